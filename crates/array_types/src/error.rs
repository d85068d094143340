// Array Errors - Failures raised while operating on type-erased arrays

// ─────────────────────────────────────────────────────────────────────────────
// Array Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while reading, writing or calling with array elements
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArrayError {
    #[error("Element types differ: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Element size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Element type {0} has zero size")]
    ZeroSizedElement(String),

    #[error("Range {start}..{end} is invalid for an array of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Expected {expected} call arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("Script call failed: {0}")]
    Invoke(String),
}

/// Result type for array operations
pub type ArrayResult<T> = Result<T, ArrayError>;
