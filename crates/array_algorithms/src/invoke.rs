// Invoke - The dynamic call seam between algorithms and the scripting host
//
// Algorithms never call into a script VM directly. They hand a raw parameter
// block to an `Invoker`, which runs the named function and writes its return
// value into the trailing slot of that block.

use std::fmt;
use std::sync::Arc;

use array_types::ArrayError;

// ─────────────────────────────────────────────────────────────────────────────
// Invoke Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors reported by an invoker
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    #[error("Function not bound: {0}")]
    UnboundFunction(String),

    #[error("Parameter block for {function} is {actual} bytes, expected {expected}")]
    ParamBlockSize {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Function {function} failed: {message}")]
    Failed { function: String, message: String },
}

impl From<InvokeError> for ArrayError {
    fn from(err: InvokeError) -> Self {
        ArrayError::Invoke(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Script Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a resolved script function
///
/// `id` is assigned by the object that resolved the function and is only
/// meaningful to that object's invoker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptFunction {
    pub name: String,
    pub id: usize,
}

impl ScriptFunction {
    pub fn new(name: impl Into<String>, id: usize) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

impl fmt::Display for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invoker Traits
// ─────────────────────────────────────────────────────────────────────────────

/// Synchronous dynamic call mechanism
pub trait Invoker {
    /// Run `function` with `params` as its parameter block
    ///
    /// `params` holds the arguments back to back followed by the return slot;
    /// the function writes its result into that slot before returning.
    fn invoke(&self, function: &ScriptFunction, params: &mut [u8]) -> Result<(), InvokeError>;
}

/// An object that script functions are resolved on and invoked against
pub trait ScriptObject: Invoker + Send + Sync {
    /// Name of the object, for diagnostics
    fn object_name(&self) -> &str;

    /// Resolve a function by name
    fn find_function(&self, name: &str) -> Option<ScriptFunction>;
}

impl<T: ScriptObject + ?Sized> Invoker for Arc<T> {
    fn invoke(&self, function: &ScriptFunction, params: &mut [u8]) -> Result<(), InvokeError> {
        (**self).invoke(function, params)
    }
}

/// A resolved function together with the invoker that runs it
#[derive(Clone, Copy)]
pub struct Callee<'a> {
    pub invoker: &'a dyn Invoker,
    pub function: &'a ScriptFunction,
}

impl<'a> Callee<'a> {
    pub fn new(invoker: &'a dyn Invoker, function: &'a ScriptFunction) -> Self {
        Self { invoker, function }
    }
}

impl fmt::Debug for Callee<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callee")
            .field("function", &self.function.name)
            .finish()
    }
}
