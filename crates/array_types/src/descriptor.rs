// Type Descriptors - Runtime description of an array element type
//
// A descriptor is all an algorithm knows about the elements it touches: how
// many bytes one element occupies, whether two element types are compatible,
// and how two values are compared and copied.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Type Descriptor Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime handle describing one element type
///
/// Implementations must describe plain old data: a value is fully defined by
/// its `size()` bytes and may be duplicated with a byte copy.
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    /// Type name, unique among compatible types
    fn name(&self) -> &str;

    /// Size of one element in bytes
    fn size(&self) -> usize;

    /// Check whether values of `other` may be compared with or copied into
    /// values of this type
    fn same_type(&self, other: &dyn TypeDescriptor) -> bool {
        self.name() == other.name() && self.size() == other.size()
    }

    /// Identity comparison of two raw values of this type
    fn identical(&self, a: &[u8], b: &[u8]) -> bool {
        a == b
    }

    /// Copy the value in `src` into `dst`
    fn copy_value(&self, dst: &mut [u8], src: &[u8]) {
        dst.copy_from_slice(src);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Element Types
// ─────────────────────────────────────────────────────────────────────────────

/// Element types provided by the host binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ElementType {
    /// Boolean stored in one byte (0 or 1)
    Boolean,
    /// Unsigned 8-bit integer
    Byte,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Integer64,
    /// 32-bit floating point
    Real,
    /// 64-bit floating point
    Double,
    /// User-defined plain struct, compared byte for byte
    Struct { struct_id: String, size: usize },
}

impl ElementType {
    /// Create a struct element type
    pub fn structure(struct_id: impl Into<String>, size: usize) -> Self {
        ElementType::Struct {
            struct_id: struct_id.into(),
            size,
        }
    }
}

impl TypeDescriptor for ElementType {
    fn name(&self) -> &str {
        match self {
            ElementType::Boolean => "Boolean",
            ElementType::Byte => "Byte",
            ElementType::Integer => "Integer",
            ElementType::Integer64 => "Integer64",
            ElementType::Real => "Real",
            ElementType::Double => "Double",
            ElementType::Struct { struct_id, .. } => struct_id,
        }
    }

    fn size(&self) -> usize {
        match self {
            ElementType::Boolean | ElementType::Byte => 1,
            ElementType::Integer | ElementType::Real => 4,
            ElementType::Integer64 | ElementType::Double => 8,
            ElementType::Struct { size, .. } => *size,
        }
    }

    // Floats compare numerically, so 0.0 and -0.0 are identical and NaN never is.
    fn identical(&self, a: &[u8], b: &[u8]) -> bool {
        match self {
            ElementType::Real => match (<[u8; 4]>::try_from(a), <[u8; 4]>::try_from(b)) {
                (Ok(a), Ok(b)) => f32::from_ne_bytes(a) == f32::from_ne_bytes(b),
                _ => false,
            },
            ElementType::Double => match (<[u8; 8]>::try_from(a), <[u8; 8]>::try_from(b)) {
                (Ok(a), Ok(b)) => f64::from_ne_bytes(a) == f64::from_ne_bytes(b),
                _ => false,
            },
            _ => a == b,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
