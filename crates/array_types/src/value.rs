//! Native values that can be stored in script arrays
//!
//! [`PodValue`] bridges Rust scalars and the raw element bytes held by a
//! [`ScriptArray`](crate::ScriptArray). Bytes are in native endian order.

use crate::ElementType;

/// A Rust scalar with a fixed element type and a byte representation
pub trait PodValue: Copy + Sized {
    /// Element type used to store this value
    fn element_type() -> ElementType;

    /// Encode the value as element bytes
    fn to_bytes(self) -> Vec<u8>;

    /// Decode a value from element bytes, `None` if the length is wrong
    fn from_bytes(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_pod_value {
    ($ty:ty, $element:expr) => {
        impl PodValue for $ty {
            fn element_type() -> ElementType {
                $element
            }

            fn to_bytes(self) -> Vec<u8> {
                self.to_ne_bytes().to_vec()
            }

            fn from_bytes(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok().map(<$ty>::from_ne_bytes)
            }
        }
    };
}

impl_pod_value!(u8, ElementType::Byte);
impl_pod_value!(i32, ElementType::Integer);
impl_pod_value!(i64, ElementType::Integer64);
impl_pod_value!(f32, ElementType::Real);
impl_pod_value!(f64, ElementType::Double);

impl PodValue for bool {
    fn element_type() -> ElementType {
        ElementType::Boolean
    }

    fn to_bytes(self) -> Vec<u8> {
        vec![u8::from(self)]
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b] => Some(*b != 0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeDescriptor;

    #[test]
    fn test_sizes_match_element_types() {
        assert_eq!(7i32.to_bytes().len(), i32::element_type().size());
        assert_eq!(1.5f64.to_bytes().len(), f64::element_type().size());
        assert_eq!(true.to_bytes().len(), bool::element_type().size());
    }

    #[test]
    fn test_decode() {
        assert_eq!(i32::from_bytes(&(-42i32).to_bytes()), Some(-42));
        assert_eq!(bool::from_bytes(&[2]), Some(true));
        assert_eq!(i32::from_bytes(&[1, 2]), None);
    }
}
