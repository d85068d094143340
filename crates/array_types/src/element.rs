// Element References - Type-erased handles standing in for one array slot
//
// An element reference pairs the raw bytes of one value with the descriptor
// of its type. Generic algorithms compare, copy and swap elements through
// these handles without knowing the concrete element type.

use std::fmt;

use crate::{ArrayError, ArrayResult, TypeDescriptor};

fn check_compatible(dst: &dyn TypeDescriptor, src: &dyn TypeDescriptor) -> ArrayResult<()> {
    if !dst.same_type(src) {
        return Err(ArrayError::TypeMismatch {
            expected: dst.name().to_string(),
            actual: src.name().to_string(),
        });
    }
    if dst.size() != src.size() {
        return Err(ArrayError::SizeMismatch {
            expected: dst.size(),
            actual: src.size(),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Const Element Reference
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only reference to one element
///
/// Never owns memory. Valid for as long as the array storage it borrows.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    bytes: &'a [u8],
    element_type: &'a dyn TypeDescriptor,
}

impl<'a> ElementRef<'a> {
    /// Create a reference over the bytes of one element
    pub fn new(bytes: &'a [u8], element_type: &'a dyn TypeDescriptor) -> Self {
        debug_assert_eq!(bytes.len(), element_type.size());
        Self {
            bytes,
            element_type,
        }
    }

    /// Raw bytes of the element
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Descriptor of the element type
    pub fn element_type(&self) -> &'a dyn TypeDescriptor {
        self.element_type
    }

    /// Compare with a raw value of the same type, without a type check
    pub fn identical_to(&self, value: &[u8]) -> bool {
        self.element_type.identical(self.bytes, value)
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element_type.same_type(other.element_type)
            && self.element_type.identical(self.bytes, other.bytes)
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("type", &self.element_type.name())
            .field("bytes", &self.bytes)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutable Element Reference
// ─────────────────────────────────────────────────────────────────────────────

/// Storage behind a mutable element reference
enum Slot<'a> {
    /// Alias into live array storage
    Borrowed(&'a mut [u8]),
    /// Detached copy owned by the reference
    Owned(Box<[u8]>),
}

/// Mutable reference to one element
///
/// A reference obtained from an array aliases the live slot, so writes through
/// it mutate the array in place. Cloning produces a detached value that owns a
/// fresh buffer holding a copy of the element; such values serve as temporaries
/// when elements are shuffled around.
pub struct ElementMut<'a> {
    slot: Slot<'a>,
    element_type: &'a dyn TypeDescriptor,
}

impl<'a> ElementMut<'a> {
    /// Create a reference aliasing the bytes of one live element
    pub fn new(bytes: &'a mut [u8], element_type: &'a dyn TypeDescriptor) -> Self {
        debug_assert_eq!(bytes.len(), element_type.size());
        Self {
            slot: Slot::Borrowed(bytes),
            element_type,
        }
    }

    /// Raw bytes of the element
    pub fn bytes(&self) -> &[u8] {
        match &self.slot {
            Slot::Borrowed(bytes) => bytes,
            Slot::Owned(buf) => buf,
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match &mut self.slot {
            Slot::Borrowed(bytes) => bytes,
            Slot::Owned(buf) => buf,
        }
    }

    /// Descriptor of the element type
    pub fn element_type(&self) -> &'a dyn TypeDescriptor {
        self.element_type
    }

    /// Whether this reference owns a detached copy
    pub fn is_owned(&self) -> bool {
        matches!(self.slot, Slot::Owned(_))
    }

    /// Borrow as a const reference
    pub fn as_ref(&self) -> ElementRef<'_> {
        ElementRef {
            bytes: self.bytes(),
            element_type: self.element_type,
        }
    }

    /// Copy the value of `src` into this element
    pub fn assign(&mut self, src: ElementRef<'_>) -> ArrayResult<()> {
        check_compatible(self.element_type, src.element_type)?;
        let element_type = self.element_type;
        element_type.copy_value(self.bytes_mut(), src.bytes);
        Ok(())
    }

    /// Copy a raw value into this element, without a type check
    pub fn assign_bytes(&mut self, value: &[u8]) -> ArrayResult<()> {
        let size = self.element_type.size();
        if value.len() != size {
            return Err(ArrayError::SizeMismatch {
                expected: size,
                actual: value.len(),
            });
        }
        let element_type = self.element_type;
        element_type.copy_value(self.bytes_mut(), value);
        Ok(())
    }

    /// Exchange the contents of two elements
    pub fn swap(&mut self, other: &mut ElementMut<'_>) -> ArrayResult<()> {
        check_compatible(self.element_type, other.element_type)?;
        self.bytes_mut().swap_with_slice(other.bytes_mut());
        Ok(())
    }
}

impl Clone for ElementMut<'_> {
    fn clone(&self) -> Self {
        Self {
            slot: Slot::Owned(self.bytes().into()),
            element_type: self.element_type,
        }
    }
}

impl fmt::Debug for ElementMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementMut")
            .field("type", &self.element_type.name())
            .field("owned", &self.is_owned())
            .field("bytes", &self.bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementType, PodValue};

    #[test]
    fn test_equality_requires_same_type() {
        let a = 7i32.to_bytes();
        let b = 7i32.to_bytes();
        let real = 7.0f32.to_bytes();

        let int_a = ElementRef::new(&a, &ElementType::Integer);
        let int_b = ElementRef::new(&b, &ElementType::Integer);
        let as_real = ElementRef::new(&real, &ElementType::Real);

        assert_eq!(int_a, int_b);
        assert_ne!(int_a, as_real);
        assert!(int_a.identical_to(&b));
    }

    #[test]
    fn test_assign_writes_through() {
        let mut slot = 1i32.to_bytes();
        let src = 99i32.to_bytes();
        {
            let mut dst = ElementMut::new(&mut slot, &ElementType::Integer);
            dst.assign(ElementRef::new(&src, &ElementType::Integer)).unwrap();
        }
        assert_eq!(i32::from_bytes(&slot), Some(99));
    }

    #[test]
    fn test_assign_type_mismatch() {
        let mut slot = 1i32.to_bytes();
        let src = 2.0f32.to_bytes();
        let mut dst = ElementMut::new(&mut slot, &ElementType::Integer);

        let err = dst
            .assign(ElementRef::new(&src, &ElementType::Real))
            .unwrap_err();
        assert!(matches!(err, ArrayError::TypeMismatch { .. }));
        assert_eq!(i32::from_bytes(dst.bytes()), Some(1));
    }

    #[test]
    fn test_assign_bytes_checks_size() {
        let mut slot = 1i32.to_bytes();
        let mut dst = ElementMut::new(&mut slot, &ElementType::Integer);
        assert_eq!(
            dst.assign_bytes(&[1, 2]),
            Err(ArrayError::SizeMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_swap_exchanges_contents() {
        let mut a = 1i32.to_bytes();
        let mut b = 2i32.to_bytes();
        {
            let mut ra = ElementMut::new(&mut a, &ElementType::Integer);
            let mut rb = ElementMut::new(&mut b, &ElementType::Integer);
            ra.swap(&mut rb).unwrap();
        }
        assert_eq!(i32::from_bytes(&a), Some(2));
        assert_eq!(i32::from_bytes(&b), Some(1));
    }

    #[test]
    fn test_swap_type_mismatch() {
        let mut a = 1i32.to_bytes();
        let mut b = 2.0f32.to_bytes();
        let mut ra = ElementMut::new(&mut a, &ElementType::Integer);
        let mut rb = ElementMut::new(&mut b, &ElementType::Real);
        assert!(ra.swap(&mut rb).is_err());
    }

    #[test]
    fn test_clone_detaches() {
        let mut slot = 5i32.to_bytes();
        let mut live = ElementMut::new(&mut slot, &ElementType::Integer);
        assert!(!live.is_owned());

        let copy = live.clone();
        assert!(copy.is_owned());

        live.assign_bytes(&6i32.to_bytes()).unwrap();
        assert_eq!(i32::from_bytes(copy.bytes()), Some(5));
        assert_eq!(i32::from_bytes(live.bytes()), Some(6));
    }
}
