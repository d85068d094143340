// Script Arrays - Resizable arrays whose element type is known only at runtime
//
// Storage is a single contiguous byte buffer; element `i` occupies
// `[i * size, (i + 1) * size)` where `size` comes from the element descriptor.

use std::fmt;
use std::sync::Arc;

use crate::{ArrayError, ArrayResult, ElementMut, ElementRef, PodValue, TypeDescriptor};

// ─────────────────────────────────────────────────────────────────────────────
// Array Access Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Access to the storage of a type-erased array
///
/// This is the only view the algorithms have of an array. Hosts with their own
/// array representation implement it over that storage.
pub trait ArrayAccess {
    /// Descriptor of the element type
    fn element_type(&self) -> &Arc<dyn TypeDescriptor>;

    /// Number of elements
    fn len(&self) -> usize;

    /// Check if the array has no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All element bytes, `len() * size` long
    fn as_bytes(&self) -> &[u8];

    /// All element bytes, mutable, together with the element descriptor
    fn storage_mut(&mut self) -> (&mut [u8], &dyn TypeDescriptor);

    /// Remove `count` elements starting at `index`, shifting the rest down
    fn remove(&mut self, index: usize, count: usize);

    /// Append one element and return its bytes
    ///
    /// The new slot is zero-filled; callers overwrite it right away.
    fn append_uninitialized(&mut self) -> &mut [u8];
}

// ─────────────────────────────────────────────────────────────────────────────
// Script Array
// ─────────────────────────────────────────────────────────────────────────────

/// Owned dynamic array of plain-data elements
#[derive(Clone)]
pub struct ScriptArray {
    element_type: Arc<dyn TypeDescriptor>,
    data: Vec<u8>,
}

impl ScriptArray {
    /// Create an empty array of the given element type
    pub fn new(element_type: Arc<dyn TypeDescriptor>) -> ArrayResult<Self> {
        Self::with_capacity(element_type, 0)
    }

    /// Create an empty array with room for `capacity` elements
    pub fn with_capacity(
        element_type: Arc<dyn TypeDescriptor>,
        capacity: usize,
    ) -> ArrayResult<Self> {
        let size = element_type.size();
        if size == 0 {
            return Err(ArrayError::ZeroSizedElement(element_type.name().to_string()));
        }
        Ok(Self {
            data: Vec::with_capacity(capacity * size),
            element_type,
        })
    }

    /// Create an array from native values
    pub fn from_values<T: PodValue>(values: &[T]) -> Self {
        let element_type = T::element_type();
        let mut data = Vec::with_capacity(values.len() * element_type.size());
        for value in values {
            data.extend_from_slice(&value.to_bytes());
        }
        Self {
            element_type: Arc::new(element_type),
            data,
        }
    }

    /// Read all elements back as native values
    pub fn to_values<T: PodValue>(&self) -> ArrayResult<Vec<T>> {
        let expected = T::element_type();
        if !expected.same_type(self.element_type.as_ref()) {
            return Err(ArrayError::TypeMismatch {
                expected: expected.to_string(),
                actual: self.element_type.name().to_string(),
            });
        }
        self.data
            .chunks_exact(self.element_size())
            .map(|chunk| {
                T::from_bytes(chunk).ok_or(ArrayError::SizeMismatch {
                    expected: expected.size(),
                    actual: chunk.len(),
                })
            })
            .collect()
    }

    /// Size of one element in bytes
    pub fn element_size(&self) -> usize {
        self.element_type.size()
    }

    /// Get a reference to the element at `index`
    pub fn element(&self, index: usize) -> Option<ElementRef<'_>> {
        let size = self.element_size();
        let bytes = self.data.get(index * size..(index + 1) * size)?;
        Some(ElementRef::new(bytes, self.element_type.as_ref()))
    }

    /// Get a mutable reference to the element at `index`
    pub fn element_mut(&mut self, index: usize) -> Option<ElementMut<'_>> {
        let size = self.element_size();
        let bytes = self.data.get_mut(index * size..(index + 1) * size)?;
        Some(ElementMut::new(bytes, self.element_type.as_ref()))
    }

    /// Append a copy of `value` to the end of the array
    pub fn push(&mut self, value: ElementRef<'_>) -> ArrayResult<()> {
        let element_type = Arc::clone(&self.element_type);
        let slot = self.append_uninitialized();
        let appended = ElementMut::new(slot, element_type.as_ref()).assign(value);
        if appended.is_err() {
            let len = self.len();
            self.remove(len - 1, 1);
        }
        appended
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl ArrayAccess for ScriptArray {
    fn element_type(&self) -> &Arc<dyn TypeDescriptor> {
        &self.element_type
    }

    fn len(&self) -> usize {
        self.data.len() / self.element_size()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn storage_mut(&mut self) -> (&mut [u8], &dyn TypeDescriptor) {
        (&mut self.data, self.element_type.as_ref())
    }

    fn remove(&mut self, index: usize, count: usize) {
        let size = self.element_size();
        self.data.drain(index * size..(index + count) * size);
    }

    fn append_uninitialized(&mut self) -> &mut [u8] {
        let size = self.element_size();
        let start = self.data.len();
        self.data.resize(start + size, 0);
        &mut self.data[start..]
    }
}

impl fmt::Debug for ScriptArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptArray")
            .field("type", &self.element_type.name())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementType;

    #[test]
    fn test_values_roundtrip() {
        let array = ScriptArray::from_values(&[3, 1, 4]);
        assert_eq!(array.len(), 3);
        assert_eq!(array.element_size(), 4);
        assert_eq!(array.to_values::<i32>().unwrap(), vec![3, 1, 4]);
    }

    #[test]
    fn test_to_values_type_mismatch() {
        let array = ScriptArray::from_values(&[1.0f32, 2.0]);
        assert!(matches!(
            array.to_values::<i32>(),
            Err(ArrayError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_sized_element_rejected() {
        let result = ScriptArray::new(Arc::new(ElementType::structure("Empty", 0)));
        assert!(matches!(result, Err(ArrayError::ZeroSizedElement(_))));
    }

    #[test]
    fn test_remove() {
        let mut array = ScriptArray::from_values(&[0, 1, 2, 3, 4]);
        array.remove(1, 2);
        assert_eq!(array.to_values::<i32>().unwrap(), vec![0, 3, 4]);
    }

    #[test]
    fn test_push_checks_type() {
        let mut array = ScriptArray::from_values(&[1, 2]);
        let other = ScriptArray::from_values(&[3, 4]);
        let real = ScriptArray::from_values(&[5.0f32]);

        array.push(other.element(1).unwrap()).unwrap();
        assert_eq!(array.to_values::<i32>().unwrap(), vec![1, 2, 4]);

        assert!(array.push(real.element(0).unwrap()).is_err());
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn test_element_access() {
        let mut array = ScriptArray::from_values(&[10, 20]);
        assert!(array.element(2).is_none());

        array
            .element_mut(0)
            .unwrap()
            .assign_bytes(&30i32.to_bytes())
            .unwrap();
        assert_eq!(array.to_values::<i32>().unwrap(), vec![30, 20]);
    }
}
