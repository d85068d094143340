// Array Iterators - Random-access iteration over type-erased elements
//
// `Iter` and `IterMut` walk an array's byte storage one element-sized chunk at
// a time and hand out element references, so standard iterator algorithms run
// over arrays whose element type is only known at runtime. `Cursor` is the
// position token shared by both flavours.

use std::iter::FusedIterator;
use std::ops::{Add, AddAssign, Range, Sub, SubAssign};
use std::slice::{ChunksExact, ChunksExactMut};

use crate::{ArrayAccess, ArrayError, ArrayResult, ElementMut, ElementRef, TypeDescriptor};

// ─────────────────────────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────────────────────────

/// Position within an array
///
/// Valid positions are `0..=len`, where `len` is one past the last element.
/// Cursors compare by index only; cursors of the same array that share an
/// index are equal regardless of which iterator produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(usize);

impl Cursor {
    /// Create a cursor at `index`
    pub fn new(index: usize) -> Self {
        Cursor(index)
    }

    /// Index of the element at this position
    pub fn index(self) -> usize {
        self.0
    }

    /// Signed distance from `self` to `other`
    pub fn distance(self, other: Cursor) -> isize {
        other - self
    }
}

impl Add<isize> for Cursor {
    type Output = Cursor;

    fn add(self, offset: isize) -> Cursor {
        Cursor(self.0.wrapping_add_signed(offset))
    }
}

impl AddAssign<isize> for Cursor {
    fn add_assign(&mut self, offset: isize) {
        *self = *self + offset;
    }
}

impl Sub<isize> for Cursor {
    type Output = Cursor;

    fn sub(self, offset: isize) -> Cursor {
        self + offset.wrapping_neg()
    }
}

impl SubAssign<isize> for Cursor {
    fn sub_assign(&mut self, offset: isize) {
        *self = *self - offset;
    }
}

impl Sub for Cursor {
    type Output = isize;

    fn sub(self, other: Cursor) -> isize {
        self.0 as isize - other.0 as isize
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Const Iterator
// ─────────────────────────────────────────────────────────────────────────────

/// Iterator over read-only element references
#[derive(Clone)]
pub struct Iter<'a> {
    chunks: ChunksExact<'a, u8>,
    element_type: &'a dyn TypeDescriptor,
    front: usize,
}

impl<'a> Iter<'a> {
    /// Iterate `bytes` as consecutive elements of `element_type`, with the
    /// first element at position `start`
    pub fn new(bytes: &'a [u8], element_type: &'a dyn TypeDescriptor, start: usize) -> Self {
        Self {
            chunks: bytes.chunks_exact(element_type.size()),
            element_type,
            front: start,
        }
    }

    /// Position of the next element
    pub fn cursor(&self) -> Cursor {
        Cursor(self.front)
    }

    /// Position one past the last remaining element
    pub fn end_cursor(&self) -> Cursor {
        Cursor(self.front + self.chunks.len())
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.chunks.next()?;
        self.front += 1;
        Some(ElementRef::new(bytes, self.element_type))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let skipped = n.min(self.chunks.len());
        let bytes = self.chunks.nth(n);
        self.front += skipped;
        let bytes = bytes?;
        self.front += 1;
        Some(ElementRef::new(bytes, self.element_type))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let bytes = self.chunks.next_back()?;
        Some(ElementRef::new(bytes, self.element_type))
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        let bytes = self.chunks.nth_back(n)?;
        Some(ElementRef::new(bytes, self.element_type))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

// ─────────────────────────────────────────────────────────────────────────────
// Mutable Iterator
// ─────────────────────────────────────────────────────────────────────────────

/// Iterator over mutable element references aliasing the live array
pub struct IterMut<'a> {
    chunks: ChunksExactMut<'a, u8>,
    element_type: &'a dyn TypeDescriptor,
    front: usize,
}

impl<'a> IterMut<'a> {
    /// Iterate `bytes` as consecutive mutable elements of `element_type`
    pub fn new(bytes: &'a mut [u8], element_type: &'a dyn TypeDescriptor, start: usize) -> Self {
        Self {
            chunks: bytes.chunks_exact_mut(element_type.size()),
            element_type,
            front: start,
        }
    }

    /// Position of the next element
    pub fn cursor(&self) -> Cursor {
        Cursor(self.front)
    }

    /// Position one past the last remaining element
    pub fn end_cursor(&self) -> Cursor {
        Cursor(self.front + self.chunks.len())
    }
}

impl<'a> Iterator for IterMut<'a> {
    type Item = ElementMut<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.chunks.next()?;
        self.front += 1;
        Some(ElementMut::new(bytes, self.element_type))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let skipped = n.min(self.chunks.len());
        let bytes = self.chunks.nth(n);
        self.front += skipped;
        let bytes = bytes?;
        self.front += 1;
        Some(ElementMut::new(bytes, self.element_type))
    }
}

impl DoubleEndedIterator for IterMut<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let bytes = self.chunks.next_back()?;
        Some(ElementMut::new(bytes, self.element_type))
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        let bytes = self.chunks.nth_back(n)?;
        Some(ElementMut::new(bytes, self.element_type))
    }
}

impl ExactSizeIterator for IterMut<'_> {}

impl FusedIterator for IterMut<'_> {}

// ─────────────────────────────────────────────────────────────────────────────
// Iterator Factories
// ─────────────────────────────────────────────────────────────────────────────

/// Check that `range` lies within an array of length `len`
pub fn check_range(range: &Range<usize>, len: usize) -> ArrayResult<()> {
    if range.start > range.end || range.end > len {
        return Err(ArrayError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

/// Iterator constructors for every [`ArrayAccess`] implementation
pub trait ArrayAccessExt: ArrayAccess {
    /// Position of the first element
    fn begin(&self) -> Cursor {
        Cursor(0)
    }

    /// Position one past the last element
    fn end(&self) -> Cursor {
        Cursor(self.len())
    }

    /// Iterate all elements
    fn iter(&self) -> Iter<'_> {
        Iter::new(self.as_bytes(), self.element_type().as_ref(), 0)
    }

    /// Iterate all elements mutably
    fn iter_mut(&mut self) -> IterMut<'_> {
        let (bytes, element_type) = self.storage_mut();
        IterMut::new(bytes, element_type, 0)
    }

    /// Iterate the elements in `range`
    fn iter_range(&self, range: Range<usize>) -> ArrayResult<Iter<'_>> {
        check_range(&range, self.len())?;
        let size = self.element_type().size();
        let bytes = &self.as_bytes()[range.start * size..range.end * size];
        Ok(Iter::new(bytes, self.element_type().as_ref(), range.start))
    }

    /// Iterate the elements in `range` mutably
    fn iter_mut_range(&mut self, range: Range<usize>) -> ArrayResult<IterMut<'_>> {
        check_range(&range, self.len())?;
        let (bytes, element_type) = self.storage_mut();
        let size = element_type.size();
        let bytes = &mut bytes[range.start * size..range.end * size];
        Ok(IterMut::new(bytes, element_type, range.start))
    }
}

impl<A: ArrayAccess + ?Sized> ArrayAccessExt for A {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PodValue, ScriptArray};

    fn ints(array: &ScriptArray) -> Vec<i32> {
        array.to_values::<i32>().unwrap()
    }

    #[test]
    fn test_cursor_arithmetic() {
        let a = Cursor::new(2);
        let b = a + 3;
        assert_eq!(b.index(), 5);
        assert_eq!(b - a, 3);
        assert_eq!(a.distance(b), 3);
        assert_eq!(b.distance(a), -3);
        assert_eq!(b - 5, Cursor::new(0));
        assert!(a < b);

        let mut c = a;
        c += 1;
        c -= 2;
        assert_eq!(c, Cursor::new(1));
    }

    #[test]
    fn test_begin_end() {
        let array = ScriptArray::from_values(&[1, 2, 3]);
        assert_eq!(array.end() - array.begin(), 3);

        let mut iter = array.iter();
        assert_eq!(iter.cursor(), array.begin());
        assert_eq!(iter.end_cursor(), array.end());
        iter.by_ref().for_each(drop);
        assert_eq!(iter.cursor(), array.end());
    }

    #[test]
    fn test_const_and_mut_cursors_agree() {
        let mut array = ScriptArray::from_values(&[1, 2, 3, 4]);

        let mut iter = array.iter();
        iter.nth(1);
        let const_cursor = iter.cursor();

        let mut iter_mut = array.iter_mut();
        iter_mut.nth(1);
        assert_eq!(iter_mut.cursor(), const_cursor);
    }

    #[test]
    fn test_random_access() {
        let array = ScriptArray::from_values(&[10, 20, 30, 40, 50]);
        let mut iter = array.iter();

        let third = iter.nth(2).unwrap();
        assert_eq!(i32::from_bytes(third.bytes()), Some(30));
        assert_eq!(iter.cursor(), Cursor::new(3));
        assert_eq!(iter.len(), 2);

        let last = iter.next_back().unwrap();
        assert_eq!(i32::from_bytes(last.bytes()), Some(50));
        assert_eq!(iter.end_cursor(), Cursor::new(4));

        assert!(iter.nth(5).is_none());
        assert_eq!(iter.cursor(), Cursor::new(4));
    }

    #[test]
    fn test_iter_mut_writes_in_place() {
        let mut array = ScriptArray::from_values(&[1, 2, 3]);
        for mut element in array.iter_mut() {
            element.assign_bytes(&7i32.to_bytes()).unwrap();
        }
        assert_eq!(ints(&array), vec![7, 7, 7]);
    }

    #[test]
    fn test_ranges() {
        let mut array = ScriptArray::from_values(&[0, 1, 2, 3, 4]);

        let iter = array.iter_range(1..3).unwrap();
        assert_eq!(iter.cursor(), Cursor::new(1));
        assert_eq!(iter.end_cursor(), Cursor::new(3));

        assert!(array.iter_range(3..1).is_err());
        assert!(array.iter_range(2..6).is_err());
        assert_eq!(array.iter_range(5..5).unwrap().len(), 0);

        for mut element in array.iter_mut_range(3..5).unwrap() {
            element.assign_bytes(&9i32.to_bytes()).unwrap();
        }
        assert_eq!(ints(&array), vec![0, 1, 2, 9, 9]);
    }
}
