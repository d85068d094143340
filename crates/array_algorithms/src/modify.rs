// Modify - Algorithms that rewrite or shrink an array in place
//
// Ranges are half-open and checked against the array length before anything
// is written. Every write goes through a mutable element reference handed out
// by the array's iterator, using the descriptor's raw copy.

use std::ops::Range;

use array_types::{
    check_range, ArrayAccess, ArrayAccessExt, ArrayError, ArrayResult, ElementMut, TypeDescriptor,
};

use crate::{Callee, ScriptCall};

fn check_value_size(element_type: &dyn TypeDescriptor, value: &[u8]) -> ArrayResult<()> {
    if value.len() != element_type.size() {
        return Err(ArrayError::SizeMismatch {
            expected: element_type.size(),
            actual: value.len(),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Fill
// ─────────────────────────────────────────────────────────────────────────────

/// Overwrite every element with a copy of `value`
pub fn fill<A>(array: &mut A, value: &[u8]) -> ArrayResult<()>
where
    A: ArrayAccess + ?Sized,
{
    let (begin, end) = (array.begin(), array.end());
    fill_range(array, begin.index()..end.index(), value)
}

/// Overwrite the elements in `range` with a copy of `value`
pub fn fill_range<A>(array: &mut A, range: Range<usize>, value: &[u8]) -> ArrayResult<()>
where
    A: ArrayAccess + ?Sized,
{
    check_value_size(array.element_type().as_ref(), value)?;
    for mut element in array.iter_mut_range(range)? {
        element.assign_bytes(value)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Remove
// ─────────────────────────────────────────────────────────────────────────────

/// Remove the elements in `range`, shifting later elements down
///
/// Returns the number of elements removed.
pub fn remove_range<A>(array: &mut A, range: Range<usize>) -> ArrayResult<usize>
where
    A: ArrayAccess + ?Sized,
{
    check_range(&range, array.len())?;
    let count = range.len();
    if count > 0 {
        array.remove(range.start, count);
    }
    Ok(count)
}

/// Remove every element satisfying `pred`, keeping survivors in order
///
/// Returns the number of elements removed. If a predicate call fails, the
/// elements already rejected are still removed and the rest of the array is
/// left as it was.
pub fn remove_if<A>(array: &mut A, callee: Callee<'_>) -> ArrayResult<usize>
where
    A: ArrayAccess + ?Sized,
{
    let mut pred = ScriptCall::unary(callee, array.element_type().size());
    let mut kept = 0;
    let mut scanned = 0;
    let outcome = {
        let mut slots: Vec<ElementMut<'_>> = array.iter_mut().collect();
        compact(&mut slots, &mut pred, &mut kept, &mut scanned)
    };

    let removed = scanned - kept;
    if removed > 0 {
        array.remove(kept, removed);
    }
    tracing::debug!(removed, "RemoveIf compacted array");
    outcome.map(|()| removed)
}

/// Move survivors of `pred` to the front; `kept..scanned` is left as a gap
fn compact(
    slots: &mut [ElementMut<'_>],
    pred: &mut ScriptCall<'_, bool>,
    kept: &mut usize,
    scanned: &mut usize,
) -> ArrayResult<()> {
    while *scanned < slots.len() {
        let read = *scanned;
        if !pred.test(slots[read].as_ref())? {
            if *kept != read {
                let (front, rest) = slots.split_at_mut(read);
                front[*kept].assign(rest[0].as_ref())?;
            }
            *kept += 1;
        }
        *scanned += 1;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Sort
// ─────────────────────────────────────────────────────────────────────────────

/// Sort the array in place under the strict ordering `less`
///
/// The relative order of equal elements is unspecified. Elements are sorted
/// as detached copies and written back once every comparison has succeeded;
/// on failure the array is untouched. A comparator that is not a strict weak
/// order leaves the elements in some permutation of their input.
pub fn sort<A>(array: &mut A, callee: Callee<'_>) -> ArrayResult<()>
where
    A: ArrayAccess + ?Sized,
{
    let len = array.len();
    if len < 2 {
        return Ok(());
    }

    let mut less = ScriptCall::binary(callee, array.element_type().size());
    let mut slots: Vec<ElementMut<'_>> = array.iter_mut().collect();
    let values: Vec<ElementMut<'_>> = slots.iter().map(ElementMut::clone).collect();

    let sorted = merge_sort(values, |a, b| less.test_pair(a.as_ref(), b.as_ref()))?;
    tracing::debug!(len, comparisons = less.calls(), "Sorted array");

    for (slot, value) in slots.iter_mut().zip(&sorted) {
        slot.assign(value.as_ref())?;
    }
    Ok(())
}

/// Bottom-up merge sort of owned values under a fallible `less`
fn merge_sort<'a, F>(values: Vec<ElementMut<'a>>, mut less: F) -> ArrayResult<Vec<ElementMut<'a>>>
where
    F: FnMut(&ElementMut<'a>, &ElementMut<'a>) -> ArrayResult<bool>,
{
    let mut runs: Vec<Vec<ElementMut<'a>>> = values.into_iter().map(|value| vec![value]).collect();
    while runs.len() > 1 {
        let mut merged = Vec::with_capacity(runs.len().div_ceil(2));
        let mut pairs = runs.into_iter();
        while let Some(left) = pairs.next() {
            match pairs.next() {
                Some(right) => merged.push(merge(left, right, &mut less)?),
                None => merged.push(left),
            }
        }
        runs = merged;
    }
    Ok(runs.pop().unwrap_or_default())
}

fn merge<'a, F>(
    left: Vec<ElementMut<'a>>,
    right: Vec<ElementMut<'a>>,
    less: &mut F,
) -> ArrayResult<Vec<ElementMut<'a>>>
where
    F: FnMut(&ElementMut<'a>, &ElementMut<'a>) -> ArrayResult<bool>,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Ties take from the left run
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => less(r, l)?,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    Ok(merged)
}
