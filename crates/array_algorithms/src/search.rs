// Search - Read-only algorithms driven by script predicates and comparators
//
// Every function here borrows the array immutably, walks it once through the
// element iterator and reports positions as `Option<usize>`, `None` meaning
// "not found". Script failures abort the scan and are returned unchanged.

use array_types::{
    ArrayAccess, ArrayAccessExt, ArrayError, ArrayResult, Cursor, ElementRef, TypeDescriptor,
};

use crate::{Callee, ScriptCall};

// ─────────────────────────────────────────────────────────────────────────────
// Predicate Queries
// ─────────────────────────────────────────────────────────────────────────────

/// Index of the first `i` where `pred(a[i], a[i + 1])` holds
pub fn adjacent_find<A>(array: &A, callee: Callee<'_>) -> ArrayResult<Option<usize>>
where
    A: ArrayAccess + ?Sized,
{
    let len = array.len();
    if len < 2 {
        return Ok(None);
    }

    let mut pred = ScriptCall::binary(callee, array.element_type().size());
    let mut firsts = array.iter();
    let seconds = array.iter_range(1..len)?;
    for second in seconds {
        let position = firsts.cursor();
        let Some(first) = firsts.next() else {
            break;
        };
        if pred.test_pair(first, second)? {
            return Ok(Some(position.index()));
        }
    }
    Ok(None)
}

/// Whether every element satisfies `pred`; true for an empty array
pub fn all_satisfy<A>(array: &A, callee: Callee<'_>) -> ArrayResult<bool>
where
    A: ArrayAccess + ?Sized,
{
    let mut pred = ScriptCall::unary(callee, array.element_type().size());
    for element in array.iter() {
        if !pred.test(element)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether at least one element satisfies `pred`; false for an empty array
pub fn any_satisfy<A>(array: &A, callee: Callee<'_>) -> ArrayResult<bool>
where
    A: ArrayAccess + ?Sized,
{
    Ok(find_if(array, callee)?.is_some())
}

/// Whether no element satisfies `pred`; true for an empty array
pub fn none_satisfy<A>(array: &A, callee: Callee<'_>) -> ArrayResult<bool>
where
    A: ArrayAccess + ?Sized,
{
    Ok(!any_satisfy(array, callee)?)
}

/// Number of elements satisfying `pred`
pub fn count_if<A>(array: &A, callee: Callee<'_>) -> ArrayResult<usize>
where
    A: ArrayAccess + ?Sized,
{
    let mut pred = ScriptCall::unary(callee, array.element_type().size());
    let mut count = 0;
    for element in array.iter() {
        if pred.test(element)? {
            count += 1;
        }
    }
    Ok(count)
}

/// Index of the first element satisfying `pred`
pub fn find_if<A>(array: &A, callee: Callee<'_>) -> ArrayResult<Option<usize>>
where
    A: ArrayAccess + ?Sized,
{
    let mut pred = ScriptCall::unary(callee, array.element_type().size());
    let mut iter = array.iter();
    loop {
        let position = iter.cursor();
        let Some(element) = iter.next() else {
            return Ok(None);
        };
        if pred.test(element)? {
            return Ok(Some(position.index()));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity Count
// ─────────────────────────────────────────────────────────────────────────────

/// Number of elements identical to `value` under the element descriptor
///
/// No script is involved; `value` holds the raw bytes of one element.
pub fn count<A>(array: &A, value: &[u8]) -> ArrayResult<usize>
where
    A: ArrayAccess + ?Sized,
{
    let size = array.element_type().size();
    if value.len() != size {
        return Err(ArrayError::SizeMismatch {
            expected: size,
            actual: value.len(),
        });
    }
    Ok(array
        .iter()
        .filter(|element| element.identical_to(value))
        .count())
}

// ─────────────────────────────────────────────────────────────────────────────
// Extremal Elements
// ─────────────────────────────────────────────────────────────────────────────

/// Index of the largest element under the strict ordering `less`
///
/// Among equal maxima the first one wins.
pub fn max_element_index<A>(array: &A, callee: Callee<'_>) -> ArrayResult<Option<usize>>
where
    A: ArrayAccess + ?Sized,
{
    Ok(max_element(array, callee)?.map(|(position, _)| position.index()))
}

/// Index of the smallest element under the strict ordering `less`
///
/// Among equal minima the first one wins.
pub fn min_element_index<A>(array: &A, callee: Callee<'_>) -> ArrayResult<Option<usize>>
where
    A: ArrayAccess + ?Sized,
{
    Ok(min_element(array, callee)?.map(|(position, _)| position.index()))
}

/// Largest element under `less`, `None` for an empty array
pub fn max<'a, A>(array: &'a A, callee: Callee<'_>) -> ArrayResult<Option<ElementRef<'a>>>
where
    A: ArrayAccess + ?Sized,
{
    Ok(max_element(array, callee)?.map(|(_, element)| element))
}

/// Smallest element under `less`, `None` for an empty array
pub fn min<'a, A>(array: &'a A, callee: Callee<'_>) -> ArrayResult<Option<ElementRef<'a>>>
where
    A: ArrayAccess + ?Sized,
{
    Ok(min_element(array, callee)?.map(|(_, element)| element))
}

fn max_element<'a, A>(array: &'a A, callee: Callee<'_>) -> ArrayResult<Option<(Cursor, ElementRef<'a>)>>
where
    A: ArrayAccess + ?Sized,
{
    // best < x
    extremal(array, callee, |less, best, x| less.test_pair(best, x))
}

fn min_element<'a, A>(array: &'a A, callee: Callee<'_>) -> ArrayResult<Option<(Cursor, ElementRef<'a>)>>
where
    A: ArrayAccess + ?Sized,
{
    // x < best
    extremal(array, callee, |less, best, x| less.test_pair(x, best))
}

/// Position and value of the element that no later element `replaces`
fn extremal<'a, A, F>(
    array: &'a A,
    callee: Callee<'_>,
    mut replaces: F,
) -> ArrayResult<Option<(Cursor, ElementRef<'a>)>>
where
    A: ArrayAccess + ?Sized,
    F: FnMut(&mut ScriptCall<'_, bool>, ElementRef<'_>, ElementRef<'_>) -> ArrayResult<bool>,
{
    let mut less = ScriptCall::binary(callee, array.element_type().size());
    let mut iter = array.iter();
    let mut best_position = array.begin();
    let Some(mut best) = iter.next() else {
        return Ok(None);
    };

    loop {
        let position = iter.cursor();
        let Some(element) = iter.next() else {
            break;
        };
        if replaces(&mut less, best, element)? {
            best_position = position;
            best = element;
        }
    }
    Ok(Some((best_position, best)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NativeObject, ScriptFunction, ScriptObject};
    use array_types::{PodValue, ScriptArray};

    fn predicates() -> NativeObject {
        NativeObject::new("Predicates")
            .with_binary_predicate("Equal", |a: i32, b: i32| a == b)
            .with_binary_predicate("Less", |a: i32, b: i32| a < b)
            .with_predicate("IsEven", |v: i32| v % 2 == 0)
            .with_predicate("IsNegative", |v: i32| v < 0)
            .with_predicate("IsSeven", |v: i32| v == 7)
            .with_binary_predicate("LessAbs", |a: i32, b: i32| a.abs() < b.abs())
    }

    fn resolve(object: &NativeObject, name: &str) -> ScriptFunction {
        object.find_function(name).unwrap()
    }

    #[test]
    fn test_adjacent_find() {
        let object = predicates();
        let equal = resolve(&object, "Equal");
        let callee = Callee::new(&object, &equal);

        let array = ScriptArray::from_values(&[1, 2, 2, 3]);
        assert_eq!(adjacent_find(&array, callee).unwrap(), Some(1));

        let last_pair = ScriptArray::from_values(&[1, 2, 3, 3]);
        assert_eq!(adjacent_find(&last_pair, callee).unwrap(), Some(2));

        let distinct = ScriptArray::from_values(&[1, 2, 3]);
        assert_eq!(adjacent_find(&distinct, callee).unwrap(), None);

        let single = ScriptArray::from_values(&[1]);
        assert_eq!(adjacent_find(&single, callee).unwrap(), None);

        let empty = ScriptArray::from_values::<i32>(&[]);
        assert_eq!(adjacent_find(&empty, callee).unwrap(), None);
    }

    #[test]
    fn test_satisfy_queries() {
        let object = predicates();
        let is_even = resolve(&object, "IsEven");
        let callee = Callee::new(&object, &is_even);

        let evens = ScriptArray::from_values(&[2, 4, 6]);
        assert!(all_satisfy(&evens, callee).unwrap());
        assert!(any_satisfy(&evens, callee).unwrap());
        assert!(!none_satisfy(&evens, callee).unwrap());

        let mixed = ScriptArray::from_values(&[1, 2, 3]);
        assert!(!all_satisfy(&mixed, callee).unwrap());
        assert!(any_satisfy(&mixed, callee).unwrap());
        assert!(!none_satisfy(&mixed, callee).unwrap());

        let odds = ScriptArray::from_values(&[1, 3]);
        assert!(!any_satisfy(&odds, callee).unwrap());
        assert!(none_satisfy(&odds, callee).unwrap());
    }

    #[test]
    fn test_vacuous_truths() {
        let object = predicates();
        let is_even = resolve(&object, "IsEven");
        let callee = Callee::new(&object, &is_even);

        let empty = ScriptArray::from_values::<i32>(&[]);
        assert!(all_satisfy(&empty, callee).unwrap());
        assert!(!any_satisfy(&empty, callee).unwrap());
        assert!(none_satisfy(&empty, callee).unwrap());
        assert_eq!(count_if(&empty, callee).unwrap(), 0);
        assert_eq!(find_if(&empty, callee).unwrap(), None);
    }

    #[test]
    fn test_find_and_count_if() {
        let object = predicates();
        let is_negative = resolve(&object, "IsNegative");
        let callee = Callee::new(&object, &is_negative);

        let array = ScriptArray::from_values(&[3, -1, 4, -1, 5]);
        assert_eq!(find_if(&array, callee).unwrap(), Some(1));
        assert_eq!(count_if(&array, callee).unwrap(), 2);
    }

    #[test]
    fn test_count_agrees_with_count_if() {
        let object = predicates();
        let is_seven = resolve(&object, "IsSeven");

        let array = ScriptArray::from_values(&[7, 1, 7, 7, 2]);
        let counted = count(&array, &7i32.to_bytes()).unwrap();
        let counted_if = count_if(&array, Callee::new(&object, &is_seven)).unwrap();
        assert_eq!(counted, 3);
        assert_eq!(counted, counted_if);

        assert_eq!(count(&array, &9i32.to_bytes()).unwrap(), 0);
    }

    #[test]
    fn test_count_rejects_wrong_size() {
        let array = ScriptArray::from_values(&[1, 2]);
        assert_eq!(
            count(&array, &1i64.to_bytes()),
            Err(ArrayError::SizeMismatch {
                expected: 4,
                actual: 8
            })
        );
    }

    #[test]
    fn test_count_floats_numerically() {
        let array = ScriptArray::from_values(&[0.0f32, -0.0, 1.0]);
        assert_eq!(count(&array, &0.0f32.to_bytes()).unwrap(), 2);
    }

    #[test]
    fn test_max_and_min_element_index() {
        let object = predicates();
        let less = resolve(&object, "Less");
        let callee = Callee::new(&object, &less);

        let array = ScriptArray::from_values(&[3, 1, 4, 1, 5]);
        assert_eq!(max_element_index(&array, callee).unwrap(), Some(4));
        assert_eq!(min_element_index(&array, callee).unwrap(), Some(1));

        let empty = ScriptArray::from_values::<i32>(&[]);
        assert_eq!(max_element_index(&empty, callee).unwrap(), None);
        assert_eq!(min_element_index(&empty, callee).unwrap(), None);
    }

    #[test]
    fn test_first_extremal_wins() {
        let object = predicates();
        let less_abs = resolve(&object, "LessAbs");
        let callee = Callee::new(&object, &less_abs);

        let array = ScriptArray::from_values(&[2, -5, 1, 5, -1]);
        assert_eq!(max_element_index(&array, callee).unwrap(), Some(1));
        assert_eq!(min_element_index(&array, callee).unwrap(), Some(2));
    }

    #[test]
    fn test_max_and_min_values() {
        let object = predicates();
        let less = resolve(&object, "Less");
        let callee = Callee::new(&object, &less);

        let array = ScriptArray::from_values(&[3, 1, 4, 1, 5]);
        let max = max(&array, callee).unwrap().unwrap();
        let min = min(&array, callee).unwrap().unwrap();
        assert_eq!(i32::from_bytes(max.bytes()), Some(5));
        assert_eq!(i32::from_bytes(min.bytes()), Some(1));

        let empty = ScriptArray::from_values::<i32>(&[]);
        assert!(super::max(&empty, callee).unwrap().is_none());
    }

    #[test]
    fn test_unbound_predicate_fails() {
        let object = predicates();
        let stray = ScriptFunction::new("Stray", 99);
        let array = ScriptArray::from_values(&[1, 2]);

        let err = count_if(&array, Callee::new(&object, &stray)).unwrap_err();
        assert!(matches!(err, ArrayError::Invoke(msg) if msg.contains("Stray")));
    }
}
