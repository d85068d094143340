// Marshal - Packs element arguments into a parameter block and calls a script
//
// A `ScriptCall` owns one scratch buffer laid out as
// `[arg 0][arg 1]...[arg n-1][return value]`. The buffer is allocated once
// when the call is built and reused for every invocation, so an algorithm pays
// for one allocation no matter how many comparisons it makes.

use std::fmt;
use std::marker::PhantomData;

use array_types::{ArrayError, ArrayResult, ElementRef, PodValue, TypeDescriptor};

use crate::Callee;

// ─────────────────────────────────────────────────────────────────────────────
// Parameter Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Shape of one argument in a parameter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// A value of the array's element type
    Element,
    /// A plain value of fixed size
    Plain(usize),
}

/// Byte layout of a parameter block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLayout {
    slots: Vec<Slot>,
    return_offset: usize,
    total_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    shape: ArgShape,
    offset: usize,
    size: usize,
}

impl ParamLayout {
    /// Lay out `shapes` back to back, element arguments taking `element_size`
    /// bytes each, followed by a return slot of `return_size` bytes
    pub fn new(element_size: usize, shapes: &[ArgShape], return_size: usize) -> Self {
        let mut offset = 0;
        let slots = shapes
            .iter()
            .map(|&shape| {
                let size = match shape {
                    ArgShape::Element => element_size,
                    ArgShape::Plain(size) => size,
                };
                let slot = Slot {
                    shape,
                    offset,
                    size,
                };
                offset += size;
                slot
            })
            .collect();

        Self {
            slots,
            return_offset: offset,
            total_size: offset + return_size,
        }
    }

    /// Number of arguments
    pub fn arg_count(&self) -> usize {
        self.slots.len()
    }

    /// Byte offset of argument `index`
    pub fn arg_offset(&self, index: usize) -> Option<usize> {
        self.slots.get(index).map(|slot| slot.offset)
    }

    /// Byte offset of the return slot
    pub fn return_offset(&self) -> usize {
        self.return_offset
    }

    /// Size of the whole parameter block
    pub fn total_size(&self) -> usize {
        self.total_size
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Script Call
// ─────────────────────────────────────────────────────────────────────────────

/// One argument passed to a script call
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Element(ElementRef<'a>),
    Plain(&'a [u8]),
}

/// Reusable call of one script function with a fixed signature
pub struct ScriptCall<'a, R> {
    callee: Callee<'a>,
    layout: ParamLayout,
    scratch: Vec<u8>,
    calls: usize,
    _return: PhantomData<fn() -> R>,
}

impl<'a, R: PodValue> ScriptCall<'a, R> {
    /// Prepare a call whose arguments have the given shapes
    pub fn new(callee: Callee<'a>, element_size: usize, shapes: &[ArgShape]) -> Self {
        let return_size = R::element_type().size();
        let layout = ParamLayout::new(element_size, shapes, return_size);
        Self {
            callee,
            scratch: vec![0; layout.total_size()],
            layout,
            calls: 0,
            _return: PhantomData,
        }
    }

    /// Layout of the parameter block
    pub fn layout(&self) -> &ParamLayout {
        &self.layout
    }

    /// Number of invocations made so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Copy `args` into the parameter block, invoke, and read the result
    pub fn call(&mut self, args: &[Arg<'_>]) -> ArrayResult<R> {
        if args.len() != self.layout.arg_count() {
            return Err(ArrayError::ArgumentCount {
                expected: self.layout.arg_count(),
                actual: args.len(),
            });
        }

        for (slot, arg) in self.layout.slots.iter().zip(args) {
            let bytes = match (slot.shape, arg) {
                (ArgShape::Element, Arg::Element(element)) => {
                    // The descriptor travels with each element, so the size is
                    // rechecked against the layout on every call.
                    let size = element.element_type().size();
                    if size != slot.size {
                        return Err(ArrayError::SizeMismatch {
                            expected: slot.size,
                            actual: size,
                        });
                    }
                    element.bytes()
                }
                (_, Arg::Element(element)) => element.bytes(),
                (_, Arg::Plain(bytes)) => bytes,
            };
            if bytes.len() != slot.size {
                return Err(ArrayError::SizeMismatch {
                    expected: slot.size,
                    actual: bytes.len(),
                });
            }
            self.scratch[slot.offset..slot.offset + slot.size].copy_from_slice(bytes);
        }

        let return_offset = self.layout.return_offset();
        self.scratch[return_offset..].fill(0);

        self.calls += 1;
        self.callee
            .invoker
            .invoke(self.callee.function, &mut self.scratch)?;

        let returned = &self.scratch[return_offset..];
        R::from_bytes(returned).ok_or(ArrayError::SizeMismatch {
            expected: R::element_type().size(),
            actual: returned.len(),
        })
    }
}

impl<'a> ScriptCall<'a, bool> {
    /// Prepare a call of `pred(element) -> bool`
    pub fn unary(callee: Callee<'a>, element_size: usize) -> Self {
        Self::new(callee, element_size, &[ArgShape::Element])
    }

    /// Prepare a call of `pred(a, b) -> bool`
    pub fn binary(callee: Callee<'a>, element_size: usize) -> Self {
        Self::new(callee, element_size, &[ArgShape::Element, ArgShape::Element])
    }

    /// Evaluate a unary predicate
    pub fn test(&mut self, element: ElementRef<'_>) -> ArrayResult<bool> {
        self.call(&[Arg::Element(element)])
    }

    /// Evaluate a binary predicate
    pub fn test_pair(&mut self, a: ElementRef<'_>, b: ElementRef<'_>) -> ArrayResult<bool> {
        self.call(&[Arg::Element(a), Arg::Element(b)])
    }
}

impl<R> Drop for ScriptCall<'_, R> {
    fn drop(&mut self) {
        tracing::trace!(
            function = %self.callee.function,
            calls = self.calls,
            "Script call finished"
        );
    }
}

impl<R> fmt::Debug for ScriptCall<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptCall")
            .field("callee", &self.callee)
            .field("layout", &self.layout)
            .field("calls", &self.calls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvokeError, Invoker, NativeObject, ScriptFunction, ScriptObject};
    use array_types::ElementType;

    #[test]
    fn test_layout_offsets() {
        let layout = ParamLayout::new(
            12,
            &[ArgShape::Element, ArgShape::Plain(4), ArgShape::Element],
            1,
        );
        assert_eq!(layout.arg_count(), 3);
        assert_eq!(layout.arg_offset(0), Some(0));
        assert_eq!(layout.arg_offset(1), Some(12));
        assert_eq!(layout.arg_offset(2), Some(16));
        assert_eq!(layout.arg_offset(3), None);
        assert_eq!(layout.return_offset(), 28);
        assert_eq!(layout.total_size(), 29);
    }

    #[test]
    fn test_binary_predicate_call() {
        let object = NativeObject::new("Comparators").with_binary_predicate("Less", |a: i32, b: i32| a < b);
        let less = object.find_function("Less").unwrap();

        let one = 1i32.to_bytes();
        let two = 2i32.to_bytes();
        let a = ElementRef::new(&one, &ElementType::Integer);
        let b = ElementRef::new(&two, &ElementType::Integer);

        let mut call = ScriptCall::binary(Callee::new(&object, &less), 4);
        assert_eq!(call.layout().total_size(), 9);
        assert!(call.test_pair(a, b).unwrap());
        assert!(!call.test_pair(b, a).unwrap());
        assert_eq!(call.calls(), 2);
    }

    #[test]
    fn test_integer_return_with_plain_argument() {
        // params: [element: i32][plain: i32][return: i32]
        let object = NativeObject::new("Math").with_function("AddOffset", |params: &mut [u8]| {
            let value = i32::from_ne_bytes(params[0..4].try_into().unwrap());
            let offset = i32::from_ne_bytes(params[4..8].try_into().unwrap());
            params[8..12].copy_from_slice(&(value + offset).to_ne_bytes());
        });
        let add = object.find_function("AddOffset").unwrap();

        let value = 40i32.to_bytes();
        let offset = 2i32.to_bytes();
        let mut call: ScriptCall<'_, i32> = ScriptCall::new(
            Callee::new(&object, &add),
            4,
            &[ArgShape::Element, ArgShape::Plain(4)],
        );
        let result = call
            .call(&[
                Arg::Element(ElementRef::new(&value, &ElementType::Integer)),
                Arg::Plain(&offset),
            ])
            .unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn test_element_size_checked_every_call() {
        let object = NativeObject::new("Predicates").with_predicate("Any", |_: i32| true);
        let any = object.find_function("Any").unwrap();
        let mut call = ScriptCall::unary(Callee::new(&object, &any), 4);

        let wide = 1i64.to_bytes();
        let err = call
            .test(ElementRef::new(&wide, &ElementType::Integer64))
            .unwrap_err();
        assert_eq!(
            err,
            ArrayError::SizeMismatch {
                expected: 4,
                actual: 8
            }
        );
        assert_eq!(call.calls(), 0);
    }

    #[test]
    fn test_argument_count_checked() {
        let object = NativeObject::new("Predicates").with_predicate("Any", |_: i32| true);
        let any = object.find_function("Any").unwrap();
        let mut call = ScriptCall::unary(Callee::new(&object, &any), 4);

        assert_eq!(
            call.call(&[]),
            Err(ArrayError::ArgumentCount {
                expected: 1,
                actual: 0
            })
        );
    }

    struct FailingInvoker;

    impl Invoker for FailingInvoker {
        fn invoke(&self, function: &ScriptFunction, _params: &mut [u8]) -> Result<(), InvokeError> {
            Err(InvokeError::Failed {
                function: function.name.clone(),
                message: "script raised".to_string(),
            })
        }
    }

    #[test]
    fn test_invoke_failure_propagates() {
        let function = ScriptFunction::new("Broken", 0);
        let mut call = ScriptCall::unary(Callee::new(&FailingInvoker, &function), 4);

        let value = 1i32.to_bytes();
        let err = call
            .test(ElementRef::new(&value, &ElementType::Integer))
            .unwrap_err();
        assert!(matches!(err, ArrayError::Invoke(msg) if msg.contains("script raised")));
    }
}
