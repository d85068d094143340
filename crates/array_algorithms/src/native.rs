// Native Object - Exposes Rust closures as named script functions
//
// Embedders without a script VM, and tests, bind predicates and comparators
// written in Rust here. Each function receives the raw parameter block exactly
// as a script function would.

use std::collections::HashMap;
use std::fmt;

use array_types::{PodValue, TypeDescriptor};

use crate::{InvokeError, Invoker, ScriptFunction, ScriptObject};

/// A native function operating on a raw parameter block
pub type NativeFn = Box<dyn Fn(&mut [u8]) + Send + Sync>;

struct NativeEntry {
    name: String,
    param_size: Option<usize>,
    func: NativeFn,
}

/// Script object whose functions are Rust closures
pub struct NativeObject {
    name: String,
    functions: Vec<NativeEntry>,
    by_name: HashMap<String, usize>,
}

impl NativeObject {
    /// Create an object with no functions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    fn insert(&mut self, name: String, param_size: Option<usize>, func: NativeFn) {
        let id = self.functions.len();
        self.by_name.insert(name.clone(), id);
        self.functions.push(NativeEntry {
            name,
            param_size,
            func,
        });
    }

    /// Bind a function over the raw parameter block
    pub fn with_function<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut [u8]) + Send + Sync + 'static,
    {
        self.insert(name.into(), None, Box::new(func));
        self
    }

    /// Bind a unary predicate `fn(T) -> bool`
    pub fn with_predicate<T, F>(mut self, name: impl Into<String>, pred: F) -> Self
    where
        T: PodValue,
        F: Fn(T) -> bool + Send + Sync + 'static,
    {
        let size = T::element_type().size();
        self.insert(
            name.into(),
            Some(size + 1),
            Box::new(move |params: &mut [u8]| {
                if let Some(value) = T::from_bytes(&params[..size]) {
                    params[size] = u8::from(pred(value));
                }
            }),
        );
        self
    }

    /// Bind a binary predicate `fn(T, T) -> bool`
    pub fn with_binary_predicate<T, F>(mut self, name: impl Into<String>, pred: F) -> Self
    where
        T: PodValue,
        F: Fn(T, T) -> bool + Send + Sync + 'static,
    {
        let size = T::element_type().size();
        self.insert(
            name.into(),
            Some(2 * size + 1),
            Box::new(move |params: &mut [u8]| {
                let a = T::from_bytes(&params[..size]);
                let b = T::from_bytes(&params[size..2 * size]);
                if let (Some(a), Some(b)) = (a, b) {
                    params[2 * size] = u8::from(pred(a, b));
                }
            }),
        );
        self
    }

    /// Number of bound functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if no functions are bound
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Invoker for NativeObject {
    fn invoke(&self, function: &ScriptFunction, params: &mut [u8]) -> Result<(), InvokeError> {
        let entry = self
            .functions
            .get(function.id)
            .filter(|entry| entry.name == function.name)
            .ok_or_else(|| InvokeError::UnboundFunction(function.name.clone()))?;

        if let Some(expected) = entry.param_size {
            if params.len() != expected {
                return Err(InvokeError::ParamBlockSize {
                    function: entry.name.clone(),
                    expected,
                    actual: params.len(),
                });
            }
        }

        (entry.func)(params);
        Ok(())
    }
}

impl ScriptObject for NativeObject {
    fn object_name(&self) -> &str {
        &self.name
    }

    fn find_function(&self, name: &str) -> Option<ScriptFunction> {
        self.by_name
            .get(name)
            .map(|&id| ScriptFunction::new(name, id))
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeObject")
            .field("name", &self.name)
            .field(
                "functions",
                &self.functions.iter().map(|e| &e.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_function() {
        let object = NativeObject::new("Predicates")
            .with_predicate("IsEven", |v: i32| v % 2 == 0)
            .with_predicate("IsNegative", |v: i32| v < 0);

        assert_eq!(object.object_name(), "Predicates");
        assert_eq!(object.len(), 2);
        assert_eq!(
            object.find_function("IsNegative"),
            Some(ScriptFunction::new("IsNegative", 1))
        );
        assert!(object.find_function("IsOdd").is_none());
    }

    #[test]
    fn test_invoke_predicate() {
        let object = NativeObject::new("Predicates").with_predicate("IsEven", |v: i32| v % 2 == 0);
        let is_even = object.find_function("IsEven").unwrap();

        let mut params = [0u8; 5];
        params[..4].copy_from_slice(&4i32.to_ne_bytes());
        object.invoke(&is_even, &mut params).unwrap();
        assert_eq!(params[4], 1);
    }

    #[test]
    fn test_invoke_rejects_wrong_block() {
        let object = NativeObject::new("Predicates").with_predicate("IsEven", |v: i32| v % 2 == 0);
        let is_even = object.find_function("IsEven").unwrap();

        let mut params = [0u8; 9];
        assert!(matches!(
            object.invoke(&is_even, &mut params),
            Err(InvokeError::ParamBlockSize { expected: 5, actual: 9, .. })
        ));
    }

    #[test]
    fn test_invoke_unbound_function() {
        let object = NativeObject::new("Empty");
        let stray = ScriptFunction::new("Stray", 0);
        assert_eq!(
            object.invoke(&stray, &mut []),
            Err(InvokeError::UnboundFunction("Stray".to_string()))
        );
    }
}
