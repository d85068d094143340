// Executor - Node execution context and output types
//
// Provides the context passed to node executors and the output structure.
// Pin values are native: arrays travel as `ScriptArray`, objects as shared
// script object handles, and wildcard values as raw element bytes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use array_algorithms::ScriptObject;
use array_types::ScriptArray;

/// Index reported by nodes when no element was found
pub const INDEX_NONE: i32 = -1;

// ─────────────────────────────────────────────────────────────────────────────
// Pin Values
// ─────────────────────────────────────────────────────────────────────────────

/// A value held by a pin
#[derive(Clone)]
pub enum PinValue {
    Array(ScriptArray),
    Object(Arc<dyn ScriptObject>),
    Name(String),
    Integer(i32),
    Boolean(bool),
    /// Raw bytes of one value of the connected array's element type
    Element(Vec<u8>),
}

impl PinValue {
    pub fn as_array(&self) -> Option<&ScriptArray> {
        match self {
            PinValue::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            PinValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PinValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&[u8]> {
        match self {
            PinValue::Element(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Debug for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinValue::Array(array) => f.debug_tuple("Array").field(array).finish(),
            PinValue::Object(object) => f.debug_tuple("Object").field(&object.object_name()).finish(),
            PinValue::Name(name) => f.debug_tuple("Name").field(name).finish(),
            PinValue::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            PinValue::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            PinValue::Element(bytes) => f.debug_tuple("Element").field(bytes).finish(),
        }
    }
}

impl From<ScriptArray> for PinValue {
    fn from(array: ScriptArray) -> Self {
        PinValue::Array(array)
    }
}

impl From<i32> for PinValue {
    fn from(value: i32) -> Self {
        PinValue::Integer(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Execution Context
// ─────────────────────────────────────────────────────────────────────────────

/// Context passed to node executors
///
/// Array pins marked `by_ref` are modified in place: the caller reads the
/// updated array back from `inputs` after the node has run.
pub struct NodeContext {
    /// Node instance ID
    pub node_id: String,
    /// Input values (pin_name -> value)
    pub inputs: HashMap<String, PinValue>,
}

impl NodeContext {
    /// Create a new node context
    pub fn new(node_id: impl Into<String>, inputs: HashMap<String, PinValue>) -> Self {
        Self {
            node_id: node_id.into(),
            inputs,
        }
    }

    /// Set an input value
    pub fn with_input(mut self, name: &str, value: impl Into<PinValue>) -> Self {
        self.inputs.insert(name.to_string(), value.into());
        self
    }

    /// Get an input value by pin name
    pub fn get_input(&self, name: &str) -> Option<&PinValue> {
        self.inputs.get(name)
    }

    /// Get input as array
    pub fn get_input_array(&self, name: &str) -> Option<&ScriptArray> {
        self.get_input(name).and_then(PinValue::as_array)
    }

    /// Get input as a mutable array, for by-reference array pins
    pub fn get_input_array_mut(&mut self, name: &str) -> Option<&mut ScriptArray> {
        match self.inputs.get_mut(name) {
            Some(PinValue::Array(array)) => Some(array),
            _ => None,
        }
    }

    /// Get input as a script object handle
    pub fn get_input_object(&self, name: &str) -> Option<Arc<dyn ScriptObject>> {
        match self.get_input(name) {
            Some(PinValue::Object(object)) => Some(Arc::clone(object)),
            _ => None,
        }
    }

    /// Get input as a function name
    pub fn get_input_name(&self, name: &str) -> Option<&str> {
        match self.get_input(name) {
            Some(PinValue::Name(value)) => Some(value),
            _ => None,
        }
    }

    /// Get input as i32
    pub fn get_input_integer(&self, name: &str) -> Option<i32> {
        self.get_input(name).and_then(PinValue::as_integer)
    }

    /// Get input as raw element bytes
    pub fn get_input_element(&self, name: &str) -> Option<&[u8]> {
        self.get_input(name).and_then(PinValue::as_element)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Output
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a node execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeResult {
    /// Continue to the named exec pin
    Continue(String),
    /// Execution ends here (pure nodes and terminal nodes)
    End,
    /// Execution failed
    Error(String),
}

/// Output from a node execution
#[derive(Debug)]
pub struct NodeOutput {
    /// Output values (pin_name -> value)
    pub values: HashMap<String, PinValue>,
    /// Result of execution (which exec pin to follow, etc.)
    pub result: NodeResult,
}

impl NodeOutput {
    /// Create output that continues to the default "exec" pin
    pub fn continue_default(values: HashMap<String, PinValue>) -> Self {
        Self {
            values,
            result: NodeResult::Continue("exec".to_string()),
        }
    }

    /// Create output that ends execution (no more exec flow)
    pub fn end(values: HashMap<String, PinValue>) -> Self {
        Self {
            values,
            result: NodeResult::End,
        }
    }

    /// Create output for a pure node (just values, no exec flow)
    pub fn pure(values: HashMap<String, PinValue>) -> Self {
        Self {
            values,
            result: NodeResult::End,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            values: HashMap::new(),
            result: NodeResult::Error(message.into()),
        }
    }

    /// Check if this output continues execution
    pub fn is_continue(&self) -> bool {
        matches!(self.result, NodeResult::Continue(_))
    }

    /// Check if this output ends execution
    pub fn is_end(&self) -> bool {
        matches!(self.result, NodeResult::End)
    }

    /// Check if this output is an error
    pub fn is_error(&self) -> bool {
        matches!(self.result, NodeResult::Error(_))
    }

    /// Get the next exec pin if continuing
    pub fn next_exec_pin(&self) -> Option<&str> {
        match &self.result {
            NodeResult::Continue(pin) => Some(pin),
            _ => None,
        }
    }

    /// Get the error message if this is an error
    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            NodeResult::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Get an output value by pin name
    pub fn get(&self, name: &str) -> Option<&PinValue> {
        self.values.get(name)
    }
}
