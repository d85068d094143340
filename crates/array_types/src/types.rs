// Node Schema Types - Definitions of array nodes and their pins
//
// These types describe the shape of each array node to the editor: which pins
// it has, in which direction data flows, and which values a pin accepts.
// They serialize to JSON for export.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Pin Types
// ─────────────────────────────────────────────────────────────────────────────

/// Direction of a pin on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

/// Data types that can flow through pins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum PinType {
    /// Execution flow (no data, just control flow)
    Exec,
    /// Boolean value
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// Function name, resolved against an object at call time
    Name,
    /// Object on which named functions are resolved and invoked
    Object,
    /// Single value whose type follows the connected array's element type
    Wildcard,
    /// Array of a specific type
    Array { element: Box<PinType> },
}

impl PinType {
    /// Array of wildcard elements
    pub fn wildcard_array() -> Self {
        PinType::Array {
            element: Box::new(PinType::Wildcard),
        }
    }

    /// Check if this is an execution pin type
    pub fn is_exec(&self) -> bool {
        matches!(self, PinType::Exec)
    }

    /// Check if this is a data pin type
    pub fn is_data(&self) -> bool {
        !self.is_exec()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pin Definitions
// ─────────────────────────────────────────────────────────────────────────────

/// Definition of a pin on a node type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinDef {
    /// Pin name (used to look up the value in a node context)
    pub name: String,
    /// Pin direction (input or output)
    pub direction: PinDirection,
    /// Data type of the pin
    #[serde(rename = "type")]
    pub pin_type: PinType,
    /// Whether the node mutates the connected value in place
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub by_ref: bool,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PinDef {
    /// Create an execution input pin
    pub fn exec_in() -> Self {
        Self {
            name: "exec".to_string(),
            direction: PinDirection::Input,
            pin_type: PinType::Exec,
            by_ref: false,
            description: None,
        }
    }

    /// Create an execution output pin with a custom name
    pub fn exec_out(name: &str) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Output,
            pin_type: PinType::Exec,
            by_ref: false,
            description: None,
        }
    }

    /// Create a data input pin
    pub fn data_in(name: &str, pin_type: PinType) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Input,
            pin_type,
            by_ref: false,
            description: None,
        }
    }

    /// Create an input pin the node modifies in place
    pub fn data_ref(name: &str, pin_type: PinType) -> Self {
        Self {
            by_ref: true,
            ..Self::data_in(name, pin_type)
        }
    }

    /// Create a data output pin
    pub fn data_out(name: &str, pin_type: PinType) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Output,
            pin_type,
            by_ref: false,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Definitions
// ─────────────────────────────────────────────────────────────────────────────

/// Definition of a node type (registered in the NodeRegistry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    /// Unique identifier (e.g., "array/SortAnyArray")
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Category for organization (e.g., "Utilities|Array")
    pub category: String,
    /// Whether this is a pure node (no exec pins, evaluated on demand)
    #[serde(default)]
    pub pure: bool,
    /// Pin definitions for this node type
    pub pins: Vec<PinDef>,
    /// Search keywords shown in the editor palette
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeDef {
    /// Get all input pins
    pub fn input_pins(&self) -> impl Iterator<Item = &PinDef> {
        self.pins
            .iter()
            .filter(|p| p.direction == PinDirection::Input)
    }

    /// Get all data input pins
    pub fn data_inputs(&self) -> impl Iterator<Item = &PinDef> {
        self.input_pins().filter(|p| p.pin_type.is_data())
    }

    /// Get a pin by name
    pub fn get_pin(&self, name: &str) -> Option<&PinDef> {
        self.pins.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_def_json() {
        let node = NodeDef {
            id: "array/Fill".to_string(),
            name: "Fill".to_string(),
            category: "Utilities|Array".to_string(),
            pure: false,
            pins: vec![
                PinDef::exec_in(),
                PinDef::data_ref("TargetArray", PinType::wildcard_array()),
                PinDef::data_in("Value", PinType::Wildcard),
                PinDef::exec_out("exec"),
            ],
            keywords: vec!["fill".to_string()],
            description: None,
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["pins"][1]["type"]["type"], "Array");
        assert_eq!(json["pins"][1]["by_ref"], true);
        assert!(json["pins"][2].get("by_ref").is_none());

        let back: NodeDef = serde_json::from_value(json).unwrap();
        assert_eq!(back.data_inputs().count(), 2);
        assert!(back.get_pin("TargetArray").unwrap().by_ref);
    }
}
