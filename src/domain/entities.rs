//! Domain entities: values, component usages, field state and removal context

use std::fmt;

use serde::{Deserialize, Serialize};

/// A property value or state default.
///
/// Expression-form values are rendered as executable snippets
/// (`"expr" as expression`), literals as plain quoted constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueExpression {
    pub text: String,
    pub is_expression: bool,
}

impl ValueExpression {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_expression: false,
        }
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_expression: true,
        }
    }
}

/// One `key=value` assignment on a component usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAssignment {
    pub key: String,
    pub value: ValueExpression,
}

/// Use of a catalog component by a node.
///
/// The component is referenced by name; assignments keep the component's
/// declaration order and never repeat a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentUsage {
    pub component: String,
    pub assignments: Vec<PropertyAssignment>,
}

/// Built-in data types a field state can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Number,
    String,
}

impl DataType {
    pub const ALL: [DataType; 3] = [DataType::Boolean, DataType::Number, DataType::String];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Number => "number",
            DataType::String => "string",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state carried by a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub data_type: DataType,
    pub is_array: bool,
    pub default_value: Option<ValueExpression>,
}

impl FieldState {
    /// Arrays and non-string types can only carry expression-form defaults.
    pub fn is_consistent(&self) -> bool {
        match &self.default_value {
            Some(value) if self.is_array || self.data_type != DataType::String => {
                value.is_expression
            }
            _ => true,
        }
    }
}

/// Payload shared by forms and fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub depth: u32,
    pub usage: ComponentUsage,
}

/// Shape of a node without its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeRole {
    Form,
    Field { state: Option<FieldState> },
}

/// Detached copy of a node (no children), valid after the tree changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(flatten)]
    pub role: NodeRole,
}

impl NodeSummary {
    pub fn is_form(&self) -> bool {
        matches!(self.role, NodeRole::Form)
    }
}

/// Structural neighbourhood of a removed node at the moment of removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalContext {
    pub parent: Option<NodeSummary>,
    pub preceding_sibling: Option<NodeSummary>,
    pub following_sibling: Option<NodeSummary>,
}
