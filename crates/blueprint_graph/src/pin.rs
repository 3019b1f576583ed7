// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub Uuid);

impl PinId {
    /// Create a new random pin ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinDirection {
    /// Input pin
    Input,
    /// Output pin
    Output,
}

/// Kind of signal that flows through a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinType {
    /// Execution flow
    Exec,
    /// Text data
    String,
    /// Numeric data
    Number,
    /// Boolean value
    Boolean,
    /// Any data type
    Any,
}

/// Declarative pin description used by node types.
///
/// Concrete [`Pin`]s with fresh ids are created from these when a node is
/// instantiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinSpec {
    /// Pin name, unique per direction within a node
    pub name: String,
    /// Pin type
    pub pin_type: PinType,
}

impl PinSpec {
    /// Create a new pin description
    pub fn new(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            pin_type,
        }
    }

    /// Unnamed execution pin
    pub fn exec() -> Self {
        Self::new("", PinType::Exec)
    }
}

/// A pin on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique pin ID
    pub id: PinId,
    /// Pin name
    pub name: String,
    /// Pin direction
    pub direction: PinDirection,
    /// Pin type
    pub pin_type: PinType,
    /// Node that owns this pin
    pub node: NodeId,
}

impl Pin {
    /// Create a new pin owned by `node`
    pub fn new(
        node: NodeId,
        name: impl Into<String>,
        pin_type: PinType,
        direction: PinDirection,
    ) -> Self {
        Self {
            id: PinId::new(),
            name: name.into(),
            direction,
            pin_type,
            node,
        }
    }

    /// Instantiate a pin from its description
    pub fn from_spec(node: NodeId, spec: &PinSpec, direction: PinDirection) -> Self {
        Self::new(node, spec.name.clone(), spec.pin_type, direction)
    }

    /// Whether this is an input pin
    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    /// Whether this is an output pin
    pub fn is_output(&self) -> bool {
        self.direction == PinDirection::Output
    }

    /// Check if an edge between this pin and `other` is legal.
    ///
    /// Both the commit path and hover feedback go through this predicate.
    pub fn can_connect(&self, other: &Pin) -> bool {
        self.node != other.node
            && self.direction != other.direction
            && self.pin_type == other.pin_type
    }
}
