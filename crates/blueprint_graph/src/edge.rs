// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions for the graph.

use crate::node::NodeId;
use crate::pin::{Pin, PinId, PinType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    /// Create a new random edge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A committed edge from an output pin to an input pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Source node ID
    pub from_node: NodeId,
    /// Source (output) pin ID
    pub from_pin: PinId,
    /// Name of the source pin
    pub from_pin_name: String,
    /// Target node ID
    pub to_node: NodeId,
    /// Target (input) pin ID
    pub to_pin: PinId,
    /// Type shared by both ends
    pub pin_type: PinType,
}

impl Edge {
    /// Create an edge between an output and an input pin.
    ///
    /// Callers are expected to have checked [`Pin::can_connect`].
    pub fn new(from: &Pin, to: &Pin) -> Self {
        Self {
            id: EdgeId::new(),
            from_node: from.node,
            from_pin: from.id,
            from_pin_name: from.name.clone(),
            to_node: to.node,
            to_pin: to.id,
            pin_type: from.pin_type,
        }
    }

    /// Check if this edge involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}
