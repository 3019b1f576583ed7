// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::behavior::NodeBehavior;
use crate::pin::{Pin, PinDirection, PinId, PinSpec, PinType};
use crate::value::PinValue;
use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Private per-node state owned by the node's behavior
pub type ScratchState = HashMap<String, PinValue>;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Entry points of a run
    Events,
    /// Branching, looping, waiting
    FlowControl,
    /// Utility nodes
    Utilities,
    /// Literal values
    Constants,
    /// String operations
    String,
    /// Math operations
    Math,
    /// Custom/user-defined
    Custom,
}

impl NodeCategory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Events => "Events",
            Self::FlowControl => "Flow Control",
            Self::Utilities => "Utilities",
            Self::Constants => "Constants",
            Self::String => "String",
            Self::Math => "Math",
            Self::Custom => "Custom",
        }
    }

    /// Whether nodes of this category start a run
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Events)
    }
}

/// Node type definition
#[derive(Debug, Clone)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub title: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Input pins, in display order
    pub inputs: Vec<PinSpec>,
    /// Output pins, in display order
    pub outputs: Vec<PinSpec>,
    /// Initial default values for inputs, keyed by pin name
    pub default_values: IndexMap<String, PinValue>,
    /// Behavior shared by every instance
    pub behavior: NodeBehavior,
    /// One-time setup run when a node is instantiated
    pub on_init: Option<fn(&mut Node)>,
}

impl NodeType {
    /// Create a passive node type with no pins
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: NodeCategory) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            default_values: IndexMap::new(),
            behavior: NodeBehavior::Passive,
            on_init: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the input pins
    pub fn with_inputs(mut self, inputs: Vec<PinSpec>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the output pins
    pub fn with_outputs(mut self, outputs: Vec<PinSpec>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Add a default value for an input
    pub fn with_default(mut self, pin_name: impl Into<String>, value: impl Into<PinValue>) -> Self {
        self.default_values.insert(pin_name.into(), value.into());
        self
    }

    /// Set the behavior
    pub fn with_behavior(mut self, behavior: NodeBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the init hook
    pub fn with_init(mut self, on_init: fn(&mut Node)) -> Self {
        self.on_init = Some(on_init);
        self
    }
}

/// A node instance in the graph
#[derive(Debug)]
pub struct Node {
    /// Unique instance ID
    id: NodeId,
    /// Node type ID
    pub node_type: String,
    /// Display name
    pub title: String,
    /// Category, copied from the type
    pub category: NodeCategory,
    /// Inputs first, then outputs
    pins: Vec<Pin>,
    default_values: IndexMap<String, PinValue>,
    behavior: NodeBehavior,
    state: Mutex<ScratchState>,
}

impl Node {
    /// Create a new node from a type definition
    pub fn new(node_type: &NodeType) -> Self {
        let id = NodeId::new();
        let pins = node_type
            .inputs
            .iter()
            .map(|spec| Pin::from_spec(id, spec, PinDirection::Input))
            .chain(
                node_type
                    .outputs
                    .iter()
                    .map(|spec| Pin::from_spec(id, spec, PinDirection::Output)),
            )
            .collect();

        let mut node = Self {
            id,
            node_type: node_type.id.clone(),
            title: node_type.title.clone(),
            category: node_type.category,
            pins,
            default_values: node_type.default_values.clone(),
            behavior: node_type.behavior.clone(),
            state: Mutex::new(ScratchState::new()),
        };

        if let Some(on_init) = node_type.on_init {
            on_init(&mut node);
        }
        node
    }

    /// Instance ID, fixed for the node's lifetime
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// All pins, inputs first
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Input pins
    pub fn inputs(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.is_input())
    }

    /// Output pins
    pub fn outputs(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.is_output())
    }

    /// Get a pin by ID
    pub fn pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == pin_id)
    }

    /// First pin matching direction, type and name
    pub fn find_pin(&self, direction: PinDirection, pin_type: PinType, name: &str) -> Option<&Pin> {
        self.pins
            .iter()
            .find(|p| p.direction == direction && p.pin_type == pin_type && p.name == name)
    }

    /// First input pin with the given name, whatever its type
    pub fn find_input(&self, name: &str) -> Option<&Pin> {
        self.inputs().find(|p| p.name == name)
    }

    /// Exec output pin with the given name
    pub fn find_exec_output(&self, name: &str) -> Option<&Pin> {
        self.find_pin(PinDirection::Output, PinType::Exec, name)
    }

    /// Default value of an input
    pub fn default_value(&self, pin_name: &str) -> Option<&PinValue> {
        self.default_values.get(pin_name)
    }

    /// Set or replace a default value
    pub fn set_default_value(&mut self, pin_name: impl Into<String>, value: impl Into<PinValue>) {
        self.default_values.insert(pin_name.into(), value.into());
    }

    /// The node's behavior
    pub fn behavior(&self) -> &NodeBehavior {
        &self.behavior
    }

    /// Lock the scratch state
    pub fn state(&self) -> MutexGuard<'_, ScratchState> {
        self.state.lock()
    }

    /// Mutable access to the scratch state without locking
    pub fn state_mut(&mut self) -> &mut ScratchState {
        self.state.get_mut()
    }

    /// Whether this node starts a run
    pub fn is_source(&self) -> bool {
        self.category.is_source()
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    /// Registered node types by ID
    types: IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
