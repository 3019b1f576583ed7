// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and edges.
//!
//! Nodes and edges are kept in insertion order. The engine relies on this:
//! when an output fans out, the edge committed first is the one followed.

use crate::edge::{Edge, EdgeId};
use crate::node::{Node, NodeId};
use crate::pin::{Pin, PinDirection, PinId, PinType};
use crate::value::PinValue;
use indexmap::IndexMap;

/// A node graph
#[derive(Debug)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Committed edges between pins
    edges: IndexMap<EdgeId, Edge>,
    /// Owning node of every pin
    pin_owners: IndexMap<PinId, NodeId>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            pin_owners: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        for pin in node.pins() {
            self.pin_owners.insert(pin.id, id);
        }
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.edges.retain(|_, e| !e.involves_node(node_id));
        self.pin_owners.retain(|_, owner| *owner != node_id);
        let node = self.nodes.shift_remove(&node_id)?;
        tracing::info!("Deleted node: {}", node.title);
        Some(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a pin by ID
    pub fn pin(&self, pin_id: PinId) -> Option<&Pin> {
        let owner = self.pin_owners.get(&pin_id)?;
        self.nodes.get(owner)?.pin(pin_id)
    }

    /// First pin on `node_id` matching direction, type and name
    pub fn find_pin(
        &self,
        node_id: NodeId,
        direction: PinDirection,
        pin_type: PinType,
        name: &str,
    ) -> Option<&Pin> {
        self.node(node_id)?.find_pin(direction, pin_type, name)
    }

    /// Update the default value of a node input
    pub fn set_default_value(
        &mut self,
        node_id: NodeId,
        pin_name: impl Into<String>,
        value: impl Into<PinValue>,
    ) -> bool {
        match self.node_mut(node_id) {
            Some(node) => {
                node.set_default_value(pin_name, value);
                true
            }
            None => false,
        }
    }

    /// Whether an edge between the two pins would be accepted.
    ///
    /// Used for hover feedback while an edge is being dragged.
    pub fn can_connect(&self, a: PinId, b: PinId) -> bool {
        match (self.pin(a), self.pin(b)) {
            (Some(a), Some(b)) => a.can_connect(b),
            _ => false,
        }
    }

    /// Commit an edge between two pins, given in either order.
    ///
    /// An edge already targeting the input pin is replaced.
    pub fn connect(&mut self, a: PinId, b: PinId) -> Result<EdgeId, ConnectionError> {
        let pin_a = self.pin(a).ok_or(ConnectionError::PinNotFound(a))?;
        let pin_b = self.pin(b).ok_or(ConnectionError::PinNotFound(b))?;

        if pin_a.node == pin_b.node {
            return Err(ConnectionError::SelfLoop);
        }
        if pin_a.direction == pin_b.direction {
            return Err(ConnectionError::SameDirection);
        }
        if pin_a.pin_type != pin_b.pin_type {
            return Err(ConnectionError::TypeMismatch {
                from: pin_a.pin_type,
                to: pin_b.pin_type,
            });
        }
        debug_assert!(pin_a.can_connect(pin_b));

        let (from, to) = if pin_a.is_output() {
            (pin_a, pin_b)
        } else {
            (pin_b, pin_a)
        };
        let edge = Edge::new(from, to);
        let to_pin = to.id;

        let before = self.edges.len();
        self.edges.retain(|_, e| e.to_pin != to_pin);
        if self.edges.len() != before {
            tracing::debug!(pin = ?to_pin, "Replaced existing edge into input");
        }

        let id = edge.id;
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Connect `pin` to the first pin on `node_id` that accepts it.
    ///
    /// Mirrors spawning a node from a dragged pin in the editor.
    pub fn connect_to_first_compatible(
        &mut self,
        pin: PinId,
        node_id: NodeId,
    ) -> Result<Option<EdgeId>, ConnectionError> {
        let source = self.pin(pin).ok_or(ConnectionError::PinNotFound(pin))?;
        let node = self
            .node(node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?;
        let target = node
            .pins()
            .iter()
            .find(|p| p.direction != source.direction && p.pin_type == source.pin_type)
            .map(|p| p.id);

        match target {
            Some(target) => self.connect(pin, target).map(Some),
            None => Ok(None),
        }
    }

    /// Remove an edge
    pub fn disconnect(&mut self, edge_id: EdgeId) -> Option<Edge> {
        self.edges.shift_remove(&edge_id)
    }

    /// Get an edge by ID
    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.get(&edge_id)
    }

    /// Get all edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Get edges from a specific pin
    pub fn edges_from(&self, pin_id: PinId) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| e.from_pin == pin_id)
    }

    /// First edge, in insertion order, whose source is `pin_id`
    pub fn find_edge_by_source(&self, pin_id: PinId) -> Option<&Edge> {
        self.edges_from(pin_id).next()
    }

    /// The edge whose target is `pin_id`
    pub fn find_edge_by_target(&self, pin_id: PinId) -> Option<&Edge> {
        self.edges.values().find(|e| e.to_pin == pin_id)
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Entry-point nodes, in insertion order
    pub fn list_source_nodes(&self) -> Vec<&Node> {
        self.nodes.values().filter(|n| n.is_source()).collect()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when committing an edge
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Pin not found
    #[error("Pin not found: {0:?}")]
    PinNotFound(PinId),

    /// Both pins belong to the same node
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// Both pins are inputs or both are outputs
    #[error("Pins have the same direction")]
    SameDirection,

    /// Pin types differ
    #[error("Incompatible pin types: {from:?} -> {to:?}")]
    TypeMismatch {
        /// Type of the first pin
        from: PinType,
        /// Type of the second pin
        to: PinType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeCategory, NodeType};
    use crate::pin::PinSpec;

    fn number_source() -> NodeType {
        NodeType::new("number", "Number", NodeCategory::Constants)
            .with_outputs(vec![PinSpec::new("Value", PinType::Number)])
    }

    fn number_sink() -> NodeType {
        NodeType::new("sink", "Sink", NodeCategory::Math)
            .with_inputs(vec![
                PinSpec::new("A", PinType::Number),
                PinSpec::new("S", PinType::String),
            ])
            .with_outputs(vec![PinSpec::new("Result", PinType::Number)])
    }

    fn pin_id(graph: &Graph, node: NodeId, dir: PinDirection, ty: PinType, name: &str) -> PinId {
        graph.find_pin(node, dir, ty, name).unwrap().id
    }

    #[test]
    fn test_connect_orients_edge() {
        let mut graph = Graph::default();
        let src = graph.add_node(Node::new(&number_source()));
        let dst = graph.add_node(Node::new(&number_sink()));
        let out = pin_id(&graph, src, PinDirection::Output, PinType::Number, "Value");
        let input = pin_id(&graph, dst, PinDirection::Input, PinType::Number, "A");

        // Input given first
        let id = graph.connect(input, out).unwrap();
        let edge = graph.edge(id).unwrap();
        assert_eq!(edge.from_pin, out);
        assert_eq!(edge.to_pin, input);
        assert_eq!(edge.from_node, src);
        assert_eq!(edge.from_pin_name, "Value");
        assert_eq!(graph.find_edge_by_target(input).map(|e| e.id), Some(id));
        assert_eq!(graph.find_edge_by_source(out).map(|e| e.id), Some(id));
    }

    #[test]
    fn test_reconnect_replaces_input_edge() {
        let mut graph = Graph::default();
        let first = graph.add_node(Node::new(&number_source()));
        let second = graph.add_node(Node::new(&number_source()));
        let dst = graph.add_node(Node::new(&number_sink()));
        let a = pin_id(&graph, dst, PinDirection::Input, PinType::Number, "A");

        let old = graph
            .connect(pin_id(&graph, first, PinDirection::Output, PinType::Number, "Value"), a)
            .unwrap();
        let new = graph
            .connect(pin_id(&graph, second, PinDirection::Output, PinType::Number, "Value"), a)
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge(old).is_none());
        assert_eq!(graph.find_edge_by_target(a).map(|e| e.from_node), Some(second));
        assert_eq!(graph.edges().filter(|e| e.to_pin == a).count(), 1);
        assert!(graph.edges().any(|e| e.id == new));
    }

    #[test]
    fn test_rejected_connections() {
        let mut graph = Graph::default();
        let src = graph.add_node(Node::new(&number_source()));
        let dst = graph.add_node(Node::new(&number_sink()));
        let out = pin_id(&graph, src, PinDirection::Output, PinType::Number, "Value");
        let s = pin_id(&graph, dst, PinDirection::Input, PinType::String, "S");
        let a = pin_id(&graph, dst, PinDirection::Input, PinType::Number, "A");
        let result = pin_id(&graph, dst, PinDirection::Output, PinType::Number, "Result");

        assert!(matches!(graph.connect(out, s), Err(ConnectionError::TypeMismatch { .. })));
        assert!(matches!(graph.connect(a, result), Err(ConnectionError::SelfLoop)));
        assert!(matches!(graph.connect(s, a), Err(ConnectionError::SelfLoop)));
        assert!(matches!(
            graph.connect(out, PinId::new()),
            Err(ConnectionError::PinNotFound(_))
        ));
        assert!(!graph.can_connect(out, s));
        assert!(graph.can_connect(out, a));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_committed_edges_are_well_typed() {
        let mut graph = Graph::default();
        let nodes: Vec<NodeId> = (0..3)
            .map(|_| graph.add_node(Node::new(&number_sink())))
            .collect();
        let pins: Vec<PinId> = nodes
            .iter()
            .flat_map(|id| graph.node(*id).unwrap().pins().iter().map(|p| p.id))
            .collect();

        // Try every pair; only legal ones may land
        for &a in &pins {
            for &b in &pins {
                let _ = graph.connect(a, b);
            }
        }

        assert!(graph.edge_count() > 0);
        for edge in graph.edges() {
            let from = graph.pin(edge.from_pin).unwrap();
            let to = graph.pin(edge.to_pin).unwrap();
            assert_eq!(from.pin_type, to.pin_type);
            assert!(from.is_output() && to.is_input());
            assert_ne!(from.node, to.node);
        }
        for &pin in &pins {
            assert!(graph.edges().filter(|e| e.to_pin == pin).count() <= 1);
        }
    }

    #[test]
    fn test_remove_node_drops_edges() {
        let mut graph = Graph::default();
        let src = graph.add_node(Node::new(&number_source()));
        let dst = graph.add_node(Node::new(&number_sink()));
        let out = pin_id(&graph, src, PinDirection::Output, PinType::Number, "Value");
        let a = pin_id(&graph, dst, PinDirection::Input, PinType::Number, "A");
        graph.connect(out, a).unwrap();

        assert!(graph.remove_node(src).is_some());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.pin(out).is_none());
        assert!(graph.find_edge_by_target(a).is_none());
        assert!(graph.remove_node(src).is_none());
    }

    #[test]
    fn test_disconnect() {
        let mut graph = Graph::default();
        let src = graph.add_node(Node::new(&number_source()));
        let dst = graph.add_node(Node::new(&number_sink()));
        let out = pin_id(&graph, src, PinDirection::Output, PinType::Number, "Value");
        let a = pin_id(&graph, dst, PinDirection::Input, PinType::Number, "A");
        let edge = graph.connect(out, a).unwrap();

        assert_eq!(graph.disconnect(edge).map(|e| e.to_pin), Some(a));
        assert!(graph.find_edge_by_source(out).is_none());
        assert!(graph.disconnect(edge).is_none());
    }

    #[test]
    fn test_connect_to_first_compatible() {
        let mut graph = Graph::default();
        let src = graph.add_node(Node::new(&number_source()));
        let dst = graph.add_node(Node::new(&number_sink()));
        let out = pin_id(&graph, src, PinDirection::Output, PinType::Number, "Value");

        let edge = graph.connect_to_first_compatible(out, dst).unwrap().unwrap();
        let a = pin_id(&graph, dst, PinDirection::Input, PinType::Number, "A");
        assert_eq!(graph.edge(edge).map(|e| e.to_pin), Some(a));

        // Another source node has no inputs to offer
        let other = graph.add_node(Node::new(&number_source()));
        assert!(graph.connect_to_first_compatible(out, other).unwrap().is_none());
    }

    #[test]
    fn test_source_nodes_in_insertion_order() {
        let mut graph = Graph::default();
        let start = NodeType::new("start", "Start", NodeCategory::Events);
        let a = graph.add_node(Node::new(&start));
        graph.add_node(Node::new(&number_source()));
        let b = graph.add_node(Node::new(&start));

        let sources: Vec<NodeId> = graph.list_source_nodes().iter().map(|n| n.id()).collect();
        assert_eq!(sources, vec![a, b]);
    }

    #[test]
    fn test_node_identity_survives_edits() {
        let mut graph = Graph::default();
        let id = graph.add_node(Node::new(&number_sink()));
        let pins: Vec<PinId> = graph.node(id).unwrap().pins().iter().map(|p| p.id).collect();

        graph.node_mut(id).unwrap().set_default_value("A", 4.0);
        assert!(graph.set_default_value(id, "S", "text"));

        let node = graph.node(id).unwrap();
        assert_eq!(node.id(), id);
        assert_eq!(node.pins().iter().map(|p| p.id).collect::<Vec<_>>(), pins);
        assert!(pins.iter().all(|&pin| graph.pin(pin).map(|p| p.node) == Some(id)));
    }
}
