// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visit callbacks.
//!
//! The engine awaits a visit before running a node and before crossing an
//! edge. What a visit *looks* like is up to the host (a renderer highlights
//! the element); the engine only depends on the visit finishing.

use crate::config::EngineConfig;
use crate::edge::{Edge, EdgeId};
use crate::node::{Node, NodeId};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::time::Duration;

/// Asynchronous "mark visited" hook
pub trait Visitor: Send + Sync {
    /// Called before a node executes or resolves
    fn visit_node<'a>(&'a self, node: &'a Node) -> BoxFuture<'a, ()>;

    /// Called before an edge is traversed
    fn visit_edge<'a>(&'a self, edge: &'a Edge) -> BoxFuture<'a, ()>;
}

/// Visits that take a fixed amount of wall-clock time
#[derive(Debug, Clone, Copy)]
pub struct TimedVisitor {
    node: Duration,
    edge: Duration,
}

impl TimedVisitor {
    /// Create a visitor with explicit durations
    pub fn new(node: Duration, edge: Duration) -> Self {
        Self { node, edge }
    }

    /// Durations taken from the engine config
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.node_visit(), config.edge_visit())
    }
}

impl Default for TimedVisitor {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Visitor for TimedVisitor {
    fn visit_node<'a>(&'a self, node: &'a Node) -> BoxFuture<'a, ()> {
        async move {
            tracing::trace!(node = %node.title, "node visit");
            if !self.node.is_zero() {
                tokio::time::sleep(self.node).await;
            }
        }
        .boxed()
    }

    fn visit_edge<'a>(&'a self, edge: &'a Edge) -> BoxFuture<'a, ()> {
        async move {
            tracing::trace!(edge = ?edge.id, "edge visit");
            if !self.edge.is_zero() {
                tokio::time::sleep(self.edge).await;
            }
        }
        .boxed()
    }
}

/// Visits that complete immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantVisitor;

impl Visitor for InstantVisitor {
    fn visit_node<'a>(&'a self, _node: &'a Node) -> BoxFuture<'a, ()> {
        futures::future::ready(()).boxed()
    }

    fn visit_edge<'a>(&'a self, _edge: &'a Edge) -> BoxFuture<'a, ()> {
        futures::future::ready(()).boxed()
    }
}

/// One recorded visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// A node was visited
    Node(NodeId),
    /// An edge was visited
    Edge(EdgeId),
}

/// Instant visitor that remembers the visit sequence
#[derive(Debug, Default)]
pub struct RecordingVisitor {
    visits: Mutex<Vec<Visit>>,
}

impl RecordingVisitor {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits so far, in order
    pub fn visits(&self) -> Vec<Visit> {
        self.visits.lock().clone()
    }

    /// How many times a node was visited
    pub fn node_visits(&self, node: NodeId) -> usize {
        self.visits
            .lock()
            .iter()
            .filter(|v| **v == Visit::Node(node))
            .count()
    }

    /// How many times an edge was visited
    pub fn edge_visits(&self, edge: EdgeId) -> usize {
        self.visits
            .lock()
            .iter()
            .filter(|v| **v == Visit::Edge(edge))
            .count()
    }
}

impl Visitor for RecordingVisitor {
    fn visit_node<'a>(&'a self, node: &'a Node) -> BoxFuture<'a, ()> {
        self.visits.lock().push(Visit::Node(node.id()));
        futures::future::ready(()).boxed()
    }

    fn visit_edge<'a>(&'a self, edge: &'a Edge) -> BoxFuture<'a, ()> {
        self.visits.lock().push(Visit::Edge(edge.id));
        futures::future::ready(()).boxed()
    }
}
