// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph execution.
//!
//! Control flow is pushed forward along exec edges: executing a node may
//! trigger one of its exec outputs, which executes whatever the first edge
//! out of that pin leads to. Data flow is pulled backward: resolving an input
//! follows its edge upstream and asks the source node for the value. Nothing
//! is cached, so reading an input twice evaluates its upstream chain twice.
//!
//! Every execute and resolve step is pushed onto the active call path. A step
//! that is already on the path means the graph loops back into itself, and
//! fails with [`ExecutionError::CycleDetected`]. Long acyclic chains only
//! fail once the path passes the configured nesting limit.

use crate::behavior::NodeContext;
use crate::config::EngineConfig;
use crate::graph::Graph;
use crate::log::LogSink;
use crate::node::{Node, NodeId};
use crate::pin::PinId;
use crate::value::PinValue;
use crate::visit::Visitor;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;

/// Walks a borrowed graph
pub struct ExecutionEngine<'g> {
    graph: &'g Graph,
    visitor: Arc<dyn Visitor>,
    log: Arc<dyn LogSink>,
    max_depth: usize,
}

/// A unit of work on the call path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step<'a> {
    /// Execute a node, entered through an exec input
    Execute(NodeId, Option<PinId>),
    /// Resolve a named output of a node
    Resolve(NodeId, &'a str),
}

impl Step<'_> {
    fn node(&self) -> NodeId {
        match *self {
            Self::Execute(node, _) | Self::Resolve(node, _) => node,
        }
    }
}

/// The active call path, innermost step first.
///
/// Frames live on the stack of the futures that pushed them, so a path only
/// holds steps that are still running.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame<'a> {
    step: Step<'a>,
    parent: Option<&'a Frame<'a>>,
    depth: usize,
}

impl<'a> Frame<'a> {
    fn ancestors(&'a self) -> impl Iterator<Item = &'a Frame<'a>> {
        std::iter::successors(Some(self), |frame| frame.parent)
    }

    fn contains(&'a self, step: Step<'_>) -> bool {
        self.ancestors().any(|frame| frame.step == step)
    }
}

impl<'g> ExecutionEngine<'g> {
    /// Create an engine over `graph`
    pub fn new(graph: &'g Graph, visitor: Arc<dyn Visitor>, log: Arc<dyn LogSink>) -> Self {
        Self {
            graph,
            visitor,
            log,
            max_depth: EngineConfig::DEFAULT_MAX_DEPTH,
        }
    }

    /// Apply limits from a config
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.max_depth = config.max_depth;
        self
    }

    /// Override the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn log_sink(&self) -> &dyn LogSink {
        self.log.as_ref()
    }

    /// Execute a node, following control flow until its branch ends.
    ///
    /// `trigger` is the input pin execution arrived through.
    pub fn execute_node(
        &self,
        node_id: NodeId,
        trigger: Option<PinId>,
    ) -> BoxFuture<'_, Result<(), ExecutionError>> {
        self.execute_at(node_id, trigger, None)
    }

    /// Fire the exec output named `pin_name` on a node.
    ///
    /// Unknown or unconnected outputs are a no-op.
    pub fn trigger_output<'a>(
        &'a self,
        node_id: NodeId,
        pin_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ExecutionError>> {
        self.trigger_output_at(node_id, pin_name, None)
    }

    /// Value of the input named `pin_name`: the upstream output if connected,
    /// else the node's default, else `0`.
    pub fn resolve_input<'a>(
        &'a self,
        node_id: NodeId,
        pin_name: &'a str,
    ) -> BoxFuture<'a, Result<PinValue, ExecutionError>> {
        self.resolve_input_at(node_id, pin_name, None)
    }

    /// Value of the output named `pin_name`, or `Null` when the node has no
    /// resolver.
    pub fn resolve_output<'a>(
        &'a self,
        node_id: NodeId,
        pin_name: &'a str,
    ) -> BoxFuture<'a, Result<PinValue, ExecutionError>> {
        self.resolve_output_at(node_id, pin_name, None)
    }

    /// Push `step` onto the path below `parent`
    fn enter<'a>(
        &self,
        step: Step<'a>,
        parent: Option<&'a Frame<'a>>,
    ) -> Result<(&'g Node, Frame<'a>), ExecutionError> {
        let node_id = step.node();
        if parent.is_some_and(|path| path.contains(step)) {
            tracing::warn!(node = ?node_id, ?step, "Step re-entered while still active");
            return Err(ExecutionError::CycleDetected { node: node_id });
        }

        let depth = parent.map_or(0, |path| path.depth + 1);
        if depth > self.max_depth {
            tracing::warn!(node = ?node_id, limit = self.max_depth, "Nesting limit reached");
            return Err(ExecutionError::DepthExceeded {
                node: node_id,
                limit: self.max_depth,
            });
        }

        let node = self.node(node_id)?;
        Ok((node, Frame { step, parent, depth }))
    }

    fn node(&self, node_id: NodeId) -> Result<&'g Node, ExecutionError> {
        self.graph
            .node(node_id)
            .ok_or(ExecutionError::NodeNotFound(node_id))
    }

    pub(crate) fn execute_at<'a>(
        &'a self,
        node_id: NodeId,
        trigger: Option<PinId>,
        parent: Option<&'a Frame<'a>>,
    ) -> BoxFuture<'a, Result<(), ExecutionError>> {
        async move {
            let (node, frame) = self.enter(Step::Execute(node_id, trigger), parent)?;
            self.visitor.visit_node(node).await;
            tracing::debug!(node = %node.title, depth = frame.depth, "execute");

            match node.behavior().executor() {
                Some(handler) => {
                    handler
                        .execute(NodeContext::new(self, node, &frame), trigger)
                        .await
                }
                None => self.trigger_output_at(node_id, "", Some(&frame)).await,
            }
        }
        .boxed()
    }

    pub(crate) fn trigger_output_at<'a>(
        &'a self,
        node_id: NodeId,
        pin_name: &'a str,
        parent: Option<&'a Frame<'a>>,
    ) -> BoxFuture<'a, Result<(), ExecutionError>> {
        async move {
            let node = self.node(node_id)?;
            let Some(pin) = node.find_exec_output(pin_name) else {
                return Ok(());
            };
            let Some(edge) = self.graph.find_edge_by_source(pin.id) else {
                return Ok(());
            };

            self.visitor.visit_edge(edge).await;
            self.execute_at(edge.to_node, Some(edge.to_pin), parent)
                .await
        }
        .boxed()
    }

    pub(crate) fn resolve_input_at<'a>(
        &'a self,
        node_id: NodeId,
        pin_name: &'a str,
        parent: Option<&'a Frame<'a>>,
    ) -> BoxFuture<'a, Result<PinValue, ExecutionError>> {
        async move {
            let node = self.node(node_id)?;
            let Some(pin) = node.find_input(pin_name) else {
                return Ok(PinValue::neutral());
            };

            match self.graph.find_edge_by_target(pin.id) {
                Some(edge) => {
                    self.visitor.visit_edge(edge).await;
                    self.resolve_output_at(edge.from_node, &edge.from_pin_name, parent)
                        .await
                }
                None => Ok(node
                    .default_value(pin_name)
                    .cloned()
                    .unwrap_or(PinValue::neutral())),
            }
        }
        .boxed()
    }

    pub(crate) fn resolve_output_at<'a>(
        &'a self,
        node_id: NodeId,
        pin_name: &'a str,
        parent: Option<&'a Frame<'a>>,
    ) -> BoxFuture<'a, Result<PinValue, ExecutionError>> {
        async move {
            let (node, frame) = self.enter(Step::Resolve(node_id, pin_name), parent)?;
            self.visitor.visit_node(node).await;

            let value = match node.behavior().resolver() {
                Some(resolver) => {
                    resolver
                        .resolve(NodeContext::new(self, node, &frame), pin_name)
                        .await?
                }
                None => PinValue::Null,
            };
            tracing::trace!(node = %node.title, pin = pin_name, %value, "resolved");
            Ok(value)
        }
        .boxed()
    }
}

/// Error during execution
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A step looped back into itself through the graph's edges
    #[error("Cycle detected: node {node:?} was re-entered while still running")]
    CycleDetected {
        /// Node whose step was re-entered
        node: NodeId,
    },

    /// The call path grew past the configured nesting limit
    #[error("Nesting limit of {limit} reached at node {node:?}")]
    DepthExceeded {
        /// Node that would have been entered
        node: NodeId,
        /// The configured limit
        limit: usize,
    },
}
