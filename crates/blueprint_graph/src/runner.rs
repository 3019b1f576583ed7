// SPDX-License-Identifier: MIT OR Apache-2.0
//! Run coordination.
//!
//! A run executes every event node of a graph, one after another. The next
//! event node does not start until the previous one's whole control-flow
//! subtree has finished, so log output stays in a deterministic order.

use crate::config::EngineConfig;
use crate::engine::{ExecutionEngine, ExecutionError};
use crate::graph::Graph;
use crate::log::{LogSeverity, LogSink};
use crate::node::NodeId;
use crate::visit::{TimedVisitor, Visitor};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The graph has no event nodes
    NothingToRun,
    /// Every event node ran to completion
    Completed,
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Event nodes executed, in order
    pub sources: Vec<NodeId>,
    /// Time spent, including visits
    pub elapsed: Duration,
}

/// Runs graphs from their event nodes
pub struct Runner {
    config: EngineConfig,
    visitor: Arc<dyn Visitor>,
    log: Arc<dyn LogSink>,
}

impl Runner {
    /// Create a runner whose visits last as long as `config` says
    pub fn new(config: EngineConfig, log: Arc<dyn LogSink>) -> Self {
        let visitor = Arc::new(TimedVisitor::from_config(&config));
        Self {
            config,
            visitor,
            log,
        }
    }

    /// Replace the visit callback
    pub fn with_visitor(mut self, visitor: Arc<dyn Visitor>) -> Self {
        self.visitor = visitor;
        self
    }

    /// An engine over `graph` sharing this runner's visitor, log and limits
    pub fn engine<'g>(&self, graph: &'g Graph) -> ExecutionEngine<'g> {
        ExecutionEngine::new(graph, self.visitor.clone(), self.log.clone()).with_config(&self.config)
    }

    /// Execute every event node of `graph` in insertion order.
    ///
    /// A graph without event nodes is not an error; the run just reports
    /// [`RunOutcome::NothingToRun`].
    pub async fn run(&self, graph: &Graph) -> Result<RunReport, ExecutionError> {
        let start = Instant::now();
        self.log.log("Starting simulation...", LogSeverity::System);

        let sources: Vec<NodeId> = graph.list_source_nodes().iter().map(|n| n.id()).collect();
        if sources.is_empty() {
            self.log
                .log("No event nodes found to start from.", LogSeverity::Warning);
            return Ok(RunReport {
                outcome: RunOutcome::NothingToRun,
                sources,
                elapsed: start.elapsed(),
            });
        }

        tracing::info!(graph = %graph.name, sources = sources.len(), "Running graph");
        let engine = self.engine(graph);
        for &source in &sources {
            if let Err(e) = engine.execute_node(source, None).await {
                tracing::error!("Run aborted: {e}");
                self.log.log(&format!("Run aborted: {e}"), LogSeverity::Error);
                return Err(e);
            }
        }

        self.log.log("Simulation finished.", LogSeverity::System);
        Ok(RunReport {
            outcome: RunOutcome::Completed,
            sources,
            elapsed: start.elapsed(),
        })
    }
}
