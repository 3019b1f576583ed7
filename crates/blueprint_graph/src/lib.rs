// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blueprint graph execution engine.
//!
//! This crate models node graphs built in a visual scripting editor and runs
//! them:
//! - Typed pins, nodes and edges with connection validation
//! - Control flow pushed along exec edges
//! - Data flow pulled on demand along data edges
//! - A run coordinator that executes event nodes in order
//!
//! ## Architecture
//!
//! The [`Graph`] is an owned aggregate; an [`ExecutionEngine`] borrows it for
//! the duration of a run. Rendering concerns stay outside the crate and plug
//! in through two seams: a [`Visitor`] awaited at every node and edge visit,
//! and a [`LogSink`] receiving the run's output.

pub mod behavior;
pub mod config;
pub mod edge;
pub mod engine;
pub mod graph;
pub mod library;
pub mod log;
pub mod node;
pub mod pin;
pub mod runner;
pub mod value;
pub mod visit;

pub use behavior::{BehaviorFuture, ExecuteHandler, NodeBehavior, NodeContext, OutputResolver};
pub use config::{ConfigError, EngineConfig};
pub use edge::{Edge, EdgeId};
pub use engine::{ExecutionEngine, ExecutionError};
pub use graph::{ConnectionError, Graph};
pub use log::{LogEntry, LogSeverity, LogSink, MemoryLog, TracingLog};
pub use node::{Node, NodeCategory, NodeId, NodeRegistry, NodeType, ScratchState};
pub use pin::{Pin, PinDirection, PinId, PinSpec, PinType};
pub use runner::{RunOutcome, RunReport, Runner};
pub use value::PinValue;
pub use visit::{InstantVisitor, RecordingVisitor, TimedVisitor, Visitor};
