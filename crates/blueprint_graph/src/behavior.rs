// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node behaviors and the context they run in.
//!
//! A behavior is tagged by the capabilities it provides. The engine dispatches
//! on the tag: nodes without an execute capability pass control straight
//! through their unnamed exec output, nodes without a resolver yield
//! [`PinValue::Null`].

use crate::engine::{ExecutionEngine, ExecutionError, Frame};
use crate::log::LogSeverity;
use crate::node::{Node, ScratchState};
use crate::pin::PinId;
use crate::value::PinValue;
use futures::future::BoxFuture;
use parking_lot::MutexGuard;
use std::fmt;
use std::sync::Arc;

/// Future returned by behavior callbacks
pub type BehaviorFuture<'a, T> = BoxFuture<'a, Result<T, ExecutionError>>;

/// Control-flow side effect of a node.
///
/// Implementations call [`NodeContext::trigger`] zero or more times to
/// continue execution downstream.
pub trait ExecuteHandler: Send + Sync {
    /// Run the node. `trigger` is the input pin execution arrived through,
    /// `None` when the node was started by the run coordinator.
    fn execute<'a>(&'a self, ctx: NodeContext<'a>, trigger: Option<PinId>)
        -> BehaviorFuture<'a, ()>;
}

/// Value computation for a node's output pins.
pub trait OutputResolver: Send + Sync {
    /// Compute the value of the output pin named `pin_name`
    fn resolve<'a>(&'a self, ctx: NodeContext<'a>, pin_name: &'a str)
        -> BehaviorFuture<'a, PinValue>;
}

/// Capability-tagged node behavior
#[derive(Clone, Default)]
pub enum NodeBehavior {
    /// No capabilities: pass-through on execute, `Null` on resolve
    #[default]
    Passive,
    /// Control-flow only
    Executable(Arc<dyn ExecuteHandler>),
    /// Data only
    Resolvable(Arc<dyn OutputResolver>),
    /// Control flow and data
    Both {
        /// Execute capability
        execute: Arc<dyn ExecuteHandler>,
        /// Resolve capability
        resolve: Arc<dyn OutputResolver>,
    },
}

impl NodeBehavior {
    /// Behavior with only an execute capability
    pub fn executable(handler: impl ExecuteHandler + 'static) -> Self {
        Self::Executable(Arc::new(handler))
    }

    /// Behavior with only a resolve capability
    pub fn resolvable(resolver: impl OutputResolver + 'static) -> Self {
        Self::Resolvable(Arc::new(resolver))
    }

    /// Behavior with both capabilities
    pub fn both(
        handler: impl ExecuteHandler + 'static,
        resolver: impl OutputResolver + 'static,
    ) -> Self {
        Self::Both {
            execute: Arc::new(handler),
            resolve: Arc::new(resolver),
        }
    }

    /// The execute capability, if any
    pub fn executor(&self) -> Option<&dyn ExecuteHandler> {
        match self {
            Self::Executable(h) | Self::Both { execute: h, .. } => Some(h.as_ref()),
            Self::Passive | Self::Resolvable(_) => None,
        }
    }

    /// The resolve capability, if any
    pub fn resolver(&self) -> Option<&dyn OutputResolver> {
        match self {
            Self::Resolvable(r) | Self::Both { resolve: r, .. } => Some(r.as_ref()),
            Self::Passive | Self::Executable(_) => None,
        }
    }

    /// Short name of the capability tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Passive => "passive",
            Self::Executable(_) => "executable",
            Self::Resolvable(_) => "resolvable",
            Self::Both { .. } => "both",
        }
    }
}

impl fmt::Debug for NodeBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeBehavior::{}", self.kind())
    }
}

/// Handle given to a behavior while it runs.
///
/// Calls back into the engine extend the active call path, which is how
/// cycles in the graph are caught.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    engine: &'a ExecutionEngine<'a>,
    node: &'a Node,
    frame: &'a Frame<'a>,
}

impl<'a> NodeContext<'a> {
    pub(crate) fn new(engine: &'a ExecutionEngine<'a>, node: &'a Node, frame: &'a Frame<'a>) -> Self {
        Self {
            engine,
            node,
            frame,
        }
    }

    /// Resolve the value of one of this node's inputs
    pub async fn input(&self, pin_name: &str) -> Result<PinValue, ExecutionError> {
        self.engine
            .resolve_input_at(self.node.id(), pin_name, Some(self.frame))
            .await
    }

    /// Continue execution through one of this node's exec outputs
    pub async fn trigger(&self, pin_name: &str) -> Result<(), ExecutionError> {
        self.engine
            .trigger_output_at(self.node.id(), pin_name, Some(self.frame))
            .await
    }

    /// Write a line to the run log
    pub fn log(&self, message: &str, severity: LogSeverity) {
        self.engine.log_sink().log(message, severity);
    }

    /// Host-edited default value of an input
    pub fn default_value(&self, pin_name: &str) -> Option<&'a PinValue> {
        self.node.default_value(pin_name)
    }

    /// Lock this node's scratch state.
    ///
    /// The guard must be dropped before the next `.await`.
    pub fn state(&self) -> MutexGuard<'a, ScratchState> {
        self.node.state()
    }
}
