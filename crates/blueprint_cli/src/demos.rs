// SPDX-License-Identifier: MIT OR Apache-2.0
//! Demo graphs.
//!
//! Graph loading belongs to the editor, so the runner ships a few graphs
//! wired up in code.

use blueprint_graph::{Graph, NodeId, NodeRegistry, PinValue};
use clap::ValueEnum;

/// Available demo graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// On Begin Play -> Print String
    Hello,
    /// For Loop printing each index
    Loop,
    /// Add two numbers and print the sum
    Math,
    /// Branch on a condition
    Branch,
    /// Two event nodes, the first one delayed
    Sequence,
}

/// Builds graphs from registry node types
struct Builder<'r> {
    registry: &'r NodeRegistry,
    graph: Graph,
}

impl<'r> Builder<'r> {
    fn new(registry: &'r NodeRegistry, name: &str) -> Self {
        Self {
            registry,
            graph: Graph::new(name),
        }
    }

    fn add(&mut self, type_id: &str) -> Option<NodeId> {
        let node = self.registry.create_node(type_id)?;
        Some(self.graph.add_node(node))
    }

    fn set(&mut self, node: NodeId, pin: &str, value: impl Into<PinValue>) {
        self.graph.set_default_value(node, pin, value);
    }

    fn wire(&mut self, from: NodeId, output: &str, to: NodeId, input: &str) -> Option<()> {
        let out = self
            .graph
            .node(from)?
            .outputs()
            .find(|p| p.name == output)?
            .id;
        let input = self.graph.node(to)?.find_input(input)?.id;
        match self.graph.connect(out, input) {
            Ok(_) => Some(()),
            Err(e) => {
                tracing::error!("Demo wiring failed: {e}");
                None
            }
        }
    }
}

impl Demo {
    /// Build the demo graph. `None` if the registry lacks a node type it needs.
    pub fn build(self, registry: &NodeRegistry) -> Option<Graph> {
        let mut b = Builder::new(registry, self.name());
        match self {
            Self::Hello => {
                let event = b.add("event_begin_play")?;
                let print = b.add("print_string")?;
                b.wire(event, "", print, "")?;
            }
            Self::Loop => {
                let event = b.add("event_begin_play")?;
                let looper = b.add("for_loop")?;
                let text = b.add("to_string")?;
                let body = b.add("print_string")?;
                let done = b.add("print_string")?;
                b.set(looper, "Last Index", 2.0);
                b.set(done, "In String", "Loop completed");
                b.wire(event, "", looper, "")?;
                b.wire(looper, "Loop Body", body, "")?;
                b.wire(looper, "Index", text, "Value")?;
                b.wire(text, "Result", body, "In String")?;
                b.wire(looper, "Completed", done, "")?;
            }
            Self::Math => {
                let event = b.add("event_begin_play")?;
                let add = b.add("add")?;
                let text = b.add("to_string")?;
                let label = b.add("multi_line_string")?;
                let append = b.add("append_strings")?;
                let print = b.add("print_string")?;
                b.set(add, "A", 2.0);
                b.set(add, "B", 3.0);
                b.set(label, "Value", "2 + 3 = ");
                b.wire(event, "", print, "")?;
                b.wire(add, "Result", text, "Value")?;
                b.wire(label, "Value", append, "A")?;
                b.wire(text, "Result", append, "B")?;
                b.wire(append, "Result", print, "In String")?;
            }
            Self::Branch => {
                let event = b.add("event_begin_play")?;
                let branch = b.add("branch")?;
                let yes = b.add("print_string")?;
                let no = b.add("print_string")?;
                b.set(branch, "Condition", true);
                b.set(yes, "In String", "Took the True branch");
                b.set(no, "In String", "Took the False branch");
                b.wire(event, "", branch, "")?;
                b.wire(branch, "True", yes, "")?;
                b.wire(branch, "False", no, "")?;
            }
            Self::Sequence => {
                let first = b.add("event_begin_play")?;
                let delay = b.add("delay")?;
                let late = b.add("print_string")?;
                let second = b.add("event_begin_play")?;
                let early = b.add("print_string")?;
                b.set(delay, "Duration", 0.5);
                b.set(late, "In String", "First event, after a delay");
                b.set(early, "In String", "Second event");
                b.wire(first, "", delay, "")?;
                b.wire(delay, "Completed", late, "")?;
                b.wire(second, "", early, "")?;
            }
        }
        Some(b.graph)
    }

    /// Graph name
    pub fn name(self) -> &'static str {
        match self {
            Self::Hello => "Hello World",
            Self::Loop => "For Loop",
            Self::Math => "Math",
            Self::Branch => "Branch",
            Self::Sequence => "Sequence",
        }
    }
}
