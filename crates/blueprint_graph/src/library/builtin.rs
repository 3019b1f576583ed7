// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in node types for visual scripting (Blueprint-like).
//!
//! Supports execution flow and data flow.

use crate::behavior::{BehaviorFuture, ExecuteHandler, NodeBehavior, NodeContext, OutputResolver};
use crate::log::LogSeverity;
use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::pin::{PinId, PinSpec, PinType};
use crate::value::PinValue;
use std::time::Duration;

/// Scratch-state key holding the For Loop's current index
pub const CURRENT_INDEX: &str = "currentIndex";

/// Create the built-in node registry
pub fn create_builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    for node_type in builtin_types() {
        registry.register(node_type);
    }
    registry
}

/// All built-in node types, in catalog order
pub fn builtin_types() -> Vec<NodeType> {
    vec![
        event_begin_play(),
        delay(),
        print_string(),
        for_loop(),
        integer(),
        append_strings(),
        multi_line_string(),
        to_string(),
        arithmetic("add", "Add", ArithmeticOp::Add),
        arithmetic("subtract", "Subtract", ArithmeticOp::Subtract),
        arithmetic("multiply", "Multiply", ArithmeticOp::Multiply),
        branch(),
    ]
}

/// Entry point of a run
pub fn event_begin_play() -> NodeType {
    NodeType::new("event_begin_play", "On Begin Play", NodeCategory::Events)
        .with_description("Triggered when the simulation starts")
        .with_outputs(vec![PinSpec::exec()])
        .with_behavior(NodeBehavior::executable(BeginPlay))
}

/// Wait for `Duration` seconds
pub fn delay() -> NodeType {
    NodeType::new("delay", "Delay", NodeCategory::FlowControl)
        .with_description("Waits before continuing")
        .with_inputs(vec![PinSpec::exec(), PinSpec::new("Duration", PinType::Number)])
        .with_outputs(vec![PinSpec::new("Completed", PinType::Exec)])
        .with_default("Duration", 1.0)
        .with_behavior(NodeBehavior::executable(Delay))
}

/// Write a string to the run log
pub fn print_string() -> NodeType {
    NodeType::new("print_string", "Print String", NodeCategory::Utilities)
        .with_description("Print a string to the output log")
        .with_inputs(vec![PinSpec::exec(), PinSpec::new("In String", PinType::String)])
        .with_outputs(vec![PinSpec::exec()])
        .with_default("In String", "Hello World")
        .with_behavior(NodeBehavior::executable(PrintString))
}

/// Counted loop over an inclusive index range
pub fn for_loop() -> NodeType {
    NodeType::new("for_loop", "For Loop", NodeCategory::FlowControl)
        .with_description("Runs the loop body once per index, then completes")
        .with_inputs(vec![
            PinSpec::exec(),
            PinSpec::new("First Index", PinType::Number),
            PinSpec::new("Last Index", PinType::Number),
        ])
        .with_outputs(vec![
            PinSpec::new("Loop Body", PinType::Exec),
            PinSpec::new("Index", PinType::Number),
            PinSpec::new("Completed", PinType::Exec),
        ])
        .with_default("First Index", 0.0)
        .with_default("Last Index", 5.0)
        .with_behavior(NodeBehavior::both(ForLoop, ForLoop))
        .with_init(|node| {
            node.state_mut().insert(CURRENT_INDEX.to_string(), PinValue::neutral());
        })
}

/// Integer literal
pub fn integer() -> NodeType {
    NodeType::new("integer", "Integer", NodeCategory::Constants)
        .with_outputs(vec![PinSpec::new("Value", PinType::Number)])
        .with_default("Value", 0.0)
        .with_behavior(NodeBehavior::resolvable(IntegerLiteral))
}

/// Concatenate two strings
pub fn append_strings() -> NodeType {
    NodeType::new("append_strings", "Append Strings", NodeCategory::String)
        .with_inputs(vec![
            PinSpec::new("A", PinType::String),
            PinSpec::new("B", PinType::String),
        ])
        .with_outputs(vec![PinSpec::new("Result", PinType::String)])
        .with_default("A", "")
        .with_default("B", "")
        .with_behavior(NodeBehavior::resolvable(AppendStrings))
}

/// Free-text literal
pub fn multi_line_string() -> NodeType {
    NodeType::new("multi_line_string", "String (Multi-line)", NodeCategory::String)
        .with_outputs(vec![PinSpec::new("Value", PinType::String)])
        .with_default("Value", "")
        .with_behavior(NodeBehavior::resolvable(StringLiteral))
}

/// Number to text
pub fn to_string() -> NodeType {
    NodeType::new("to_string", "To String", NodeCategory::String)
        .with_description("Formats a number as text")
        .with_inputs(vec![PinSpec::new("Value", PinType::Number)])
        .with_outputs(vec![PinSpec::new("Result", PinType::String)])
        .with_default("Value", 0.0)
        .with_behavior(NodeBehavior::resolvable(ToText))
}

/// Binary math node with `A`, `B` inputs and a `Result` output
pub fn arithmetic(id: &str, title: &str, op: ArithmeticOp) -> NodeType {
    NodeType::new(id, title, NodeCategory::Math)
        .with_inputs(vec![
            PinSpec::new("A", PinType::Number),
            PinSpec::new("B", PinType::Number),
        ])
        .with_outputs(vec![PinSpec::new("Result", PinType::Number)])
        .with_default("A", 0.0)
        .with_default("B", 0.0)
        .with_behavior(NodeBehavior::resolvable(Arithmetic(op)))
}

/// If/else branching
pub fn branch() -> NodeType {
    NodeType::new("branch", "Branch", NodeCategory::FlowControl)
        .with_description("If/else branching")
        .with_inputs(vec![PinSpec::exec(), PinSpec::new("Condition", PinType::Boolean)])
        .with_outputs(vec![
            PinSpec::new("True", PinType::Exec),
            PinSpec::new("False", PinType::Exec),
        ])
        .with_behavior(NodeBehavior::executable(Branch))
}

struct BeginPlay;

impl ExecuteHandler for BeginPlay {
    fn execute<'a>(&'a self, ctx: NodeContext<'a>, _trigger: Option<PinId>) -> BehaviorFuture<'a, ()> {
        Box::pin(async move { ctx.trigger("").await })
    }
}

struct Delay;

impl ExecuteHandler for Delay {
    fn execute<'a>(&'a self, ctx: NodeContext<'a>, _trigger: Option<PinId>) -> BehaviorFuture<'a, ()> {
        Box::pin(async move {
            let seconds = ctx.input("Duration").await?.as_number();
            match Duration::try_from_secs_f64(seconds) {
                Ok(wait) => tokio::time::sleep(wait).await,
                Err(_) if seconds <= 0.0 => {}
                Err(e) => tracing::warn!(seconds, error = %e, "Ignoring unusable delay"),
            }
            ctx.trigger("Completed").await
        })
    }
}

struct PrintString;

impl ExecuteHandler for PrintString {
    fn execute<'a>(&'a self, ctx: NodeContext<'a>, _trigger: Option<PinId>) -> BehaviorFuture<'a, ()> {
        Box::pin(async move {
            let message = ctx.input("In String").await?;
            ctx.log(&message.to_string(), LogSeverity::Success);
            ctx.trigger("").await
        })
    }
}

struct ForLoop;

impl ExecuteHandler for ForLoop {
    fn execute<'a>(&'a self, ctx: NodeContext<'a>, _trigger: Option<PinId>) -> BehaviorFuture<'a, ()> {
        Box::pin(async move {
            let first = ctx.input("First Index").await?.parse_integer();
            let last = ctx.input("Last Index").await?.parse_integer();

            // Unreadable bounds skip the body
            if let (Some(first), Some(last)) = (first, last) {
                for index in first..=last {
                    ctx.state()
                        .insert(CURRENT_INDEX.to_string(), PinValue::from(index));
                    ctx.trigger("Loop Body").await?;
                }
            }
            ctx.trigger("Completed").await
        })
    }
}

impl OutputResolver for ForLoop {
    fn resolve<'a>(&'a self, ctx: NodeContext<'a>, pin_name: &'a str) -> BehaviorFuture<'a, PinValue> {
        Box::pin(async move {
            if pin_name != "Index" {
                return Ok(PinValue::neutral());
            }
            let index = ctx.state().get(CURRENT_INDEX).cloned();
            Ok(index.unwrap_or(PinValue::neutral()))
        })
    }
}

struct IntegerLiteral;

impl OutputResolver for IntegerLiteral {
    fn resolve<'a>(&'a self, ctx: NodeContext<'a>, _pin: &'a str) -> BehaviorFuture<'a, PinValue> {
        Box::pin(async move {
            let value = ctx.default_value("Value").map_or(0, PinValue::as_integer);
            Ok(PinValue::from(value))
        })
    }
}

struct StringLiteral;

impl OutputResolver for StringLiteral {
    fn resolve<'a>(&'a self, ctx: NodeContext<'a>, _pin: &'a str) -> BehaviorFuture<'a, PinValue> {
        Box::pin(async move {
            Ok(ctx
                .default_value("Value")
                .filter(|v| v.is_truthy())
                .cloned()
                .unwrap_or_else(|| PinValue::from("")))
        })
    }
}

struct AppendStrings;

impl OutputResolver for AppendStrings {
    fn resolve<'a>(&'a self, ctx: NodeContext<'a>, _pin: &'a str) -> BehaviorFuture<'a, PinValue> {
        Box::pin(async move {
            let a = ctx.input("A").await?;
            let b = ctx.input("B").await?;
            Ok(PinValue::String(format!("{a}{b}")))
        })
    }
}

struct ToText;

impl OutputResolver for ToText {
    fn resolve<'a>(&'a self, ctx: NodeContext<'a>, _pin: &'a str) -> BehaviorFuture<'a, PinValue> {
        Box::pin(async move { Ok(PinValue::String(ctx.input("Value").await?.to_string())) })
    }
}

/// Operation performed by an arithmetic node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// `A + B`
    Add,
    /// `A - B`
    Subtract,
    /// `A * B`
    Multiply,
}

impl ArithmeticOp {
    /// Apply to two operands
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
        }
    }
}

struct Arithmetic(ArithmeticOp);

impl OutputResolver for Arithmetic {
    fn resolve<'a>(&'a self, ctx: NodeContext<'a>, _pin: &'a str) -> BehaviorFuture<'a, PinValue> {
        Box::pin(async move {
            let a = ctx.input("A").await?.as_number();
            let b = ctx.input("B").await?.as_number();
            Ok(PinValue::Number(self.0.apply(a, b)))
        })
    }
}

struct Branch;

impl ExecuteHandler for Branch {
    fn execute<'a>(&'a self, ctx: NodeContext<'a>, _trigger: Option<PinId>) -> BehaviorFuture<'a, ()> {
        Box::pin(async move {
            let condition = ctx.input("Condition").await?.is_truthy();
            ctx.trigger(if condition { "True" } else { "False" }).await
        })
    }
}
