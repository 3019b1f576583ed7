// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end runs of graphs built from the built-in node library.

use blueprint_graph::library::create_default_registry;
use blueprint_graph::{
    EngineConfig, Graph, InstantVisitor, LogSeverity, MemoryLog, NodeId, NodeRegistry, PinValue,
    RunOutcome, Runner,
};
use std::sync::Arc;

struct Fixture {
    registry: NodeRegistry,
    graph: Graph,
}

impl Fixture {
    fn new() -> Self {
        Self {
            registry: create_default_registry(),
            graph: Graph::new("Scenario"),
        }
    }

    fn add(&mut self, type_id: &str) -> NodeId {
        let node = self.registry.create_node(type_id).unwrap();
        self.graph.add_node(node)
    }

    fn wire(&mut self, from: NodeId, output: &str, to: NodeId, input: &str) {
        let out = self
            .graph
            .node(from)
            .unwrap()
            .outputs()
            .find(|p| p.name == output)
            .unwrap()
            .id;
        let input = self.graph.node(to).unwrap().find_input(input).unwrap().id;
        self.graph.connect(out, input).unwrap();
    }

    fn set(&mut self, node: NodeId, pin: &str, value: impl Into<PinValue>) {
        assert!(self.graph.set_default_value(node, pin, value));
    }

    async fn run(&self) -> (RunOutcome, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        let runner =
            Runner::new(EngineConfig::instant(), log.clone()).with_visitor(Arc::new(InstantVisitor));
        let report = runner.run(&self.graph).await.unwrap();
        (report.outcome, log)
    }
}

#[tokio::test]
async fn test_hello_world() {
    let mut fx = Fixture::new();
    let event = fx.add("event_begin_play");
    let print = fx.add("print_string");
    fx.wire(event, "", print, "");

    let (outcome, log) = fx.run().await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(log.messages(LogSeverity::Success), vec!["Hello World"]);
    assert_eq!(
        log.messages(LogSeverity::System),
        vec!["Starting simulation...", "Simulation finished."]
    );
}

#[tokio::test]
async fn test_for_loop_prints_each_index_then_completes() {
    let mut fx = Fixture::new();
    let event = fx.add("event_begin_play");
    let looper = fx.add("for_loop");
    let to_text = fx.add("to_string");
    let body = fx.add("print_string");
    let done = fx.add("print_string");
    fx.set(looper, "First Index", 0.0);
    fx.set(looper, "Last Index", 2.0);
    fx.set(done, "In String", "Completed");

    fx.wire(event, "", looper, "");
    fx.wire(looper, "Loop Body", body, "");
    fx.wire(looper, "Index", to_text, "Value");
    fx.wire(to_text, "Result", body, "In String");
    fx.wire(looper, "Completed", done, "");

    let (_, log) = fx.run().await;

    assert_eq!(
        log.messages(LogSeverity::Success),
        vec!["0", "1", "2", "Completed"]
    );
}

#[tokio::test]
async fn test_empty_loop_range_only_completes() {
    let mut fx = Fixture::new();
    let event = fx.add("event_begin_play");
    let looper = fx.add("for_loop");
    let body = fx.add("print_string");
    let done = fx.add("print_string");
    fx.set(looper, "First Index", 3.0);
    fx.set(looper, "Last Index", 1.0);
    fx.set(body, "In String", "body");
    fx.set(done, "In String", "done");
    fx.wire(event, "", looper, "");
    fx.wire(looper, "Loop Body", body, "");
    fx.wire(looper, "Completed", done, "");

    let (_, log) = fx.run().await;
    assert_eq!(log.messages(LogSeverity::Success), vec!["done"]);
}

#[tokio::test(start_paused = true)]
async fn test_sources_run_sequentially() {
    let mut fx = Fixture::new();
    let first = fx.add("event_begin_play");
    let wait = fx.add("delay");
    let a1 = fx.add("print_string");
    let a2 = fx.add("print_string");
    let second = fx.add("event_begin_play");
    let b1 = fx.add("print_string");
    fx.set(wait, "Duration", 0.05);
    fx.set(a1, "In String", "A1");
    fx.set(a2, "In String", "A2");
    fx.set(b1, "In String", "B1");

    fx.wire(first, "", a1, "");
    fx.wire(a1, "", wait, "");
    fx.wire(wait, "Completed", a2, "");
    fx.wire(second, "", b1, "");

    let (_, log) = fx.run().await;
    assert_eq!(log.messages(LogSeverity::Success), vec!["A1", "A2", "B1"]);
}

#[tokio::test]
async fn test_add_with_defaults() {
    let mut fx = Fixture::new();
    let add = fx.add("add");
    fx.set(add, "A", 2.0);
    fx.set(add, "B", 3.0);

    let log = Arc::new(MemoryLog::new());
    let runner = Runner::new(EngineConfig::instant(), log).with_visitor(Arc::new(InstantVisitor));
    let engine = runner.engine(&fx.graph);

    assert_eq!(
        engine.resolve_output(add, "Result").await.unwrap(),
        PinValue::Number(5.0)
    );
}

#[tokio::test]
async fn test_rewiring_an_input_replaces_its_edge() {
    let mut fx = Fixture::new();
    let event = fx.add("event_begin_play");
    let print = fx.add("print_string");
    let hello = fx.add("multi_line_string");
    let bye = fx.add("multi_line_string");
    fx.set(hello, "Value", "hello");
    fx.set(bye, "Value", "bye");
    fx.wire(event, "", print, "");
    fx.wire(hello, "Value", print, "In String");
    fx.wire(bye, "Value", print, "In String");

    assert_eq!(fx.graph.edge_count(), 2);
    let (_, log) = fx.run().await;
    assert_eq!(log.messages(LogSeverity::Success), vec!["bye"]);
}

#[tokio::test]
async fn test_branch_on_computed_condition() {
    let mut fx = Fixture::new();
    let event = fx.add("event_begin_play");
    let branch = fx.add("branch");
    let yes = fx.add("print_string");
    let no = fx.add("print_string");
    fx.set(yes, "In String", "non-zero");
    fx.set(no, "In String", "zero");
    fx.wire(event, "", branch, "");
    fx.wire(branch, "True", yes, "");
    fx.wire(branch, "False", no, "");

    // Conditions are booleans; a number output cannot be wired in
    let sub = fx.add("subtract");
    let out = fx.graph.node(sub).unwrap().outputs().next().unwrap().id;
    let cond = fx.graph.node(branch).unwrap().find_input("Condition").unwrap().id;
    assert!(!fx.graph.can_connect(out, cond));

    fx.set(branch, "Condition", 1.0);
    let (_, log) = fx.run().await;
    assert_eq!(log.messages(LogSeverity::Success), vec!["non-zero"]);
}

#[tokio::test]
async fn test_custom_node_output_is_null() {
    let mut fx = Fixture::new();
    let event = fx.add("event_begin_play");
    let custom = fx.add("my_macro");
    let print = fx.add("print_string");
    fx.wire(event, "", print, "");
    fx.wire(custom, "Output", print, "In String");

    let (_, log) = fx.run().await;
    assert_eq!(log.messages(LogSeverity::Success), vec!["null"]);
}

#[tokio::test]
async fn test_long_print_chain_completes() {
    let mut fx = Fixture::new();
    let event = fx.add("event_begin_play");
    let mut previous = event;
    for i in 0..200 {
        let print = fx.add("print_string");
        fx.set(print, "In String", format!("line {i}"));
        fx.wire(previous, "", print, "");
        previous = print;
    }

    let (outcome, log) = fx.run().await;

    assert_eq!(outcome, RunOutcome::Completed);
    let lines = log.messages(LogSeverity::Success);
    assert_eq!(lines.len(), 200);
    assert_eq!(lines.last().map(String::as_str), Some("line 199"));
    assert!(log.messages(LogSeverity::Error).is_empty());
}

#[tokio::test]
async fn test_nothing_to_run() {
    let mut fx = Fixture::new();
    fx.add("print_string");
    let (outcome, log) = fx.run().await;

    assert_eq!(outcome, RunOutcome::NothingToRun);
    assert_eq!(
        log.messages(LogSeverity::Warning),
        vec!["No event nodes found to start from."]
    );
}
