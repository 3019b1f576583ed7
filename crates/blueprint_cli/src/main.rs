// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blueprint runner.
//!
//! Builds one of the demo graphs from the built-in node library and runs it
//! from its event nodes, printing the run log when it finishes.

mod demos;

use blueprint_graph::library::create_default_registry;
use blueprint_graph::log::Tee;
use blueprint_graph::{
    ConfigError, EngineConfig, ExecutionError, InstantVisitor, MemoryLog, NodeCategory, RunOutcome,
    Runner, TracingLog,
};
use clap::Parser;
use demos::Demo;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Demo graph to run
    #[arg(short, long, value_enum, default_value_t = Demo::Hello)]
    demo: Demo,

    /// Engine config file (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip visit delays
    #[arg(long)]
    instant: bool,

    /// List the node catalog and exit
    #[arg(long)]
    list: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Demo {0:?} needs a node type missing from the registry")]
    Demo(Demo),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blueprint_graph=info,blueprint_cli=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let registry = create_default_registry();

    if cli.list {
        for category in [
            NodeCategory::Events,
            NodeCategory::FlowControl,
            NodeCategory::Utilities,
            NodeCategory::Constants,
            NodeCategory::String,
            NodeCategory::Math,
            NodeCategory::Custom,
        ] {
            for ty in registry.types_in_category(category) {
                println!("{:<14} {:<20} {}", category.label(), ty.id, ty.title);
            }
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if cli.instant {
        config.node_visit_ms = 0;
        config.edge_visit_ms = 0;
    }
    tracing::debug!(?config, "Engine config");

    let graph = cli.demo.build(&registry).ok_or(CliError::Demo(cli.demo))?;
    tracing::info!(
        "Loaded \"{}\": {} nodes, {} edges",
        graph.name,
        graph.node_count(),
        graph.edge_count()
    );

    let transcript = Arc::new(MemoryLog::new());
    let mut runner = Runner::new(config, Arc::new(Tee(transcript.clone(), TracingLog)));
    if cli.instant {
        runner = runner.with_visitor(Arc::new(InstantVisitor));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let report = runtime.block_on(runner.run(&graph))?;

    for entry in transcript.entries() {
        println!(
            "[{}] {:<8} {}",
            entry.time_label(),
            entry.severity.name(),
            entry.message
        );
    }
    if report.outcome == RunOutcome::Completed {
        tracing::info!(
            "Ran {} event node(s) in {:.2?}",
            report.sources.len(),
            report.elapsed
        );
    }
    Ok(())
}
