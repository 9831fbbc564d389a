//! Headless inspector for world entity graphs.
//!
//! Loads a world snapshot and prints graph or search payloads as JSON:
//!
//! ```bash
//! cargo run -p worldgraph -- --snapshot world.json search w1 zara
//! ```

mod args;

use args::{parse_args, print_help, Command, SNAPSHOT_ENV};
use tracing_subscriber::EnvFilter;
use worldgraph_core::{GraphConfig, WorldGraph, WorldId, WorldSnapshot};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if invocation.command == Command::Help {
        print_help();
        return Ok(());
    }

    let Some(path) = invocation
        .snapshot
        .or_else(|| std::env::var(SNAPSHOT_ENV).ok())
    else {
        eprintln!("Error: no snapshot given.");
        eprintln!("Pass --snapshot <path> or set {SNAPSHOT_ENV}.");
        std::process::exit(2);
    };

    let store = WorldSnapshot::load_json(&path).await?.into_store();
    tracing::debug!(path = %path, "snapshot loaded");

    match invocation.command {
        Command::Graph { world, kinds } => {
            let graph = WorldGraph::new(store);
            let mut data = graph.graph_data(&WorldId::new(world)).await;
            if let Some(kinds) = kinds {
                data.retain_kinds(&kinds);
            }
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Search { world, query, limit } => {
            let mut config = GraphConfig::new();
            if let Some(limit) = limit {
                config = config.with_search_limit(limit);
            }
            let graph = WorldGraph::new(store).with_config(config);
            let results = graph.search(&WorldId::new(world), &query).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::List { world } => {
            let graph = WorldGraph::new(store);
            let results = graph.all_entities(&WorldId::new(world)).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Help => print_help(),
    }

    Ok(())
}
