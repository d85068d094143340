//! Array Node Schema Export
//!
//! Registers the array nodes and prints their definitions as JSON for the
//! blueprint editor.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use array_nodes::{ArrayNodesConfig, NodeRegistry, init_tracing, register_array_nodes};

/// Print the array node definitions as JSON
#[derive(Parser, Debug)]
#[command(name = "array_nodes")]
#[command(about = "Export the array node schemas", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ArrayNodesConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ArrayNodesConfig::default(),
    };

    init_tracing(&config.log_filter);

    let mut registry = NodeRegistry::new();
    register_array_nodes(&mut registry, &config);

    println!("{}", registry.definitions_json()?);
    Ok(())
}
