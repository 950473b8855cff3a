//! Tangle CLI: batch analysis of a social-network dataset.
//!
//! Usage:
//!   tangle analyze <dataset.json> [--partition p.json] [--config c.yaml] [--combine union]
//!   tangle stats <dataset.json> [--config c.yaml]
//!   tangle profile <dataset.json> <node> [--config c.yaml]
//!   tangle config

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tangle::{AnalysisConfig, AnalysisEngine, CombineMethod, Dataset, GraphLayerBuilder, Partition};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tangle",
    version,
    about = "Coordinated behaviour and misinformation cluster detection"
)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print the JSON report
    Analyze {
        /// Dataset JSON with posts, edges and claims
        dataset: PathBuf,
        /// JSON object mapping node id to community id
        #[arg(long)]
        partition: Option<PathBuf>,
        /// Layer combination method (union or intersection)
        #[arg(long)]
        combine: Option<CombineMethod>,
    },
    /// Print per-layer statistics
    Stats {
        dataset: PathBuf,
    },
    /// Print one node's presence across layers
    Profile {
        dataset: PathBuf,
        node: String,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TANGLE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit file, else the default location if present, else built-in defaults
fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, String> {
    match path {
        Some(p) => AnalysisConfig::load(p).map_err(|e| format!("Failed to load config: {}", e)),
        None => {
            let default = AnalysisConfig::default_path();
            if default.exists() {
                AnalysisConfig::load(&default).map_err(|e| format!("Failed to load config: {}", e))
            } else {
                Ok(AnalysisConfig::default())
            }
        }
    }
}

fn load_dataset(path: &Path) -> Result<Dataset, String> {
    Dataset::from_path(path).map_err(|e| format!("Failed to load dataset '{}': {}", path.display(), e))
}

fn load_partition(path: Option<&Path>) -> Result<Partition, String> {
    let Some(path) = path else {
        return Ok(Partition::new());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read partition '{}': {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid partition '{}': {}", path.display(), e))
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn build_network(config: &AnalysisConfig, dataset: &Dataset) -> GraphLayerBuilder {
    let mut builder = GraphLayerBuilder::new(config.layers.clone());
    builder.build_layers(&dataset.edges);
    if config
        .layers
        .get(tangle::graph::layer::HASHTAG)
        .is_some_and(|c| c.enabled)
    {
        builder.build_hashtag_layer(&dataset.posts);
    }
    builder
}

fn cmd_analyze(
    mut config: AnalysisConfig,
    dataset: &Path,
    partition: Option<&Path>,
    combine: Option<CombineMethod>,
) -> Result<i32, String> {
    if let Some(method) = combine {
        config.combine = method;
    }
    let dataset = load_dataset(dataset)?;
    let partition = load_partition(partition)?;

    let engine = AnalysisEngine::new(config);
    let snapshot = engine.run(&dataset, &partition).map_err(|e| e.to_string())?;
    Ok(print_json(&snapshot))
}

fn cmd_stats(config: AnalysisConfig, dataset: &Path) -> Result<i32, String> {
    let dataset = load_dataset(dataset)?;
    let mut builder = build_network(&config, &dataset);
    builder
        .combine_layers(config.combine)
        .map_err(|e| e.to_string())?;
    Ok(print_json(&builder.get_layer_statistics()))
}

fn cmd_profile(config: AnalysisConfig, dataset: &Path, node: &str) -> Result<i32, String> {
    let dataset = load_dataset(dataset)?;
    let builder = build_network(&config, &dataset);
    let profile = builder.node_profile(&node.into());
    if profile.layers.is_empty() {
        return Err(format!("node '{}' not found in any layer", node));
    }
    Ok(print_json(&profile))
}

fn cmd_config(config: AnalysisConfig) -> Result<i32, String> {
    let yaml = config.to_yaml().map_err(|e| e.to_string())?;
    print!("{}", yaml);
    Ok(0)
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Analyze {
            dataset,
            partition,
            combine,
        } => cmd_analyze(config, &dataset, partition.as_deref(), combine),
        Commands::Stats { dataset } => cmd_stats(config, &dataset),
        Commands::Profile { dataset, node } => cmd_profile(config, &dataset, &node),
        Commands::Config => cmd_config(config),
    };

    let code = result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        1
    });
    std::process::exit(code);
}
