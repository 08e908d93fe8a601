//! chainopt CLI - analyze goals and rank tool chains from a static catalog
//!
//! # Usage
//!
//! ```bash
//! # Capabilities, workflow type and complexity of a goal
//! chainopt analyze "Fetch orders and send to analytics"
//!
//! # Rank chains against a catalog
//! chainopt optimize --catalog tools.toml "Email the weekly report" --budget 0.05
//!
//! # Compare two JSON samples
//! chainopt check-flow '{"email": "a@b.c"}' '{"to": "a@b.c"}'
//! ```

use anyhow::{Context, Result};
use chainopt::config::OptimizerConfig;
use chainopt::discovery::CatalogDiscovery;
use chainopt::scoring::ChainOptimizationCriteria;
use chainopt::{check_data_flow_compatibility, ChainOptimizationRequest, ChainOptimizer};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chainopt")]
#[command(version)]
#[command(about = "Tool chain optimization engine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optimizer configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE", env = "CHAINOPT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Single-line JSON output
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the workflow analysis of a goal
    Analyze {
        goal: String,
    },

    /// Pick the best tool chain for a goal
    Optimize(OptimizeArgs),

    /// Check whether SOURCE output satisfies TARGET input
    CheckFlow {
        /// JSON sample or path to a JSON file
        source: String,
        /// JSON sample or path to a JSON file
        target: String,
    },
}

#[derive(clap::Args)]
struct OptimizeArgs {
    goal: String,

    /// Tool catalog (JSON or TOML)
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    #[arg(long, default_value = "cli")]
    user: String,

    /// Budget limit in USD
    #[arg(long)]
    budget: Option<f64>,

    /// Time limit in milliseconds
    #[arg(long)]
    time_limit: Option<u64>,

    #[arg(long)]
    max_steps: Option<usize>,

    /// Preferred tool id (repeatable)
    #[arg(long = "prefer", value_name = "ID")]
    preferred: Vec<String>,

    /// Excluded tool id (repeatable)
    #[arg(long = "exclude", value_name = "ID")]
    excluded: Vec<String>,

    #[arg(long)]
    cost_weight: Option<f64>,
    #[arg(long)]
    speed_weight: Option<f64>,
    #[arg(long)]
    reliability_weight: Option<f64>,
    #[arg(long)]
    simplicity_weight: Option<f64>,
}

impl OptimizeArgs {
    fn criteria(&self) -> Result<Option<ChainOptimizationCriteria>> {
        let weights = [
            self.cost_weight,
            self.speed_weight,
            self.reliability_weight,
            self.simplicity_weight,
        ];
        if weights.iter().all(Option::is_none) {
            return Ok(None);
        }
        let [cost, speed, reliability, simplicity] = weights.map(|w| w.unwrap_or(0.0));
        let criteria = ChainOptimizationCriteria::new(cost, speed, reliability, simplicity)
            .context("Invalid optimization weights")?;
        Ok(Some(criteria))
    }

    fn request(&self) -> Result<ChainOptimizationRequest> {
        let mut request = ChainOptimizationRequest::new(&self.goal, &self.user)
            .with_preferred_tools(self.preferred.clone())
            .with_excluded_tools(self.excluded.clone());
        request.criteria = self.criteria()?;
        request.budget_limit_usd = self.budget;
        request.time_limit_ms = self.time_limit;
        request.max_steps = self.max_steps;
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("chainopt=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chainopt=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match &cli.config {
        Some(path) => OptimizerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
            .with_env_overrides()?,
        None => OptimizerConfig::from_env()?,
    };

    match &cli.command {
        Commands::Analyze { goal } => {
            let analysis = chainopt::analysis::analyze_workflow_goal_with_config(goal, &config);
            print_json(&analysis, cli.compact)
        }
        Commands::Optimize(args) => {
            let catalog = CatalogDiscovery::from_file(&args.catalog).with_context(|| {
                format!("Failed to load tool catalog from {}", args.catalog.display())
            })?;
            let optimizer = ChainOptimizer::with_config(Arc::new(catalog), config);
            let result = optimizer
                .optimize_chain(&args.request()?)
                .await
                .context("Optimization failed")?;
            print_json(&result, cli.compact)
        }
        Commands::CheckFlow { source, target } => {
            let source = load_sample(source).context("Invalid source sample")?;
            let target = load_sample(target).context("Invalid target sample")?;
            print_json(&check_data_flow_compatibility(&source, &target), cli.compact)
        }
    }
}

fn load_sample(arg: &str) -> Result<serde_json::Value> {
    let trimmed = arg.trim_start();
    let text = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        arg.to_string()
    } else {
        std::fs::read_to_string(Path::new(arg)).with_context(|| format!("Failed to read {}", arg))?
    };
    Ok(serde_json::from_str(&text)?)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}
