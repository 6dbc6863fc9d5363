//! Command line argument parsing for the rulestream CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// rulestream - incremental rule induction over data streams
#[derive(Parser, Debug, Clone)]
#[command(name = "rulestream")]
#[command(about = "Learn interpretable classification rules from a data stream")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct RuleStreamArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl RuleStreamArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a prequential (test-then-train) evaluation over a JSON-lines stream
    Run(RunArgs),

    /// Write a synthetic schema and stream
    Generate(GenerateArgs),
}

/// Arguments for a prequential run
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Schema file (JSON)
    #[arg(value_name = "SCHEMA_FILE")]
    pub schema_file: PathBuf,

    /// Instance stream (JSON lines)
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Classifier configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Instances buffered before an induction pass
    #[arg(short = 's', long)]
    pub window_size: Option<usize>,

    /// Coverings before a rule may be pruned
    #[arg(short = 'm', long)]
    pub min_rule_trials: Option<u64>,

    /// Accuracy below which a rule is pruned
    #[arg(short = 't', long)]
    pub accuracy_threshold: Option<f64>,

    /// Score induction candidates in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Print the final rule set
    #[arg(long)]
    pub show_rules: bool,
}

/// Arguments for synthetic data generation
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Directory receiving schema.json and stream.jsonl
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Number of instances
    #[arg(short = 'n', long, default_value = "10000")]
    pub count: usize,

    /// RNG seed
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Number of categorical attributes
    #[arg(long, default_value = "2")]
    pub categorical: usize,

    /// Number of numeric attributes
    #[arg(long, default_value = "1")]
    pub numeric: usize,

    /// Label noise probability
    #[arg(long, default_value = "0.0")]
    pub noise: f64,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let args = RuleStreamArgs::parse_from([
            "rulestream",
            "-vv",
            "--format",
            "json",
            "run",
            "schema.json",
            "stream.jsonl",
            "--window-size",
            "100",
            "--show-rules",
        ]);
        assert_eq!(args.verbosity(), 2);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.schema_file, PathBuf::from("schema.json"));
                assert_eq!(run.window_size, Some(100));
                assert_eq!(run.min_rule_trials, None);
                assert!(run.show_rules);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_generate_defaults() {
        let args = RuleStreamArgs::parse_from(["rulestream", "-q", "generate", "out"]);
        assert_eq!(args.verbosity(), 0);
        match args.command {
            Command::Generate(generate) => {
                assert_eq!(generate.count, 10000);
                assert_eq!(generate.categorical, 2);
                assert_eq!(generate.noise, 0.0);
            }
            _ => panic!("expected generate command"),
        }
    }
}
