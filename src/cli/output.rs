//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, RuleStreamArgs};
use crate::classifier::ClassifierMetrics;
use crate::error::Result;

/// Result structure for a prequential run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub instances: u64,
    pub prequential_accuracy: Option<f64>,
    pub duration_ms: u64,
    pub instances_per_second: f64,
    pub metrics: ClassifierMetrics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
}

/// Result structure for synthetic data generation.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResult {
    pub schema_path: String,
    pub data_path: String,
    pub instances: usize,
}

/// Types that know how to print themselves for a human reader.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Output a result in the requested format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &RuleStreamArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &RuleStreamArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", rate * 100.0),
        None => "undefined".to_string(),
    }
}

impl HumanOutput for RunResult {
    fn print_human(&self) {
        println!("Prequential Evaluation:");
        println!("═══════════════════════");
        println!("Instances: {}", self.instances);
        println!("Accuracy: {}", format_rate(self.prequential_accuracy));
        println!(
            "Duration: {}ms ({:.1} instances/sec)",
            self.duration_ms, self.instances_per_second
        );

        println!();
        println!("Rule Statistics:");
        println!("────────────────");
        println!("Abstaining rate: {}", format_rate(self.metrics.abstaining_rate));
        println!(
            "Tentative accuracy: {}",
            format_rate(self.metrics.tentative_accuracy)
        );
        println!("Rules: {}", self.metrics.rule_count);
        println!(
            "Induction passes: {} ({} deferred)",
            self.metrics.induction_passes, self.metrics.deferred_batches
        );
        println!("Rules pruned: {}", self.metrics.rules_pruned);
        println!(
            "Buffered: {} in window, {} leftover",
            self.metrics.window_len, self.metrics.leftover_len
        );

        if !self.rules.is_empty() {
            println!();
            println!("Rules:");
            println!("──────");
            for rule in &self.rules {
                println!("{rule}");
            }
        }
    }
}

impl HumanOutput for GenerationResult {
    fn print_human(&self) {
        println!("Schema: {}", self.schema_path);
        println!("Data: {} ({} instances)", self.data_path, self.instances);
    }
}
