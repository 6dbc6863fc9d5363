//! Command implementations for the rulestream CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::classifier::{ClassifierConfig, StreamClassifier, evaluate_prequential};
use crate::data::{Instance, InstanceHeader, InstanceRecord, SyntheticStream, SyntheticStreamConfig};
use crate::error::{Result, RuleStreamError};

/// Execute a CLI command.
pub fn execute_command(args: RuleStreamArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run_stream(run_args.clone(), &args),
        Command::Generate(generate_args) => generate_stream(generate_args.clone(), &args),
    }
}

/// Load a header from a JSON schema file.
pub fn load_header(path: &Path) -> Result<InstanceHeader> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Build the classifier configuration from an optional file and flag
/// overrides.
pub fn load_config(args: &RunArgs) -> Result<ClassifierConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => ClassifierConfig::default(),
    };
    if let Some(window_size) = args.window_size {
        config.window_size = window_size;
    }
    if let Some(min_rule_trials) = args.min_rule_trials {
        config.min_rule_trials = min_rule_trials;
    }
    if let Some(accuracy_threshold) = args.accuracy_threshold {
        config.accuracy_threshold = accuracy_threshold;
    }
    if args.parallel {
        config.parallel_scoring = true;
    }
    config.validate()?;
    Ok(config)
}

/// Lazily parses a JSON-lines stream into instances. Blank lines are skipped.
pub struct RecordReader<'a, R> {
    header: &'a InstanceHeader,
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<'a, R: BufRead> RecordReader<'a, R> {
    pub fn new(header: &'a InstanceHeader, reader: R) -> Self {
        RecordReader {
            header,
            lines: reader.lines(),
            line_number: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<Instance> {
        let record: InstanceRecord = serde_json::from_str(line)?;
        self.header.parse_record(&record)
    }
}

impl<R: BufRead> Iterator for RecordReader<'_, R> {
    type Item = Result<Instance>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(self.parse_line(&line).map_err(|e| {
                RuleStreamError::invalid_instance(format!("line {}: {e}", self.line_number))
            }));
        }
    }
}

/// Run a prequential evaluation over a JSON-lines stream.
fn run_stream(args: RunArgs, cli_args: &RuleStreamArgs) -> Result<()> {
    let header = load_header(&args.schema_file)?;
    let config = load_config(&args)?;
    debug!(?config, "classifier configuration");

    let mut classifier = StreamClassifier::new(header.clone(), config)?;
    let file = File::open(&args.data_file)?;
    info!(path = %args.data_file.display(), "reading stream");

    let mut read_error = None;
    let instances = RecordReader::new(&header, BufReader::new(file)).map_while(|item| match item {
        Ok(instance) => Some(instance),
        Err(e) => {
            read_error = Some(e);
            None
        }
    });
    let summary = evaluate_prequential(&mut classifier, instances)?;
    if let Some(e) = read_error {
        return Err(e);
    }

    let duration_ms = summary.duration.as_millis() as u64;
    let seconds = summary.duration.as_secs_f64();
    let result = RunResult {
        instances: summary.instances,
        prequential_accuracy: summary.accuracy(),
        duration_ms,
        instances_per_second: if seconds > 0.0 {
            summary.instances as f64 / seconds
        } else {
            0.0
        },
        metrics: classifier.metrics(),
        rules: if args.show_rules {
            classifier.describe_rules()
        } else {
            Vec::new()
        },
    };

    output_result("Stream processed", &result, cli_args)
}

/// Write a synthetic schema and stream.
fn generate_stream(args: GenerateArgs, cli_args: &RuleStreamArgs) -> Result<()> {
    let stream = SyntheticStream::new(SyntheticStreamConfig {
        num_categorical: args.categorical,
        num_numeric: args.numeric,
        noise: args.noise,
        seed: args.seed,
    })?;
    let header = stream.header().clone();

    fs::create_dir_all(&args.output_dir)?;
    let schema_path = args.output_dir.join("schema.json");
    let data_path = args.output_dir.join("stream.jsonl");

    fs::write(&schema_path, serde_json::to_string_pretty(&header)?)?;

    let mut writer = BufWriter::new(File::create(&data_path)?);
    for instance in stream.take(args.count) {
        serde_json::to_writer(&mut writer, &header.to_record(&instance)?)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    output_result(
        "Synthetic stream generated",
        &GenerationResult {
            schema_path: schema_path.to_string_lossy().to_string(),
            data_path: data_path.to_string_lossy().to_string(),
            instances: args.count,
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::*;
    use crate::data::Attribute;

    fn header() -> InstanceHeader {
        InstanceHeader::new(
            vec![Attribute::categorical("A", ["x", "y"]), Attribute::numeric("b")],
            "class",
            ["no", "yes"],
        )
        .unwrap()
    }

    fn run_args() -> RunArgs {
        RunArgs {
            schema_file: PathBuf::from("schema.json"),
            data_file: PathBuf::from("stream.jsonl"),
            config: None,
            window_size: None,
            min_rule_trials: None,
            accuracy_threshold: None,
            parallel: false,
            show_rules: false,
        }
    }

    #[test]
    fn test_record_reader() {
        let header = header();
        let input = "{\"values\": [\"x\", 1.5], \"class\": \"yes\"}\n\n{\"values\": [\"y\", 0.5], \"class\": \"no\"}\n";
        let instances: Vec<Instance> = RecordReader::new(&header, Cursor::new(input))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[1], Instance::new(vec![1.0, 0.5], 0));
    }

    #[test]
    fn test_record_reader_reports_line() {
        let header = header();
        let input = "{\"values\": [\"x\", 1.5], \"class\": \"yes\"}\n{\"values\": [\"z\", 0.5], \"class\": \"no\"}\n";
        let results: Vec<Result<Instance>> = RecordReader::new(&header, Cursor::new(input)).collect();
        assert!(results[0].is_ok());
        let error = results[1].as_ref().unwrap_err().to_string();
        assert!(error.contains("line 2"), "{error}");
    }

    #[test]
    fn test_load_config_overrides() {
        let mut args = run_args();
        args.window_size = Some(25);
        args.accuracy_threshold = Some(0.6);
        args.parallel = true;
        let config = load_config(&args).unwrap();
        assert_eq!(config.window_size, 25);
        assert_eq!(config.min_rule_trials, 10);
        assert_eq!(config.accuracy_threshold, 0.6);
        assert!(config.parallel_scoring);

        args.min_rule_trials = Some(1);
        assert!(load_config(&args).is_err());
    }
}
