//! Command-line interface for the review repair pipeline.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing::warn;

use crate::config::{ReviewConfig, ReviewConfigBuilder};
use crate::error::{PipelineError, Result};
use crate::record::{BatchReport, ProcessedRecord, RecordOutcome, RecordPipeline};
use crate::repair::HeuristicRepairer;
use crate::report::{json_report, violation_lines, wrapped_pretty};
use crate::schema::SchemaValidator;

/// Reviewrepair - Repair, normalize and validate reviewer JSON records.
#[derive(Parser)]
#[command(name = "reviewrepair")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Repair and validate a single record.
    Check(InputArgs),

    /// Repair and validate up to four `reviewer`-delimited records.
    Batch(InputArgs),
}

/// Options shared by both subcommands.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input file (default: stdin)
    pub input: Option<PathBuf>,

    /// Draft-07 JSON Schema file (default: $REVIEWREPAIR_SCHEMA or built-in)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Words per line for wrapped output, clamped to 20..=80
    #[arg(short, long)]
    pub wrap: Option<usize>,

    /// Print string fields re-flowed to a fixed number of words per line
    #[arg(long)]
    pub wrapped: bool,

    /// Print a machine-readable JSON report instead
    #[arg(long, conflicts_with = "wrapped")]
    pub json: bool,
}

impl InputArgs {
    /// Environment configuration with this invocation's flags applied.
    fn config(&self) -> ReviewConfig {
        let mut builder = ReviewConfigBuilder::from_config(ReviewConfig::from_env());
        if let Some(words) = self.wrap {
            builder = builder.wrap_words(words);
        }
        if let Some(path) = &self.schema {
            builder = builder.schema_path(path.clone());
        }
        builder.build()
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => check_command(&args),
        Commands::Batch(args) => batch_command(&args),
    }
}

fn check_command(args: &InputArgs) -> Result<()> {
    let config = args.config();
    let input = read_input(args.input.as_deref())?;
    let validator = load_validator(config.schema_path.as_deref())?;

    let repairer = HeuristicRepairer;
    let pipeline = RecordPipeline::new(&repairer, &validator);
    let outcome = match pipeline.process(&input) {
        Ok(repaired) => RecordOutcome::Repaired(repaired),
        Err(e @ PipelineError::Repair { .. }) => RecordOutcome::Failed(e),
        Err(e) => return Err(e),
    };

    let report = BatchReport {
        records: vec![ProcessedRecord {
            label: "Record".to_string(),
            outcome,
        }],
        warnings: Vec::new(),
    };
    finish(&report, args, &config)
}

fn batch_command(args: &InputArgs) -> Result<()> {
    let config = args.config();
    let input = read_input(args.input.as_deref())?;
    let validator = load_validator(config.schema_path.as_deref())?;

    let repairer = HeuristicRepairer;
    let pipeline = RecordPipeline::new(&repairer, &validator);
    let report = pipeline.process_batch(&input, config.max_segments);

    if report.records.is_empty() {
        print_warnings(&report.warnings);
        return Err(PipelineError::InvalidInput(
            "no records found in input".to_string(),
        ));
    }
    finish(&report, args, &config)
}

/// Read the input file, or stdin when no file is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if text.trim().is_empty() {
        return Err(PipelineError::InvalidInput("input is empty".to_string()));
    }
    Ok(text)
}

/// Load the schema file if one was configured; a fallback is printed, not fatal.
///
/// A schema file that cannot be read (missing, unreadable, not UTF-8) is
/// treated like unusable schema text.
fn load_validator(schema_path: Option<&Path>) -> Result<SchemaValidator> {
    let schema_text = match schema_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                let message = format!(
                    "cannot read schema {}: {e}, using default schema",
                    path.display()
                );
                warn!(%message, "schema fallback");
                print_warnings(std::slice::from_ref(&message));
                None
            }
        },
        None => None,
    };
    let loaded = SchemaValidator::load(schema_text.as_deref())?;

    if let Some(warning) = &loaded.fallback_warning {
        print_warnings(std::slice::from_ref(warning));
    }
    Ok(loaded.validator)
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{} {}", style("Warning:").yellow().bold(), warning);
    }
}

/// Print the report and turn any failed record into a non-zero exit.
fn finish(report: &BatchReport, args: &InputArgs, config: &ReviewConfig) -> Result<()> {
    print_warnings(&report.warnings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_report(report))?);
    } else {
        for record in &report.records {
            print_record(record, args.wrapped.then_some(config.wrap_words))?;
        }
    }

    let failed = report.failed_count();
    if failed > 0 {
        return Err(PipelineError::RecordsFailed {
            failed,
            total: report.records.len(),
        });
    }
    Ok(())
}

fn print_record(record: &ProcessedRecord, wrap: Option<usize>) -> Result<()> {
    match &record.outcome {
        RecordOutcome::Repaired(repaired) => {
            if repaired.is_valid() {
                println!(
                    "{} {}",
                    style(&record.label).bold(),
                    style("valid").green().bold()
                );
            } else {
                println!(
                    "{} {} ({} violation(s))",
                    style(&record.label).bold(),
                    style("invalid").red().bold(),
                    repaired.violations.len()
                );
            }

            match wrap {
                Some(words) => println!("{}", wrapped_pretty(&repaired.record, words)?),
                None => println!("{}", repaired.pretty),
            }
            for line in violation_lines(&repaired.violations) {
                println!("{}", style(line).red());
            }
        }
        RecordOutcome::Failed(error) => {
            println!(
                "{} {}",
                style(&record.label).bold(),
                style(error).red().bold()
            );
            if let Some(raw) = error.raw_text() {
                println!("{}", style("Raw text:").dim());
                println!("{raw}");
            }
        }
    }
    println!();
    Ok(())
}
