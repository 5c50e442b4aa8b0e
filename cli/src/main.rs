use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_dispatch::Dispatcher;
use command_dispatch_core::{CommandSummary, DispatchConfig};
use command_dispatch_table::TableDocument;
use serde_json::{Map, Value};
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Structured output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

/// Formats accepted by `list`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ListFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "dispatch-argv")]
#[command(about = "Check declarative command tables and dispatch argv against them")]
struct Cli {
    /// Log dispatch decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a command table and run every definition check.
    Check(CheckArgs),
    /// List the commands a table declares.
    List(ListArgs),
    /// Dispatch an argv against a table and print the typed result.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Table file (.yaml, .yml or .json).
    table: PathBuf,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Table file (.yaml, .yml or .json).
    table: PathBuf,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: ListFormat,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Table file (.yaml, .yml or .json).
    #[arg(long)]
    table: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to dispatch, given after `--`.
    #[arg(last = true)]
    argv: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::List(args) => run_list(args),
        Command::Run(args) => run_dispatch(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let config = load_config(&args.table)?;
    let summaries = command_summaries(&config);

    println!(
        "Table '{}' is valid: {} command(s).",
        args.table.display(),
        summaries.len()
    );
    if let Some(default) = &config.default_command {
        println!("Default command: {default}");
    }
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let config = load_config(&args.table)?;
    let summaries = command_summaries(&config);

    let raw = match args.format {
        ListFormat::Text => summaries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        ListFormat::Json => serde_json::to_string_pretty(&summaries)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        ListFormat::Yaml => serde_yaml::to_string(&summaries)
            .map_err(|e| format!("YAML serialization failed: {e}"))?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}

fn run_dispatch(args: RunArgs) -> Result<(), String> {
    let config = load_config(&args.table)?;
    let dispatcher = Dispatcher::new(config).map_err(|e| e.to_string())?;

    debug!(argv = ?args.argv, "Dispatching");
    let result = dispatcher.dispatch(&args.argv).map_err(|e| e.to_string())?;

    let raw = format_value(&result.to_json(), args.format)?;
    println!("{}", raw.trim_end());
    Ok(())
}

fn load_config(path: &Path) -> Result<DispatchConfig, String> {
    let doc = TableDocument::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    debug!(commands = doc.commands.len(), version = %doc.version, "Loaded table");
    doc.into_config()
        .map_err(|err| format!("'{}': {err}", path.display()))
}

/// Summaries for a table as seen with no global flags.
fn command_summaries(config: &DispatchConfig) -> Vec<CommandSummary> {
    config
        .commands
        .materialize(&Value::Object(Map::new()), config.global_options.as_ref())
        .summaries()
}

fn format_value(value: &Value, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}
