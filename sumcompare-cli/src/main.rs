//! sumcompare CLI: compare an original summary against neighbor summaries
//! and email the HTML report.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// sumcompare: LLM-driven comparison of document summaries
#[derive(Parser, Debug)]
#[command(name = "sumcompare", version, about, long_about = None)]
struct Cli {
    /// LLM model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Workspace directory
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// Compare an original summary with one or more neighbor summaries
    Compare {
        /// File holding the original summary
        #[arg(long)]
        original: PathBuf,
        /// Neighbor summary file (repeatable)
        #[arg(long = "neighbor", required = true)]
        neighbors: Vec<PathBuf>,
        /// Also write the HTML report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render and print the report without sending email
        #[arg(long)]
        no_email: bool,
        /// Escape LLM output before inserting it into the table
        #[arg(long)]
        escape: bool,
    },
    /// Parse a saved raw LLM response and print the sections as JSON
    Parse {
        /// File holding the raw response text
        file: PathBuf,
    },
    /// Print the effective configuration (secrets redacted)
    Config,
}

/// Global options shared by every subcommand.
pub(crate) struct GlobalOptions {
    pub workspace: PathBuf,
    pub config: Option<PathBuf>,
    pub model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "sumcompare", "sumcompare")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "sumcompare.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let options = GlobalOptions {
        workspace,
        config: cli.config,
        model: cli.model,
    };

    commands::handle_command(cli.command, &options).await
}
