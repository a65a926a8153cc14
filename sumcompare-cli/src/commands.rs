//! CLI subcommand handlers.

use crate::{Commands, GlobalOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumcompare_core::config::{ComparatorConfig, load_config};
use sumcompare_core::delivery::{DeliveryStatus, MemorySink, ReportSink, SmtpReportSink};
use sumcompare_core::providers::create_provider;
use sumcompare_core::{Summary, SummaryComparator, parse_comparison};
use tracing::{info, warn};

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, options: &GlobalOptions) -> anyhow::Result<()> {
    match command {
        Commands::Compare {
            original,
            neighbors,
            output,
            no_email,
            escape,
        } => {
            let mut config = resolve_config(options)?;
            if no_email {
                config.report.send_email = false;
            }
            if escape {
                config.report.escape_fragments = true;
            }
            handle_compare(config, &original, &neighbors, output.as_deref()).await
        }
        Commands::Parse { file } => handle_parse(&file),
        Commands::Config => handle_config(options),
    }
}

/// Load layered configuration and apply CLI overrides.
fn resolve_config(options: &GlobalOptions) -> anyhow::Result<ComparatorConfig> {
    let mut config = load_config(Some(&options.workspace), options.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    config.email = config
        .email
        .with_legacy_env()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    if let Some(model) = &options.model {
        config.llm.model = model.clone();
    }
    for warning in config.validate() {
        warn!("{}", warning);
    }
    Ok(config)
}

async fn handle_compare(
    config: ComparatorConfig,
    original: &Path,
    neighbors: &[PathBuf],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let original = load_summary(original)?;
    let neighbors = neighbors
        .iter()
        .map(|path| load_summary(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    // Fail on missing SMTP settings before spending any LLM calls.
    let sink: Arc<dyn ReportSink> = if config.report.send_email {
        let smtp = SmtpReportSink::new(config.email.clone()).map_err(|e| {
            anyhow::anyhow!("{}. Configure [email] or pass --no-email.", e)
        })?;
        Arc::new(smtp)
    } else {
        Arc::new(MemorySink::new())
    };

    let provider = create_provider(&config.llm)?;
    let comparator = SummaryComparator::new(provider, sink, &config);

    let outcome = comparator
        .compare_with_multiple_neighbors(&original, &neighbors)
        .await?;

    if let Some(path) = output {
        std::fs::write(path, &outcome.html)?;
        info!(path = %path.display(), "HTML report written");
    }

    match &outcome.delivery {
        DeliveryStatus::Sent => println!("Report sent: {}", outcome.subject),
        DeliveryStatus::Skipped => {
            if output.is_none() {
                println!("{}", outcome.html);
            }
        }
        DeliveryStatus::Failed(reason) => {
            eprintln!("Report could not be emailed: {}", reason);
        }
    }
    Ok(())
}

fn handle_parse(file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    println!("{}", render_parsed_json(&raw)?);
    Ok(())
}

fn render_parsed_json(raw: &str) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&parse_comparison(raw))?)
}

fn handle_config(options: &GlobalOptions) -> anyhow::Result<()> {
    let config = resolve_config(options)?;
    println!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}

fn load_summary(path: &Path) -> anyhow::Result<Summary> {
    Summary::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read summary {}: {}", path.display(), e))
}
