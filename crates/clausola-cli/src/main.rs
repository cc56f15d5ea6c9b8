//! Clausola: risk reports for Italian contracts.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clausola_core::{ClausolaConfig, Report, Strategy};
use clausola_runtime::DocumentService;

mod cli;

use cli::{AnalyzeArgs, Arguments, Command};

fn resolve_data_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    if let Some(dir) = exe_dir {
        let parent_data = dir.join("../data");
        if parent_data.exists() {
            return parent_data;
        }
    }
    PathBuf::from("data")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {}", e);
        }
    }

    // Logs go to stderr, reports to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();
    let data_dir = args.data_dir.clone().unwrap_or_else(resolve_data_dir);
    info!("Data directory: {}", data_dir.display());

    let config = ClausolaConfig::from_env(&data_dir)?;

    match args.command {
        Command::Analyze(analyze) => {
            let ready = run_analyze(config, &analyze).await?;
            if !ready {
                std::process::exit(1);
            }
        }
        Command::Show { document_id } => {
            let service = storage_service(config)?;
            print_json(&service.get(&document_id)?, false)?;
        }
        Command::ImportReport {
            document_id,
            report,
        } => {
            let service = storage_service(config)?;
            let parsed = read_report(&report)?;
            let saved = service.import_report(&document_id, parsed)?;
            info!("Imported report for document {}", document_id);
            print_json(&saved, false)?;
        }
    }

    Ok(())
}

/// Returns whether the document ended up with a ready report.
async fn run_analyze(mut config: ClausolaConfig, args: &AnalyzeArgs) -> anyhow::Result<bool> {
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    let service = DocumentService::from_config(&config, !args.no_store)?;
    let (document_id, outcome) = service.submit(&args.pdf).await?;

    let mut value = serde_json::to_value(&outcome)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("document_id".into(), document_id.clone().into());
    }
    print_json(&value, args.compact)?;

    if !outcome.is_ready() {
        warn!("Document {} could not be analyzed", document_id);
    }
    Ok(outcome.is_ready())
}

/// Service for commands that only touch the database; never builds an LLM client.
fn storage_service(config: ClausolaConfig) -> anyhow::Result<DocumentService> {
    let config = ClausolaConfig {
        strategy: Strategy::Heuristic,
        ..config
    };
    Ok(DocumentService::from_config(&config, true)?)
}

fn read_report(path: &Path) -> anyhow::Result<Report> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid report {}: {}", path.display(), e))
}

fn print_json(value: &impl Serialize, compact: bool) -> anyhow::Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}
