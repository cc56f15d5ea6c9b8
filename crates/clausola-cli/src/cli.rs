//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use clausola_core::Strategy;

#[derive(Debug, Parser)]
#[command(name = "clausola", author, version, about = "Risk analysis of Italian contracts", long_about = None)]
pub struct Arguments {
    /// Data directory holding uploads, the report database and llm-config.json
    #[arg(long, global = true, env = "CLAUSOLA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a contract PDF and print its report
    Analyze(AnalyzeArgs),
    /// Print a stored document and its report
    Show {
        document_id: String,
    },
    /// Store a manually prepared report and mark the document ready
    ImportReport {
        document_id: String,
        /// JSON file with `summary` and `clauses`
        report: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Contract to analyze
    pub pdf: PathBuf,

    /// Overrides CLAUSOLA_STRATEGY
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Do not write the result to the report database
    #[arg(long)]
    pub no_store: bool,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Heuristic,
    Llm,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Heuristic => Strategy::Heuristic,
            StrategyArg::Llm => Strategy::Llm,
        }
    }
}
