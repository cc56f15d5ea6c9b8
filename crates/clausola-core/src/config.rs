//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Paths to all Clausola data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Uploaded PDFs, stored as `<document_id>.pdf` (`data/uploads/`).
    pub uploads: PathBuf,
    /// Report database directory (`data/db/`).
    pub db: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            uploads: root.join("uploads"),
            db: root.join("db"),
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.uploads)?;
        std::fs::create_dir_all(&self.db)?;
        Ok(())
    }
}

/// Which analysis strategy produces the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Local keyword clause finding and rule-based scoring.
    #[default]
    Heuristic,
    /// Delegate the analysis to an external LLM.
    Llm,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heuristic => write!(f, "heuristic"),
            Self::Llm => write!(f, "llm"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" | "local" => Ok(Self::Heuristic),
            "llm" | "ai" => Ok(Self::Llm),
            other => Err(Error::Config(format!("Unknown strategy: {}", other))),
        }
    }
}

/// Parameters of the time/cost savings estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    /// Fraction of review time saved, in `[0, 1]`.
    pub efficiency: f64,
    /// Currency units per hour.
    pub hourly_rate: f64,
    /// Manual review minutes per clause.
    pub minutes_per_clause: u32,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            efficiency: 0.8,
            hourly_rate: 100.0,
            minutes_per_clause: 15,
        }
    }
}

impl CostParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.efficiency) {
            return Err(Error::Config(format!(
                "efficiency must be within [0, 1], got {}",
                self.efficiency
            )));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(Error::Config(format!(
                "hourly rate must be a non-negative number, got {}",
                self.hourly_rate
            )));
        }
        Ok(())
    }
}

/// Top-level Clausola configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClausolaConfig {
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Strategy used when the caller does not pick one.
    pub strategy: Strategy,
    pub cost: CostParams,
    /// Optional heuristic profile (keywords, triggers) overriding the built-in one.
    pub profile_path: Option<PathBuf>,
}

impl ClausolaConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_lookup(
        data_dir: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let strategy = match lookup("CLAUSOLA_STRATEGY") {
            Some(s) => s.parse()?,
            None => Strategy::default(),
        };

        let defaults = CostParams::default();
        let cost = CostParams {
            efficiency: parse_var(&lookup, "CLAUSOLA_EFFICIENCY", defaults.efficiency)?,
            hourly_rate: parse_var(&lookup, "CLAUSOLA_HOURLY_RATE", defaults.hourly_rate)?,
            minutes_per_clause: parse_var(
                &lookup,
                "CLAUSOLA_MINUTES_PER_CLAUSE",
                defaults.minutes_per_clause,
            )?,
        };
        cost.validate()?;

        let profile_path = lookup("CLAUSOLA_PROFILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            data_paths,
            strategy,
            cost,
            profile_path,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
