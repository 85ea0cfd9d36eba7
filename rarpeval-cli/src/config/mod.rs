//! Configuration module

use crate::error::CliError;
use crate::output::SummaryFormat;
use anyhow::{Context, Result};
use rarpeval_engine::Tasks;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Evaluation configuration
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())).into())
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Which tasks to score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskSelection {
    /// Segmentation and action recognition
    #[default]
    All,
    /// Instrument segmentation only
    Segmentation,
    /// Action recognition only
    Actions,
}

impl From<TaskSelection> for Tasks {
    fn from(selection: TaskSelection) -> Self {
        Tasks {
            segmentation: selection != TaskSelection::Actions,
            actions: selection != TaskSelection::Segmentation,
        }
    }
}

/// Evaluation-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Tasks to score
    pub tasks: TaskSelection,

    /// Segmentation classes, background excluded
    pub segmentation_classes: usize,

    /// Action classes
    pub action_classes: usize,

    /// NSD boundary tolerance in pixels
    pub nsd_tolerance: f64,

    /// F1 overlap threshold in percent
    pub f1_overlap: u32,

    /// Action label ignored by segment matching
    pub background_action: Option<u32>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            tasks: TaskSelection::All,
            segmentation_classes: 9,
            action_classes: 8,
            nsd_tolerance: 10.0,
            f1_overlap: 10,
            background_action: None,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for result tables (default: the prediction directory)
    pub directory: Option<PathBuf>,

    /// Write per-class statistics for every video
    pub class_statistics: bool,

    /// Append the run log to evaluation.log
    pub log_file: bool,

    /// Summary format printed to stdout
    pub summary_format: SummaryFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            class_statistics: false,
            log_file: true,
            summary_format: SummaryFormat::Text,
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { worker_threads: 0 }
    }
}
