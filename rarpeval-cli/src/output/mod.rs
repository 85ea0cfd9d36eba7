//! Output formatting module
//!
//! Result tables always go to CSV files; the formatters below only shape what
//! is printed on stdout.

use anyhow::Result;
use rarpeval_engine::{DatasetSummary, ScoreTable};
use serde::{Deserialize, Serialize};

/// Trait for summary formatters
pub trait OutputFormatter {
    /// Format the per-video table and the dataset summary
    fn format_report(&mut self, table: &ScoreTable, summary: &DatasetSummary) -> Result<()>;

    /// Finalize output
    fn finish(&mut self) -> Result<()>;
}

pub mod files;
pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported stdout summary formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    /// Aligned plain text
    #[default]
    Text,
    /// JSON object with rows and summary
    Json,
    /// Markdown tables
    Markdown,
}

impl SummaryFormat {
    /// Formatter writing to `writer`
    pub fn formatter<'a, W: std::io::Write + 'a>(self, writer: W) -> Box<dyn OutputFormatter + 'a> {
        match self {
            SummaryFormat::Text => Box::new(TextFormatter::new(writer)),
            SummaryFormat::Json => Box::new(JsonFormatter::new(writer)),
            SummaryFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }
}

/// Score rendered with four decimals, like the logged values
pub(crate) fn fmt_score(value: f64) -> String {
    format!("{value:.4}")
}
