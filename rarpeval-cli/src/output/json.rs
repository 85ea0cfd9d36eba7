//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use rarpeval_engine::{DatasetSummary, ScoreRow, ScoreTable};
use serde::Serialize;
use std::io::Write;

/// JSON formatter - outputs one object with per-video rows and the summary
pub struct JsonFormatter<W: Write> {
    writer: W,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct ReportData<'a> {
    /// Metric column headers, the order of every row's `scores`
    pub metrics: Vec<String>,
    /// Per-video rows in reference directory order
    pub videos: &'a [ScoreRow],
    /// `name`/`value` entries in output order
    pub summary: &'a DatasetSummary,
}

impl<'a> ReportData<'a> {
    fn new(table: &'a ScoreTable, summary: &'a DatasetSummary) -> Self {
        Self {
            metrics: table.metrics.iter().map(|m| m.column_name()).collect(),
            videos: &table.rows,
            summary,
        }
    }
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_report(&mut self, table: &ScoreTable, summary: &DatasetSummary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &ReportData::new(table, summary))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
