//! Markdown output formatter

use super::{fmt_score, OutputFormatter};
use anyhow::Result;
use rarpeval_engine::{DatasetSummary, ScoreTable};
use std::io::Write;

/// Markdown formatter - per-video table followed by a summary table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new Markdown formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn table_row<I: IntoIterator<Item = String>>(&mut self, cells: I) -> Result<()> {
        let cells: Vec<String> = cells.into_iter().collect();
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        Ok(())
    }
}

impl<W: Write> OutputFormatter for MarkdownFormatter<W> {
    fn format_report(&mut self, table: &ScoreTable, summary: &DatasetSummary) -> Result<()> {
        let headers = table.headers();
        let columns = headers.len();
        self.table_row(headers)?;
        self.table_row(std::iter::repeat("---".to_string()).take(columns))?;
        for row in &table.rows {
            let scores = row.scores.iter().map(|s| fmt_score(*s));
            self.table_row(std::iter::once(row.video_id.clone()).chain(scores))?;
        }

        writeln!(self.writer)?;
        self.table_row(["metric".to_string(), "value".to_string()])?;
        self.table_row(["---".to_string(), "---".to_string()])?;
        for entry in &summary.entries {
            self.table_row([entry.name.clone(), fmt_score(entry.value)])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
