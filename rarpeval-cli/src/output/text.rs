//! Plain text output formatter

use super::{fmt_score, OutputFormatter};
use anyhow::Result;
use rarpeval_engine::{DatasetSummary, ScoreTable};
use std::io::Write;

/// Text formatter - aligned columns, then one `name: value` line per summary entry
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_report(&mut self, table: &ScoreTable, summary: &DatasetSummary) -> Result<()> {
        let headers = table.headers();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cells = table.rows.iter().map(|row| match i {
                    0 => row.video_id.len(),
                    _ => fmt_score(row.scores[i - 1]).len(),
                });
                cells.chain(std::iter::once(header.len())).max().unwrap_or(0)
            })
            .collect();

        let line: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{h:>w$}"))
            .collect();
        writeln!(self.writer, "{}", line.join("  "))?;

        for row in &table.rows {
            let cells: Vec<String> = std::iter::once(row.video_id.clone())
                .chain(row.scores.iter().map(|s| fmt_score(*s)))
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:>w$}"))
                .collect();
            writeln!(self.writer, "{}", cells.join("  "))?;
        }

        writeln!(self.writer)?;
        for entry in &summary.entries {
            writeln!(self.writer, "{}: {}", entry.name, fmt_score(entry.value))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
