//! CSV result files

use anyhow::{Context, Result};
use rarpeval_engine::{ClassStatistics, DatasetSummary, ScoreTable};
use rarpeval_engine::metrics::Describe;
use std::path::{Path, PathBuf};

/// Per-video score table file name
pub const PER_VIDEO_FILE: &str = "per_video_results.csv";
/// Dataset summary file name
pub const SUMMARY_FILE: &str = "final_results.csv";

/// Write the per-video score table, one row per video
pub fn write_score_table(path: &Path, table: &ScoreTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(table.headers())?;
    for row in &table.rows {
        let record =
            std::iter::once(row.video_id.clone()).chain(row.scores.iter().map(f64::to_string));
        wtr.write_record(record)?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the dataset summary, one `metric,value` row per entry
pub fn write_summary(path: &Path, summary: &DatasetSummary) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["metric", "value"])?;
    for entry in &summary.entries {
        wtr.write_record([entry.name.clone(), entry.value.to_string()])?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write one per-class statistics table into `dir`, returning its path
///
/// Rows are the statistics (count, mean, std, ...), columns the classes.
pub fn write_class_statistics(dir: &Path, stats: &ClassStatistics) -> Result<PathBuf> {
    let path = dir.join(stats.file_name());
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(std::iter::once("").chain(stats.classes.iter().map(String::as_str)))?;
    for (index, label) in Describe::LABELS.iter().enumerate() {
        let values = stats.columns.iter().map(|column| {
            column
                .map(|describe| describe.values()[index].to_string())
                .unwrap_or_default()
        });
        wtr.write_record(std::iter::once(label.to_string()).chain(values))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
