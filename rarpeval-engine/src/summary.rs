//! Per-video score table, dataset summary and per-class statistics

use crate::config::{Tasks, SEGMENTATION_CLASS_NAMES};
use rarpeval_metrics::{numeric::geometric_mean2, numeric::mean, Describe, ScoreAccumulator};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column of the per-video score table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Mean per-class IoU of the segmentation masks
    SegmentationIou,
    /// Mean per-class normalized surface distance
    SegmentationNsd,
    /// Fraction of correctly labelled action frames
    ActionAccuracy,
    /// Segmental F1 at an overlap threshold in percent
    ActionF1 {
        /// Overlap threshold in percent
        percent: u32,
    },
}

impl Metric {
    /// Columns produced for the enabled tasks, in table order
    pub fn for_tasks(tasks: Tasks, f1_percent: u32) -> Vec<Metric> {
        let mut metrics = Vec::new();
        if tasks.segmentation {
            metrics.extend([Metric::SegmentationIou, Metric::SegmentationNsd]);
        }
        if tasks.actions {
            metrics.extend([Metric::ActionAccuracy, Metric::ActionF1 { percent: f1_percent }]);
        }
        metrics
    }

    /// Column header
    pub fn column_name(&self) -> String {
        match self {
            Metric::SegmentationIou => "seg_mIoU".to_string(),
            Metric::SegmentationNsd => "seg_mNSD".to_string(),
            Metric::ActionAccuracy => "ar_acc".to_string(),
            Metric::ActionF1 { percent } => format!("ar_f1@{percent}"),
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            Metric::SegmentationIou => {
                "mean intersection over union of instrument masks, background excluded"
            }
            Metric::SegmentationNsd => {
                "mean normalized surface distance of instrument mask boundaries"
            }
            Metric::ActionAccuracy => "fraction of action frames labelled correctly",
            Metric::ActionF1 { .. } => "segmental F1 of action segments at an IoU threshold",
        }
    }
}

/// One video's scores, aligned with the table's metrics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreRow {
    /// Video identifier
    pub video_id: String,
    /// One score per table metric
    pub scores: Vec<f64>,
}

/// Per-video score table
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    /// Columns, shared by every row
    pub metrics: Vec<Metric>,
    /// Rows in reference directory order
    pub rows: Vec<ScoreRow>,
}

impl ScoreTable {
    /// Empty table with the given columns
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self {
            metrics,
            rows: Vec::new(),
        }
    }

    /// Header row, `video_id` first
    pub fn headers(&self) -> Vec<String> {
        std::iter::once("video_id".to_string())
            .chain(self.metrics.iter().map(Metric::column_name))
            .collect()
    }

    /// Scores of one column
    pub fn column(&self, metric: Metric) -> Option<Vec<f64>> {
        let index = self.metrics.iter().position(|m| *m == metric)?;
        Some(self.rows.iter().map(|row| row.scores[index]).collect())
    }

    /// Mean of every column, `None` on an empty table
    pub fn column_means(&self) -> Option<Vec<(Metric, f64)>> {
        self.metrics
            .iter()
            .map(|&metric| Some((metric, mean(&self.column(metric)?)?)))
            .collect()
    }
}

/// Named dataset-level value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryEntry {
    /// Column header
    pub name: String,
    /// Value
    pub value: f64,
}

/// Column means plus composite scores
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DatasetSummary {
    /// Means first, then `segmentation_score` and `action_score` when available
    pub entries: Vec<SummaryEntry>,
}

impl DatasetSummary {
    /// Header of the segmentation composite
    pub const SEGMENTATION_SCORE: &'static str = "segmentation_score";
    /// Header of the action composite
    pub const ACTION_SCORE: &'static str = "action_score";

    /// Summarize a table; empty tables give an empty summary
    pub fn from_table(table: &ScoreTable) -> Self {
        let Some(means) = table.column_means() else {
            return Self::default();
        };
        let lookup = |wanted: fn(&Metric) -> bool| {
            means.iter().find(|(m, _)| wanted(m)).map(|(_, v)| *v)
        };

        let mut entries: Vec<SummaryEntry> = means
            .iter()
            .map(|(metric, value)| SummaryEntry {
                name: metric.column_name(),
                value: *value,
            })
            .collect();

        if let (Some(iou), Some(nsd)) = (
            lookup(|m| *m == Metric::SegmentationIou),
            lookup(|m| *m == Metric::SegmentationNsd),
        ) {
            entries.push(SummaryEntry {
                name: Self::SEGMENTATION_SCORE.to_string(),
                value: geometric_mean2(iou, nsd),
            });
        }
        if let (Some(accuracy), Some(f1)) = (
            lookup(|m| *m == Metric::ActionAccuracy),
            lookup(|m| matches!(m, Metric::ActionF1 { .. })),
        ) {
            entries.push(SummaryEntry {
                name: Self::ACTION_SCORE.to_string(),
                value: geometric_mean2(accuracy, f1),
            });
        }

        Self { entries }
    }

    /// Value by header name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.value)
    }
}

/// Per-class descriptive statistics of one video's frame scores
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStatistics {
    /// Video directory name
    pub video: String,
    /// `iou` or `nsd`
    pub metric: &'static str,
    /// Class names, one per column
    pub classes: Vec<String>,
    /// Statistics per class, `None` if the video had no frame
    pub columns: Vec<Option<Describe>>,
}

impl ClassStatistics {
    /// Describe each class column of an accumulator that kept its history
    pub fn from_accumulator(
        video: &str,
        metric: &'static str,
        scores: &ScoreAccumulator,
    ) -> Option<Self> {
        let history = scores.history()?;
        let columns = (0..scores.n_classes())
            .map(|class| {
                let column: Vec<f64> = history.iter().map(|frame| frame[class]).collect();
                Describe::of(&column)
            })
            .collect();

        Some(Self {
            video: video.to_string(),
            metric,
            classes: class_names(scores.n_classes()),
            columns,
        })
    }

    /// Output file name, e.g. `video_41_class_stats_iou.csv`
    pub fn file_name(&self) -> String {
        format!("{}_class_stats_{}.csv", self.video, self.metric)
    }
}

/// Display names for `n` classes, numbered past the known ones
pub fn class_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            SEGMENTATION_CLASS_NAMES
                .get(i)
                .map_or_else(|| format!("Class {}", i + 1), |name| name.to_string())
        })
        .collect()
}
