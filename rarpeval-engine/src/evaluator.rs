//! Evaluation orchestration
//!
//! Videos are independent, so they are scored in parallel and collected back
//! in reference directory order.

use crate::{
    actions::ActionTrack,
    config::EvalConfig,
    error::{EngineError, Result, ValidationError},
    layout::VideoPair,
    segmentation::{SegmentationScorer, SegmentationScores},
    summary::{ClassStatistics, DatasetSummary, Metric, ScoreRow, ScoreTable},
    validator::PredictionValidator,
};
use rarpeval_metrics::{frame_accuracy, MatchCounts, SegmentMatcher};
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Action scores of one video
#[derive(Debug, Clone, PartialEq)]
pub struct ActionScores {
    /// Frame accuracy
    pub accuracy: f64,
    /// Segmental F1 at the configured threshold
    pub f1: f64,
    /// Matching outcome behind the F1
    pub counts: MatchCounts,
}

/// Everything computed for one video
#[derive(Debug, Clone)]
pub struct VideoScores {
    /// The scored video
    pub pair: VideoPair,
    /// Present when segmentation is enabled
    pub segmentation: Option<SegmentationScores>,
    /// Present when actions are enabled
    pub actions: Option<ActionScores>,
}

impl VideoScores {
    /// Identifier used in the score table
    pub fn video_id(&self) -> &str {
        self.pair.video_id()
    }

    /// Table row for the given columns
    pub fn row(&self, metrics: &[Metric]) -> ScoreRow {
        let scores = metrics
            .iter()
            .map(|metric| match metric {
                Metric::SegmentationIou => self.segmentation.as_ref().map_or(0.0, |s| s.miou()),
                Metric::SegmentationNsd => self.segmentation.as_ref().map_or(0.0, |s| s.mnsd()),
                Metric::ActionAccuracy => self.actions.as_ref().map_or(0.0, |a| a.accuracy),
                Metric::ActionF1 { .. } => self.actions.as_ref().map_or(0.0, |a| a.f1),
            })
            .collect();
        ScoreRow {
            video_id: self.video_id().to_string(),
            scores,
        }
    }

    /// Per-class IoU and NSD statistics, when frame history was kept
    pub fn class_statistics(&self) -> Vec<ClassStatistics> {
        let Some(segmentation) = &self.segmentation else {
            return Vec::new();
        };
        [("iou", &segmentation.iou), ("nsd", &segmentation.nsd)]
            .into_iter()
            .filter_map(|(metric, scores)| {
                ClassStatistics::from_accumulator(&self.pair.name, metric, scores)
            })
            .collect()
    }
}

/// Result of a dataset evaluation
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Per-video details, in reference directory order
    pub videos: Vec<VideoScores>,
    /// Per-video score table
    pub table: ScoreTable,
    /// Column means and composites
    pub summary: DatasetSummary,
}

/// Scores prediction sets against reference sets
#[derive(Debug)]
pub struct Evaluator {
    config: EvalConfig,
    matcher: SegmentMatcher,
    scorer: SegmentationScorer,
}

impl Evaluator {
    /// Create an evaluator, rejecting invalid configurations
    pub fn new(config: EvalConfig) -> Result<Self> {
        config.validate()?;
        let mut matcher = SegmentMatcher::new(config.n_action_classes, config.overlap()?);
        if let Some(background) = config.background_class {
            matcher = matcher.with_background(background);
        }
        let scorer = SegmentationScorer::new(config.n_seg_classes, config.nsd_tau)
            .with_history(config.class_statistics);
        Ok(Self {
            config,
            matcher,
            scorer,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Columns of the score table
    pub fn metrics(&self) -> Vec<Metric> {
        Metric::for_tasks(self.config.tasks, self.config.f1_overlap_percent)
    }

    /// Validator for the configured tasks
    pub fn validator(&self) -> PredictionValidator {
        PredictionValidator::new(self.config.tasks)
    }

    /// Accuracy and F1 of one video's action labels
    pub fn score_actions(&self, pair: &VideoPair) -> Result<ActionScores> {
        let reference = ActionTrack::read(&pair.reference_actions())?;
        let prediction = ActionTrack::read(&pair.prediction_actions())?;

        if let Some(line) = reference.first_index_mismatch(&prediction) {
            return Err(ValidationError::FrameIndexMismatch {
                reference: pair.reference_actions(),
                prediction: pair.prediction_actions(),
                line,
            }
            .into());
        }

        let metric_error = |source| EngineError::Metric {
            video: pair.name.clone(),
            artifact: pair.prediction_actions(),
            source,
        };
        let accuracy = frame_accuracy(&reference.labels, &prediction.labels).map_err(metric_error)?;
        let counts = self
            .matcher
            .match_sequences(&reference.labels, &prediction.labels)
            .map_err(metric_error)?;

        Ok(ActionScores {
            accuracy,
            f1: counts.f1(),
            counts,
        })
    }

    /// Score every enabled task of one video
    pub fn score_video(&self, pair: &VideoPair) -> Result<VideoScores> {
        let segmentation = if self.config.tasks.segmentation {
            let scores = self.scorer.score_video(
                &pair.name,
                &pair.reference_segmentation(),
                &pair.prediction_segmentation(),
            )?;
            log::info!("{}: mIoU {:.4}, mNSD {:.4}", pair.name, scores.miou(), scores.mnsd());
            Some(scores)
        } else {
            None
        };

        let actions = if self.config.tasks.actions {
            let scores = self.score_actions(pair)?;
            log::info!(
                "{}: accuracy {:.4}, F1@{} {:.4}",
                pair.name,
                scores.accuracy,
                self.config.f1_overlap_percent,
                scores.f1
            );
            Some(scores)
        } else {
            None
        };

        Ok(VideoScores {
            pair: pair.clone(),
            segmentation,
            actions,
        })
    }

    /// Score validated video pairs
    pub fn evaluate(&self, pairs: &[VideoPair]) -> Result<Evaluation> {
        self.evaluate_with_progress(pairs, |_| {})
    }

    /// Score validated video pairs, calling `on_video` as each one finishes
    pub fn evaluate_with_progress<F>(&self, pairs: &[VideoPair], on_video: F) -> Result<Evaluation>
    where
        F: Fn(&VideoScores) + Sync,
    {
        let videos = self.score_all(pairs, &on_video)?;

        let mut table = ScoreTable::new(self.metrics());
        table.rows = videos.iter().map(|video| video.row(&table.metrics)).collect();
        let summary = DatasetSummary::from_table(&table);

        Ok(Evaluation {
            videos,
            table,
            summary,
        })
    }

    /// Validate both roots, then score them; nothing is scored if any video fails
    pub fn validate_and_evaluate(
        &self,
        reference_root: &Path,
        prediction_root: &Path,
    ) -> Result<Evaluation> {
        let pairs = self
            .validator()
            .validate(reference_root, prediction_root)?
            .into_pairs()?;
        self.evaluate(&pairs)
    }

    #[cfg(feature = "parallel")]
    fn score_all<F>(&self, pairs: &[VideoPair], on_video: &F) -> Result<Vec<VideoScores>>
    where
        F: Fn(&VideoScores) + Sync,
    {
        let run = || {
            pairs
                .par_iter()
                .map(|pair| {
                    let scores = self.score_video(pair)?;
                    on_video(&scores);
                    Ok(scores)
                })
                .collect::<Result<Vec<_>>>()
        };

        match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| EngineError::ParallelError(e.to_string()))?
                .install(run),
            None => run(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all<F>(&self, pairs: &[VideoPair], on_video: &F) -> Result<Vec<VideoScores>>
    where
        F: Fn(&VideoScores) + Sync,
    {
        pairs
            .iter()
            .map(|pair| {
                let scores = self.score_video(pair)?;
                on_video(&scores);
                Ok(scores)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ACTION_FILE, SEGMENTATION_DIR};
    use crate::masks::write_label_map;
    use rarpeval_metrics::LabelMap;
    use std::fs;
    use tempfile::TempDir;

    fn write_video(root: &Path, name: &str, labels: &[u32], masks: &[(&str, u8)]) {
        let dir = root.join(name);
        fs::create_dir_all(dir.join(SEGMENTATION_DIR)).unwrap();
        let body: String = labels
            .iter()
            .enumerate()
            .map(|(i, label)| format!("{:09},{label}\n", i * 6))
            .collect();
        fs::write(dir.join(ACTION_FILE), body).unwrap();
        for (mask, class) in masks {
            let map = LabelMap::from_fn(8, 8, |x, _| if x < 4 { *class } else { 0 });
            write_label_map(&dir.join(SEGMENTATION_DIR).join(mask), &map).unwrap();
        }
    }

    fn evaluator(config: EvalConfig) -> Evaluator {
        Evaluator::new(config).unwrap()
    }

    #[test]
    fn test_action_end_to_end() {
        let (reference, prediction) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        write_video(reference.path(), "video_1", &[1, 1, 2, 2], &[]);
        write_video(prediction.path(), "video_1", &[1, 2, 2, 2], &[]);

        let config = EvalConfig::builder().segmentation(false).build().unwrap();
        let evaluation = evaluator(config)
            .validate_and_evaluate(reference.path(), prediction.path())
            .unwrap();

        assert_eq!(evaluation.table.rows.len(), 1);
        assert_eq!(evaluation.table.rows[0].video_id, "1");
        assert_eq!(evaluation.table.rows[0].scores, vec![0.75, 1.0]);
        assert_eq!(evaluation.summary.get("ar_acc"), Some(0.75));
        assert!((evaluation.summary.get("action_score").unwrap() - 0.75f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rows_follow_directory_order() {
        let (reference, prediction) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        for (i, name) in ["video_03", "video_01", "video_10", "video_02"].iter().enumerate() {
            let labels = vec![i as u32; 6];
            write_video(reference.path(), name, &labels, &[("000000000.png", 1)]);
            write_video(prediction.path(), name, &labels, &[("000000000.png", 1)]);
        }

        let config = EvalConfig::builder().threads(Some(3)).build().unwrap();
        let evaluation = evaluator(config)
            .validate_and_evaluate(reference.path(), prediction.path())
            .unwrap();

        let ids: Vec<&str> = evaluation.table.rows.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["01", "02", "03", "10"]);
        for row in &evaluation.table.rows {
            assert_eq!(row.scores, vec![1.0, 1.0, 1.0, 1.0]);
        }
        assert_eq!(evaluation.summary.get("segmentation_score"), Some(1.0));
    }

    #[test]
    fn test_invalid_dataset_is_not_scored() {
        let (reference, prediction) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        write_video(reference.path(), "video_1", &[1; 12], &[]);
        write_video(prediction.path(), "video_1", &[1; 11], &[]);

        let config = EvalConfig::builder().segmentation(false).build().unwrap();
        let result = evaluator(config).validate_and_evaluate(reference.path(), prediction.path());
        assert!(matches!(result, Err(EngineError::ValidationFailed { count: 1, .. })));
    }

    #[test]
    fn test_progress_called_per_video() {
        let (reference, prediction) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        for name in ["video_1", "video_2"] {
            write_video(reference.path(), name, &[0; 6], &[]);
            write_video(prediction.path(), name, &[0; 6], &[]);
        }

        let evaluator = evaluator(EvalConfig::builder().segmentation(false).build().unwrap());
        let pairs = evaluator
            .validator()
            .validate(reference.path(), prediction.path())
            .unwrap()
            .into_pairs()
            .unwrap();
        let seen = std::sync::atomic::AtomicUsize::new(0);
        evaluator
            .evaluate_with_progress(&pairs, |_| {
                seen.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            })
            .unwrap();
        assert_eq!(seen.into_inner(), 2);
    }

    #[test]
    fn test_class_statistics_when_requested() {
        let (reference, prediction) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        write_video(reference.path(), "video_5", &[0; 6], &[("000000000.png", 2)]);
        write_video(prediction.path(), "video_5", &[0; 6], &[("000000000.png", 2)]);

        let config = EvalConfig::builder()
            .actions(false)
            .class_statistics(true)
            .build()
            .unwrap();
        let evaluation = evaluator(config)
            .validate_and_evaluate(reference.path(), prediction.path())
            .unwrap();

        let stats = evaluation.videos[0].class_statistics();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].file_name(), "video_5_class_stats_iou.csv");
        assert_eq!(stats[1].file_name(), "video_5_class_stats_nsd.csv");
        assert_eq!(stats[0].columns.len(), 9);
    }
}
