//! Per-video segmentation scoring
//!
//! Reference frames are enumerated in sorted filename order and each one is
//! paired with the prediction of the same name. A prediction that is absent
//! or cannot be decoded scores zero on every class for that frame.

use crate::{
    error::{EngineError, Result},
    layout::list_entries,
    masks::read_label_map,
};
use rarpeval_metrics::{mask_iou, mask_nsd, LabelMap, MetricError, OneHotMask, ScoreAccumulator};
use std::path::{Path, PathBuf};

/// Accumulated IoU and NSD of one video
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationScores {
    /// Per-class IoU over frames
    pub iou: ScoreAccumulator,
    /// Per-class NSD over frames
    pub nsd: ScoreAccumulator,
    /// Reference frames without a usable prediction
    pub missing_frames: usize,
}

impl SegmentationScores {
    /// Mean IoU over frames then classes
    pub fn miou(&self) -> f64 {
        self.iou.mean().unwrap_or(0.0)
    }

    /// Mean NSD over frames then classes
    pub fn mnsd(&self) -> f64 {
        self.nsd.mean().unwrap_or(0.0)
    }
}

/// Scores the segmentation frames of one video
#[derive(Debug, Clone)]
pub struct SegmentationScorer {
    n_classes: usize,
    tau: f64,
    keep_history: bool,
}

impl SegmentationScorer {
    /// Scorer for `n_classes` foreground classes at NSD tolerance `tau`
    pub fn new(n_classes: usize, tau: f64) -> Self {
        Self {
            n_classes,
            tau,
            keep_history: false,
        }
    }

    /// Keep every per-frame score vector
    pub fn with_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }

    /// IoU and NSD vectors of one frame pair
    pub fn score_frame(
        &self,
        reference: &LabelMap,
        prediction: &LabelMap,
    ) -> std::result::Result<(Vec<f64>, Vec<f64>), MetricError> {
        let reference = OneHotMask::encode(reference, self.n_classes + 1)?;
        let prediction = OneHotMask::encode(prediction, self.n_classes + 1)?;
        Ok((
            mask_iou(&reference, &prediction)?,
            mask_nsd(&reference, &prediction, self.tau)?,
        ))
    }

    fn accumulator(&self) -> ScoreAccumulator {
        let accumulator = ScoreAccumulator::new(self.n_classes);
        if self.keep_history {
            accumulator.with_history()
        } else {
            accumulator
        }
    }

    /// Score every reference frame of a video
    pub fn score_video(
        &self,
        video: &str,
        reference_dir: &Path,
        prediction_dir: &Path,
    ) -> Result<SegmentationScores> {
        let frames = list_entries(reference_dir)?;
        if frames.is_empty() {
            return Err(EngineError::NoReferenceFrames {
                path: reference_dir.to_path_buf(),
            });
        }

        let metric_error = |artifact: PathBuf| {
            let video = video.to_string();
            move |source| EngineError::Metric {
                video,
                artifact,
                source,
            }
        };

        let mut scores = SegmentationScores {
            iou: self.accumulator(),
            nsd: self.accumulator(),
            missing_frames: 0,
        };

        for name in &frames {
            let reference_path = reference_dir.join(name);
            let reference = read_label_map(&reference_path)?;

            let prediction_path = prediction_dir.join(name);
            let prediction = if prediction_path.is_file() {
                match read_label_map(&prediction_path) {
                    Ok(map) => Some(map),
                    Err(e) => {
                        log::warn!("{video}: {e}, scoring frame {name} as zero");
                        None
                    }
                }
            } else {
                log::warn!("{video}: prediction for frame {name} not found, scoring as zero");
                None
            };

            let Some(prediction) = prediction else {
                scores.iou.push_missing();
                scores.nsd.push_missing();
                scores.missing_frames += 1;
                continue;
            };

            let (iou, nsd) = self
                .score_frame(&reference, &prediction)
                .map_err(metric_error(prediction_path.clone()))?;
            log::trace!("{video}/{name}: iou {iou:?} nsd {nsd:?}");
            scores.iou.push(&iou).map_err(metric_error(prediction_path.clone()))?;
            scores.nsd.push(&nsd).map_err(metric_error(prediction_path))?;
        }

        log::debug!(
            "{video}: {} frames scored, {} missing",
            frames.len(),
            scores.missing_frames
        );
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masks::write_label_map;
    use std::fs;
    use tempfile::TempDir;

    fn square(offset: u32) -> LabelMap {
        LabelMap::from_fn(32, 32, |x, y| {
            if (8 + offset..20 + offset).contains(&x) && (8..20).contains(&y) {
                1
            } else {
                0
            }
        })
    }

    fn dirs() -> (TempDir, PathBuf, PathBuf) {
        let root = TempDir::new().unwrap();
        let reference = root.path().join("ref");
        let prediction = root.path().join("pred");
        fs::create_dir(&reference).unwrap();
        fs::create_dir(&prediction).unwrap();
        (root, reference, prediction)
    }

    #[test]
    fn test_perfect_frames() {
        let (_root, reference, prediction) = dirs();
        for name in ["000000000.png", "000000060.png"] {
            write_label_map(&reference.join(name), &square(0)).unwrap();
            write_label_map(&prediction.join(name), &square(0)).unwrap();
        }

        let scores = SegmentationScorer::new(2, 10.0)
            .score_video("video_01", &reference, &prediction)
            .unwrap();
        assert_eq!(scores.iou.frame_count(), 2);
        assert_eq!(scores.miou(), 1.0);
        assert_eq!(scores.mnsd(), 1.0);
        assert_eq!(scores.missing_frames, 0);
    }

    #[test]
    fn test_missing_and_broken_predictions_score_zero() {
        let (_root, reference, prediction) = dirs();
        for name in ["a.png", "b.png", "c.png", "d.png"] {
            write_label_map(&reference.join(name), &square(0)).unwrap();
        }
        write_label_map(&prediction.join("a.png"), &square(0)).unwrap();
        write_label_map(&prediction.join("b.png"), &square(0)).unwrap();
        fs::write(prediction.join("c.png"), b"garbage").unwrap();
        write_label_map(&prediction.join("extra.png"), &square(3)).unwrap();

        let scores = SegmentationScorer::new(2, 10.0)
            .score_video("video_01", &reference, &prediction)
            .unwrap();
        assert_eq!(scores.iou.frame_count(), 4);
        assert_eq!(scores.missing_frames, 2);
        assert_eq!(scores.miou(), 0.5);
        assert_eq!(scores.mnsd(), 0.5);
    }

    #[test]
    fn test_empty_reference_dir_is_error() {
        let (_root, reference, prediction) = dirs();
        let result =
            SegmentationScorer::new(2, 10.0).score_video("video_01", &reference, &prediction);
        assert!(matches!(result, Err(EngineError::NoReferenceFrames { .. })));
    }

    #[test]
    fn test_out_of_range_prediction_is_fatal() {
        let (_root, reference, prediction) = dirs();
        write_label_map(&reference.join("a.png"), &square(0)).unwrap();
        write_label_map(&prediction.join("a.png"), &LabelMap::filled(32, 32, 9)).unwrap();

        let result =
            SegmentationScorer::new(2, 10.0).score_video("video_01", &reference, &prediction);
        match result {
            Err(EngineError::Metric { video, artifact, .. }) => {
                assert_eq!(video, "video_01");
                assert!(artifact.ends_with("a.png"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_history_kept_on_request() {
        let (_root, reference, prediction) = dirs();
        write_label_map(&reference.join("a.png"), &square(0)).unwrap();
        write_label_map(&prediction.join("a.png"), &square(2)).unwrap();

        let scores = SegmentationScorer::new(2, 10.0)
            .with_history(true)
            .score_video("video_01", &reference, &prediction)
            .unwrap();
        let history = scores.iou.history().unwrap();
        assert_eq!(history.len(), 1);
        // 12x12 squares shifted by 2 columns: 120 shared of 168 covered
        assert!((history[0][0] - 120.0 / 168.0).abs() < 1e-12);
        // class 2 absent on both sides
        assert_eq!(history[0][1], 1.0);
    }
}
