//! Structural validation of a prediction set against its reference set
//!
//! Dataset-level problems (no videos, differing video counts or names) stop
//! validation immediately. Per-video problems are collected so that one run
//! reports every failing video.

use crate::{
    actions::{count_rows, ActionTrack},
    config::Tasks,
    error::{EngineError, ValidationError},
    layout::{discover_videos, list_entries, VideoPair},
    resolver::{SequenceLengthResolver, SequenceLengths},
};
use std::collections::BTreeSet;
use std::path::Path;

/// A video that failed validation
#[derive(Debug)]
pub struct VideoFailure {
    /// Video directory name
    pub video: String,
    /// What failed
    pub error: ValidationError,
}

/// Outcome of validating a whole dataset
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Every paired video, in sorted order
    pub pairs: Vec<VideoPair>,
    /// Videos that failed, in sorted order
    pub failures: Vec<VideoFailure>,
}

impl ValidationReport {
    /// Whether every video passed
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// The paired videos, or the first failure if any video failed
    pub fn into_pairs(self) -> Result<Vec<VideoPair>, EngineError> {
        let count = self.failures.len();
        match self.failures.into_iter().next() {
            None => Ok(self.pairs),
            Some(first) => Err(EngineError::ValidationFailed {
                count,
                video: first.video,
                first: Box::new(first.error),
            }),
        }
    }
}

/// Checks that predictions line up with the reference set before scoring
#[derive(Debug)]
pub struct PredictionValidator {
    tasks: Tasks,
    resolver: SequenceLengthResolver,
}

impl PredictionValidator {
    /// Validator for the given tasks using the default resolver
    pub fn new(tasks: Tasks) -> Self {
        Self::with_resolver(tasks, SequenceLengthResolver::default())
    }

    /// Validator with a custom length resolver
    pub fn with_resolver(tasks: Tasks, resolver: SequenceLengthResolver) -> Self {
        Self { tasks, resolver }
    }

    /// Pair the `video_*` directories of both roots by name
    pub fn pair_videos(
        &self,
        reference_root: &Path,
        prediction_root: &Path,
    ) -> Result<Vec<VideoPair>, ValidationError> {
        let reference = discover_videos(reference_root)?;
        let prediction = discover_videos(prediction_root)?;

        if reference.is_empty() || prediction.is_empty() {
            return Err(ValidationError::NoVideoDirectories {
                reference: reference_root.to_path_buf(),
                prediction: prediction_root.to_path_buf(),
            });
        }
        if reference.len() != prediction.len() {
            return Err(ValidationError::VideoCountMismatch {
                reference: reference.len(),
                predicted: prediction.len(),
            });
        }
        if let Some((r, p)) = reference.iter().zip(&prediction).find(|(r, p)| r != p) {
            return Err(ValidationError::VideoNameMismatch {
                reference: r.clone(),
                predicted: p.clone(),
            });
        }

        Ok(reference
            .into_iter()
            .map(|name| VideoPair::new(reference_root, prediction_root, name))
            .collect())
    }

    /// Validate a whole dataset, collecting per-video failures
    pub fn validate(
        &self,
        reference_root: &Path,
        prediction_root: &Path,
    ) -> Result<ValidationReport, ValidationError> {
        let pairs = self.pair_videos(reference_root, prediction_root)?;
        log::info!("validating {} videos", pairs.len());

        let mut failures = Vec::new();
        for pair in &pairs {
            match self.validate_video(pair) {
                Ok(lengths) => log::debug!(
                    "{}: valid (actions {:?}, segmentation {:?})",
                    pair.name,
                    lengths.actions,
                    lengths.segmentation
                ),
                Err(error) => {
                    log::error!("{}: {}", pair.name, error);
                    failures.push(VideoFailure {
                        video: pair.name.clone(),
                        error,
                    });
                }
            }
        }

        Ok(ValidationReport { pairs, failures })
    }

    /// Validate one video pair, returning the lengths it was checked against
    pub fn validate_video(&self, pair: &VideoPair) -> Result<SequenceLengths, ValidationError> {
        let lengths = self.resolver.resolve(&pair.reference)?;

        if self.tasks.segmentation {
            let expected = lengths.segmentation.ok_or_else(|| ValidationError::Unresolvable {
                video: pair.reference.clone(),
                task: "segmentation",
            })?;
            self.check_segmentation(pair, expected)?;
        }

        if self.tasks.actions {
            let expected = lengths.actions.ok_or_else(|| ValidationError::Unresolvable {
                video: pair.reference.clone(),
                task: "actions",
            })?;
            self.check_actions(pair, expected)?;
        }

        Ok(lengths)
    }

    fn check_segmentation(&self, pair: &VideoPair, expected: usize) -> Result<(), ValidationError> {
        let prediction_dir = pair.prediction_segmentation();
        if !prediction_dir.is_dir() {
            return Err(ValidationError::MissingSegmentationDir { path: prediction_dir });
        }

        let predicted = list_entries(&prediction_dir)?;
        if predicted.len() == expected {
            return Ok(());
        }

        let reference_dir = pair.reference_segmentation();
        let reference = if reference_dir.is_dir() {
            list_entries(&reference_dir)?
        } else {
            Vec::new()
        };
        let reference_set: BTreeSet<&String> = reference.iter().collect();
        let predicted_set: BTreeSet<&String> = predicted.iter().collect();

        Err(ValidationError::SegmentationCountMismatch {
            reference: pair.reference.clone(),
            prediction: prediction_dir,
            expected,
            actual: predicted.len(),
            missing: reference_set.difference(&predicted_set).map(|s| s.to_string()).collect(),
            extra: if reference.is_empty() {
                Vec::new()
            } else {
                predicted_set.difference(&reference_set).map(|s| s.to_string()).collect()
            },
        })
    }

    fn check_actions(&self, pair: &VideoPair, expected: usize) -> Result<(), ValidationError> {
        let prediction_file = pair.prediction_actions();
        if !prediction_file.is_file() {
            return Err(ValidationError::MissingActionFile { path: prediction_file });
        }

        let actual = count_rows(&prediction_file)?;
        if actual != expected {
            return Err(ValidationError::ActionCountMismatch {
                reference: pair.reference_actions(),
                prediction: prediction_file,
                expected,
                actual,
            });
        }

        let reference_file = pair.reference_actions();
        let reference = ActionTrack::read(&reference_file)?;
        let prediction = ActionTrack::read(&prediction_file)?;
        match reference.first_index_mismatch(&prediction) {
            None => Ok(()),
            Some(line) => Err(ValidationError::FrameIndexMismatch {
                reference: reference_file,
                prediction: prediction_file,
                line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ACTION_FILE, SEGMENTATION_DIR};
    use std::fs;
    use tempfile::TempDir;

    fn actions(n: usize) -> String {
        (0..n).map(|i| format!("{:09},1\n", i * 6)).collect()
    }

    fn video(root: &Path, name: &str, lines: usize, masks: &[&str]) {
        let dir = root.join(name);
        fs::create_dir_all(dir.join(SEGMENTATION_DIR)).unwrap();
        fs::write(dir.join(ACTION_FILE), actions(lines)).unwrap();
        for mask in masks {
            fs::write(dir.join(SEGMENTATION_DIR).join(mask), b"").unwrap();
        }
    }

    fn roots() -> (TempDir, TempDir) {
        (TempDir::new().unwrap(), TempDir::new().unwrap())
    }

    #[test]
    fn test_valid_dataset() {
        let (reference, prediction) = roots();
        for root in [reference.path(), prediction.path()] {
            video(root, "video_01", 12, &["000000000.png", "000000060.png"]);
            video(root, "video_02", 6, &["000000000.png"]);
        }

        let report = PredictionValidator::new(Tasks::default())
            .validate(reference.path(), prediction.path())
            .unwrap();
        assert!(report.is_valid());
        assert_eq!(report.into_pairs().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_root() {
        let (reference, prediction) = roots();
        video(reference.path(), "video_01", 6, &[]);
        let result = PredictionValidator::new(Tasks::default())
            .validate(reference.path(), prediction.path());
        assert!(matches!(result, Err(ValidationError::NoVideoDirectories { .. })));
    }

    #[test]
    fn test_video_count_and_name_mismatch() {
        let (reference, prediction) = roots();
        video(reference.path(), "video_01", 6, &[]);
        video(reference.path(), "video_02", 6, &[]);
        video(prediction.path(), "video_01", 6, &[]);
        let validator = PredictionValidator::new(Tasks::default());
        assert!(matches!(
            validator.validate(reference.path(), prediction.path()),
            Err(ValidationError::VideoCountMismatch { reference: 2, predicted: 1 })
        ));

        video(prediction.path(), "video_03", 6, &[]);
        match validator.validate(reference.path(), prediction.path()) {
            Err(ValidationError::VideoNameMismatch { reference, predicted }) => {
                assert_eq!(reference, "video_02");
                assert_eq!(predicted, "video_03");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_failures_are_collected() {
        let (reference, prediction) = roots();
        for name in ["video_01", "video_02", "video_03"] {
            video(reference.path(), name, 12, &["000000000.png", "000000060.png"]);
        }
        video(prediction.path(), "video_01", 11, &["000000000.png", "000000060.png"]);
        video(prediction.path(), "video_02", 12, &["000000000.png", "000000060.png"]);
        video(prediction.path(), "video_03", 12, &["000000000.png"]);

        let report = PredictionValidator::new(Tasks::default())
            .validate(reference.path(), prediction.path())
            .unwrap();
        let failed: Vec<&str> = report.failures.iter().map(|f| f.video.as_str()).collect();
        assert_eq!(failed, vec!["video_01", "video_03"]);

        match &report.failures[1].error {
            ValidationError::SegmentationCountMismatch { missing, extra, .. } => {
                assert_eq!(missing, &vec!["000000060.png".to_string()]);
                assert!(extra.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(report.into_pairs(), Err(EngineError::ValidationFailed { count: 2, .. })));
    }

    #[test]
    fn test_missing_prediction_artifacts() {
        let (reference, prediction) = roots();
        video(reference.path(), "video_01", 6, &["000000000.png"]);
        fs::create_dir(prediction.path().join("video_01")).unwrap();

        let segmentation_only = Tasks {
            segmentation: true,
            actions: false,
        };
        let report = PredictionValidator::new(segmentation_only)
            .validate(reference.path(), prediction.path())
            .unwrap();
        assert!(matches!(report.failures[0].error, ValidationError::MissingSegmentationDir { .. }));

        let actions_only = Tasks {
            segmentation: false,
            actions: true,
        };
        let report = PredictionValidator::new(actions_only)
            .validate(reference.path(), prediction.path())
            .unwrap();
        assert!(matches!(report.failures[0].error, ValidationError::MissingActionFile { .. }));
    }

    #[test]
    fn test_reordered_frame_indices() {
        let (reference, prediction) = roots();
        video(reference.path(), "video_01", 3, &[]);
        let dir = prediction.path().join("video_01");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(ACTION_FILE), "000000000,1\n000000012,1\n000000006,1\n").unwrap();

        let actions_only = Tasks {
            segmentation: false,
            actions: true,
        };
        let report = PredictionValidator::new(actions_only)
            .validate(reference.path(), prediction.path())
            .unwrap();
        let error = &report.failures[0].error;
        assert!(error.is_content_mismatch());
        assert!(matches!(error, ValidationError::FrameIndexMismatch { line: 2, .. }));
    }

    #[test]
    fn test_blank_lines_are_not_rows() {
        let (reference, prediction) = roots();
        for (root, body) in [
            (reference.path(), "000000000,1\n000000006,1\n000000012,2\n\n"),
            (prediction.path(), "000000000,1\n\n000000006,1\n000000012,2\n"),
        ] {
            let dir = root.join("video_01");
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join(ACTION_FILE), body).unwrap();
        }

        let actions_only = Tasks {
            segmentation: false,
            actions: true,
        };
        let report = PredictionValidator::new(actions_only)
            .validate(reference.path(), prediction.path())
            .unwrap();
        assert!(report.is_valid(), "{:?}", report.failures);
    }

    #[test]
    fn test_unresolvable_actions() {
        let (reference, prediction) = roots();
        fs::create_dir_all(reference.path().join("video_01").join(SEGMENTATION_DIR)).unwrap();
        video(prediction.path(), "video_01", 1, &[]);

        let report = PredictionValidator::new(Tasks::default())
            .validate(reference.path(), prediction.path())
            .unwrap();
        assert!(matches!(
            report.failures[0].error,
            ValidationError::Unresolvable { task: "actions", .. }
        ));
    }
}
