//! Random prediction sets for exercising the evaluator
//!
//! The generated set mirrors the reference layout exactly, so it always
//! passes validation while scoring close to chance.

use crate::{
    actions::{read_frame_keys, write_track},
    error::{ArtifactError, EngineError, Result, ValidationError},
    layout::{discover_videos, list_entries, ACTION_FILE, RGB_DIR, SEGMENTATION_DIR},
    masks::{image_dimensions, write_label_map},
    resolver::ACTIONS_PER_MASK,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rarpeval_metrics::{Label, LabelMap};
use std::fs;
use std::path::Path;

/// What a generation run wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockSummary {
    /// Video directories created
    pub videos: usize,
    /// Action label files written
    pub action_files: usize,
    /// Mask images written
    pub masks: usize,
}

/// Writes structurally valid random predictions for a reference set
#[derive(Debug)]
pub struct MockGenerator {
    n_action_classes: Label,
    n_seg_classes: u8,
    rng: StdRng,
}

impl MockGenerator {
    /// Generator drawing labels from `[0, n_action_classes)` and mask classes
    /// from `[0, n_seg_classes]`; a seed makes the output reproducible
    pub fn new(n_action_classes: usize, n_seg_classes: usize, seed: Option<u64>) -> Result<Self> {
        let n_action_classes = Label::try_from(n_action_classes)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| EngineError::Config(format!("{n_action_classes} action classes")))?;
        let n_seg_classes = u8::try_from(n_seg_classes)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| EngineError::Config(format!("{n_seg_classes} segmentation classes")))?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            n_action_classes,
            n_seg_classes,
            rng,
        })
    }

    /// Populate `prediction_root` with one random prediction per reference video
    pub fn generate(
        &mut self,
        reference_root: &Path,
        prediction_root: &Path,
        overwrite: bool,
    ) -> Result<MockSummary> {
        let videos = discover_videos(reference_root)?;
        if videos.is_empty() {
            return Err(ValidationError::NoVideoDirectories {
                reference: reference_root.to_path_buf(),
                prediction: prediction_root.to_path_buf(),
            }
            .into());
        }

        if prediction_root.exists() {
            if !overwrite {
                return Err(EngineError::OutputExists {
                    path: prediction_root.to_path_buf(),
                });
            }
            log::warn!("removing previous predictions in {}", prediction_root.display());
            fs::remove_dir_all(prediction_root).map_err(|e| ArtifactError::io(prediction_root, e))?;
        }

        let mut summary = MockSummary::default();
        for name in &videos {
            self.generate_video(
                &reference_root.join(name),
                &prediction_root.join(name),
                &mut summary,
            )?;
            summary.videos += 1;
            log::info!("{name}: mock predictions written");
        }
        Ok(summary)
    }

    fn generate_video(
        &mut self,
        reference: &Path,
        prediction: &Path,
        summary: &mut MockSummary,
    ) -> Result<()> {
        let segmentation_dir = prediction.join(SEGMENTATION_DIR);
        fs::create_dir_all(&segmentation_dir).map_err(|e| ArtifactError::io(&segmentation_dir, e))?;

        let reference_actions = reference.join(ACTION_FILE);
        let rgb = reference.join(RGB_DIR);
        let rgb_frames = if rgb.is_dir() { list_entries(&rgb)? } else { Vec::new() };

        let keys = if reference_actions.is_file() {
            read_frame_keys(&reference_actions)?
        } else {
            rgb_frames.iter().map(|name| stem(name).to_string()).collect()
        };
        if keys.is_empty() {
            log::warn!("{}: no frame index source, skipping action labels", reference.display());
        } else {
            let labels: Vec<Label> = keys
                .iter()
                .map(|_| self.rng.random_range(0..self.n_action_classes))
                .collect();
            write_track(
                &prediction.join(ACTION_FILE),
                keys.iter().map(String::as_str).zip(labels),
            )?;
            summary.action_files += 1;
        }

        let reference_masks = reference.join(SEGMENTATION_DIR);
        let frames: Vec<(String, std::path::PathBuf)> = if reference_masks.is_dir() {
            list_entries(&reference_masks)?
                .into_iter()
                .map(|name| {
                    let source = reference_masks.join(&name);
                    (name, source)
                })
                .collect()
        } else {
            rgb_frames
                .iter()
                .step_by(ACTIONS_PER_MASK)
                .map(|name| (format!("{}.png", stem(name)), rgb.join(name)))
                .collect()
        };

        for (name, source) in frames {
            let (width, height) = image_dimensions(&source)?;
            let mask = self.random_mask(width, height);
            write_label_map(&segmentation_dir.join(&name), &mask)?;
            summary.masks += 1;
        }
        Ok(())
    }

    /// Background frame with one rectangle of a random class
    fn random_mask(&mut self, width: u32, height: u32) -> LabelMap {
        let class = self.rng.random_range(0..=self.n_seg_classes);
        let x0 = self.rng.random_range(0..width.max(1));
        let y0 = self.rng.random_range(0..height.max(1));
        let x1 = self.rng.random_range(x0..=width);
        let y1 = self.rng.random_range(y0..=height);
        LabelMap::from_fn(width, height, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                class
            } else {
                0
            }
        })
    }
}

fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
