//! Dataset directory layout
//!
//! ```text
//! <root>/video_<id>/
//!     video_left.avi          raw recording (reference only)
//!     rgb/                    extracted frames (reference only)
//!     action_discrete.txt     frame_index,label per line
//!     segmentation/           one mask per sampled frame
//! ```

use crate::error::ArtifactError;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix every video directory name starts with
pub const VIDEO_DIR_PREFIX: &str = "video_";
/// Raw recording inside a reference video directory
pub const RAW_VIDEO_FILE: &str = "video_left.avi";
/// Extracted frame directory inside a reference video directory
pub const RGB_DIR: &str = "rgb";
/// Action label file name
pub const ACTION_FILE: &str = "action_discrete.txt";
/// Segmentation mask directory name
pub const SEGMENTATION_DIR: &str = "segmentation";

/// One reference video paired with its prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPair {
    /// Directory name shared by both sides, e.g. `video_41`
    pub name: String,
    /// Reference video directory
    pub reference: PathBuf,
    /// Prediction video directory
    pub prediction: PathBuf,
}

impl VideoPair {
    /// Create a pair from the two roots and a directory name
    pub fn new(reference_root: &Path, prediction_root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            reference: reference_root.join(&name),
            prediction: prediction_root.join(&name),
            name,
        }
    }

    /// Identifier reported in result tables
    pub fn video_id(&self) -> &str {
        video_id(&self.name)
    }

    /// Reference action label file
    pub fn reference_actions(&self) -> PathBuf {
        self.reference.join(ACTION_FILE)
    }

    /// Prediction action label file
    pub fn prediction_actions(&self) -> PathBuf {
        self.prediction.join(ACTION_FILE)
    }

    /// Reference segmentation directory
    pub fn reference_segmentation(&self) -> PathBuf {
        self.reference.join(SEGMENTATION_DIR)
    }

    /// Prediction segmentation directory
    pub fn prediction_segmentation(&self) -> PathBuf {
        self.prediction.join(SEGMENTATION_DIR)
    }
}

/// Portion of a directory name after the first underscore
///
/// ```
/// use rarpeval_engine::video_id;
///
/// assert_eq!(video_id("video_41"), "41");
/// assert_eq!(video_id("video_2_1"), "2_1");
/// assert_eq!(video_id("clip"), "clip");
/// ```
pub fn video_id(name: &str) -> &str {
    name.split_once('_').map_or(name, |(_, id)| id)
}

/// Sorted names of the `video_*` directories directly under `root`
pub fn discover_videos(root: &Path) -> Result<Vec<String>, ArtifactError> {
    let entries = fs::read_dir(root).map_err(|e| ArtifactError::io(root, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ArtifactError::io(root, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(VIDEO_DIR_PREFIX) && entry.path().is_dir() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Sorted entry names of a directory
pub fn list_entries(dir: &Path) -> Result<Vec<String>, ArtifactError> {
    let entries = fs::read_dir(dir).map_err(|e| ArtifactError::io(dir, e))?;

    let mut names = entries
        .map(|entry| {
            entry
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .map_err(|e| ArtifactError::io(dir, e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names)
}

/// Number of entries in a directory
pub fn count_entries(dir: &Path) -> Result<usize, ArtifactError> {
    Ok(list_entries(dir)?.len())
}
