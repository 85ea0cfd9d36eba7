//! Expected sequence lengths of a reference video
//!
//! The raw recording runs at 60 Hz, action labels are sampled at 10 Hz and
//! segmentation masks at 1 Hz. The first available reference artifact decides:
//!
//! | source                 | actions          | segmentation       |
//! |------------------------|------------------|--------------------|
//! | `video_left.avi`       | ceil(total / 6)  | ceil(total / 60)   |
//! | `rgb/`                 | frame count      | ceil(actions / 10) |
//! | `action_discrete.txt`  | line count       | floor(lines / 6)   |
//! | `segmentation/`        | undetermined     | file count         |

use crate::{
    actions::count_rows,
    avi::{AviHeaderCounter, FrameCounter},
    error::ArtifactError,
    layout::{count_entries, ACTION_FILE, RAW_VIDEO_FILE, RGB_DIR, SEGMENTATION_DIR},
};
use std::path::Path;

/// Raw frames per action label
pub const ACTION_STRIDE: u64 = 6;
/// Raw frames per segmentation mask
pub const SEGMENTATION_STRIDE: u64 = 60;
/// Action labels per segmentation mask
pub const ACTIONS_PER_MASK: usize = 10;
/// Divisor applied to an action file's line count
const LINES_PER_MASK: usize = 6;

/// Reference artifact the lengths were derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSource {
    /// Header of the raw recording
    RawVideo {
        /// Total 60 Hz frames
        total_frames: u64,
    },
    /// Extracted frame directory
    ExtractedFrames,
    /// Reference action label file
    ActionFile,
    /// Reference segmentation directory
    SegmentationDir,
}

/// Expected prediction lengths for one video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLengths {
    /// Expected action label rows
    pub actions: Option<usize>,
    /// Expected segmentation frames
    pub segmentation: Option<usize>,
    /// Artifact the lengths came from, None if nothing applied
    pub source: Option<LengthSource>,
}

impl SequenceLengths {
    const UNRESOLVED: SequenceLengths = SequenceLengths {
        actions: None,
        segmentation: None,
        source: None,
    };
}

fn ceil_div(n: u64, d: u64) -> u64 {
    n / d + u64::from(n % d != 0)
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Derives expected lengths from reference artifacts
pub struct SequenceLengthResolver {
    counter: Box<dyn FrameCounter>,
}

impl Default for SequenceLengthResolver {
    fn default() -> Self {
        Self::new(Box::new(AviHeaderCounter))
    }
}

impl std::fmt::Debug for SequenceLengthResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceLengthResolver").finish_non_exhaustive()
    }
}

impl SequenceLengthResolver {
    /// Create a resolver with a custom frame counter for raw recordings
    pub fn new(counter: Box<dyn FrameCounter>) -> Self {
        Self { counter }
    }

    /// Resolve the expected lengths for one reference video directory
    pub fn resolve(&self, reference: &Path) -> Result<SequenceLengths, ArtifactError> {
        let raw = reference.join(RAW_VIDEO_FILE);
        if raw.is_file() {
            let total_frames = self.counter.frame_count(&raw)?;
            return Ok(SequenceLengths {
                actions: Some(to_usize(ceil_div(total_frames, ACTION_STRIDE))),
                segmentation: Some(to_usize(ceil_div(total_frames, SEGMENTATION_STRIDE))),
                source: Some(LengthSource::RawVideo { total_frames }),
            });
        }

        let rgb = reference.join(RGB_DIR);
        if rgb.is_dir() {
            let frames = count_entries(&rgb)?;
            return Ok(SequenceLengths {
                actions: Some(frames),
                segmentation: Some(frames.div_ceil(ACTIONS_PER_MASK)),
                source: Some(LengthSource::ExtractedFrames),
            });
        }

        let actions = reference.join(ACTION_FILE);
        if actions.is_file() {
            let rows = count_rows(&actions)?;
            return Ok(SequenceLengths {
                actions: Some(rows),
                segmentation: Some(rows / LINES_PER_MASK),
                source: Some(LengthSource::ActionFile),
            });
        }

        let segmentation = reference.join(SEGMENTATION_DIR);
        if segmentation.is_dir() {
            return Ok(SequenceLengths {
                actions: None,
                segmentation: Some(count_entries(&segmentation)?),
                source: Some(LengthSource::SegmentationDir),
            });
        }

        Ok(SequenceLengths::UNRESOLVED)
    }
}
