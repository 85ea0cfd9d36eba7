//! Scoring algorithms for surgical video benchmark evaluation
//!
//! This crate holds the deterministic part of the evaluator: it never touches
//! the filesystem. Callers hand it label sequences and decoded label maps and
//! get scores back.
//!
//! # Architecture
//!
//! - **Temporal metrics**: segment extraction, greedy F1@k matching and frame
//!   accuracy over action label sequences
//! - **Pixel metrics**: one-hot encoding of label maps, per-class IoU and
//!   normalized surface distance (NSD) with their empty-channel policies
//! - **Aggregation**: associative per-frame accumulation and descriptive
//!   statistics
//!
//! # Example
//!
//! ```rust
//! use rarpeval_metrics::{frame_accuracy, OverlapThreshold, SegmentMatcher};
//!
//! let reference = [1, 1, 2, 2];
//! let prediction = [1, 2, 2, 2];
//!
//! let accuracy = frame_accuracy(&reference, &prediction).unwrap();
//! assert_eq!(accuracy, 0.75);
//!
//! let matcher = SegmentMatcher::new(8, OverlapThreshold::from_percent(10).unwrap());
//! assert_eq!(matcher.f1_score(&reference, &prediction).unwrap(), 1.0);
//! ```

#![warn(missing_docs)]

pub mod accumulator;
pub mod accuracy;
pub mod distance;
pub mod error;
pub mod f1k;
pub mod mask;
pub mod numeric;
pub mod overlap;
pub mod segment;
pub mod stats;
pub mod surface;

pub use accumulator::ScoreAccumulator;
pub use accuracy::{frame_accuracy, mean_frame_accuracy};
pub use error::{MetricError, Result};
pub use f1k::{MatchCounts, OverlapThreshold, SegmentMatcher};
pub use mask::{LabelMap, OneHotMask};
pub use overlap::{channel_iou, mask_iou};
pub use segment::{extract_segments, Label, Segment};
pub use stats::Describe;
pub use surface::{mask_nsd, normalized_surface_distance, surface_dice};
