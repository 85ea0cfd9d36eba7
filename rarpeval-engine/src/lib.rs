//! Dataset validation and evaluation for surgical video benchmarks
//!
//! This crate walks reference and prediction directory trees, checks that
//! they line up, and feeds their contents to the scoring algorithms in
//! [`rarpeval_metrics`].
//!
//! # Example
//!
//! ```rust,no_run
//! use rarpeval_engine::{EvalConfig, Evaluator};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let evaluator = Evaluator::new(EvalConfig::default())?;
//! let evaluation = evaluator.validate_and_evaluate(Path::new("test_set"), Path::new("predictions"))?;
//!
//! for entry in &evaluation.summary.entries {
//!     println!("{}: {:.4}", entry.name, entry.value);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod actions;
pub mod avi;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod layout;
pub mod masks;
pub mod mock;
pub mod resolver;
pub mod segmentation;
pub mod summary;
pub mod validator;

pub use actions::ActionTrack;
pub use avi::{AviHeaderCounter, FrameCounter};
pub use config::{EvalConfig, EvalConfigBuilder, Tasks, SEGMENTATION_CLASS_NAMES};
pub use error::{ArtifactError, EngineError, Result, ValidationError};
pub use evaluator::{ActionScores, Evaluation, Evaluator, VideoScores};
pub use layout::{video_id, VideoPair};
pub use mock::{MockGenerator, MockSummary};
pub use resolver::{LengthSource, SequenceLengthResolver, SequenceLengths};
pub use segmentation::{SegmentationScorer, SegmentationScores};
pub use summary::{ClassStatistics, DatasetSummary, Metric, ScoreRow, ScoreTable, SummaryEntry};
pub use validator::{PredictionValidator, ValidationReport, VideoFailure};

/// Re-export of the scoring crate
pub use rarpeval_metrics as metrics;
