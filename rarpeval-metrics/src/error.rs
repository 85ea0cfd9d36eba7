//! Metric error types (deterministic only)

use thiserror::Error;

/// Errors raised by the scoring algorithms
///
/// None of these describe numeric degeneracy: zero denominators and empty
/// channels are resolved by the documented substitution rules and never
/// surface as errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// Reference and prediction sequences differ in length
    #[error("sequence length mismatch: reference has {reference} frames, prediction has {prediction}")]
    LengthMismatch {
        /// Reference sequence length
        reference: usize,
        /// Prediction sequence length
        prediction: usize,
    },

    /// A metric was asked to score an empty input
    #[error("cannot score an empty {what}")]
    EmptyInput {
        /// What was empty (sequence, dataset, ...)
        what: &'static str,
    },

    /// A label is outside the configured class range
    #[error("label {label} is outside the class range [0, {n_classes})")]
    LabelOutOfRange {
        /// The offending label
        label: u32,
        /// Configured number of classes
        n_classes: usize,
    },

    /// A pixel value does not map to any mask channel
    #[error("pixel value {value} at ({x}, {y}) exceeds the {n_channels} mask channels")]
    ClassOutOfRange {
        /// The offending pixel value
        value: u8,
        /// Column of the pixel
        x: u32,
        /// Row of the pixel
        y: u32,
        /// Number of channels of the encoding
        n_channels: usize,
    },

    /// Two masks or maps have different spatial dimensions
    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        /// Expected width
        expected_width: u32,
        /// Expected height
        expected_height: u32,
        /// Actual width
        actual_width: u32,
        /// Actual height
        actual_height: u32,
    },

    /// Two masks or score vectors have a different number of channels
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch {
        /// Expected channel count
        expected: usize,
        /// Actual channel count
        actual: usize,
    },

    /// Raw label buffer does not match the declared dimensions
    #[error("label buffer holds {actual} values, {width}x{height} requires {expected}")]
    BufferSize {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Required number of values
        expected: usize,
        /// Number of values provided
        actual: usize,
    },

    /// Overlap threshold outside [0, 1]
    #[error("overlap threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    /// Negative or non-finite surface tolerance
    #[error("surface tolerance {0} must be finite and non-negative")]
    InvalidTolerance(f64),
}

/// Result type for metric operations
pub type Result<T> = std::result::Result<T, MetricError>;
