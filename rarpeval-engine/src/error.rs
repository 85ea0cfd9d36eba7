//! Layered error types
//!
//! `ArtifactError` covers reading one file or directory, `ValidationError`
//! the structural checks run before scoring, and `EngineError` everything the
//! evaluation entry points can fail with.

use rarpeval_metrics::MetricError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or interpret one artifact on disk
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Mask raster could not be decoded or encoded
    #[error("failed to process image {path}: {source}")]
    Image {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: image::ImageError,
    },

    /// Action label file line that is not `frame_index,label`
    #[error("malformed action file {path} at line {line}: {reason}")]
    MalformedActionFile {
        /// Offending file
        path: PathBuf,
        /// One-based line number
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// CSV encoding failure while writing a label file
    #[error("failed to write {path}: {source}")]
    Csv {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: csv::Error,
    },

    /// Raw video container whose frame count cannot be read
    #[error("cannot read the frame count of {path}: {reason}")]
    UnsupportedVideo {
        /// Offending file
        path: PathBuf,
        /// What was wrong
        reason: String,
    },
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Structural or content mismatch between reference and prediction sets
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A root holds no `video_*` directory
    #[error("{reference} or {prediction} do not have child directories using the naming convention video_*")]
    NoVideoDirectories {
        /// Reference root
        reference: PathBuf,
        /// Prediction root
        prediction: PathBuf,
    },

    /// The two roots hold a different number of videos
    #[error("prediction set and reference set do not match in size: {predicted} != {reference}")]
    VideoCountMismatch {
        /// Videos in the reference root
        reference: usize,
        /// Videos in the prediction root
        predicted: usize,
    },

    /// Sorted video directories do not pair up by name
    #[error("video directory {predicted} is not present in the reference set or {reference} is not present in the prediction set")]
    VideoNameMismatch {
        /// Reference directory name
        reference: String,
        /// Prediction directory name at the same position
        predicted: String,
    },

    /// Expected sequence length cannot be derived from the reference video
    #[error("cannot determine the expected {task} length for {video}: no usable reference artifact")]
    Unresolvable {
        /// Reference video directory
        video: PathBuf,
        /// `actions` or `segmentation`
        task: &'static str,
    },

    /// Prediction lacks its `segmentation` directory
    #[error("{path} is not a directory")]
    MissingSegmentationDir {
        /// Expected directory
        path: PathBuf,
    },

    /// Prediction holds the wrong number of segmentation frames
    #[error("segmentation file validation failed. {reference} contained {expected} files while {prediction} contained {actual} (missing: {missing:?}, extra: {extra:?})")]
    SegmentationCountMismatch {
        /// Reference video directory
        reference: PathBuf,
        /// Prediction segmentation directory
        prediction: PathBuf,
        /// Resolved expected count
        expected: usize,
        /// Files found
        actual: usize,
        /// Reference frame names absent from the prediction
        missing: Vec<String>,
        /// Prediction frame names absent from the reference
        extra: Vec<String>,
    },

    /// Prediction lacks its action label file
    #[error("{path} does not exist")]
    MissingActionFile {
        /// Expected file
        path: PathBuf,
    },

    /// Prediction action file has the wrong number of lines
    #[error("action file validation failed. {reference} contained {expected} lines while {prediction} contained {actual} lines")]
    ActionCountMismatch {
        /// Reference action file
        reference: PathBuf,
        /// Prediction action file
        prediction: PathBuf,
        /// Resolved expected count
        expected: usize,
        /// Lines found
        actual: usize,
    },

    /// Prediction frame indices do not line up with the reference
    #[error("action file validation failed. {prediction} contained predictions that do not correspond to {reference} (first difference at line {line})")]
    FrameIndexMismatch {
        /// Reference action file
        reference: PathBuf,
        /// Prediction action file
        prediction: PathBuf,
        /// One-based line of the first disagreement
        line: usize,
    },

    /// An artifact needed for validation could not be read
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl ValidationError {
    /// Whether this is a frame-index content mismatch rather than a structural one
    pub fn is_content_mismatch(&self) -> bool {
        matches!(self, ValidationError::FrameIndexMismatch { .. })
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Dataset-level validation failure
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// One or more videos failed validation
    #[error("validation failed for {count} video(s); first failure in {video}: {first}")]
    ValidationFailed {
        /// Number of failing videos
        count: usize,
        /// First failing video directory name
        video: String,
        /// Its failure
        first: Box<ValidationError>,
    },

    /// Artifact read failure during scoring
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Metric failure while scoring one video
    #[error("scoring {video} failed on {artifact}: {source}")]
    Metric {
        /// Video directory name
        video: String,
        /// Artifact being scored
        artifact: PathBuf,
        /// Underlying error
        #[source]
        source: MetricError,
    },

    /// Reference video without any segmentation frame
    #[error("{path} holds no reference segmentation frame")]
    NoReferenceFrames {
        /// Reference segmentation directory
        path: PathBuf,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Prediction root exists and overwriting was not requested
    #[error("{path} exists, remove it or pass overwrite to replace previous predictions")]
    OutputExists {
        /// Existing prediction root
        path: PathBuf,
    },

    /// Worker pool could not be created
    #[cfg(feature = "parallel")]
    #[error("parallel execution failed: {0}")]
    ParallelError(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
