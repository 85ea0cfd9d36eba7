//! Streaming per-frame score accumulation
//!
//! Frames are folded in one at a time as `sum + count`, so partial
//! accumulators from disjoint frame ranges can be merged in any grouping.

use crate::error::{MetricError, Result};

/// Running per-class sums over scored frames
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreAccumulator {
    sums: Vec<f64>,
    frames: usize,
    history: Option<Vec<Vec<f64>>>,
}

impl ScoreAccumulator {
    /// Create an accumulator for `n_classes` scores per frame
    pub fn new(n_classes: usize) -> Self {
        Self {
            sums: vec![0.0; n_classes],
            frames: 0,
            history: None,
        }
    }

    /// Also keep every frame's score vector, for per-class statistics
    pub fn with_history(mut self) -> Self {
        self.history = Some(Vec::new());
        self
    }

    /// Number of classes per frame
    pub fn n_classes(&self) -> usize {
        self.sums.len()
    }

    /// Number of frames folded in so far
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Fold in one frame's per-class scores
    pub fn push(&mut self, scores: &[f64]) -> Result<()> {
        if scores.len() != self.sums.len() {
            return Err(MetricError::ChannelMismatch {
                expected: self.sums.len(),
                actual: scores.len(),
            });
        }
        for (sum, score) in self.sums.iter_mut().zip(scores) {
            *sum += score;
        }
        self.frames += 1;
        if let Some(history) = &mut self.history {
            history.push(scores.to_vec());
        }
        Ok(())
    }

    /// Fold in a frame whose prediction is missing: every class scores zero
    pub fn push_missing(&mut self) {
        self.frames += 1;
        if let Some(history) = &mut self.history {
            history.push(vec![0.0; self.sums.len()]);
        }
    }

    /// Combine with an accumulator over a disjoint, later range of frames
    pub fn merge(mut self, other: ScoreAccumulator) -> Result<Self> {
        if other.sums.len() != self.sums.len() {
            return Err(MetricError::ChannelMismatch {
                expected: self.sums.len(),
                actual: other.sums.len(),
            });
        }
        for (sum, value) in self.sums.iter_mut().zip(&other.sums) {
            *sum += value;
        }
        self.frames += other.frames;
        match (&mut self.history, other.history) {
            (Some(history), Some(more)) => history.extend(more),
            (Some(_), None) => self.history = None,
            _ => {}
        }
        Ok(self)
    }

    /// Mean score of each class over frames, `None` before the first frame
    pub fn class_means(&self) -> Option<Vec<f64>> {
        if self.frames == 0 {
            return None;
        }
        let frames = self.frames as f64;
        Some(self.sums.iter().map(|sum| sum / frames).collect())
    }

    /// Mean over frames, then over classes
    pub fn mean(&self) -> Option<f64> {
        let means = self.class_means()?;
        crate::numeric::mean(&means)
    }

    /// Per-frame score vectors, when history was requested
    pub fn history(&self) -> Option<&[Vec<f64>]> {
        self.history.as_deref()
    }
}
