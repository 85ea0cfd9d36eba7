//! Segmental F1 at an overlap threshold (F1@k)
//!
//! Predicted segments are matched greedily, in prediction order, against
//! reference segments of the same label. A prediction claims the reference
//! segment with the highest IoU (the earliest one on ties) when that IoU
//! reaches the threshold and nobody claimed it before. Every other prediction
//! is a false positive; every unclaimed reference segment is a false negative.

use crate::{
    error::{MetricError, Result},
    numeric::safe_div,
    segment::{extract_segments, Label, Segment},
};

/// Minimum IoU for a predicted segment to match a reference segment
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OverlapThreshold(f64);

impl OverlapThreshold {
    /// Create a threshold from a fraction in `[0, 1]`
    pub fn new(fraction: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(MetricError::InvalidThreshold(fraction));
        }
        Ok(Self(fraction))
    }

    /// Create a threshold from a percentage, so `10` means F1@10
    pub fn from_percent(percent: u32) -> Result<Self> {
        Self::new(f64::from(percent) / 100.0)
    }

    /// The threshold as a fraction
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Outcome of one matching pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchCounts {
    /// True positives per predicted label
    pub true_positives: Vec<usize>,
    /// False positives per predicted label
    pub false_positives: Vec<usize>,
    /// Reference segments nobody claimed
    pub false_negatives: usize,
}

impl MatchCounts {
    fn with_classes(n_classes: usize) -> Self {
        Self {
            true_positives: vec![0; n_classes],
            false_positives: vec![0; n_classes],
            false_negatives: 0,
        }
    }

    /// Total true positives over all classes
    pub fn tp(&self) -> usize {
        self.true_positives.iter().sum()
    }

    /// Total false positives over all classes
    pub fn fp(&self) -> usize {
        self.false_positives.iter().sum()
    }

    /// TP / (TP + FP), zero when nothing was predicted
    pub fn precision(&self) -> f64 {
        let tp = self.tp() as f64;
        safe_div(tp, tp + self.fp() as f64)
    }

    /// TP / (TP + FN), zero when there was nothing to find
    pub fn recall(&self) -> f64 {
        let tp = self.tp() as f64;
        safe_div(tp, tp + self.false_negatives as f64)
    }

    /// Harmonic mean of precision and recall, zero instead of NaN
    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        safe_div(2.0 * precision * recall, precision + recall)
    }
}

/// Greedy first-come segment matcher
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    n_classes: usize,
    background: Option<Label>,
    overlap: OverlapThreshold,
}

impl SegmentMatcher {
    /// Create a matcher for labels in `[0, n_classes)`
    pub fn new(n_classes: usize, overlap: OverlapThreshold) -> Self {
        Self {
            n_classes,
            background: None,
            overlap,
        }
    }

    /// Drop segments of this label from both sides before matching
    pub fn with_background(mut self, background: Label) -> Self {
        self.background = Some(background);
        self
    }

    /// Configured overlap threshold
    pub fn overlap(&self) -> OverlapThreshold {
        self.overlap
    }

    /// Match two segment sets
    pub fn match_segments(
        &self,
        reference: &[Segment],
        prediction: &[Segment],
    ) -> Result<MatchCounts> {
        let keep = |segment: &&Segment| Some(segment.label) != self.background;
        let reference: Vec<&Segment> = reference.iter().filter(keep).collect();

        let mut counts = MatchCounts::with_classes(self.n_classes);
        let mut claimed = vec![false; reference.len()];

        for predicted in prediction.iter().filter(keep) {
            let class = predicted.label as usize;
            if class >= self.n_classes {
                return Err(MetricError::LabelOutOfRange {
                    label: predicted.label,
                    n_classes: self.n_classes,
                });
            }

            let mut best: Option<(usize, f64)> = None;
            for (index, candidate) in reference.iter().enumerate() {
                if candidate.label != predicted.label {
                    continue;
                }
                let iou = predicted.iou(candidate);
                // strict comparison keeps the earliest segment on ties
                match best {
                    Some((_, best_iou)) if iou <= best_iou => {}
                    _ => best = Some((index, iou)),
                }
            }

            match best {
                Some((index, iou)) if iou >= self.overlap.value() && !claimed[index] => {
                    claimed[index] = true;
                    counts.true_positives[class] += 1;
                }
                _ => counts.false_positives[class] += 1,
            }
        }

        counts.false_negatives = claimed.iter().filter(|&&used| !used).count();
        Ok(counts)
    }

    /// Segment both label sequences and match them
    pub fn match_sequences(
        &self,
        reference: &[Label],
        prediction: &[Label],
    ) -> Result<MatchCounts> {
        self.match_segments(&extract_segments(reference), &extract_segments(prediction))
    }

    /// F1@k of one video
    pub fn f1_score(&self, reference: &[Label], prediction: &[Label]) -> Result<f64> {
        Ok(self.match_sequences(reference, prediction)?.f1())
    }

    /// Unweighted mean of the per-video F1@k over a dataset
    pub fn mean_f1_score<'a, I>(&self, videos: I) -> Result<f64>
    where
        I: IntoIterator<Item = (&'a [Label], &'a [Label])>,
    {
        let mut total = 0.0;
        let mut count = 0usize;
        for (reference, prediction) in videos {
            total += self.f1_score(reference, prediction)?;
            count += 1;
        }
        if count == 0 {
            return Err(MetricError::EmptyInput { what: "dataset" });
        }
        Ok(total / count as f64)
    }
}
