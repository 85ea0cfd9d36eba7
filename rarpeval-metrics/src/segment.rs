//! Temporal segments of a label sequence

/// Discrete class identifier of one frame
pub type Label = u32;

/// A maximal run of identical labels over the half-open frame range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// First frame of the run
    pub start: usize,
    /// One past the last frame of the run
    pub end: usize,
    /// Label shared by every frame of the run
    pub label: Label,
}

impl Segment {
    /// Create a new segment
    pub fn new(start: usize, end: usize, label: Label) -> Self {
        debug_assert!(start <= end, "segment start must not exceed end");
        Self { start, end, label }
    }

    /// Number of frames covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the segment covers no frame
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Intersection-over-union of the two frame intervals, ignoring labels
    ///
    /// Disjoint intervals have an IoU of exactly zero.
    pub fn iou(&self, other: &Segment) -> f64 {
        let intersection = self.end.min(other.end).saturating_sub(self.start.max(other.start));
        let union = self.end.max(other.end) - self.start.min(other.start);
        if union == 0 {
            return 0.0;
        }
        intersection as f64 / union as f64
    }
}

/// Split a label sequence into its contiguous runs
///
/// The returned segments are ordered, never overlap and cover `[0, labels.len())`
/// exactly. An empty sequence yields no segment.
pub fn extract_segments(labels: &[Label]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let Some(&first) = labels.first() else {
        return segments;
    };

    let mut start = 0;
    let mut current = first;
    for (index, &label) in labels.iter().enumerate().skip(1) {
        if label != current {
            segments.push(Segment::new(start, index, current));
            start = index;
            current = label;
        }
    }
    segments.push(Segment::new(start, labels.len(), current));

    segments
}
