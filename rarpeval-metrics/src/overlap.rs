//! Pixel-region intersection-over-union

use crate::{error::Result, mask::OneHotMask};

/// IoU of two boolean channels
///
/// A channel that is empty on both sides scores 1: both agree the class is absent.
pub fn channel_iou(reference: &[bool], prediction: &[bool]) -> f64 {
    let mut intersection = 0usize;
    let mut union = 0usize;
    for (&r, &p) in reference.iter().zip(prediction) {
        intersection += usize::from(r && p);
        union += usize::from(r || p);
    }
    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}

/// Per-class IoU of two masks, background channel excluded
pub fn mask_iou(reference: &OneHotMask, prediction: &OneHotMask) -> Result<Vec<f64>> {
    reference.check_compatible(prediction)?;
    Ok((1..reference.n_channels())
        .map(|class| channel_iou(reference.channel(class), prediction.channel(class)))
        .collect())
}
