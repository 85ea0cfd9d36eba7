//! Frame-level accuracy

use crate::{
    error::{MetricError, Result},
    segment::Label,
};

/// Fraction of frames whose predicted label equals the reference label
///
/// The sequences must have the same, non-zero length; they are never truncated.
pub fn frame_accuracy(reference: &[Label], prediction: &[Label]) -> Result<f64> {
    if reference.len() != prediction.len() {
        return Err(MetricError::LengthMismatch {
            reference: reference.len(),
            prediction: prediction.len(),
        });
    }
    if reference.is_empty() {
        return Err(MetricError::EmptyInput { what: "sequence" });
    }

    let correct = reference
        .iter()
        .zip(prediction)
        .filter(|(expected, actual)| expected == actual)
        .count();

    Ok(correct as f64 / reference.len() as f64)
}

/// Unweighted mean of the per-video frame accuracy over a dataset
pub fn mean_frame_accuracy<'a, I>(videos: I) -> Result<f64>
where
    I: IntoIterator<Item = (&'a [Label], &'a [Label])>,
{
    let mut total = 0.0;
    let mut count = 0usize;
    for (reference, prediction) in videos {
        total += frame_accuracy(reference, prediction)?;
        count += 1;
    }
    if count == 0 {
        return Err(MetricError::EmptyInput { what: "dataset" });
    }
    Ok(total / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(frame_accuracy(&[1, 1, 2, 2], &[1, 1, 2, 2]).unwrap(), 1.0);
    }

    #[test]
    fn test_fully_different() {
        assert_eq!(frame_accuracy(&[0, 1, 0, 1], &[1, 0, 1, 0]).unwrap(), 0.0);
    }

    #[test]
    fn test_partial() {
        assert_eq!(frame_accuracy(&[0, 1, 2, 3], &[0, 1, 0, 0]).unwrap(), 0.5);
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            frame_accuracy(&[0, 1, 2], &[0, 1]),
            Err(MetricError::LengthMismatch {
                reference: 3,
                prediction: 2
            })
        );
    }

    #[test]
    fn test_empty() {
        assert!(frame_accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_mean_over_videos() {
        let a = [1u32, 1];
        let b = [0u32, 1];
        let mean = mean_frame_accuracy([(&a[..], &a[..]), (&a[..], &b[..])]).unwrap();
        assert_eq!(mean, 0.75);
    }
}
