//! Small numeric helpers shared by the metrics

/// Divide, mapping a zero denominator to `0.0` instead of NaN or infinity
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Replace NaN with `0.0`, leaving every other value untouched
#[inline]
pub fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Unweighted arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Geometric mean of two non-negative scores
///
/// Penalises imbalance between the two constituents more than an arithmetic
/// mean. Negative products (which no metric here produces) clamp to zero.
pub fn geometric_mean2(a: f64, b: f64) -> f64 {
    (a * b).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0, 4.0), 0.25);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_nan_to_zero() {
        assert_eq!(nan_to_zero(f64::NAN), 0.0);
        assert_eq!(nan_to_zero(0.5), 0.5);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_geometric_mean2() {
        assert_eq!(geometric_mean2(0.25, 1.0), 0.5);
        assert_eq!(geometric_mean2(0.0, 1.0), 0.0);
    }
}
