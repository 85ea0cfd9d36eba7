//! Descriptive statistics of a score column

/// Summary of one column of per-frame scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN below two values
    pub std: f64,
    /// Smallest value
    pub min: f64,
    /// First quartile
    pub q25: f64,
    /// Median
    pub q50: f64,
    /// Third quartile
    pub q75: f64,
    /// Largest value
    pub max: f64,
}

impl Describe {
    /// Row labels in output order
    pub const LABELS: [&'static str; 8] = [
        "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    ];

    /// Describe a column, `None` when it is empty
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }

    /// Values in the order of [`Describe::LABELS`]
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Linearly interpolated quantile of sorted, non-empty data
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let d = Describe::of(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(d.count, 4);
        assert_eq!(d.mean, 2.5);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 4.0);
        assert_eq!(d.q25, 1.75);
        assert_eq!(d.q50, 2.5);
        assert_eq!(d.q75, 3.25);
        assert!((d.std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_single_value() {
        let d = Describe::of(&[0.5]).unwrap();
        assert_eq!(d.q25, 0.5);
        assert!(d.std.is_nan());
    }

    #[test]
    fn test_empty() {
        assert!(Describe::of(&[]).is_none());
    }
}
