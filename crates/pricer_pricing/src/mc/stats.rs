//! Sample statistics for Monte Carlo estimates.

/// Arithmetic mean; `NaN` for an empty sample.
pub fn mean(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return f64::NAN;
    }
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// Standard error of the mean: sample standard deviation (n - 1 divisor)
/// over `sqrt(n)`.
///
/// Undefined, and `NaN`, for fewer than two observations.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::standard_error;
///
/// let se = standard_error(&[1.0, 2.0, 3.0, 4.0]);
/// assert!((se - 0.6454972243679028).abs() < 1e-15);
/// assert!(standard_error(&[1.0]).is_nan());
/// ```
pub fn standard_error(sample: &[f64]) -> f64 {
    let n = sample.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(sample);
    let variance = sample.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    (variance / n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_constant_sample_has_zero_error() {
        assert_eq!(standard_error(&[2.5; 10]), 0.0);
    }

    #[test]
    fn test_standard_error_reference() {
        // std (ddof = 1) of [2, 4, 4, 4, 5, 5, 7, 9] is 2.138089935299395
        let sample = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(
            standard_error(&sample),
            2.138_089_935_299_395 / 8.0_f64.sqrt(),
            epsilon = 1e-15
        );
    }
}
