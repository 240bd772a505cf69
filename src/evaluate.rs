use std::time::Instant;

/// Absolute percentage deviation of `tampered` from `original`.
///
/// Undefined when `original` is zero; that case yields `NaN` instead of an error.
pub fn percent_error(original: f64, tampered: f64) -> f64 {
    if original == 0.0 {
        return f64::NAN;
    }
    (original - tampered).abs() / original * 100.0
}

/// Arithmetic mean computed in the clear, `NaN` for an empty input.
pub fn plaintext_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Runs `op` and returns its result with the wall-clock seconds it took.
///
/// Plaintext and encrypted computations go through this same wrapper so
/// their timings share the same overhead.
pub fn time_operation<R>(op: impl FnOnce() -> R) -> (R, f64) {
    let start = Instant::now();
    let result = op();
    (result, start.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn no_change_is_zero_error() {
        assert_eq!(percent_error(10.0, 10.0), 0.0);
    }

    #[test]
    fn half_again_is_fifty_percent() {
        assert_eq!(percent_error(10.0, 15.0), 50.0);
        assert_eq!(percent_error(10.0, 5.0), 50.0);
    }

    #[test]
    fn zero_original_is_undefined() {
        assert!(percent_error(0.0, 3.0).is_nan());
        assert!(percent_error(0.0, 0.0).is_nan());
    }

    #[test]
    fn tamper_offset_on_average() {
        assert_abs_diff_eq!(percent_error(70.0, 75.0), 7.142857142857143, epsilon = 1e-12);
    }

    #[test]
    fn mean_of_samples() {
        assert_eq!(plaintext_mean(&[40.0, 60.0, 80.0, 100.0]), 70.0);
        assert!(plaintext_mean(&[]).is_nan());
    }

    #[test]
    fn timing_returns_result_and_elapsed() {
        let (value, seconds) = time_operation(|| (1..=100).sum::<u32>());
        assert_eq!(value, 5050);
        assert!(seconds >= 0.0);
    }
}
