use std::{fmt, time::Duration};

/// Human readable duration, picking the unit from the magnitude.
pub struct DisplayDuration(pub Duration);

impl fmt::Display for DisplayDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration_ns = self.0.as_nanos();
        if duration_ns < 1_000 {
            write!(f, "{duration_ns} ns")
        } else if duration_ns < 1_000_000 {
            write!(f, "{:.2} µs", duration_ns as f64 / 1_000.0)
        } else if duration_ns < 1_000_000_000 {
            write!(f, "{:.2} ms", duration_ns as f64 / 1_000_000.0)
        } else {
            write!(f, "{:.2} s", duration_ns as f64 / 1_000_000_000.0)
        }
    }
}

/// Evaluates `$code`, logs how long it took under `$name` and returns its value.
macro_rules! timeit {
    ($name:expr, $code:expr) => {{
        let start = std::time::Instant::now();
        let r = $code;
        log::info!(
            "⏱  {}: {}",
            $name,
            $crate::util::timing::DisplayDuration(start.elapsed())
        );
        r
    }};
}

pub(crate) use timeit;
