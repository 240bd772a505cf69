use crate::error::{PipelineError, Result};

/// Fixed-point mapping between reals and the signed integers held in slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPointCodec {
    scale: f64,
    /// Largest scaled magnitude a slot holds before wrapping.
    slot_limit: f64,
    /// Largest scaled magnitude accepted for a freshly encoded value.
    max_magnitude: f64,
}

impl FixedPointCodec {
    /// Codec for slots holding scaled integers in `[-slot_limit, slot_limit]`.
    ///
    /// Fresh values are capped at `slot_limit / slot_count` so that a full
    /// inner sum of one ciphertext cannot wrap.
    pub fn new(scale: f64, slot_limit: f64, slot_count: usize) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PipelineError::Parameter(format!(
                "global scale must be positive and finite, got {scale}"
            )));
        }
        let max_magnitude = (slot_limit / slot_count.max(1) as f64).floor();
        if !max_magnitude.is_finite() || max_magnitude < 1.0 {
            return Err(PipelineError::Parameter(format!(
                "encodable range must be at least one scaled unit, got {max_magnitude}"
            )));
        }
        Ok(Self {
            scale,
            slot_limit,
            max_magnitude,
        })
    }

    /// Codec whose slots live modulo `plaintext_modulus`, centered on zero.
    pub fn for_modulus(scale: f64, plaintext_modulus: u64, slot_count: usize) -> Result<Self> {
        Self::new(scale, (plaintext_modulus / 2) as f64, slot_count)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Largest absolute real value accepted by [`encode`](Self::encode).
    pub fn max_value(&self) -> f64 {
        self.max_magnitude / self.scale
    }

    /// Largest absolute real value a slot can hold after homomorphic arithmetic.
    pub fn slot_limit(&self) -> f64 {
        self.slot_limit / self.scale
    }

    /// Whether a slot bounded by `magnitude` is still below the wraparound point.
    pub fn fits(&self, magnitude: f64) -> bool {
        (magnitude * self.scale).round() <= self.slot_limit
    }

    pub fn encode(&self, values: &[f64]) -> Result<Vec<i64>> {
        values
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    return Err(PipelineError::Encoding(format!(
                        "cannot encode non-finite value {v}"
                    )));
                }
                let scaled = (v * self.scale).round();
                if scaled.abs() > self.max_magnitude {
                    return Err(PipelineError::Encoding(format!(
                        "value {v} exceeds encodable range ±{}",
                        self.max_value()
                    )));
                }
                Ok(scaled as i64)
            })
            .collect()
    }

    pub fn decode(&self, slots: &[i64]) -> Vec<f64> {
        slots.iter().map(|&s| s as f64 / self.scale).collect()
    }

    /// The value the scheme actually represents when asked to hold `v`.
    pub fn quantize(&self, v: f64) -> f64 {
        (v * self.scale).round() / self.scale
    }
}
