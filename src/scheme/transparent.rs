use super::{ContextId, FixedPointCodec, SlotDecrypter, SlotEncrypter, SlotEvaluator};
use crate::error::{PipelineError, Result};

/// Slot vector stored in the clear, already quantized to the codec's scale.
#[derive(Clone, Debug, PartialEq)]
pub struct TransparentCiphertext {
    slots: Vec<f64>,
}

impl TransparentCiphertext {
    pub fn slots(&self) -> &[f64] {
        &self.slots
    }
}

/// Stand-in scheme with no lattice arithmetic.
///
/// It keeps the observable behaviour of the BFV backend: fixed slot count,
/// zero padding, fixed-point quantization and a replicated inner sum.
/// Nothing is hidden, so it is only fit for exercising orchestration code.
#[derive(Clone, Debug)]
pub struct TransparentContext {
    id: ContextId,
    slot_count: usize,
    codec: FixedPointCodec,
}

impl TransparentContext {
    /// Slots wrap only where an `i64` would.
    pub fn new(slot_count: usize, global_scale: f64) -> Result<Self> {
        Self::with_slot_limit(slot_count, global_scale, i64::MAX as f64)
    }

    /// Slots behave as if reduced modulo `plaintext_modulus`, like the BFV backend.
    pub fn with_plaintext_modulus(
        slot_count: usize,
        global_scale: f64,
        plaintext_modulus: u64,
    ) -> Result<Self> {
        Self::with_slot_limit(slot_count, global_scale, (plaintext_modulus / 2) as f64)
    }

    fn with_slot_limit(slot_count: usize, global_scale: f64, slot_limit: f64) -> Result<Self> {
        if slot_count == 0 {
            return Err(PipelineError::Parameter(
                "slot count must be positive".to_string(),
            ));
        }
        Ok(Self {
            id: ContextId::fresh(),
            slot_count,
            codec: FixedPointCodec::new(global_scale, slot_limit, slot_count)?,
        })
    }
}

impl SlotEncrypter for TransparentContext {
    type Ciphertext = TransparentCiphertext;

    fn context_id(&self) -> ContextId {
        self.id
    }

    fn slot_count(&self) -> usize {
        self.slot_count
    }

    fn codec(&self) -> &FixedPointCodec {
        &self.codec
    }

    fn encrypt_slots(&self, values: &[f64]) -> Result<TransparentCiphertext> {
        if values.len() > self.slot_count {
            return Err(PipelineError::Encoding(format!(
                "{} values exceed the {} available slots",
                values.len(),
                self.slot_count
            )));
        }
        let mut slots = self.codec.decode(&self.codec.encode(values)?);
        slots.resize(self.slot_count, 0.0);
        Ok(TransparentCiphertext { slots })
    }
}

impl SlotEvaluator for TransparentContext {
    fn add_ciphertexts(
        &self,
        lhs: &TransparentCiphertext,
        rhs: &TransparentCiphertext,
    ) -> Result<TransparentCiphertext> {
        if lhs.slots.len() != rhs.slots.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: lhs.slots.len(),
                found: rhs.slots.len(),
            });
        }
        let slots = lhs
            .slots
            .iter()
            .zip(&rhs.slots)
            .map(|(a, b)| a + b)
            .collect();
        Ok(TransparentCiphertext { slots })
    }

    fn sum_slots(&self, ct: &TransparentCiphertext) -> Result<TransparentCiphertext> {
        let total: f64 = ct.slots.iter().sum();
        Ok(TransparentCiphertext {
            slots: vec![total; ct.slots.len()],
        })
    }
}

impl SlotDecrypter for TransparentContext {
    fn decrypt_slots(&self, ct: &TransparentCiphertext, len: usize) -> Result<Vec<f64>> {
        if len > ct.slots.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: ct.slots.len(),
                found: len,
            });
        }
        Ok(ct.slots[..len].to_vec())
    }
}
