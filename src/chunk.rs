use crate::{
    error::{PipelineError, Result},
    scheme::{ContextId, SlotEncrypter, SlotEvaluator},
};

/// One encrypted slice of a plaintext vector.
///
/// Chunks are values: every operation returns a new chunk and leaves its
/// inputs untouched.
///
/// Slots hold integers modulo the plaintext modulus, so each chunk carries a
/// clear upper bound on the absolute value of any of its slots. Operations
/// that would push that bound past the wraparound point fail instead of
/// producing a ciphertext that decrypts to the wrong value.
#[derive(Clone, Debug)]
pub struct CipherChunk<T> {
    ciphertext: T,
    size: usize,
    context: ContextId,
    /// Bound on `|slot|` over every slot, in real units.
    magnitude: f64,
    /// Leading slots that may be non-zero.
    occupied: usize,
}

/// Ordered chunks jointly encrypting one plaintext vector.
pub type CipherChunkSequence<T> = Vec<CipherChunk<T>>;

impl<T> CipherChunk<T> {
    /// Encrypts `values` into the leading slots of a fresh ciphertext.
    pub fn encrypt<C>(ctx: &C, values: &[f64]) -> Result<Self>
    where
        C: SlotEncrypter<Ciphertext = T>,
    {
        let ciphertext = ctx.encrypt_slots(values)?;
        let codec = ctx.codec();
        let magnitude = values
            .iter()
            .map(|&v| codec.quantize(v).abs())
            .fold(0.0, f64::max);
        Ok(Self {
            ciphertext,
            size: values.len(),
            context: ctx.context_id(),
            magnitude,
            occupied: values.len(),
        })
    }

    /// Number of logical elements; slots beyond it are padding.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn ciphertext(&self) -> &T {
        &self.ciphertext
    }

    pub fn context_id(&self) -> ContextId {
        self.context
    }

    /// Largest absolute value any slot of this chunk can hold.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub(crate) fn check_context(&self, context: ContextId) -> Result<()> {
        if self.context != context {
            return Err(PipelineError::ContextMismatch);
        }
        Ok(())
    }

    /// Element-wise addition of two chunks of equal size under `ctx`.
    pub fn homomorphic_add<C>(&self, ctx: &C, other: &Self) -> Result<Self>
    where
        C: SlotEvaluator<Ciphertext = T>,
    {
        self.check_context(ctx.context_id())?;
        other.check_context(ctx.context_id())?;
        if self.size != other.size {
            return Err(PipelineError::DimensionMismatch {
                expected: self.size,
                found: other.size,
            });
        }
        let magnitude = check_range(ctx, self.magnitude + other.magnitude)?;
        let ciphertext = ctx.add_ciphertexts(&self.ciphertext, &other.ciphertext)?;
        Ok(Self {
            ciphertext,
            size: self.size,
            context: self.context,
            magnitude,
            occupied: self.occupied.max(other.occupied),
        })
    }

    /// Collapses the chunk into a single-element chunk holding the sum of its elements.
    ///
    /// The sum is replicated into every slot of the result.
    pub fn reduce_sum<C>(&self, ctx: &C) -> Result<Self>
    where
        C: SlotEvaluator<Ciphertext = T>,
    {
        self.check_context(ctx.context_id())?;
        let magnitude = check_range(ctx, self.magnitude * self.occupied as f64)?;
        let ciphertext = ctx.sum_slots(&self.ciphertext)?;
        Ok(Self {
            ciphertext,
            size: 1,
            context: self.context,
            magnitude,
            occupied: ctx.slot_count(),
        })
    }
}

fn check_range<C: SlotEncrypter>(ctx: &C, magnitude: f64) -> Result<f64> {
    let codec = ctx.codec();
    if !codec.fits(magnitude) {
        return Err(PipelineError::RangeExceeded {
            magnitude,
            limit: codec.slot_limit(),
        });
    }
    Ok(magnitude)
}

/// Encrypted running sum plus the element count it covers.
///
/// The count is not sensitive and is kept in the clear.
#[derive(Clone, Debug)]
pub struct AggregateResult<T> {
    pub sum: CipherChunk<T>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{SlotDecrypter, TransparentCiphertext, TransparentContext};

    fn chunk(ctx: &TransparentContext, values: &[f64]) -> CipherChunk<TransparentCiphertext> {
        CipherChunk::encrypt(ctx, values).unwrap()
    }

    #[test]
    fn add_sums_element_wise() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let a = chunk(&ctx, &[1.0, 2.0, 3.0]);
        let b = chunk(&ctx, &[0.5, 0.5, 0.5]);
        let sum = a.homomorphic_add(&ctx, &b).unwrap();
        assert_eq!(sum.size(), 3);
        assert_eq!(
            ctx.decrypt_slots(sum.ciphertext(), 3).unwrap(),
            vec![1.5, 2.5, 3.5]
        );
        // inputs are untouched
        assert_eq!(ctx.decrypt_slots(a.ciphertext(), 3).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn add_rejects_unequal_sizes() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let a = chunk(&ctx, &[1.0, 2.0, 3.0]);
        let b = chunk(&ctx, &[1.0]);
        assert!(matches!(
            a.homomorphic_add(&ctx, &b),
            Err(PipelineError::DimensionMismatch {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn add_rejects_foreign_context() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let other = TransparentContext::new(16, 1024.0).unwrap();
        let a = chunk(&ctx, &[1.0]);
        let b = chunk(&other, &[1.0]);
        assert!(matches!(
            a.homomorphic_add(&ctx, &b),
            Err(PipelineError::ContextMismatch)
        ));
    }

    #[test]
    fn reduce_sum_yields_scalar_chunk() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let reduced = chunk(&ctx, &[40.0, 60.0, 80.0, 100.0])
            .reduce_sum(&ctx)
            .unwrap();
        assert_eq!(reduced.size(), 1);
        assert_eq!(ctx.decrypt_slots(reduced.ciphertext(), 1).unwrap(), vec![280.0]);
    }

    #[test]
    fn magnitude_tracks_additions_and_reductions() {
        let ctx = TransparentContext::new(16, 4.0).unwrap();
        let a = chunk(&ctx, &[1.0, -3.3, 2.0]);
        assert_eq!(a.magnitude(), 3.25);
        let b = chunk(&ctx, &[0.5, 0.5, 0.5]);
        let sum = a.homomorphic_add(&ctx, &b).unwrap();
        assert_eq!(sum.magnitude(), 3.75);
        assert_eq!(sum.reduce_sum(&ctx).unwrap().magnitude(), 3.75 * 3.0);
    }

    #[test]
    fn add_refuses_to_wrap_past_the_modulus() {
        // slots hold [-500, 500]; fresh values are capped at 125
        let ctx = TransparentContext::with_plaintext_modulus(4, 1.0, 1001).unwrap();
        let a = chunk(&ctx, &[125.0; 4]);
        let doubled = a.homomorphic_add(&ctx, &a).unwrap();
        let quadrupled = doubled.homomorphic_add(&ctx, &doubled).unwrap();
        assert_eq!(quadrupled.magnitude(), 500.0);
        assert!(matches!(
            quadrupled.homomorphic_add(&ctx, &a),
            Err(PipelineError::RangeExceeded { .. })
        ));
    }

    #[test]
    fn reduce_refuses_to_wrap_past_the_modulus() {
        let ctx = TransparentContext::with_plaintext_modulus(4, 1.0, 1001).unwrap();
        let a = chunk(&ctx, &[125.0; 4]);
        assert_eq!(a.reduce_sum(&ctx).unwrap().magnitude(), 500.0);

        let shifted = a.homomorphic_add(&ctx, &chunk(&ctx, &[1.0; 4])).unwrap();
        assert!(matches!(
            shifted.reduce_sum(&ctx),
            Err(PipelineError::RangeExceeded { .. })
        ));
    }

    #[test]
    fn reduction_bound_counts_only_occupied_slots() {
        let ctx = TransparentContext::with_plaintext_modulus(4, 1.0, 1001).unwrap();
        let a = chunk(&ctx, &[125.0, 125.0]);
        let grown = a.homomorphic_add(&ctx, &a).unwrap();
        assert_eq!(grown.reduce_sum(&ctx).unwrap().magnitude(), 500.0);
    }
}
