use crate::{
    chunk::{AggregateResult, CipherChunk},
    error::{PipelineError, Result},
    reducer,
    scheme::{SlotDecrypter, SlotEvaluator},
};

/// Sums every element of `chunks` under encryption.
///
/// Starts from an encryption of zero and, in index order, folds in each
/// chunk's slot sum. The element count is accumulated in the clear. Nothing
/// is decrypted here. Fails with `RangeExceeded` once the running sum could
/// wrap modulo the plaintext modulus.
pub fn secure_sum<C: SlotEvaluator>(
    ctx: &C,
    chunks: &[CipherChunk<C::Ciphertext>],
) -> Result<AggregateResult<C::Ciphertext>> {
    if chunks.is_empty() {
        return Err(PipelineError::EmptySequence);
    }

    let mut sum = CipherChunk::encrypt(ctx, &[0.0])?;
    let mut count = 0;
    for chunk in chunks {
        let reduced = chunk.reduce_sum(ctx)?;
        sum = sum.homomorphic_add(ctx, &reduced)?;
        count += chunk.size();
    }
    log::debug!("aggregated {count} elements from {} chunks", chunks.len());

    Ok(AggregateResult { sum, count })
}

/// Average of every element of `chunks`.
///
/// The sum stays encrypted until [`reducer::decrypt_average`] opens it; the
/// division by the count is a plaintext step.
pub fn secure_average<C>(ctx: &C, chunks: &[CipherChunk<C::Ciphertext>]) -> Result<f64>
where
    C: SlotEvaluator + SlotDecrypter,
{
    let aggregate = secure_sum(ctx, chunks)?;
    reducer::decrypt_average(ctx, &aggregate)
}
