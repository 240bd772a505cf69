use crate::{
    chunk::{AggregateResult, CipherChunk},
    error::{PipelineError, Result},
    scheme::SlotDecrypter,
};

/// Decrypts each chunk and concatenates the elements in sequence order.
pub fn decrypt_all<C: SlotDecrypter>(
    ctx: &C,
    chunks: &[CipherChunk<C::Ciphertext>],
) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(chunks.iter().map(CipherChunk::size).sum());
    for chunk in chunks {
        chunk.check_context(ctx.context_id())?;
        values.extend(ctx.decrypt_slots(chunk.ciphertext(), chunk.size())?);
    }
    Ok(values)
}

/// Decrypts a single-element chunk such as an aggregate sum.
pub fn decrypt_scalar<C: SlotDecrypter>(ctx: &C, chunk: &CipherChunk<C::Ciphertext>) -> Result<f64> {
    if chunk.size() != 1 {
        return Err(PipelineError::DimensionMismatch {
            expected: 1,
            found: chunk.size(),
        });
    }
    chunk.check_context(ctx.context_id())?;
    let values = ctx.decrypt_slots(chunk.ciphertext(), 1)?;
    Ok(values[0])
}

/// Opens the encrypted sum and divides it by the clear count.
pub fn decrypt_average<C: SlotDecrypter>(
    ctx: &C,
    aggregate: &AggregateResult<C::Ciphertext>,
) -> Result<f64> {
    if aggregate.count == 0 {
        return Err(PipelineError::EmptySequence);
    }
    Ok(decrypt_scalar(ctx, &aggregate.sum)? / aggregate.count as f64)
}
