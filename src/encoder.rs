use rayon::prelude::*;

use crate::{
    chunk::{CipherChunk, CipherChunkSequence},
    error::{PipelineError, Result},
    scheme::SlotEncrypter,
};

/// Splits plaintext vectors into fixed-size slices and encrypts each one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkedEncoder {
    chunk_size: usize,
}

impl ChunkedEncoder {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(PipelineError::Encoding(
                "chunk size must be positive".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Encrypts `values` as contiguous chunks; the last one may be shorter.
    ///
    /// Chunks are encrypted in parallel and returned in slice order. An empty
    /// input yields an empty sequence.
    pub fn encode<C: SlotEncrypter>(
        &self,
        ctx: &C,
        values: &[f64],
    ) -> Result<CipherChunkSequence<C::Ciphertext>> {
        if self.chunk_size > ctx.slot_count() {
            return Err(PipelineError::Encoding(format!(
                "chunk size {} exceeds the {} slots of a ciphertext",
                self.chunk_size,
                ctx.slot_count()
            )));
        }
        let chunks = values
            .par_chunks(self.chunk_size)
            .map(|slice| CipherChunk::encrypt(ctx, slice))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "encrypted {} values into {} chunks of up to {}",
            values.len(),
            chunks.len(),
            self.chunk_size
        );
        Ok(chunks)
    }
}

/// One-shot form of [`ChunkedEncoder::encode`].
pub fn encode<C: SlotEncrypter>(
    ctx: &C,
    values: &[f64],
    chunk_size: usize,
) -> Result<CipherChunkSequence<C::Ciphertext>> {
    ChunkedEncoder::new(chunk_size)?.encode(ctx, values)
}
