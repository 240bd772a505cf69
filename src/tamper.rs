//! Integrity attack on ciphertexts in transit.
//!
//! The attacker holds only what a [`SlotEvaluator`] exposes: the public key
//! and the evaluation keys. Perturbations are encrypted and added to the
//! victim's chunks without ever seeing a plaintext.

use rayon::prelude::*;

use crate::{
    chunk::{CipherChunk, CipherChunkSequence},
    error::{PipelineError, Result},
    scheme::SlotEvaluator,
};

/// Adds `offset` to every element of every chunk.
///
/// The offset ciphertext is built per chunk with that chunk's element count,
/// so a short trailing chunk gets a short offset. Fails with
/// `RangeExceeded` if a shifted slot could wrap modulo the plaintext modulus.
pub fn tamper<C: SlotEvaluator>(
    ctx: &C,
    chunks: &[CipherChunk<C::Ciphertext>],
    offset: f64,
) -> Result<CipherChunkSequence<C::Ciphertext>> {
    let perturbations = chunks
        .par_iter()
        .map(|chunk| CipherChunk::encrypt(ctx, &vec![offset; chunk.size()]))
        .collect::<Result<Vec<_>>>()?;
    log::debug!("tampering {} chunks with offset {offset}", chunks.len());
    inject(ctx, chunks, &perturbations)
}

/// Adds `perturbations[i]` to `chunks[i]` for every chunk.
pub fn inject<C: SlotEvaluator>(
    ctx: &C,
    chunks: &[CipherChunk<C::Ciphertext>],
    perturbations: &[CipherChunk<C::Ciphertext>],
) -> Result<CipherChunkSequence<C::Ciphertext>> {
    if chunks.len() != perturbations.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: chunks.len(),
            found: perturbations.len(),
        });
    }
    chunks
        .par_iter()
        .zip(perturbations)
        .map(|(chunk, perturbation)| chunk.homomorphic_add(ctx, perturbation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encoder::encode,
        reducer::decrypt_all,
        scheme::TransparentContext,
    };

    #[test]
    fn shifts_every_element() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let chunks = encode(&ctx, &[40.0, 60.0, 80.0, 100.0], 10).unwrap();
        let tampered = tamper(&ctx, &chunks, 5.0).unwrap();
        assert_eq!(
            decrypt_all(&ctx, &tampered).unwrap(),
            vec![45.0, 65.0, 85.0, 105.0]
        );
    }

    #[test]
    fn keeps_shape_with_short_tail() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let values: Vec<f64> = (0..23).map(f64::from).collect();
        let chunks = encode(&ctx, &values, 10).unwrap();
        let tampered = tamper(&ctx, &chunks, -2.5).unwrap();
        let sizes: Vec<usize> = tampered.iter().map(|c| c.size()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        let expected: Vec<f64> = values.iter().map(|v| v - 2.5).collect();
        assert_eq!(decrypt_all(&ctx, &tampered).unwrap(), expected);
    }

    #[test]
    fn padding_slots_stay_zero() {
        let ctx = TransparentContext::new(8, 1024.0).unwrap();
        let chunks = encode(&ctx, &[1.0, 2.0], 4).unwrap();
        let tampered = tamper(&ctx, &chunks, 5.0).unwrap();
        assert_eq!(
            tampered[0].ciphertext().slots(),
            &[6.0, 7.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn inject_rejects_mismatched_perturbation() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let chunks = encode(&ctx, &[1.0, 2.0, 3.0], 10).unwrap();
        let wrong = vec![CipherChunk::encrypt(&ctx, &[5.0, 5.0]).unwrap()];
        assert!(matches!(
            inject(&ctx, &chunks, &wrong),
            Err(PipelineError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn inject_rejects_missing_perturbations() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        let chunks = encode(&ctx, &[1.0, 2.0, 3.0], 1).unwrap();
        assert!(matches!(
            inject(&ctx, &chunks, &chunks[..2]),
            Err(PipelineError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn empty_sequence_stays_empty() {
        let ctx = TransparentContext::new(16, 1024.0).unwrap();
        assert!(tamper(&ctx, &[], 5.0).unwrap().is_empty());
    }

    #[test]
    fn repeated_tampering_stops_before_wrapping() {
        // slots hold [-500, 500]; fresh values are capped at 125
        let ctx = TransparentContext::with_plaintext_modulus(4, 1.0, 1001).unwrap();
        let mut chunks = encode(&ctx, &[100.0, -100.0], 4).unwrap();
        for _ in 0..3 {
            chunks = tamper(&ctx, &chunks, 125.0).unwrap();
        }
        assert_eq!(decrypt_all(&ctx, &chunks).unwrap(), vec![475.0, 275.0]);
        assert!(matches!(
            tamper(&ctx, &chunks, 125.0),
            Err(PipelineError::RangeExceeded { .. })
        ));
    }
}
