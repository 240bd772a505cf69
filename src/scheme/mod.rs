//! Capability interface over the homomorphic primitive library.
//!
//! The pipeline never talks to `fhe` directly. It is written against the
//! three traits below, split the same way `fhe-traits` splits encryption
//! from decryption, so that code holding only an encrypter/evaluator has no
//! route to plaintext.

mod bfv;
mod codec;
mod transparent;

pub use bfv::{ContextParameters, CryptoContext, PublicContext, DEFAULT_PLAINTEXT_MODULUS};
pub use codec::FixedPointCodec;
pub use transparent::{TransparentCiphertext, TransparentContext};

use crate::error::Result;

/// Identifies the key material a ciphertext was produced under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    pub(crate) fn fresh() -> Self {
        Self(rand::random())
    }
}

/// Encrypts vectors of reals into slot-packed ciphertexts.
pub trait SlotEncrypter: Send + Sync {
    type Ciphertext: Clone + Send + Sync;

    fn context_id(&self) -> ContextId;

    /// Number of values a single ciphertext can hold.
    fn slot_count(&self) -> usize;

    /// Fixed-point mapping and the wraparound bound of a slot.
    fn codec(&self) -> &FixedPointCodec;

    /// Encrypts `values` into the leading slots; remaining slots hold zero.
    fn encrypt_slots(&self, values: &[f64]) -> Result<Self::Ciphertext>;
}

/// Homomorphic evaluation without access to the decryption key.
pub trait SlotEvaluator: SlotEncrypter {
    fn add_ciphertexts(
        &self,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext>;

    /// Rotate-and-add reduction: every slot of the output holds the sum of
    /// all slots of the input.
    fn sum_slots(&self, ct: &Self::Ciphertext) -> Result<Self::Ciphertext>;
}

/// Decrypts slot-packed ciphertexts back into reals.
pub trait SlotDecrypter: SlotEncrypter {
    /// Decrypts `ct` and returns its first `len` slots.
    fn decrypt_slots(&self, ct: &Self::Ciphertext, len: usize) -> Result<Vec<f64>>;
}
