//! Privacy-preserving aggregation of vehicular telemetry.
//!
//! Speed and GPS series are encrypted in fixed-size chunks under a
//! slot-packed homomorphic scheme, optionally perturbed by an attacker who
//! only holds the public keys, summed without decryption, and finally
//! compared against the plaintext computation for accuracy and cost.

pub mod aggregate;
pub mod chunk;
pub mod encoder;
pub mod error;
pub mod evaluate;
pub mod pipeline;
pub mod reducer;
pub mod scheme;
pub mod tamper;
pub mod telemetry;
pub mod util;

pub use chunk::{AggregateResult, CipherChunk, CipherChunkSequence};
pub use error::{PipelineError, Result};
pub use scheme::{
    ContextParameters, CryptoContext, PublicContext, SlotDecrypter, SlotEncrypter, SlotEvaluator,
    TransparentContext,
};
