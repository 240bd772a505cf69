use thiserror::Error;

/// Errors raised by the encrypted telemetry pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid scheme parameters: {0}")]
    Parameter(String),

    #[error("invalid encoding: {0}")]
    Encoding(String),

    #[error("dimension mismatch: expected {expected} elements, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("ciphertext was produced under a different context")]
    ContextMismatch,

    #[error("slot magnitude {magnitude} would wrap past the plaintext range ±{limit}")]
    RangeExceeded { magnitude: f64, limit: f64 },

    #[error("cannot aggregate an empty chunk sequence")]
    EmptySequence,

    #[error("homomorphic scheme failure: {0}")]
    Scheme(#[from] fhe::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
