use std::sync::Arc;

use fhe::bfv::{
    BfvParameters, BfvParametersBuilder, Ciphertext, Encoding, EvaluationKey,
    EvaluationKeyBuilder, Plaintext, PublicKey, SecretKey,
};
use fhe_traits::{FheDecoder, FheDecrypter, FheEncoder, FheEncrypter};

use super::{ContextId, FixedPointCodec, SlotDecrypter, SlotEncrypter, SlotEvaluator};
use crate::error::{PipelineError, Result};

/// 2^54 - 2^24 + 1, prime and congruent to 1 mod 2^24.
pub const DEFAULT_PLAINTEXT_MODULUS: u64 = 0x3fffffff000001;

/// Largest ring degree accepted for a context.
pub const MAX_POLY_MODULUS_DEGREE: usize = 1 << 17;

/// Scheme parameters fixed at context construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextParameters {
    /// Ring degree; also the number of slots per ciphertext.
    pub poly_modulus_degree: usize,
    /// Bit size of each ciphertext modulus in the chain.
    pub coeff_mod_bit_sizes: Vec<usize>,
    /// Fixed-point factor applied to every encoded real.
    pub global_scale: f64,
    pub plaintext_modulus: u64,
}

impl Default for ContextParameters {
    fn default() -> Self {
        Self {
            poly_modulus_degree: 8192,
            coeff_mod_bit_sizes: vec![60, 60, 60, 60],
            global_scale: 2f64.powi(21),
            plaintext_modulus: DEFAULT_PLAINTEXT_MODULUS,
        }
    }
}

impl ContextParameters {
    pub fn validate(&self) -> Result<()> {
        let degree = self.poly_modulus_degree;
        if degree < 8 || degree > MAX_POLY_MODULUS_DEGREE || !degree.is_power_of_two() {
            return Err(PipelineError::Parameter(format!(
                "polynomial modulus degree must be a power of two in \
                 8..={MAX_POLY_MODULUS_DEGREE}, got {degree}"
            )));
        }
        let t = self.plaintext_modulus;
        if t < 2 || (t - 1) % (2 * degree as u64) != 0 {
            return Err(PipelineError::Parameter(format!(
                "plaintext modulus {t} does not support {degree} slots"
            )));
        }
        if self.coeff_mod_bit_sizes.is_empty() {
            return Err(PipelineError::Parameter(
                "coefficient modulus chain is empty".to_string(),
            ));
        }
        // A prime q with q = 1 mod 2N needs more bits than 2N itself, and
        // decryption scales by q/t, so every limb must be wider than t.
        let t_bits = (u64::BITS - t.leading_zeros()) as usize;
        let min_bits = ((2 * degree).ilog2() as usize + 1).max(t_bits + 1).max(10);
        for &bits in &self.coeff_mod_bit_sizes {
            if !(min_bits..=62).contains(&bits) {
                return Err(PipelineError::Parameter(format!(
                    "modulus of {bits} bits is incompatible with degree {degree} and a \
                     {t_bits}-bit plaintext modulus (expected {min_bits}..=62 bits)"
                )));
            }
        }
        if !self.global_scale.is_finite() || self.global_scale <= 0.0 {
            return Err(PipelineError::Parameter(format!(
                "global scale must be positive and finite, got {}",
                self.global_scale
            )));
        }
        Ok(())
    }
}

/// The evaluation-only half of a context: public key and rotation keys.
///
/// Anything holding a `PublicContext` can encrypt and combine ciphertexts
/// but can never read them.
pub struct PublicContext {
    id: ContextId,
    parameters: Arc<BfvParameters>,
    public_key: PublicKey,
    evaluation_key: EvaluationKey,
    codec: FixedPointCodec,
}

impl SlotEncrypter for PublicContext {
    type Ciphertext = Ciphertext;

    fn context_id(&self) -> ContextId {
        self.id
    }

    fn slot_count(&self) -> usize {
        self.parameters.degree()
    }

    fn codec(&self) -> &FixedPointCodec {
        &self.codec
    }

    fn encrypt_slots(&self, values: &[f64]) -> Result<Ciphertext> {
        if values.len() > self.slot_count() {
            return Err(PipelineError::Encoding(format!(
                "{} values exceed the {} available slots",
                values.len(),
                self.slot_count()
            )));
        }
        let encoded = self.codec.encode(values)?;
        let plaintext = Plaintext::try_encode(encoded.as_slice(), Encoding::simd(), &self.parameters)?;
        Ok(self.public_key.try_encrypt(&plaintext, &mut rand::rng())?)
    }
}

impl SlotEvaluator for PublicContext {
    fn add_ciphertexts(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        Ok(lhs + rhs)
    }

    fn sum_slots(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        Ok(self.evaluation_key.computes_inner_sum(ct)?)
    }
}

/// Full key material: encryption, evaluation and decryption.
pub struct CryptoContext {
    settings: ContextParameters,
    secret_key: SecretKey,
    public: Arc<PublicContext>,
}

impl CryptoContext {
    /// Builds a context with the default plaintext modulus.
    pub fn create(
        poly_modulus_degree: usize,
        coeff_mod_bit_sizes: &[usize],
        global_scale: f64,
    ) -> Result<Self> {
        Self::from_parameters(ContextParameters {
            poly_modulus_degree,
            coeff_mod_bit_sizes: coeff_mod_bit_sizes.to_vec(),
            global_scale,
            ..ContextParameters::default()
        })
    }

    /// Generates the secret, public and inner-sum rotation keys for `settings`.
    pub fn from_parameters(settings: ContextParameters) -> Result<Self> {
        settings.validate()?;
        let codec = FixedPointCodec::for_modulus(
            settings.global_scale,
            settings.plaintext_modulus,
            settings.poly_modulus_degree,
        )?;

        let parameters = Arc::new(
            BfvParametersBuilder::new()
                .set_degree(settings.poly_modulus_degree)
                .set_plaintext_modulus(settings.plaintext_modulus)
                .set_moduli_sizes(&settings.coeff_mod_bit_sizes)
                .build()
                .map_err(|e| PipelineError::Parameter(e.to_string()))?,
        );
        let mut rng = rand::rng();

        let secret_key = SecretKey::random(&parameters, &mut rng);
        let public_key = PublicKey::new(&secret_key, &mut rng);
        let evaluation_key = EvaluationKeyBuilder::new(&secret_key)?
            .enable_inner_sum()?
            .build(&mut rng)?;
        if !evaluation_key.supports_inner_sum() {
            return Err(PipelineError::Parameter(
                "evaluation key cannot compute inner sums".to_string(),
            ));
        }

        log::debug!(
            "context ready: degree {}, moduli {:?}, scale {}",
            settings.poly_modulus_degree,
            settings.coeff_mod_bit_sizes,
            settings.global_scale
        );

        Ok(Self {
            settings,
            secret_key,
            public: Arc::new(PublicContext {
                id: ContextId::fresh(),
                parameters,
                public_key,
                evaluation_key,
                codec,
            }),
        })
    }

    pub fn parameters(&self) -> &ContextParameters {
        &self.settings
    }

    /// Shares the key material that does not allow decryption.
    pub fn public_view(&self) -> Arc<PublicContext> {
        Arc::clone(&self.public)
    }
}

impl SlotEncrypter for CryptoContext {
    type Ciphertext = Ciphertext;

    fn context_id(&self) -> ContextId {
        self.public.context_id()
    }

    fn slot_count(&self) -> usize {
        self.public.slot_count()
    }

    fn codec(&self) -> &FixedPointCodec {
        &self.public.codec
    }

    fn encrypt_slots(&self, values: &[f64]) -> Result<Ciphertext> {
        self.public.encrypt_slots(values)
    }
}

impl SlotEvaluator for CryptoContext {
    fn add_ciphertexts(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        self.public.add_ciphertexts(lhs, rhs)
    }

    fn sum_slots(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        self.public.sum_slots(ct)
    }
}

impl SlotDecrypter for CryptoContext {
    fn decrypt_slots(&self, ct: &Ciphertext, len: usize) -> Result<Vec<f64>> {
        let plaintext = self.secret_key.try_decrypt(ct)?;
        let slots = Vec::<i64>::try_decode(&plaintext, Encoding::simd())?;
        if len > slots.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: slots.len(),
                found: len,
            });
        }
        Ok(self.public.codec.decode(&slots[..len]))
    }
}
