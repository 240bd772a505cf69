use crate::{
    aggregate::secure_average,
    encoder::ChunkedEncoder,
    error::Result,
    evaluate::{percent_error, plaintext_mean, time_operation},
    reducer::decrypt_all,
    scheme::{SlotDecrypter, SlotEvaluator},
    tamper::tamper,
    telemetry::TelemetryBatch,
    util::timing::timeit,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenarioConfig {
    pub chunk_size: usize,
    /// Added by the attacker to every encrypted speed sample.
    pub tamper_offset: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            tamper_offset: 5.0,
        }
    }
}

/// Plain outputs of one run, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioReport {
    pub original_speed: Vec<f64>,
    pub tampered_speed: Vec<f64>,
    pub original_average: f64,
    pub tampered_average: f64,
    /// `NaN` when the original average is zero.
    pub percent_error: f64,
    pub average_latitude: f64,
    pub average_longitude: f64,
    pub plaintext_seconds: f64,
    pub encrypted_seconds: f64,
}

/// Encrypts the batch, tampers with the speed series and compares the
/// secure averages of the clean and tampered data.
pub fn run_scenario<C>(
    ctx: &C,
    batch: &TelemetryBatch,
    config: &ScenarioConfig,
) -> Result<ScenarioReport>
where
    C: SlotEvaluator + SlotDecrypter,
{
    let encoder = ChunkedEncoder::new(config.chunk_size)?;

    let encrypted_speed = timeit!("Encrypt speed", encoder.encode(ctx, &batch.speed)?);
    let encrypted_latitude = timeit!("Encrypt latitude", encoder.encode(ctx, &batch.latitude)?);
    let encrypted_longitude =
        timeit!("Encrypt longitude", encoder.encode(ctx, &batch.longitude)?);

    let tampered_speed = timeit!(
        "Tamper speed",
        tamper(ctx, &encrypted_speed, config.tamper_offset)?
    );

    let original_series = timeit!("Decrypt speed", decrypt_all(ctx, &encrypted_speed)?);
    let tampered_series = timeit!("Decrypt tampered speed", decrypt_all(ctx, &tampered_speed)?);

    let (_, plaintext_seconds) = time_operation(|| plaintext_mean(&batch.speed));
    let (original_average, encrypted_seconds) =
        time_operation(|| secure_average(ctx, &encrypted_speed));
    let original_average = original_average?;
    let tampered_average = secure_average(ctx, &tampered_speed)?;
    let average_latitude = timeit!("Average latitude", secure_average(ctx, &encrypted_latitude)?);
    let average_longitude =
        timeit!("Average longitude", secure_average(ctx, &encrypted_longitude)?);

    Ok(ScenarioReport {
        original_speed: original_series,
        tampered_speed: tampered_series,
        original_average,
        tampered_average,
        percent_error: percent_error(original_average, tampered_average),
        average_latitude,
        average_longitude,
        plaintext_seconds,
        encrypted_seconds,
    })
}
