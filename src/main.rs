use std::{error::Error, time::Duration};

use clap::Parser;
use vehicular_he::{
    evaluate::time_operation,
    pipeline::{run_scenario, ScenarioConfig},
    telemetry::generate_vehicular_data,
    util::timing::DisplayDuration,
    ContextParameters, CryptoContext,
};

#[derive(Parser)]
#[command(
    name = "vehicular_he",
    about = "Encrypted aggregation of vehicular telemetry under a ciphertext tampering attack"
)]
struct Cli {
    /// Samples per telemetry series
    #[arg(long, default_value = "100")]
    samples: usize,

    /// Seed for the simulated fleet data
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Values packed into each ciphertext
    #[arg(long, default_value = "10")]
    chunk_size: usize,

    /// Offset the attacker adds to every encrypted speed sample
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    offset: f64,

    /// Polynomial modulus degree
    #[arg(long, default_value = "8192")]
    degree: usize,

    /// Coefficient modulus bit sizes, comma separated
    #[arg(long, value_delimiter = ',', default_value = "60,60,60,60")]
    moduli_sizes: Vec<usize>,

    /// Global scale as a power of two
    #[arg(long, default_value = "21")]
    scale_bits: i32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let parameters = ContextParameters {
        poly_modulus_degree: cli.degree,
        coeff_mod_bit_sizes: cli.moduli_sizes,
        global_scale: 2f64.powi(cli.scale_bits),
        ..ContextParameters::default()
    };
    let (context, setup_seconds) = time_operation(|| CryptoContext::from_parameters(parameters));
    let context = context?;
    println!(
        "⏱  Context and key generation: {}",
        DisplayDuration(Duration::from_secs_f64(setup_seconds))
    );

    let batch = generate_vehicular_data(cli.samples, cli.seed);
    let config = ScenarioConfig {
        chunk_size: cli.chunk_size,
        tamper_offset: cli.offset,
    };
    let report = run_scenario(&context, &batch, &config)?;

    println!(
        "⏱  Unencrypted average: {}",
        DisplayDuration(Duration::from_secs_f64(report.plaintext_seconds))
    );
    println!(
        "⏱  Encrypted average: {}",
        DisplayDuration(Duration::from_secs_f64(report.encrypted_seconds))
    );
    println!("Average Latitude: {:.4}", report.average_latitude);
    println!("Average Longitude: {:.4}", report.average_longitude);
    println!("Original Average Speed: {:.2} km/h", report.original_average);
    println!("Tampered Average Speed: {:.2} km/h", report.tampered_average);
    if report.percent_error.is_nan() {
        println!("Percentage Error Due to Tampering: undefined (original average is zero)");
    } else {
        println!(
            "Percentage Error Due to Tampering: {:.2}%",
            report.percent_error
        );
    }
    Ok(())
}
