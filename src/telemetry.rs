use rand::{rngs::StdRng, Rng, SeedableRng};

/// Simulated fleet readings, one entry per sample in each series.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryBatch {
    /// km/h
    pub speed: Vec<f64>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
}

impl TelemetryBatch {
    pub fn len(&self) -> usize {
        self.speed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speed.is_empty()
    }
}

/// Draws `n` uniform samples per series from a generator seeded with `seed`.
pub fn generate_vehicular_data(n: usize, seed: u64) -> TelemetryBatch {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut draw = |low: f64, high: f64| -> Vec<f64> {
        (0..n).map(|_| rng.random_range(low..high)).collect()
    };
    let speed = draw(30.0, 100.0);
    let latitude = draw(35.0, 40.0);
    let longitude = draw(-120.0, -115.0);
    TelemetryBatch {
        speed,
        latitude,
        longitude,
    }
}
