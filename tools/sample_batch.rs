//! Sample Batch Generator
//!
//! Writes a random CSV table with the 106 feature columns the dashboard
//! expects, for exercising batch upload.
//!
//! Usage: sample-batch [OUTPUT|-] [COUNT] [FRAUD_RATE] [SEED]

use anyhow::{Context, Result};
use fraud_scoring_dashboard::types::feature_vector::feature_names;
use fraud_scoring_dashboard::FEATURE_COUNT;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use tracing::info;

/// Row generator mimicking the engineered feature layout
struct RowGenerator {
    rng: StdRng,
}

impl RowGenerator {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// A row resembling routine daytime activity
    fn generate_legitimate(&mut self) -> Vec<f64> {
        let mut row = self.base_row();
        row[0] = self.rng.gen_range(10.0..500.0); // amount
        row[1] = self.rng.gen_range(8..22) as f64; // hour
        row[2] = 1.0; // region match
        row[3] = if self.rng.gen_bool(0.1) { 1.0 } else { 0.0 };
        row[4] = 1.0; // known merchant
        row
    }

    /// A row with the traits usually flagged: large, late, unfamiliar
    fn generate_suspicious(&mut self) -> Vec<f64> {
        let mut row = self.base_row();
        row[0] = self.rng.gen_range(1000.0..10000.0);
        row[1] = self.rng.gen_range(0..6) as f64;
        row[2] = 0.0;
        row[3] = 1.0;
        row[4] = 0.0;
        row
    }

    fn base_row(&mut self) -> Vec<f64> {
        let mut row = vec![0.0; FEATURE_COUNT];
        row[5] = self.flag(0.2); // contract type
        row[6] = self.flag(0.5); // gender
        row[7] = self.flag(0.4); // own car
        row[8] = self.flag(0.7); // own realty
        row[9] = self.rng.gen_range(0..4) as f64; // children
        row[10] = self.rng.gen_range(20_000.0..200_000.0); // income
        row[11] = self.rng.gen_range(5_000.0..1_000_000.0); // credit amount
        row[12] = self.rng.gen_range(1_000.0..50_000.0); // annuity
        for value in row.iter_mut().skip(13) {
            *value = self.rng.gen_range(-1.0..1.0);
        }
        row
    }

    fn flag(&mut self, p: f64) -> f64 {
        if self.rng.gen_bool(p) {
            1.0
        } else {
            0.0
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_batch=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let output = args.get(1).map(|s| s.as_str()).unwrap_or("-");
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.1_f64)
        .clamp(0.0, 1.0);
    let seed: Option<u64> = args.get(4).and_then(|s| s.parse().ok());

    info!(
        output = %output,
        count = count,
        fraud_rate = fraud_rate,
        seed = ?seed,
        "Generating sample batch"
    );

    let sink: Box<dyn Write> = if output == "-" {
        Box::new(std::io::stdout().lock())
    } else {
        Box::new(
            std::fs::File::create(output)
                .with_context(|| format!("Failed to create {}", output))?,
        )
    };

    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(feature_names())?;

    let mut generator = RowGenerator::new(seed);
    let mut suspicious_count = 0;

    for _ in 0..count {
        let row = if generator.rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };
        writer.write_record(row.iter().map(|v| format!("{:.4}", v)))?;
    }
    writer.flush()?;

    info!(
        "Completed! Wrote {} rows ({} legitimate, {} suspicious)",
        count,
        count - suspicious_count,
        suspicious_count
    );

    Ok(())
}
