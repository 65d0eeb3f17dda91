use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use surface_correlation::config::{Config, DATASET_NAMES, TRUNCATED_DATASET};

/// Gaussian settlement trough: deepest on the tunnel centre line.
fn trough(offset: f64, max_settlement: f64, width: f64) -> f64 {
    -max_settlement * (-offset.powi(2) / (2.0 * width.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Write one survey table: a row per monitoring epoch, a column per offset
/// from the tunnel centre line (metres), settlement in millimetres.
fn write_dataset(path: &Path, rows: usize, columns: usize, rng: &mut SimpleRng) -> Result<()> {
    let offsets: Vec<f64> = (0..columns)
        .map(|c| c as f64 * 2.5 - (columns as f64 - 1.0) * 1.25)
        .collect();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(offsets.iter().map(|o| format!("{o}")))?;

    let width = rng.gauss(12.0, 1.5).abs().max(4.0);
    for epoch in 0..rows {
        // Settlement grows as the face passes, then levels off.
        let progress = 1.0 - (-(epoch as f64) / 6.0).exp();
        let depth = 15.0 * progress + rng.gauss(0.0, 0.5);
        let record: Vec<String> = offsets
            .iter()
            .map(|&o| format!("{:.3}", trough(o, depth, width) + rng.gauss(0.0, 0.4)))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for name in DATASET_NAMES {
        // The windowed dataset is deliberately larger than the window.
        let (rows, columns) = if name == TRUNCATED_DATASET {
            (26, 40)
        } else {
            (20, 12)
        };
        let path = dir.join(format!("{name}.csv"));
        write_dataset(&path, rows, columns, &mut rng)?;
        log::info!("Wrote {rows} x {columns} table to {}", path.display());
    }

    let config_path = dir.join("config.json");
    let config = Config::for_directory(&dir)?;
    let file = std::fs::File::create(&config_path)
        .with_context(|| format!("creating {}", config_path.display()))?;
    serde_json::to_writer_pretty(file, &config)?;

    println!(
        "Wrote {} datasets to {}; run `surface-correlation {}`",
        DATASET_NAMES.len(),
        dir.display(),
        config_path.display()
    );
    Ok(())
}
