use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i64 = 1990;
const LAST_YEAR: i64 = 2022;

/// One generated observation.
struct Row {
    year: i64,
    sex: &'static str,
    value: f64,
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

/// Linear drift per sex plus noise; the combined category is the sum.
fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for year in FIRST_YEAR..=LAST_YEAR {
        let t = (year - FIRST_YEAR) as f64;
        let males = (120.0 + 2.5 * t + rng.gauss(0.0, 6.0)).max(0.0).round();
        let females = (140.0 - 1.2 * t + rng.gauss(0.0, 6.0)).max(0.0).round();
        rows.push(Row { year, sex: "Males", value: males });
        rows.push(Row { year, sex: "Females", value: females });
        rows.push(Row { year, sex: "Males and females", value: males + females });
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Time", "Sex", "Value"])?;
    for row in rows {
        writer.write_record([row.year.to_string(), row.sex.to_string(), row.value.to_string()])?;
    }
    // Rows the loader is expected to skip.
    writer.write_record(["2023", "Males", ".."])?;
    writer.write_record(["n.d.", "Females", "12"])?;
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Time", DataType::Int64, false),
        Field::new("Sex", DataType::Utf8, false),
        Field::new("Value", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sex))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.value))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "sample_data.csv")?;
    write_parquet(&rows, "sample_data.parquet")?;

    println!(
        "Wrote {} rows ({FIRST_YEAR}–{LAST_YEAR}) to sample_data.csv and sample_data.parquet",
        rows.len()
    );
    Ok(())
}
