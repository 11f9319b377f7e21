use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated launch, serialized with the canonical column names.
#[derive(Debug, Serialize)]
struct Launch {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    site: &'static str,
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: &'static str,
}

/// Booster eras: (category, flights, candidate sites, payload kg range, success rate).
const ERAS: [(&str, usize, &[&str], (f64, f64), f64); 5] = [
    ("v1.0", 5, &["CCAFS LC-40"], (0.0, 700.0), 0.2),
    ("v1.1", 15, &["CCAFS LC-40", "VAFB SLC-4E"], (500.0, 4500.0), 0.35),
    ("FT", 20, &["CCAFS LC-40", "KSC LC-39A", "VAFB SLC-4E"], (2000.0, 9600.0), 0.7),
    ("B4", 10, &["KSC LC-39A", "CCAFS SLC-40", "VAFB SLC-4E"], (2500.0, 7000.0), 0.6),
    ("B5", 6, &["KSC LC-39A", "CCAFS SLC-40"], (3000.0, 6000.0), 0.9),
];

fn generate(rng: &mut SimpleRng) -> Vec<Launch> {
    let mut launches = Vec::new();
    let mut flight_number: i64 = 0;
    for (category, flights, sites, (lo, hi), success_rate) in ERAS {
        for serial in 0..flights {
            flight_number += 1;
            let payload = (rng.uniform(lo, hi) / 10.0).round() * 10.0;
            launches.push(Launch {
                flight_number,
                site: *rng.pick(sites),
                class: i64::from(rng.next_f64() < success_rate),
                payload_mass_kg: payload,
                booster_version: format!("F9 {category} B{:04}", 1000 + serial * 3),
                booster_version_category: category,
            });
        }
    }
    launches
}

fn write_csv(path: &str, launches: &[Launch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for launch in launches {
        writer.serialize(launch).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, launches: &[Launch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.site))),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(launches.iter().map(|l| l.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_version_category),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let launches = generate(&mut rng);

    write_csv("spacex_launch_dash.csv", &launches)?;
    write_parquet("spacex_launch_dash.parquet", &launches)?;

    println!(
        "Wrote {} launches to spacex_launch_dash.csv and spacex_launch_dash.parquet",
        launches.len()
    );
    Ok(())
}
