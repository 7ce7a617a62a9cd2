use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use top2000_explorer::Company;

const ROWS: u32 = 2000;

/// (country, continent, latitude, longitude)
const COUNTRIES: &[(&str, &str, f64, f64)] = &[
    ("United States", "North America", 38.0, -97.0),
    ("Canada", "North America", 56.0, -106.0),
    ("Mexico", "North America", 23.0, -102.0),
    ("Brazil", "South America", -14.0, -51.0),
    ("Argentina", "South America", -38.0, -63.0),
    ("China", "Asia", 35.0, 105.0),
    ("Japan", "Asia", 36.0, 138.0),
    ("India", "Asia", 21.0, 78.0),
    ("South Korea", "Asia", 36.0, 128.0),
    ("Germany", "Europe", 51.0, 10.0),
    ("United Kingdom", "Europe", 55.0, -3.0),
    ("France", "Europe", 46.0, 2.0),
    ("Switzerland", "Europe", 47.0, 8.0),
    ("South Africa", "Africa", -30.0, 25.0),
    ("Nigeria", "Africa", 9.0, 8.0),
    ("Australia", "Oceania", -25.0, 133.0),
];

const NAME_HEADS: &[&str] = &[
    "Atlas", "Boreal", "Cedar", "Delta", "Ember", "Falcon", "Granite", "Harbor", "Ion",
    "Juniper", "Keystone", "Lumen", "Meridian", "Nova", "Orchid", "Pioneer",
];
const NAME_TAILS: &[&str] = &[
    "Holdings", "Bank", "Energy", "Motors", "Telecom", "Pharma", "Insurance", "Group",
    "Industries", "Retail", "Systems", "Capital",
];

/// Deterministic splitmix64 generator.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(rng: &mut SplitMix) -> Vec<Company> {
    (1..=ROWS)
        .map(|rank| {
            let &(country, continent, lat, lon) = rng.pick(COUNTRIES);
            let name = format!("{} {}", rng.pick(NAME_HEADS), rng.pick(NAME_TAILS));
            let market_value = 1500.0 / (rank as f64).powf(0.6) * rng.range(0.6, 1.4);
            Company {
                global_rank: rank,
                company: name,
                country: country.to_string(),
                continent: continent.to_string(),
                sales: round2(market_value * rng.range(0.2, 2.0)),
                profits: round2(market_value * rng.range(-0.02, 0.12)),
                market_value: round2(market_value),
                latitude: round2(lat + rng.range(-3.0, 3.0)),
                longitude: round2(lon + rng.range(-3.0, 3.0)),
            }
        })
        .collect()
}

fn write_csv(path: &str, companies: &[Company]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for c in companies {
        writer.serialize(c).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, companies: &[Company]) -> Result<()> {
    let floats = |f: fn(&Company) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(companies.iter().map(f).collect::<Vec<_>>()))
    };
    let strings = |f: fn(&Company) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(companies.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Global Rank", DataType::Int64, false),
        Field::new("Company", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new("Continent", DataType::Utf8, false),
        Field::new("Sales ($billion)", DataType::Float64, false),
        Field::new("Profits ($billion)", DataType::Float64, false),
        Field::new("Market Value ($billion)", DataType::Float64, false),
        Field::new("Latitude_final", DataType::Float64, false),
        Field::new("Longitude_final", DataType::Float64, false),
    ]));

    let ranks: ArrayRef = Arc::new(Int64Array::from(
        companies
            .iter()
            .map(|c| c.global_rank as i64)
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            ranks,
            strings(|c| c.company.as_str()),
            strings(|c| c.country.as_str()),
            strings(|c| c.continent.as_str()),
            floats(|c| c.sales),
            floats(|c| c.profits),
            floats(|c| c.market_value),
            floats(|c| c.latitude),
            floats(|c| c.longitude),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SplitMix(42);
    let companies = generate(&mut rng);

    write_csv("sample_companies.csv", &companies)?;
    write_parquet("sample_companies.parquet", &companies)?;

    println!(
        "Wrote {} companies to sample_companies.csv and sample_companies.parquet",
        companies.len()
    );
    Ok(())
}
