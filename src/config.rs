use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::data::filter::{DEFAULT_RANGE, DEFAULT_TOP_N, FilterCriteria, MarketValueRange};

/// Dataset read when no path is given.
pub const DEFAULT_DATASET: &str = "Top2000_Companies_Globally_Fixed.csv";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "top2000-explorer")]
#[command(about = "Explore the Top 2000 global companies with tables, charts and a map", long_about = None)]
pub struct Cli {
    /// Dataset file (.csv, .tsv, .json or .parquet)
    #[arg(short, long, env = "TOP2000_DATA", default_value = DEFAULT_DATASET)]
    pub data: PathBuf,

    /// Number of companies in the top-N tables and charts (5-50)
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N as u32,
          value_parser = clap::value_parser!(u32).range(5..=50))]
    pub top_n: u32,

    /// Lower end of the market value window, in $B
    #[arg(long, default_value_t = DEFAULT_RANGE.0)]
    pub min_value: f64,

    /// Upper end of the market value window, in $B
    #[arg(long, default_value_t = DEFAULT_RANGE.1)]
    pub max_value: f64,
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub initial_criteria: FilterCriteria,
}

impl Cli {
    pub fn into_config(self) -> Result<AppConfig> {
        if !self.min_value.is_finite() || !self.max_value.is_finite() {
            bail!("market value bounds must be finite numbers");
        }
        if self.min_value > self.max_value {
            bail!(
                "--min-value ({}) is greater than --max-value ({})",
                self.min_value,
                self.max_value
            );
        }
        Ok(AppConfig {
            dataset_path: self.data,
            initial_criteria: FilterCriteria {
                market_value_range: MarketValueRange::new(self.min_value, self.max_value),
                top_n: self.top_n as usize,
                ..FilterCriteria::default()
            },
        })
    }
}
