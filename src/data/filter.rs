use std::collections::BTreeSet;

use super::aggregate::MarketValueBounds;
use super::model::{ALL_CONTINENTS, CompanyTable, CompanyView};

/// Initial market-value window, in billions.
pub const DEFAULT_RANGE: (f64, f64) = (100.0, 500.0);
/// Initial number of companies shown in the top-N tables and charts.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Market value range
// ---------------------------------------------------------------------------

/// Inclusive `[low, high]` market value window. Always `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketValueRange {
    low: f64,
    high: f64,
}

impl MarketValueRange {
    /// Build a range from two bounds in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Pull both ends into the observed bounds of the table.
    pub fn clamped_to(self, bounds: MarketValueBounds) -> Self {
        let (min, max) = (bounds.min as f64, bounds.max as f64);
        Self::new(self.low.clamp(min, max), self.high.clamp(min, max))
    }
}

impl Default for MarketValueRange {
    fn default() -> Self {
        Self::new(DEFAULT_RANGE.0, DEFAULT_RANGE.1)
    }
}

// ---------------------------------------------------------------------------
// Filter criteria: the active selections for one render pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// `None` or [`ALL_CONTINENTS`] means every continent.
    pub continent: Option<String>,
    /// Empty means no country restriction.
    pub countries: BTreeSet<String>,
    pub market_value_range: MarketValueRange,
    pub top_n: usize,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            continent: None,
            countries: BTreeSet::new(),
            market_value_range: MarketValueRange::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl FilterCriteria {
    /// The continent to filter on, with the "All" sentinel folded into `None`.
    pub fn continent_filter(&self) -> Option<&str> {
        self.continent
            .as_deref()
            .filter(|c| *c != ALL_CONTINENTS)
    }

    /// Drop selected countries no longer offered for the current continent.
    pub fn retain_valid_countries(&mut self, table: &CompanyTable) {
        let offered: BTreeSet<&str> = table
            .countries_in(self.continent_filter())
            .into_iter()
            .collect();
        self.countries.retain(|c| offered.contains(c.as_str()));
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Records passing the continent, country and market value filters.
///
/// Filters combine with AND and the input order is kept. An empty result is
/// a valid view, not an error.
pub fn apply_filters<'a>(view: &CompanyView<'a>, criteria: &FilterCriteria) -> CompanyView<'a> {
    let continent = criteria.continent_filter();
    let countries = &criteria.countries;
    let range = criteria.market_value_range;

    view.retain(|rec| {
        if let Some(c) = continent {
            if rec.continent != c {
                return false;
            }
        }
        if !countries.is_empty() && !countries.contains(&rec.country) {
            return false;
        }
        range.contains(rec.market_value)
    })
}

/// The `n` most profitable records, highest first. Ties keep input order.
pub fn top_by_profit<'a>(view: &CompanyView<'a>, n: usize) -> CompanyView<'a> {
    view.sorted_by(|a, b| b.profits.total_cmp(&a.profits), n)
}

/// Continent selector choices: "All" followed by the distinct continents.
pub fn continent_options(table: &CompanyTable) -> Vec<String> {
    std::iter::once(ALL_CONTINENTS)
        .chain(table.continents())
        .map(str::to_string)
        .collect()
}

/// Country selector choices for the given continent choice.
pub fn country_options(table: &CompanyTable, continent: Option<&str>) -> Vec<String> {
    let continent = continent.filter(|c| *c != ALL_CONTINENTS);
    table
        .countries_in(continent)
        .into_iter()
        .map(str::to_string)
        .collect()
}
