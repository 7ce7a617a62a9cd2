use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

/// Sentinel continent choice meaning "no continent restriction".
pub const ALL_CONTINENTS: &str = "All";

// ---------------------------------------------------------------------------
// Company – one row of the source table
// ---------------------------------------------------------------------------

/// A single company record. Monetary values are in billions.
///
/// Serialises with the dataset's own column names so the sample generator
/// writes files the loader accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
    #[serde(rename = "Global Rank")]
    pub global_rank: u32,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Country")]
    pub country: String,
    /// Empty when the source has no continent for this row.
    #[serde(rename = "Continent")]
    pub continent: String,
    #[serde(rename = "Sales ($billion)")]
    pub sales: f64,
    #[serde(rename = "Profits ($billion)")]
    pub profits: f64,
    #[serde(rename = "Market Value ($billion)")]
    pub market_value: f64,
    #[serde(rename = "Latitude_final")]
    pub latitude: f64,
    #[serde(rename = "Longitude_final")]
    pub longitude: f64,
}

impl Company {
    /// Value of one financial metric.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sales => self.sales,
            Metric::Profits => self.profits,
            Metric::MarketValue => self.market_value,
        }
    }
}

// ---------------------------------------------------------------------------
// Metric – the financial columns a comparison can show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Sales,
    Profits,
    MarketValue,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Sales, Metric::Profits, Metric::MarketValue];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Sales => "Sales",
            Metric::Profits => "Profits",
            Metric::MarketValue => "Market Value",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CompanyTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset with pre-computed continent/country indices.
///
/// Immutable once built; every filter produces a [`CompanyView`] over it.
#[derive(Debug, Clone)]
pub struct CompanyTable {
    records: Vec<Company>,
    /// Sorted distinct non-empty continents.
    continents: BTreeSet<String>,
    /// continent → sorted distinct non-empty countries.
    countries_by_continent: BTreeMap<String, BTreeSet<String>>,
    /// Sorted distinct non-empty countries over the whole table.
    countries: BTreeSet<String>,
}

impl CompanyTable {
    /// Build lookup indices from the loaded records.
    pub fn from_records(records: Vec<Company>) -> Self {
        let mut continents = BTreeSet::new();
        let mut countries_by_continent: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut countries = BTreeSet::new();

        for rec in &records {
            if !rec.continent.is_empty() {
                continents.insert(rec.continent.clone());
            }
            if rec.country.is_empty() {
                continue;
            }
            countries.insert(rec.country.clone());
            if !rec.continent.is_empty() {
                countries_by_continent
                    .entry(rec.continent.clone())
                    .or_default()
                    .insert(rec.country.clone());
            }
        }

        CompanyTable {
            records,
            continents,
            countries_by_continent,
            countries,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Company] {
        &self.records
    }

    pub fn get(&self, row: usize) -> Option<&Company> {
        self.records.get(row)
    }

    /// A view containing every record in table order.
    pub fn view(&self) -> CompanyView<'_> {
        CompanyView {
            table: self,
            rows: (0..self.records.len()).collect(),
        }
    }

    /// A view over the given rows. Rows past the end of the table are dropped.
    pub fn view_of(&self, rows: Vec<usize>) -> CompanyView<'_> {
        let mut rows = rows;
        rows.retain(|&r| r < self.records.len());
        CompanyView { table: self, rows }
    }

    pub fn continents(&self) -> impl Iterator<Item = &str> {
        self.continents.iter().map(String::as_str)
    }

    /// Countries of one continent, or of the whole table for `None`.
    pub fn countries_in(&self, continent: Option<&str>) -> Vec<&str> {
        match continent {
            None => self.countries.iter().map(String::as_str).collect(),
            Some(c) => self
                .countries_by_continent
                .get(c)
                .map(|set| set.iter().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// CompanyView – an ordered subset of a table
// ---------------------------------------------------------------------------

/// Row indices into a [`CompanyTable`]. A record's identity is its row index.
#[derive(Debug, Clone)]
pub struct CompanyView<'a> {
    table: &'a CompanyTable,
    rows: Vec<usize>,
}

impl<'a> CompanyView<'a> {
    pub fn table(&self) -> &'a CompanyTable {
        self.table
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<usize> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in view order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Company> + '_ {
        let table = self.table;
        self.rows.iter().map(move |&r| &table.records[r])
    }

    /// Records paired with their row index.
    pub fn iter_rows(&self) -> impl Iterator<Item = (usize, &'a Company)> + '_ {
        let table = self.table;
        self.rows.iter().map(move |&r| (r, &table.records[r]))
    }

    /// New view keeping the records that satisfy `keep`, in view order.
    pub fn retain(&self, mut keep: impl FnMut(&Company) -> bool) -> CompanyView<'a> {
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&r| keep(&self.table.records[r]))
            .collect();
        CompanyView {
            table: self.table,
            rows,
        }
    }

    /// New view with the rows reordered by `compare` (stable) and cut to `n`.
    pub fn sorted_by(
        &self,
        mut compare: impl FnMut(&Company, &Company) -> std::cmp::Ordering,
        n: usize,
    ) -> CompanyView<'a> {
        let mut rows = self.rows.clone();
        let records = &self.table.records;
        rows.sort_by(|&a, &b| compare(&records[a], &records[b]));
        rows.truncate(n);
        CompanyView {
            table: self.table,
            rows,
        }
    }
}

impl PartialEq for CompanyView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.table, other.table) && self.rows == other.rows
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn company(
        rank: u32,
        name: &str,
        country: &str,
        continent: &str,
        profits: f64,
        market_value: f64,
    ) -> Company {
        Company {
            global_rank: rank,
            company: name.to_string(),
            country: country.to_string(),
            continent: continent.to_string(),
            sales: profits * 4.0,
            profits,
            market_value,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_indices_skip_empty_values() {
        let table = CompanyTable::from_records(vec![
            company(1, "A", "USA", "North America", 1.0, 10.0),
            company(2, "B", "China", "Asia", 1.0, 10.0),
            company(3, "C", "", "Asia", 1.0, 10.0),
            company(4, "D", "Japan", "", 1.0, 10.0),
        ]);

        assert_eq!(
            table.continents().collect::<Vec<_>>(),
            vec!["Asia", "North America"]
        );
        assert_eq!(table.countries_in(Some("Asia")), vec!["China"]);
        assert_eq!(table.countries_in(None), vec!["China", "Japan", "USA"]);
        assert!(table.countries_in(Some("Europe")).is_empty());
    }

    #[test]
    fn test_view_of_drops_out_of_range_rows() {
        let table = CompanyTable::from_records(vec![company(1, "A", "USA", "", 1.0, 1.0)]);
        let view = table.view_of(vec![0, 5]);
        assert_eq!(view.rows(), &[0]);
    }

    #[test]
    fn test_sorted_by_is_stable() {
        let table = CompanyTable::from_records(vec![
            company(1, "A", "USA", "", 5.0, 1.0),
            company(2, "B", "USA", "", 7.0, 1.0),
            company(3, "C", "USA", "", 5.0, 1.0),
        ]);
        let view = table
            .view()
            .sorted_by(|a, b| b.profits.total_cmp(&a.profits), 10);
        let names: Vec<_> = view.iter().map(|c| c.company.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
