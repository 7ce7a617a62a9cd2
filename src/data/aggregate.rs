use crate::error::EmptyTableError;

use super::model::CompanyView;

/// Largest and smallest market value in a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes {
    pub max: f64,
    pub min: f64,
}

/// Integer slider bounds covering every observed market value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketValueBounds {
    pub min: i64,
    pub max: i64,
}

impl MarketValueBounds {
    /// `[floor(min), ceil(max)]`.
    pub fn from_extremes(extremes: Extremes) -> Self {
        Self {
            min: extremes.min.floor() as i64,
            max: extremes.max.ceil() as i64,
        }
    }
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketShare {
    pub row: usize,
    pub company: String,
    pub market_value: f64,
    /// Share of the slice total in `[0, 1]`. Non-positive values get 0.
    pub fraction: f64,
}

/// Maximum and minimum market value. Fails on an empty table instead of
/// producing NaN.
pub fn market_value_extremes(view: &CompanyView<'_>) -> Result<Extremes, EmptyTableError> {
    let mut values = view.iter().map(|c| c.market_value);
    let first = values.next().ok_or(EmptyTableError)?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Ok(Extremes { max, min })
}

/// First `n` records by global rank, best rank first.
pub fn top_by_rank<'a>(view: &CompanyView<'a>, n: usize) -> CompanyView<'a> {
    view.sorted_by(|a, b| a.global_rank.cmp(&b.global_rank), n)
}

/// Pie chart input: the `n` highest market values with their share of the
/// total of those `n`.
pub fn market_value_shares(
    view: &CompanyView<'_>,
    n: usize,
) -> Result<Vec<MarketShare>, EmptyTableError> {
    if view.is_empty() {
        return Err(EmptyTableError);
    }
    let largest = view.sorted_by(|a, b| b.market_value.total_cmp(&a.market_value), n);
    let total: f64 = largest.iter().map(|c| c.market_value.max(0.0)).sum();

    Ok(largest
        .iter_rows()
        .map(|(row, c)| MarketShare {
            row,
            company: c.company.clone(),
            market_value: c.market_value,
            fraction: if total > 0.0 {
                c.market_value.max(0.0) / total
            } else {
                0.0
            },
        })
        .collect())
}
