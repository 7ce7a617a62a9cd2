use std::sync::Arc;

use crate::error::EmptyTableError;

use super::aggregate::{
    Extremes, MarketShare, MarketValueBounds, market_value_extremes, market_value_shares,
    top_by_rank,
};
use super::compare::company_names;
use super::filter::{FilterCriteria, apply_filters, top_by_profit};
use super::model::{CompanyTable, CompanyView};

/// Everything one render pass shows, computed from the table and the
/// current criteria.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<CompanyTable>,
    criteria: FilterCriteria,
    /// Over the full table, not the filtered view.
    extremes: Result<Extremes, EmptyTableError>,
    filtered: Vec<usize>,
    by_rank: Vec<usize>,
    by_profit: Vec<usize>,
    shares: Result<Vec<MarketShare>, EmptyTableError>,
    company_names: Vec<String>,
}

impl Dashboard {
    pub fn build(table: Arc<CompanyTable>, criteria: &FilterCriteria) -> Self {
        let full = table.view();
        let extremes = market_value_extremes(&full);
        let filtered = apply_filters(&full, criteria);
        let by_rank = top_by_rank(&filtered, criteria.top_n).into_rows();
        let by_profit = top_by_profit(&filtered, criteria.top_n).into_rows();
        let shares = market_value_shares(&filtered, criteria.top_n);
        let company_names = company_names(&filtered);

        log::debug!(
            "Render pass: {} of {} companies match {:?}",
            filtered.len(),
            table.len(),
            criteria
        );

        let filtered = filtered.into_rows();
        Dashboard {
            table,
            criteria: criteria.clone(),
            extremes,
            filtered,
            by_rank,
            by_profit,
            shares,
            company_names,
        }
    }

    pub fn table(&self) -> &CompanyTable {
        &self.table
    }

    pub fn shared_table(&self) -> Arc<CompanyTable> {
        Arc::clone(&self.table)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn extremes(&self) -> Result<Extremes, EmptyTableError> {
        self.extremes
    }

    /// Slider bounds, or `None` for an empty table.
    pub fn bounds(&self) -> Option<MarketValueBounds> {
        self.extremes.ok().map(MarketValueBounds::from_extremes)
    }

    /// Records passing every filter, in table order.
    pub fn filtered(&self) -> CompanyView<'_> {
        self.table.view_of(self.filtered.clone())
    }

    /// Filtered records by global rank, cut to top N.
    pub fn by_rank(&self) -> CompanyView<'_> {
        self.table.view_of(self.by_rank.clone())
    }

    /// Filtered records by profit, cut to top N.
    pub fn by_profit(&self) -> CompanyView<'_> {
        self.table.view_of(self.by_profit.clone())
    }

    pub fn shares(&self) -> Result<&[MarketShare], EmptyTableError> {
        self.shares.as_deref().map_err(|e| *e)
    }

    /// Names selectable on the comparison page.
    pub fn company_names(&self) -> &[String] {
        &self.company_names
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::MarketValueRange;
    use crate::data::model::tests::company;

    fn table() -> Arc<CompanyTable> {
        Arc::new(CompanyTable::from_records(vec![
            company(1, "Alpha", "USA", "North America", 30.0, 600.0),
            company(2, "Beta", "China", "Asia", 50.0, 200.0),
            company(3, "Gamma", "USA", "North America", 10.0, 150.0),
            company(4, "Delta", "Japan", "Asia", 70.0, 20.0),
        ]))
    }

    #[test]
    fn test_build_fills_every_section() {
        let criteria = FilterCriteria {
            continent: None,
            countries: BTreeSet::new(),
            market_value_range: MarketValueRange::new(100.0, 700.0),
            top_n: 2,
        };
        let dash = Dashboard::build(table(), &criteria);

        assert_eq!(dash.extremes(), Ok(Extremes { max: 600.0, min: 20.0 }));
        assert_eq!(dash.bounds(), Some(MarketValueBounds { min: 20, max: 600 }));
        assert_eq!(dash.filtered().len(), 3);
        let ranks: Vec<_> = dash.by_rank().iter().map(|c| c.global_rank).collect();
        assert_eq!(ranks, vec![1, 2]);
        let profits: Vec<_> = dash.by_profit().iter().map(|c| c.profits).collect();
        assert_eq!(profits, vec![50.0, 30.0]);
        assert_eq!(dash.shares().map(|s| s.len()), Ok(2));
        assert_eq!(dash.company_names(), ["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_empty_selection_signals_no_data() {
        let criteria = FilterCriteria {
            continent: Some("Europe".into()),
            ..FilterCriteria::default()
        };
        let dash = Dashboard::build(table(), &criteria);

        assert!(dash.filtered().is_empty());
        assert!(dash.by_profit().is_empty());
        assert_eq!(dash.shares(), Err(EmptyTableError));
        assert!(dash.extremes().is_ok());
    }
}
