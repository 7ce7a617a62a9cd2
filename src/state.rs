use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::cache::DatasetCache;
use crate::data::compare::{Comparison, compare};
use crate::data::dashboard::Dashboard;
use crate::data::filter::FilterCriteria;
use crate::data::model::{CompanyTable, CompanyView, Metric};
use crate::data::search::search_by_name;
use crate::error::InvalidSelectionError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Explorer,
    Compare,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// File the dataset is (or will be) loaded from.
    pub dataset_path: PathBuf,

    /// Last render pass. `None` until a dataset is loaded.
    pub dashboard: Option<Dashboard>,

    /// Current selections; the dashboard is rebuilt when they change.
    pub criteria: FilterCriteria,

    pub page: Page,

    /// Company search box contents.
    pub search_query: String,
    searched_query: String,
    search_rows: Vec<usize>,

    /// Comparison page selections.
    pub compare_a: Option<String>,
    pub compare_b: Option<String>,

    /// Map marker colour per continent.
    pub continent_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            dataset_path: config.dataset_path,
            dashboard: None,
            criteria: config.initial_criteria,
            page: Page::Explorer,
            search_query: String::new(),
            searched_query: String::new(),
            search_rows: Vec::new(),
            compare_a: None,
            compare_b: None,
            continent_colors: None,
            status_message: None,
        }
    }

    /// Load through the process-wide cache.
    pub fn load(&mut self, path: &Path) {
        self.load_with(DatasetCache::global(), path);
    }

    pub fn load_with(&mut self, cache: &DatasetCache, path: &Path) {
        self.dataset_path = path.to_path_buf();
        match cache.get_or_load(path) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                let e = anyhow::Error::from(e);
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a loaded table: clamp the range, build colours and the first pass.
    pub fn set_table(&mut self, table: Arc<CompanyTable>) {
        self.continent_colors = Some(ColorMap::new(table.continents()));
        self.criteria.retain_valid_countries(&table);

        let dashboard = Dashboard::build(Arc::clone(&table), &self.criteria);
        if let Some(bounds) = dashboard.bounds() {
            self.criteria.market_value_range = self.criteria.market_value_range.clamped_to(bounds);
        }
        self.dashboard = Some(dashboard);
        self.searched_query.clear();
        self.search_rows.clear();
        self.status_message = None;
        self.refresh();
    }

    pub fn table(&self) -> Option<&CompanyTable> {
        self.dashboard.as_ref().map(Dashboard::table)
    }

    /// Rebuild the dashboard if the criteria changed since the last pass.
    pub fn refresh(&mut self) {
        let Some(dash) = &self.dashboard else {
            return;
        };
        if dash.criteria() != &self.criteria {
            let table = dash.shared_table();
            self.dashboard = Some(Dashboard::build(table, &self.criteria));
        }
        self.sync_compare_selection();
        self.run_search();
    }

    /// Change the continent and drop countries outside it.
    pub fn set_continent(&mut self, continent: Option<String>) {
        self.criteria.continent = continent;
        if let Some(dash) = &self.dashboard {
            self.criteria.retain_valid_countries(dash.table());
        }
        self.refresh();
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.criteria.countries.remove(country) {
            self.criteria.countries.insert(country.to_string());
        }
        self.refresh();
    }

    pub fn clear_countries(&mut self) {
        self.criteria.countries.clear();
        self.refresh();
    }

    // -- Search --

    fn run_search(&mut self) {
        if self.searched_query == self.search_query {
            return;
        }
        self.searched_query = self.search_query.clone();
        self.search_rows = match self.table() {
            Some(table) => search_by_name(table, &self.search_query).into_rows(),
            None => Vec::new(),
        };
    }

    /// Search hits over the full table, `None` while the box is blank.
    pub fn search_results(&self) -> Option<CompanyView<'_>> {
        if self.search_query.trim().is_empty() {
            return None;
        }
        self.table().map(|t| t.view_of(self.search_rows.clone()))
    }

    // -- Comparison --

    /// Keep both selections inside the current filtered view.
    fn sync_compare_selection(&mut self) {
        let Some(dash) = &self.dashboard else {
            return;
        };
        let names = dash.company_names();
        let valid = |sel: &Option<String>| sel.as_ref().is_some_and(|n| names.contains(n));

        if !valid(&self.compare_a) {
            self.compare_a = names.first().cloned();
        }
        if !valid(&self.compare_b) {
            self.compare_b = names
                .iter()
                .find(|n| Some(*n) != self.compare_a.as_ref())
                .cloned();
        }
    }

    pub fn same_selection(&self) -> bool {
        self.compare_a.is_some() && self.compare_a == self.compare_b
    }

    /// Comparison of the two selected companies. `None` when a selection is
    /// missing or both name the same company, since the UI shows a prompt
    /// instead.
    pub fn comparison(&self) -> Option<Result<Comparison, InvalidSelectionError>> {
        let dash = self.dashboard.as_ref()?;
        let (a, b) = (self.compare_a.as_deref()?, self.compare_b.as_deref()?);
        if a == b {
            return None;
        }
        let result = compare(&dash.filtered(), a, b, &Metric::ALL);
        if let Err(e) = &result {
            log::warn!("Comparison rejected: {e}");
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::MarketValueRange;
    use crate::data::model::tests::company;

    fn state() -> AppState {
        let mut state = AppState::new(AppConfig {
            dataset_path: PathBuf::from("unused.csv"),
            initial_criteria: FilterCriteria {
                market_value_range: MarketValueRange::new(0.0, 10_000.0),
                ..FilterCriteria::default()
            },
        });
        state.set_table(Arc::new(CompanyTable::from_records(vec![
            company(1, "Alpha", "USA", "North America", 30.0, 600.0),
            company(2, "Beta", "China", "Asia", 50.0, 200.0),
            company(3, "Gamma", "Canada", "North America", 10.0, 150.0),
        ])));
        state
    }

    #[test]
    fn test_range_is_clamped_to_observed_bounds() {
        let state = state();
        let range = state.criteria.market_value_range;
        assert_eq!((range.low(), range.high()), (150.0, 600.0));
    }

    #[test]
    fn test_continent_change_drops_foreign_countries() {
        let mut state = state();
        state.toggle_country("China");
        state.toggle_country("USA");
        state.set_continent(Some("North America".into()));

        assert_eq!(state.criteria.countries.len(), 1);
        let dash = state.dashboard.as_ref().unwrap();
        let names: Vec<_> = dash.filtered().iter().map(|c| c.company.clone()).collect();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[test]
    fn test_compare_selection_follows_filtered_view() {
        let mut state = state();
        assert_eq!(state.compare_a.as_deref(), Some("Alpha"));
        assert_eq!(state.compare_b.as_deref(), Some("Beta"));
        assert!(matches!(state.comparison(), Some(Ok(_))));

        state.set_continent(Some("North America".into()));
        assert_eq!(state.compare_a.as_deref(), Some("Alpha"));
        assert_eq!(state.compare_b.as_deref(), Some("Gamma"));
    }

    #[test]
    fn test_identical_selection_is_suppressed() {
        let mut state = state();
        state.compare_b = state.compare_a.clone();
        assert!(state.same_selection());
        assert!(state.comparison().is_none());
    }

    #[test]
    fn test_search_uses_full_table() {
        let mut state = state();
        state.set_continent(Some("Asia".into()));
        state.search_query = "a".into();
        state.refresh();

        let hits = state.search_results().unwrap();
        assert_eq!(hits.len(), 3);

        state.search_query = "zzz".into();
        state.refresh();
        assert!(state.search_results().unwrap().is_empty());
    }
}
