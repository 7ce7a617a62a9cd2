use std::collections::{BTreeMap, HashSet};

use crate::error::InvalidSelectionError;

use super::model::{CompanyView, Metric};

/// Metric values of one company.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyMetrics {
    pub company: String,
    pub values: BTreeMap<Metric, f64>,
}

/// Two companies side by side, in the order they were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub first: CompanyMetrics,
    pub second: CompanyMetrics,
}

impl Comparison {
    /// company name → metric → value.
    pub fn as_map(&self) -> BTreeMap<&str, &BTreeMap<Metric, f64>> {
        [&self.first, &self.second]
            .into_iter()
            .map(|m| (m.company.as_str(), &m.values))
            .collect()
    }
}

/// Compare two companies of `view` across `metrics`.
///
/// Names are matched exactly; the first record with that name in view order
/// is used.
pub fn compare(
    view: &CompanyView<'_>,
    name_a: &str,
    name_b: &str,
    metrics: &[Metric],
) -> Result<Comparison, InvalidSelectionError> {
    if name_a == name_b {
        return Err(InvalidSelectionError::SameCompany(name_a.to_string()));
    }
    Ok(Comparison {
        first: lookup(view, name_a, metrics)?,
        second: lookup(view, name_b, metrics)?,
    })
}

fn lookup(
    view: &CompanyView<'_>,
    name: &str,
    metrics: &[Metric],
) -> Result<CompanyMetrics, InvalidSelectionError> {
    let rec = view
        .iter()
        .find(|c| c.company == name)
        .ok_or_else(|| InvalidSelectionError::CompanyNotFound(name.to_string()))?;
    Ok(CompanyMetrics {
        company: rec.company.clone(),
        values: metrics.iter().map(|&m| (m, rec.metric(m))).collect(),
    })
}

/// Distinct company names in view order.
pub fn company_names(view: &CompanyView<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    view.iter()
        .filter(|c| seen.insert(c.company.as_str()))
        .map(|c| c.company.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::company;
    use crate::data::model::CompanyTable;

    fn table() -> CompanyTable {
        CompanyTable::from_records(vec![
            company(1, "Apple", "USA", "North America", 57.4, 1285.5),
            company(2, "Saudi Aramco", "Saudi Arabia", "Asia", 88.2, 1684.8),
            company(3, "Apple", "USA", "North America", 1.0, 1.0),
        ])
    }

    #[test]
    fn test_compare_two_companies() {
        let table = table();
        let cmp = compare(&table.view(), "Saudi Aramco", "Apple", &Metric::ALL).unwrap();
        assert_eq!(cmp.first.company, "Saudi Aramco");
        assert_eq!(cmp.second.values[&Metric::Profits], 57.4);
        assert_eq!(cmp.second.values[&Metric::MarketValue], 1285.5);
        assert_eq!(cmp.as_map().len(), 2);
    }

    #[test]
    fn test_same_company_is_rejected() {
        let table = table();
        assert_eq!(
            compare(&table.view(), "Apple", "Apple", &Metric::ALL),
            Err(InvalidSelectionError::SameCompany("Apple".into()))
        );
    }

    #[test]
    fn test_company_outside_view_is_rejected() {
        let table = table();
        let asia = table.view().retain(|c| c.continent == "Asia");
        assert_eq!(
            compare(&asia, "Saudi Aramco", "Apple", &[Metric::Sales]),
            Err(InvalidSelectionError::CompanyNotFound("Apple".into()))
        );
    }

    #[test]
    fn test_company_names_are_distinct() {
        let table = table();
        assert_eq!(company_names(&table.view()), vec!["Apple", "Saudi Aramco"]);
    }
}
