use super::model::{CompanyTable, CompanyView};

/// Companies whose name contains `query`, ignoring case.
///
/// Always searches the whole table, not the filtered view. The query is
/// literal text, so characters like `(` or `*` need no escaping, and
/// surrounding spaces are part of the match. A blank query returns an empty
/// view.
pub fn search_by_name<'a>(table: &'a CompanyTable, query: &str) -> CompanyView<'a> {
    if query.trim().is_empty() {
        return table.view_of(Vec::new());
    }
    let needle = query.to_lowercase();
    table
        .view()
        .retain(|c| c.company.to_lowercase().contains(&needle))
}
