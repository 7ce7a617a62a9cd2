use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Company, CompanyView};

/// A displayable company column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Rank,
    Company,
    Country,
    Continent,
    Sales,
    Profits,
    MarketValue,
}

/// Columns of the "High Market Value Companies" table.
pub const RANKED_FIELDS: [Field; 5] = [
    Field::Rank,
    Field::Company,
    Field::Country,
    Field::MarketValue,
    Field::Profits,
];

/// Every column, used for search results.
pub const ALL_FIELDS: [Field; 7] = [
    Field::Rank,
    Field::Company,
    Field::Country,
    Field::Continent,
    Field::Sales,
    Field::Profits,
    Field::MarketValue,
];

impl Field {
    pub fn header(self) -> &'static str {
        match self {
            Field::Rank => "Global Rank",
            Field::Company => "Company",
            Field::Country => "Country",
            Field::Continent => "Continent",
            Field::Sales => "Sales ($billion)",
            Field::Profits => "Profits ($billion)",
            Field::MarketValue => "Market Value ($billion)",
        }
    }

    pub fn cell(self, c: &Company) -> String {
        match self {
            Field::Rank => c.global_rank.to_string(),
            Field::Company => c.company.clone(),
            Field::Country => c.country.clone(),
            Field::Continent => c.continent.clone(),
            Field::Sales => format!("{:.2}", c.sales),
            Field::Profits => format!("{:.2}", c.profits),
            Field::MarketValue => format!("{:.2}", c.market_value),
        }
    }
}

/// Render `view` as a striped table. Rows keep the view's order.
pub fn company_table(ui: &mut Ui, id: &str, view: &CompanyView<'_>, fields: &[Field]) {
    if view.is_empty() {
        ui.label(super::NO_DATA);
        return;
    }
    let records: Vec<&Company> = view.iter().collect();

    ui.push_id(id, |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(320.0);
        for _ in fields {
            builder = builder.column(Column::auto().at_least(60.0));
        }

        builder
            .header(20.0, |mut header| {
                for field in fields {
                    header.col(|ui| {
                        ui.strong(field.header());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, records.len(), |mut row| {
                    let Some(rec) = records.get(row.index()) else {
                        return;
                    };
                    for field in fields {
                        row.col(|ui| {
                            ui.label(field.cell(rec));
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::company;

    #[test]
    fn test_cells_format_money_with_two_decimals() {
        let c = company(7, "Apple", "USA", "North America", 57.411, 1285.5);
        let cells: Vec<_> = RANKED_FIELDS.iter().map(|f| f.cell(&c)).collect();
        assert_eq!(cells, vec!["7", "Apple", "USA", "1285.50", "57.41"]);
    }
}
