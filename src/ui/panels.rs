use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::dashboard::Dashboard;
use crate::data::filter::{MarketValueRange, continent_options, country_options};
use crate::data::model::ALL_CONTINENTS;
use crate::state::{AppState, Page};

/// Top-N slider limits.
pub const TOP_N_RANGE: RangeInclusive<usize> = 5..=50;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(table) = state.table() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Owned copies so state can be mutated inside the widgets.
    let continents = continent_options(table);
    let countries = country_options(table, state.criteria.continent.as_deref());
    let bounds = state.dashboard.as_ref().and_then(Dashboard::bounds);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Continent ----
            ui.strong("Select a Continent");
            let current = state
                .criteria
                .continent
                .clone()
                .unwrap_or_else(|| ALL_CONTINENTS.to_string());
            let mut chosen = None;
            egui::ComboBox::from_id_salt("continent")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for c in &continents {
                        if ui.selectable_label(current == *c, c.as_str()).clicked() {
                            chosen = Some(c.clone());
                        }
                    }
                });
            if let Some(c) = chosen {
                state.set_continent(Some(c).filter(|c| c != ALL_CONTINENTS));
            }
            ui.separator();

            // ---- Countries (collapsible multi-select) ----
            let header_text = format!(
                "Select Country/Countries  ({}/{})",
                state.criteria.countries.len(),
                countries.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("countries")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_countries();
                    }
                    for country in &countries {
                        let mut checked = state.criteria.countries.contains(country);
                        if ui.checkbox(&mut checked, country.as_str()).changed() {
                            state.toggle_country(country);
                        }
                    }
                });
            if state.criteria.countries.is_empty() {
                ui.label(RichText::new("No country restriction").weak());
            }
            ui.separator();

            // ---- Top N ----
            ui.strong("How many top companies to display?");
            ui.add(Slider::new(&mut state.criteria.top_n, TOP_N_RANGE));
            ui.separator();

            // ---- Market value window ----
            ui.strong("Select Market Value Range (in $B)");
            match bounds {
                Some(b) => market_value_sliders(ui, state, b.min..=b.max),
                None => {
                    ui.label("No market values to select from.");
                }
            }
        });

    // Recompute the dashboard after any widget changes.
    state.refresh();
}

/// Two integer sliders that never cross.
fn market_value_sliders(ui: &mut Ui, state: &mut AppState, bounds: RangeInclusive<i64>) {
    let range = state.criteria.market_value_range;
    let (old_low, old_high) = (range.low().round() as i64, range.high().round() as i64);
    let (mut low, mut high) = (old_low, old_high);

    ui.add(Slider::new(&mut low, bounds.clone()).text("min"));
    ui.add(Slider::new(&mut high, bounds).text("max"));

    if low != old_low && low > high {
        high = low;
    }
    if high != old_high && high < low {
        low = high;
    }
    if (low, high) != (old_low, old_high) {
        state.criteria.market_value_range = MarketValueRange::new(low as f64, high as f64);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            // The table is loaded once per process.
            let loaded = state.dashboard.is_some();
            if ui.add_enabled(!loaded, egui::Button::new("Open…")).clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.page, Page::Explorer, "Explorer");
        ui.selectable_value(&mut state.page, Page::Compare, "Compare");

        ui.separator();

        if let Some(dash) = &state.dashboard {
            ui.label(format!(
                "{} companies loaded, {} match the filters",
                dash.table().len(),
                dash.filtered().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open companies dataset")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
