use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

use super::{NO_DATA, charts, map, panels, table};

// ---------------------------------------------------------------------------
// Load failure
// ---------------------------------------------------------------------------

/// Shown instead of the dashboard while no dataset is loaded.
pub fn load_error(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading("The companies dataset could not be loaded");
        ui.label(format!("Tried: {}", state.dataset_path.display()));
        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
        ui.add_space(8.0);
        if ui.button("Open another file…").clicked() {
            panels::open_file_dialog(state);
        }
    });
}

// ---------------------------------------------------------------------------
// Explorer page
// ---------------------------------------------------------------------------

pub fn explorer_page(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Top 2000 Global Companies Explorer");
            ui.label(
                "Global ranking of the top 2000 largest companies in the world based on \
                 revenue, profits, assets, and market value, as of 2020.",
            );
            ui.separator();

            if let Some(dash) = &state.dashboard {
                let top_n = state.criteria.top_n;

                match dash.extremes() {
                    Ok(e) => ui.label(format!(
                        "Max Market Value: ${}B | Min Market Value: ${}B",
                        e.max, e.min
                    )),
                    Err(e) => ui.label(e.to_string()),
                };

                ui.add_space(8.0);
                ui.heading("High Market Value Companies");
                table::company_table(ui, "ranked", &dash.by_rank(), &table::RANKED_FIELDS);

                ui.add_space(8.0);
                ui.heading(format!("Top {top_n} Most Profitable Companies"));
                charts::profit_bar_chart(ui, &dash.by_profit());

                ui.add_space(8.0);
                ui.heading(format!("Market Value Distribution (Top {top_n})"));
                charts::market_share_pie(ui, dash.shares());

                ui.add_space(8.0);
                ui.heading("High Market Value Companies Map");
                map::company_map(
                    ui,
                    &dash.filtered(),
                    state.criteria.continent_filter(),
                    state.continent_colors.as_ref(),
                );
            }

            ui.add_space(8.0);
            ui.separator();
            search_section(ui, state);
        });
}

fn search_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Search for a Company by Name");
    if ui.text_edit_singleline(&mut state.search_query).changed() {
        state.refresh();
    }

    match state.search_results() {
        None => {}
        Some(hits) if hits.is_empty() => {
            ui.label(RichText::new("Company not found.").color(Color32::YELLOW));
        }
        Some(hits) => {
            ui.label(format!("{} matching companies", hits.len()));
            table::company_table(ui, "search", &hits, &table::ALL_FIELDS);
        }
    }
}

// ---------------------------------------------------------------------------
// Compare page
// ---------------------------------------------------------------------------

pub fn compare_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Compare Two Companies");
    ui.label("Sales, profits and market value of two companies from the high market value selection.");
    ui.separator();

    let Some(dash) = &state.dashboard else {
        return;
    };
    let names = dash.company_names().to_vec();
    if names.is_empty() {
        ui.label(NO_DATA);
        return;
    }
    if names.len() < 2 {
        ui.label("At least two companies must match the current filters to compare.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        company_selector(ui, "compare_a", &names, &mut state.compare_a);
        ui.label("vs");
        company_selector(ui, "compare_b", &names, &mut state.compare_b);
    });
    ui.add_space(8.0);

    if state.same_selection() {
        ui.label(RichText::new("Please select two different companies.").color(Color32::YELLOW));
        return;
    }

    match state.comparison() {
        Some(Ok(cmp)) => charts::comparison_chart(ui, &cmp),
        Some(Err(e)) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
        None => {}
    }
}

fn company_selector(ui: &mut Ui, id: &str, names: &[String], selected: &mut Option<String>) {
    let text = selected.clone().unwrap_or_else(|| "Select a company".to_string());
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .width(220.0)
        .show_ui(ui, |ui: &mut Ui| {
            for name in names {
                let is_selected = selected.as_deref() == Some(name.as_str());
                if ui.selectable_label(is_selected, name.as_str()).clicked() {
                    *selected = Some(name.clone());
                }
            }
        });
}
