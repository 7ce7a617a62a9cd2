use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Page};
use crate::ui::{pages, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    /// Build the app and load the configured dataset.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        let path = state.dataset_path.clone();
        state.load(&path);
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        if self.state.dashboard.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                pages::load_error(ui, &mut self.state);
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current page ----
        let page = self.state.page;
        egui::CentralPanel::default().show(ctx, |ui| match page {
            Page::Explorer => pages::explorer_page(ui, &mut self.state),
            Page::Compare => pages::compare_page(ui, &mut self.state),
        });
    }
}
