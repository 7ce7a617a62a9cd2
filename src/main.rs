use clap::Parser;
use eframe::egui;

use top2000_explorer::app::ExplorerApp;
use top2000_explorer::config::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Cli::parse().into_config()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Top 2000 Global Companies Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the UI: {e}"))
}
