mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use std::path::Path;

use anyhow::{anyhow, Result};
use app::DashboardApp;
use config::{DashboardConfig, CONFIG_FILE};
use data::loader::DataLoader;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let [width, height] = config.window_size;

    // A missing or malformed extract aborts before any window opens.
    let loader = DataLoader::new(config);
    loader.load()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard Sakila",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(DashboardApp::new(AppState::new(loader))))
        }),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
