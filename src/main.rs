use std::path::Path;

use eframe::egui;
use wdi_dashboard::app::DashboardApp;
use wdi_dashboard::config::{CONFIG_FILE, DashboardConfig};

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        log::warn!("Ignoring config: {e:#}");
        DashboardConfig::default()
    });
    let app = DashboardApp::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Bank WDI Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
