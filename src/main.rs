//! Chaos Dashboard - Main Entry Point

use chaosdash_rs::{
    api::{DemoSource, FetchBridge, JsonFileSource},
    app::DashboardApp,
    config::AppConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,chaosdash_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Chaos Dashboard");

    let config = AppConfig::load_or_default();

    // Kick off the initial event fetch before the first frame
    let bridge = match &config.events_file {
        Some(path) => {
            tracing::info!("Loading events from {:?}", path);
            FetchBridge::spawn(JsonFileSource::new(path))
        }
        None => {
            tracing::info!("No events file configured, using demo data");
            FetchBridge::spawn(DemoSource)
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 480.0])
            .with_title("Chaos Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Chaos Dashboard",
        native_options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, bridge, config)))),
    )
}
