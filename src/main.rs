mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::LaunchDashApp;
use clap::Parser;
use config::DashConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashConfig::parse();

    // No dashboard without data: a bad file stops startup.
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading launch records from {}", config.data_path.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    let payload_step = config.payload_step;
    let initial_site = config.initial_site.clone();
    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(LaunchDashApp::new(
                dataset,
                payload_step,
                initial_site.as_deref(),
            )))
        }),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}
