//! SSH Flow Labeler - Main Entry Point
//!
//! Labels the train and test SSH flow captures for model training:
//! simulated lab attacks first, then flows correlated with the AI analyst's
//! detection events.

mod config;
mod constants;
mod error;
mod logic;

use anyhow::Context;

pub use error::{LabelError, LabelResult};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Labeling failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);
    log::info!("Data directory: {:?}", config.data_dir);

    let reports = logic::pipeline::Pipeline::new(config)
        .run()
        .context("labeling simulated and detected attacks")?;

    for report in &reports {
        log::info!(
            "{}: {} flows, {} simulated, {} promoted by detections, {} attack total",
            report.split,
            report.final_stats.total,
            report.simulated.positive,
            report.detected.promoted,
            report.final_stats.positive
        );
    }
    log::info!("Labeling completed.");
    Ok(())
}
