// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod gui;
mod playback;
mod signal;
use std::path::Path;
use anyhow::Context;
use eframe::egui;
use log::{info, warn};
use config::{TimeWindow, ViewMode, ViewerConfig, CONFIG_FILE};
use playback::{AnimationClock, Player};
use signal::{PlotStyle, WaveformTable};
fn static_app(config: &ViewerConfig, table: &WaveformTable) -> anyhow::Result<gui::StaticViewerApp> {
    let rows = table.rows_for_span(config.start_time, config.duration, config.sample_rate);
    info!(
        "static window {:.1}s + {:.1}s covers rows {}..{}",
        config.start_time, config.duration, rows.start, rows.end
    );
    let slice = table.slice(rows.clone());
    if slice.is_empty() {
        warn!("static window lies outside the recording ({} rows)", table.len());
    } else if let Some(path) = &config.export_png {
        signal::export_png(&slice, &PlotStyle::default(), path)
            .with_context(|| format!("failed to export {}", path.display()))?;
        info!("wrote static window to {}", path.display());
    }
    Ok(gui::StaticViewerApp::new(table, rows))
}
fn player_app(config: &ViewerConfig, table: WaveformTable, title: String) -> gui::PlayerApp {
    let clock = AnimationClock::new(config.tick_interval(), table.len());
    let window = TimeWindow::new(config.window_size.seconds);
    info!(
        "interactive window {:.1}s at {:.2}s/tick every {:?}",
        window.seconds,
        config.play_speed,
        clock.interval()
    );
    gui::PlayerApp::new(title, Player::new(table, window, config.play_speed), clock)
}
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = ViewerConfig::load_or_default(Path::new(CONFIG_FILE))
        .with_context(|| format!("failed to read {CONFIG_FILE}"))?;
    let table = signal::load_table(&config.file_path, &config.loader)
        .with_context(|| format!("failed to load {}", config.file_path.display()))?;
    if table.is_empty() {
        warn!("{} contains no samples", config.file_path.display());
    }
    let title = config.file_path.display().to_string();
    let app: Box<dyn eframe::App> = match config.mode {
        ViewMode::Static => Box::new(static_app(&config, &table)?),
        ViewMode::Interactive => Box::new(player_app(&config, table, title.clone())),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title(title),
        ..Default::default()
    };
    eframe::run_native("pulseview", options, Box::new(move |_cc| app))
        .map_err(|e| anyhow::anyhow!("viewer window failed: {e}"))
}
