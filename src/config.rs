use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::info;
use serde::{Deserialize, Serialize};
use crate::signal::ViewerError;
/// Settings file looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "pulseview.json";
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One fixed window drawn once.
    Static,
    /// Sliding window with pause, speed and stepping controls.
    Interactive,
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeWindow {
    pub seconds: f64,
}
impl TimeWindow {
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds: seconds.max(0.1),
        }
    }
}
impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow { seconds: 10.0 }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Variable holding the ECG lead inside a `.mat` container.
    pub mat_variable: String,
    /// Assumed rate of `.mat` recordings; the container's own metadata is not consulted.
    pub mat_sample_rate: f64,
}
impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mat_variable: "val".to_owned(),
            mat_sample_rate: 300.0,
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub file_path: PathBuf,
    pub mode: ViewMode,
    /// Static window start, in seconds.
    pub start_time: f64,
    /// Static window length, in seconds.
    pub duration: f64,
    /// Rate used to turn static window seconds into row indices.
    pub sample_rate: f64,
    /// Interactive window width.
    pub window_size: TimeWindow,
    /// Seconds of signal time advanced per animation tick.
    pub play_speed: f64,
    pub tick_interval_ms: u64,
    pub loader: LoaderConfig,
    /// Also write the static window to this PNG file.
    pub export_png: Option<PathBuf>,
}
impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("data/mimic_perform_af_006_data.csv"),
            mode: ViewMode::Static,
            start_time: 0.0,
            duration: 1200.0,
            sample_rate: 125.0,
            window_size: TimeWindow::default(),
            play_speed: 0.2,
            tick_interval_ms: 50,
            loader: LoaderConfig::default(),
            export_png: None,
        }
    }
}
impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self, ViewerError> {
        Ok(serde_json::from_str(text)?)
    }
    pub fn from_file(path: &Path) -> Result<Self, ViewerError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
    /// Reads `path` if it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ViewerError> {
        if path.exists() {
            info!("reading settings from {}", path.display());
            Self::from_file(path)
        } else {
            info!("{} not found, using built-in settings", path.display());
            Ok(Self::default())
        }
    }
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
