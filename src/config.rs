use std::fs;
use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};
use serde::Deserialize;
use crate::drivers::{CaptureSettings, SimulationProfile};
use crate::serial_link::SerialSettings;
use crate::types::{ConnectionMode, OutputSettings};
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub sample_interval_ms: u64,
    pub heart_rate_bpm: f64,
    pub noise: f64,
    pub seed: Option<u64>,
}
impl Default for SimulationSettings {
    fn default() -> Self {
        let profile = SimulationProfile::default();
        Self {
            sample_interval_ms: profile.sample_interval.as_millis() as u64,
            heart_rate_bpm: profile.heart_rate_bpm,
            noise: profile.noise,
            seed: profile.seed,
        }
    }
}
impl SimulationSettings {
    pub fn profile(&self) -> SimulationProfile {
        SimulationProfile {
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            heart_rate_bpm: self.heart_rate_bpm,
            noise: self.noise,
            seed: self.seed,
            ..SimulationProfile::default()
        }
    }
}
/// Everything a capture run needs. Every field has a default, so an empty
/// JSON object (or no file at all) reproduces the fixed COM3 / 150-sample run.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub source: ConnectionMode,
    pub serial: SerialSettings,
    pub simulation: SimulationSettings,
    pub capture: CaptureSettings,
    pub output: OutputSettings,
}
impl CaptureConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    #[test]
    fn empty_object_gives_defaults() {
        let config = CaptureConfig::from_json("{}").unwrap();
        assert_eq!(config.source, ConnectionMode::Hardware);
        assert_eq!(config.serial.port, "COM3");
        assert_eq!(config.capture.target_samples, 150);
        assert_eq!(config.capture.window, 50);
        assert_eq!(config.capture.initial_ion_level, 4.0);
        assert!(config.output.show_window);
        assert!(config.output.png.is_none());
    }
    #[test]
    fn missing_file_path_means_defaults() {
        let config = CaptureConfig::load(None).unwrap();
        assert_eq!(config.serial.baud_rate, 115_200);
    }
    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = CaptureConfig::from_json(
            r#"{
                "source": { "mode": "replay", "path": "session.txt" },
                "serial": { "port": "/dev/ttyACM0" },
                "capture": { "target_samples": 300 },
                "output": { "png": "capture.png", "show_window": false }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.source,
            ConnectionMode::Replay {
                path: PathBuf::from("session.txt"),
                sample_interval_ms: 20,
            }
        );
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.capture.target_samples, 300);
        assert_eq!(config.capture.sigma_factor, 2.0);
        assert_eq!(config.output.png, Some(PathBuf::from("capture.png")));
        assert!(!config.output.show_window);
    }
    #[test]
    fn simulation_settings_map_onto_profile() {
        let config = CaptureConfig::from_json(
            r#"{ "source": { "mode": "simulation" }, "simulation": { "sample_interval_ms": 0, "seed": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.source, ConnectionMode::Simulation);
        let profile = config.simulation.profile();
        assert!(profile.sample_interval.is_zero());
        assert_eq!(profile.seed, Some(3));
        assert_eq!(profile.heart_rate_bpm, 72.0);
    }
    #[test]
    fn unknown_mode_is_an_error() {
        assert!(CaptureConfig::from_json(r#"{ "source": { "mode": "bluetooth" } }"#).is_err());
    }
    #[test]
    fn unreadable_file_names_the_path() {
        let err = CaptureConfig::load(Some(Path::new("/nonexistent/kion.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/kion.json"));
    }
}
