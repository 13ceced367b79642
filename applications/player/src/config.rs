//! Player configuration
use crate::error::{PlayerError, Result};
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// File standing in for the browser's local storage
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Song list as returned by the backend; built-in demo songs when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Interval between time updates of the simulated output
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Media time advanced per tick, relative to the tick interval
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Duration assumed for tracks without one
    #[serde(default = "default_track_secs")]
    pub default_track_secs: u64,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides `cadence.toml`; an explicit path must exist.
    /// Environment variables prefixed with `CADENCE_` override both, with
    /// `__` between section and key (`CADENCE_PLAYBACK__HISTORY_SIZE=20`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("playback.sleep_timer_presets")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.playback.validate()?;

        for (name, value) in [
            ("playback.media_base_url", &self.playback.media_base_url),
            (
                "playback.placeholder_cover_url",
                &self.playback.placeholder_cover_url,
            ),
        ] {
            url::Url::parse(value)
                .map_err(|e| PlayerError::Config(format!("{} {:?}: {}", name, value, e)))?;
        }

        if self.simulation.tick_ms == 0 {
            return Err(PlayerError::Config(
                "simulation.tick_ms must be at least 1".to_string(),
            ));
        }

        if !(self.simulation.speed.is_finite() && self.simulation.speed > 0.0) {
            return Err(PlayerError::Config(format!(
                "simulation.speed must be positive, got {}",
                self.simulation.speed
            )));
        }

        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| PlayerError::Config(e.to_string()))
    }
}

impl SimulationSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Media time covered by one tick
    pub fn media_step(&self) -> Duration {
        self.tick().mul_f64(self.speed)
    }

    pub fn default_track_duration(&self) -> Duration {
        Duration::from_secs(self.default_track_secs)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            speed: default_speed(),
            default_track_secs: default_track_secs(),
        }
    }
}

// Default values
fn default_state_path() -> PathBuf {
    PathBuf::from("./data/local-storage.json")
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_speed() -> f64 {
    1.0
}

fn default_track_secs() -> u64 {
    180
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[playback]
history_size = 5
repeat = "all"

[simulation]
tick_ms = 250
"#
        )
        .unwrap();

        let config = PlayerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.playback.history_size, 5);
        assert_eq!(config.playback.repeat, cadence_playback::RepeatMode::All);
        assert_eq!(config.playback.history_key, "recentlyPlayed");
        assert_eq!(config.simulation.tick(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_explicit_file_fails() {
        let result = PlayerConfig::load(Some(Path::new("/nonexistent/cadence.toml")));
        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn rejects_bad_urls() {
        let mut config = PlayerConfig::default();
        config.playback.media_base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(PlayerError::Config(_))));
    }

    #[test]
    fn rejects_zero_tick() {
        let mut config = PlayerConfig::default();
        config.simulation.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_dump_keeps_presets() {
        let config = PlayerConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("sleep_timer_presets = [15, 30, 60]"));
    }
}
