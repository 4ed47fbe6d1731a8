use crate::hover::TriggerZone;
use crate::paths;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The path the config file was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Width of the notch when enabled without an explicit width
    pub default_width: f64,
    /// Height of the notch when enabled without an explicit height
    pub default_height: f64,
    /// Bottom corner radius used when a command does not specify one
    pub default_radius: f64,
    /// Blur intensity (0.0 - 1.0) when enabled without an explicit intensity
    pub default_blur_intensity: f64,
    /// Intensities at or below this remove the blur surface entirely
    pub blur_visibility_threshold: f64,
    /// Milliseconds between animation frames
    pub animation_tick_ms: u64,
    /// Milliseconds between pointer position checks
    pub hover_poll_ms: u64,
    /// Height in points of the hover trigger zone below the top of the screen
    pub trigger_zone_height: f64,
    /// Half the width in points of the hover trigger zone around the screen center
    pub trigger_zone_half_width: f64,
}

impl Config {
    pub fn default_config_path() -> Option<PathBuf> {
        paths::default_config_path()
    }

    pub fn load(
        config_path: Option<&Path>,
        save: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                Self::default_config_path().ok_or("Could not determine default config directory")?
            }
        };

        if !path.exists() {
            Self::create_default_config_file(&path)?;
            trace!("Created default config file at: {}", path.display());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let mut config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        config.config_path = Some(path.clone());

        // Write back so the file lists every field, missing ones filled with defaults
        if save {
            if let Err(e) = config.save_to_file(&path) {
                warn!("Failed to update config file with missing fields: {e}");
            }
        }

        Ok(config)
    }

    fn create_default_config_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        Config::default().save_to_file(path)
    }

    /// Save the current config to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let header = "# Notch Configuration File\n# This file contains your notch settings.\n\n";
        let serialized_config = serde_yaml::to_string(self)?;
        let config_content = format!("{}{}", header, serialized_config);

        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn animation_tick(&self) -> Duration {
        Duration::from_millis(self.animation_tick_ms.max(1))
    }

    pub fn hover_poll_interval(&self) -> Duration {
        Duration::from_millis(self.hover_poll_ms.max(1))
    }

    pub fn trigger_zone(&self) -> TriggerZone {
        TriggerZone {
            height: self.trigger_zone_height,
            half_width: self.trigger_zone_half_width,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            default_width: 130.0,
            default_height: 30.0,
            default_radius: 10.0,
            default_blur_intensity: 1.0,
            blur_visibility_threshold: 0.01,
            animation_tick_ms: 16,
            hover_poll_ms: 100,
            trigger_zone_height: 40.0,
            trigger_zone_half_width: 150.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("notch-config-test-{}-{}", process::id(), name))
            .join("config.yaml")
    }

    #[test]
    fn test_defaults_match_trigger_zone() {
        let config = Config::default();
        assert_eq!(config.trigger_zone(), TriggerZone::default());
        assert_eq!(config.animation_tick(), Duration::from_millis(16));
        assert_eq!(config.hover_poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_intervals_are_raised() {
        let config = Config {
            animation_tick_ms: 0,
            hover_poll_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.animation_tick(), Duration::from_millis(1));
        assert_eq!(config.hover_poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config =
            serde_yaml::from_str("default_width: 180\nhover_poll_ms: 50\n").unwrap();
        assert_eq!(config.default_width, 180.0);
        assert_eq!(config.hover_poll_ms, 50);
        assert_eq!(config.default_height, 30.0);
        assert_eq!(config.trigger_zone_half_width, 150.0);
    }

    #[test]
    fn test_load_creates_default_file() {
        let path = temp_config_path("create");
        let _ = fs::remove_file(&path);

        let config = Config::load(Some(&path), false).unwrap();
        assert!(path.exists());
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            Config {
                config_path: None,
                ..config
            },
            Config::default()
        );

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_saves_missing_fields() {
        let path = temp_config_path("save");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "default_radius: 14\n").unwrap();

        let config = Config::load(Some(&path), true).unwrap();
        assert_eq!(config.default_radius, 14.0);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Notch Configuration File"));
        assert!(contents.contains("default_radius: 14"));
        assert!(contents.contains("trigger_zone_height"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_rejects_invalid_yaml() {
        let path = temp_config_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "default_width: [not a number\n").unwrap();

        let error = Config::load(Some(&path), false).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config file"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
