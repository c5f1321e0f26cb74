// crates/sprig-runtime/src/config.rs
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Window and scale settings, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fullscreen: bool,

    #[serde(rename = "max fps")]
    pub max_fps: u32,

    pub size: [f32; 2],

    #[serde(rename = "spacing points")]
    pub spacing_points: f32,

    #[serde(rename = "monitor number")]
    pub monitor_number: u32,

    /// Screen resolution used to convert points to pixels
    pub dpi: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            max_fps: 60,
            size: [960.0, 520.0],
            spacing_points: 5.0,
            monitor_number: 0,
            dpi: 96.0,
        }
    }
}

impl AppConfig {
    pub const MIN_FPS: u32 = 28;
    pub const MAX_FPS: u32 = 180;

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config.normalized())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        tracing::info!("Saving {}", path.display());
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn normalized(mut self) -> Self {
        let clamped = self.max_fps.clamp(Self::MIN_FPS, Self::MAX_FPS);
        if clamped != self.max_fps {
            tracing::warn!("max fps {} out of range, using {}", self.max_fps, clamped);
            self.max_fps = clamped;
        }
        self
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::from(self.size)
    }

    pub fn frame_length(&self) -> std::time::Duration {
        let fps = self.max_fps.clamp(Self::MIN_FPS, Self::MAX_FPS);
        std::time::Duration::from_secs_f64(1.0 / fps as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::load_or_default(dir.path().join("absent.cfg")).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.cfg");
        let config = AppConfig {
            fullscreen: true,
            max_fps: 120,
            size: [1280.0, 720.0],
            spacing_points: 3.0,
            monitor_number: 1,
            dpi: 144.0,
        };

        config.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let loaded = AppConfig::load_or_default(&path).unwrap();

        assert!(written.contains("\"max fps\": 120"));
        assert!(written.contains("\"spacing points\""));
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps_fps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.cfg");
        std::fs::write(&path, r#"{ "max fps": 1000, "size": [640, 480] }"#).unwrap();

        let config = AppConfig::load_or_default(&path).unwrap();

        assert_eq!(config.max_fps, AppConfig::MAX_FPS);
        assert_eq!(config.window_size(), Vec2::new(640.0, 480.0));
        assert_eq!(config.spacing_points, 5.0);
        assert!(!config.fullscreen);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.cfg");
        std::fs::write(&path, "{ fullscreen: ").unwrap();

        assert!(matches!(AppConfig::load_or_default(&path), Err(ConfigError::Parse(_))));
    }
}
