//! Viewer configuration loaded from TOML, falling back to defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

use crate::asset::DEFAULT_MODEL_URL;

const DEFAULT_CONFIG_PATH: &str = "config/viewer.toml";

/// Viewer settings: window, model source, and orbit control tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window title.
    pub title: String,
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Enable VSync.
    pub vsync: bool,
    /// Model source: an http(s) URL or a local file path.
    pub model: String,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Orbit rotation speed in radians per pixel of drag.
    pub mouse_sensitivity: f32,
    /// Zoom speed in distance units per scroll line.
    pub zoom_sensitivity: f32,
    /// Orbit damping factor (0..1], fraction of remaining delta per frame.
    pub damping: f32,
    /// Minimum orbit distance.
    pub min_distance: f32,
    /// Maximum orbit distance.
    pub max_distance: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "astroview".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            model: DEFAULT_MODEL_URL.to_string(),
            fov_degrees: 75.0,
            // ~0.3 degrees of orbit per pixel of drag
            mouse_sensitivity: 0.005,
            zoom_sensitivity: 0.5,
            damping: 0.1,
            min_distance: 3.0,
            max_distance: 10.0,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ViewerConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ViewerConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else if path != Path::new(DEFAULT_CONFIG_PATH) {
                    warn!(
                        "Viewer config not found at {}. Using defaults",
                        path.display()
                    );
                }
                ViewerConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn test_default_settings() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.model, DEFAULT_MODEL_URL);
        assert_eq!(cfg.fov_degrees, 75.0);
        assert_eq!(cfg.min_distance, 3.0);
        assert_eq!(cfg.max_distance, 10.0);
        assert_eq!(cfg.damping, 0.1);
        assert_eq!(cfg.zoom_sensitivity, 0.5);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cfg = ViewerConfig::load_from_path(Path::new("does/not/exist.toml"));
        assert_eq!(cfg.width, 1280);
        assert_eq!(cfg.height, 720);
    }

    #[test]
    fn test_partial_config_keeps_defaults_for_rest() {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("astroview_config_{timestamp}.toml"));
        fs::write(&path, "width = 640\nheight = 480\n").expect("write temp config");

        let cfg = ViewerConfig::load_from_path(&path);
        assert_eq!(cfg.width, 640);
        assert_eq!(cfg.height, 480);
        assert_eq!(cfg.model, DEFAULT_MODEL_URL);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("astroview_config_rt_{timestamp}.toml"));

        let cfg = ViewerConfig {
            model: "assets/local.glb".to_string(),
            fov_degrees: 60.0,
            ..ViewerConfig::default()
        };
        cfg.save_to_path(&path).expect("save config");

        let reloaded = ViewerConfig::load_from_path(&path);
        assert_eq!(reloaded.model, "assets/local.glb");
        assert_eq!(reloaded.fov_degrees, 60.0);

        let _ = fs::remove_file(&path);
    }
}
