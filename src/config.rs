//! Editor configuration
//!
//! Read once at startup from `<config_dir>/roomcraft/config.ron`. A missing
//! file means defaults; a broken one means defaults plus a warning. Fields
//! absent from the file keep their default values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILENAME: &str = "config.ron";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Saved designs live in `<data_dir>/designs`
    pub data_dir: PathBuf,
    /// Root for `models/` and `textures/`
    pub asset_dir: PathBuf,
    pub default_owner: String,
    pub initial_zoom: f32,
    /// `log` level filter name, overridden by `RUST_LOG`
    pub log_level: String,
    /// Import the bundled sample designs into an empty store
    pub seed_sample_designs: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            asset_dir: PathBuf::from("assets"),
            default_owner: "default-user".to_string(),
            initial_zoom: 0.5,
            log_level: "info".to_string(),
            seed_sample_designs: true,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(env!("CARGO_PKG_NAME")))
}

#[cfg(target_arch = "wasm32")]
pub fn config_dir() -> Option<PathBuf> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(env!("CARGO_PKG_NAME")))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(target_arch = "wasm32")]
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl EditorConfig {
    /// Load from the platform config directory, never failing
    pub fn load_or_default() -> Self {
        match config_dir() {
            Some(dir) => Self::load_from_or_default(&dir.join(FILENAME)),
            None => Self::default(),
        }
    }

    /// Defaults when `path` is missing, written back as a starting point;
    /// defaults and a warning when unreadable
    pub fn load_from_or_default(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                eprintln!("could not write default config to {}: {}", path.display(), e);
            }
            return config;
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                // Logger may not be up yet, so say it on stderr too
                eprintln!("ignoring {}: {}", path.display(), e);
                log::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.initial_zoom = crate::canvas2d::clamp_zoom(config.initial_zoom);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            eprintln!("unknown log level {:?}, using info", self.log_level);
            log::LevelFilter::Info
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = EditorConfig::parse("(default_owner: \"alice\", initial_zoom: 0.8)").unwrap();
        assert_eq!(config.default_owner, "alice");
        assert_eq!(config.initial_zoom, 0.8);
        assert_eq!(config.log_level, "info");
        assert!(config.seed_sample_designs);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let config = EditorConfig::parse("(initial_zoom: 9.0)").unwrap();
        assert_eq!(config.initial_zoom, crate::canvas2d::MAX_ZOOM);
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILENAME);
        std::fs::write(&path, "(initial_zoom: ").unwrap();
        assert_eq!(EditorConfig::load_from_or_default(&path), EditorConfig::default());
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse(_))));

        let missing = dir.path().join("roomcraft").join("nope.ron");
        assert_eq!(EditorConfig::load_from_or_default(&missing), EditorConfig::default());
        // A missing file is written out with the defaults
        assert_eq!(EditorConfig::load(&missing).unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let config = EditorConfig {
            log_level: "debug".to_string(),
            seed_sample_designs: false,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
        assert_eq!(config.log_filter(), log::LevelFilter::Debug);
    }
}
