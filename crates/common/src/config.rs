//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{QuadwarpError, QuadwarpResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where projects are stored.
    pub projects_dir: PathBuf,

    /// Default editing settings.
    #[serde(default)]
    pub editor: EditorDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default editing parameters for new projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Grid cell size in texture pixels.
    pub grid_size: f32,

    /// Whether point drags snap to the grid.
    pub snap_to_grid: bool,

    /// Minimum sampling interval used when resampling meshes for export.
    pub resample_interval: f32,

    /// Texture size assumed before a source has been loaded.
    pub texture_width: u32,
    pub texture_height: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "quadwarp=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: dirs_default_projects(),
            editor: EditorDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            grid_size: 32.0,
            snap_to_grid: false,
            resample_interval: 100.0,
            texture_width: 1920,
            texture_height: 1080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> QuadwarpResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => QuadwarpError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => QuadwarpError::Io(e),
        })?;
        serde_json::from_str(&content)
            .map_err(|e| QuadwarpError::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Save config to the standard location.
    pub fn save(&self) -> QuadwarpResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> QuadwarpResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("quadwarp").join("config.json")
}

/// Default projects directory.
fn dirs_default_projects() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("quadwarp").join("projects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"projects_dir":"/srv/shows","editor":{"grid_size":8.0}}"#)
                .unwrap();
        assert_eq!(parsed.projects_dir, PathBuf::from("/srv/shows"));
        assert_eq!(parsed.editor.grid_size, 8.0);
        assert_eq!(parsed.editor.texture_width, 1920);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = std::env::temp_dir().join("quadwarp_config_round_trip");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.editor.grid_size = 16.0;
        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.editor.grid_size, 16.0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_reports_errors() {
        let dir = std::env::temp_dir().join("quadwarp_config_errors");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let missing = AppConfig::load_from(&dir.join("absent.json")).unwrap_err();
        assert!(matches!(missing, QuadwarpError::FileNotFound { .. }));

        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = AppConfig::load_from(&bad).unwrap_err();
        assert!(matches!(err, QuadwarpError::Config { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
