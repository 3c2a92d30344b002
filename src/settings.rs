//! Persistence model and configuration IO.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// File name used under the per-user config directory.
const SETTINGS_FILE: &str = "settings.json";

/// Environment variable that overrides the stored access key.
pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Theme options.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the desktop's light/dark preference.
    #[default]
    #[serde(other)]
    System,
}

/// Settings persisted to `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Unsplash API access key, sent as `client_id`.
    pub access_key: String,
    /// Endpoint returning a JSON array of random photos.
    pub api_url: String,
    /// Number of photos requested per batch.
    pub batch_size: u32,
    /// Connect timeout for every request and the full budget of a photo list request.
    pub request_timeout_secs: u64,
    /// Full budget of a single image download.
    pub download_timeout_secs: u64,
    /// File name of the bitmap written under the OS temp directory.
    pub wallpaper_file: String,
    /// Selected UI theme.
    pub theme: ThemeMode,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            api_url: "https://api.unsplash.com/photos/random".to_string(),
            batch_size: 10,
            request_timeout_secs: 30,
            download_timeout_secs: 300,
            wallpaper_file: "splashpaper_wallpaper.bmp".to_string(),
            theme: ThemeMode::System,
        }
    }
}

impl AppSettings {
    /// Replace the access key with `value` when it is present and non-blank.
    pub fn with_access_key_override(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.access_key = key;
        }
        self
    }

    /// Absolute path of the bitmap handed to the wallpaper facility.
    pub fn wallpaper_path(&self) -> PathBuf {
        std::env::temp_dir().join(&self.wallpaper_file)
    }
}

/// Build the settings path and ensure the directory exists.
pub fn settings_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("dev", "splashpaper", "splashpaper")
        .ok_or_else(|| anyhow!("cannot determine config directory"))?;
    let config_dir = proj_dirs.config_dir();
    fs::create_dir_all(config_dir)
        .with_context(|| format!("failed to create {}", config_dir.display()))?;
    Ok(config_dir.join(SETTINGS_FILE))
}

/// Load settings from disk, returning defaults when missing.
///
/// A default file is written on first run so there is something to edit.
pub fn load() -> AppSettings {
    let path = match settings_path() {
        Ok(path) => path,
        Err(err) => {
            log::warn!("using default settings: {err:#}");
            return AppSettings::default();
        }
    };
    let settings = match fs::read_to_string(&path) {
        Ok(contents) => parse(&contents),
        Err(_) => {
            let defaults = AppSettings::default();
            if let Err(err) = save(&defaults) {
                log::warn!("could not write default settings: {err:#}");
            }
            defaults
        }
    };
    settings.with_access_key_override(std::env::var(ACCESS_KEY_ENV).ok())
}

fn parse(contents: &str) -> AppSettings {
    serde_json::from_str(contents).unwrap_or_else(|err| {
        log::warn!("ignoring invalid settings file: {err}");
        AppSettings::default()
    })
}

/// Persist settings to disk as pretty JSON.
pub fn save(settings: &AppSettings) -> Result<()> {
    let path = settings_path()?;
    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("settings written to {}", path.display());
    Ok(())
}
