use crate::api::client::ApiClient;
use crate::utils::normalize_url;
use adw::prelude::*;
use adw::Application;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://spam-detector-api-8p6z.onrender.com";
/// Overrides the configured service URL when set.
pub const API_URL_ENV: &str = "SPAM_DETECTOR_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("com", "example", "SpamDetector")?;
        Some(proj.config_dir().join("settings.toml"))
    }

    /// Settings file, then the environment override, then validation.
    /// Anything unusable falls back to the compiled default.
    pub fn load() -> Self {
        let from_file = Self::config_path().and_then(|path| {
            if !path.exists() {
                // leave an editable file behind on first run
                if let Err(e) = Self::default().save_to(&path) {
                    log::warn!("Could not write {}: {e}", path.display());
                }
                return None;
            }
            match Self::load_from(&path) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    Some(settings)
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {e}", path.display());
                    None
                }
            }
        });
        Self::resolve(from_file, std::env::var(API_URL_ENV).ok())
    }

    pub fn resolve(from_file: Option<Settings>, env_url: Option<String>) -> Self {
        let mut settings = from_file.unwrap_or_default();
        if let Some(url) = env_url {
            log::info!("Using {API_URL_ENV} override");
            settings.base_url = url;
        }
        let normalized = normalize_url(&settings.base_url);
        match Url::parse(&normalized) {
            Ok(_) => settings.base_url = normalized,
            Err(e) => {
                log::warn!("Invalid base_url {:?} ({e}), using default", settings.base_url);
                settings.base_url = DEFAULT_BASE_URL.to_string();
            }
        }
        settings
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

pub fn build_ui(app: &Application) {
    let settings = Settings::load();
    log::info!("Classification service: {}", settings.base_url);
    match ApiClient::new(&settings.base_url) {
        Ok(api) => crate::ui::main_window::show_main_window(app, api),
        Err(e) => {
            log::error!("Cannot start: {e}");
            app.quit();
        }
    }
}
