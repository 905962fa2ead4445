use std::env;
use std::fs;
use std::path::PathBuf;

use eframe::egui::Color32;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::utils::color::ColorExt;

pub const SETTINGS_FILE: &str = "uploader.toml";

const ENV_ENDPOINT: &str = "PLANILHA_ENDPOINT";
const ENV_MODE: &str = "PLANILHA_MODE";
const ENV_DOWNLOAD_DIR: &str = "PLANILHA_DOWNLOAD_DIR";

/// Raw settings as read from `uploader.toml`, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub mode: String,
    pub download_dir: String,
    pub theme: ThemeSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub progress_fill: String,
    pub progress_done: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/".to_string(),
            mode: "download".to_string(),
            download_dir: ".".to_string(),
            theme: ThemeSettings::default(),
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            progress_fill: "#3498db".to_string(),
            progress_done: "#27ae60".to_string(),
        }
    }
}

/// Reads `uploader.toml` from the working directory, then applies
/// environment overrides. A missing or unreadable file falls back to
/// the defaults so the app always starts.
pub fn load_settings() -> Settings {
    let mut settings = match fs::read_to_string(SETTINGS_FILE) {
        Ok(raw) => match toml::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("ignoring invalid {SETTINGS_FILE}: {err}");
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    };

    if let Ok(endpoint) = env::var(ENV_ENDPOINT) {
        settings.endpoint = endpoint;
    }
    if let Ok(mode) = env::var(ENV_MODE) {
        settings.mode = mode;
    }
    if let Ok(dir) = env::var(ENV_DOWNLOAD_DIR) {
        settings.download_dir = dir;
    }

    settings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Download,
    Table,
    Redirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub progress_fill: Color32,
    pub progress_done: Color32,
}

/// Validated configuration the app runs on.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: Url,
    pub mode: DeploymentMode,
    pub download_dir: PathBuf,
    pub theme: Theme,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint '{url}': {source}")]
    Endpoint { url: String, source: url::ParseError },
    #[error("unknown mode '{0}', expected download, table or redirect")]
    Mode(String),
    #[error("invalid color '{0}', expected #rrggbb")]
    Color(String),
}

impl Settings {
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|source| ConfigError::Endpoint {
            url: self.endpoint.clone(),
            source,
        })?;

        let mode = match self.mode.as_str() {
            "download" => DeploymentMode::Download,
            "table" => DeploymentMode::Table,
            "redirect" => DeploymentMode::Redirect,
            other => return Err(ConfigError::Mode(other.to_string())),
        };

        let theme = Theme {
            progress_fill: parse_color(&self.theme.progress_fill)?,
            progress_done: parse_color(&self.theme.progress_done)?,
        };

        Ok(AppConfig {
            endpoint,
            mode,
            download_dir: PathBuf::from(self.download_dir),
            theme,
        })
    }
}

fn parse_color(hex: &str) -> Result<Color32, ConfigError> {
    Color32::from_hex(hex).ok_or_else(|| ConfigError::Color(hex.to_string()))
}
