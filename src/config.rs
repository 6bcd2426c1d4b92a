//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::format::OutputFormat;
use crate::model::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::vocab::{AspectRatio, CameraPerspective, LightingStyle};

/// Default REST endpoint for Gemini models.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Model selection.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Default style values used when CLI flags are omitted.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Remote service settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Model names (aliases allowed).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model for scene ideas and style suggestions.
    pub text: String,
    /// Model for image edits.
    pub image: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { text: DEFAULT_TEXT_MODEL.to_string(), image: DEFAULT_IMAGE_MODEL.to_string() }
    }
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Default lighting style.
    pub lighting: LightingStyle,
    /// Default camera perspective.
    pub camera: CameraPerspective,
    /// Default output format.
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Square,
            lighting: LightingStyle::StudioSoftbox,
            camera: CameraPerspective::EyeLevel,
            format: OutputFormat::Jpeg,
        }
    }
}

/// Remote service settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the models endpoint.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: 120 }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring `GEMINI_API_KEY`, then `API_KEY`.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|k| !k.is_empty()))
            .or_else(|| self.keys.gemini.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `PRODUCT_STUDIO_CONFIG` environment variable
/// 3. `~/.config/product-studio/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PRODUCT_STUDIO_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/product-studio/config.toml")
    } else {
        PathBuf::from("product-studio.toml")
    }
}
