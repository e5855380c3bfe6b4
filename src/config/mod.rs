//! Configuration file support for rasterlayer.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/rasterlayer/config.toml`. Settings include viewer zoom
//! behaviour, annotation style, export location, and notifications.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{LayerConfig, NotificationConfig, OutputConfig, ViewerConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [viewer]
/// zoom_step = 0.1
/// annotation_visible = true
///
/// [layer]
/// line_color = "red"
///
/// [output]
/// directory = "~/Pictures/RasterLayer"
/// filename_template = "layer_%Y-%m-%d_%H%M%S"
///
/// [notifications]
/// enabled = true
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Pointer-driven zoom and startup visibility
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Annotation layer style
    #[serde(default)]
    pub layer: LayerConfig,

    /// Export destination
    #[serde(default)]
    pub output: OutputConfig,

    /// Desktop notifications
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced by
    /// the default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `viewer.zoom_step`: 0.01 - 1.0
    /// - `layer.line_color`: must name a known color
    /// - `output.filename_template`: must not be empty
    fn validate_and_clamp(&mut self) {
        // Zoom step: 0.01 - 1.0
        if !(0.01..=1.0).contains(&self.viewer.zoom_step) {
            log::warn!(
                "Invalid zoom_step {:.3}, clamping to 0.01-1.0 range",
                self.viewer.zoom_step
            );
            self.viewer.zoom_step = if self.viewer.zoom_step.is_nan() {
                ViewerConfig::default().zoom_step
            } else {
                self.viewer.zoom_step.clamp(0.01, 1.0)
            };
        }

        if !self.layer.line_color.is_known() {
            log::warn!(
                "Invalid line_color {:?}, falling back to 'red'",
                self.layer.line_color
            );
            self.layer.line_color = LayerConfig::default().line_color;
        }

        if self.output.filename_template.trim().is_empty() {
            log::warn!("Empty filename_template, falling back to default");
            self.output.filename_template = OutputConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/rasterlayer/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("rasterlayer");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file
    /// does not exist. All loaded values are validated and clamped.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        config.validate_and_clamp();
        Ok(config)
    }

    /// Parses a TOML document without validation.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Saves the current configuration to the default location.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory cannot be created
    /// - The config cannot be serialized to TOML
    /// - The file cannot be written
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Serializes the config to TOML and writes it to `config_path`,
    /// creating the parent directory if needed.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config
    /// directory and returns the path written.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
