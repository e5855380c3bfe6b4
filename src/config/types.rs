//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Viewer interaction settings.
///
/// Controls how pointer input maps onto layer zoom and how layers are shown
/// when the viewer starts.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ViewerConfig {
    /// Zoom change per scroll notch (valid range: 0.01 - 1.0)
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,

    /// Show the annotation layer on startup
    #[serde(default = "default_annotation_visible")]
    pub annotation_visible: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: default_zoom_step(),
            annotation_visible: default_annotation_visible(),
        }
    }
}

/// Layer style settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LayerConfig {
    /// Fill and stroke color of the annotation layer - either a named color
    /// (red, green, blue, yellow, orange, pink, white, black) or an RGB array
    /// like `[255, 0, 0]`
    #[serde(default = "default_line_color")]
    pub line_color: ColorSpec,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            line_color: default_line_color(),
        }
    }
}

/// Where rendered layers are written.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct OutputConfig {
    /// Directory for exported PNGs (`~` is expanded)
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Filename template using chrono format specifiers, without extension
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            filename_template: default_filename_template(),
        }
    }
}

/// Desktop notification settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NotificationConfig {
    /// Send a desktop notification when a layer cannot be initialised
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_zoom_step() -> f64 {
    0.1
}

fn default_annotation_visible() -> bool {
    true
}

fn default_line_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_output_directory() -> String {
    "~/Pictures/RasterLayer".to_string()
}

fn default_filename_template() -> String {
    "layer_%Y-%m-%d_%H%M%S".to_string()
}

fn default_notifications_enabled() -> bool {
    true
}
