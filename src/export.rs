//! Writing rendered layers to PNG files.

use crate::config::OutputConfig;
use crate::layer::PixelBuffer;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where and under which name exports are written.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory to save images to.
    pub directory: PathBuf,
    /// Filename template (supports chrono format specifiers).
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("RasterLayer"),
            filename_template: "layer_%Y-%m-%d_%H%M%S".to_string(),
        }
    }
}

impl From<&OutputConfig> for ExportConfig {
    fn from(output: &OutputConfig) -> Self {
        Self {
            directory: expand_tilde(&output.directory),
            filename_template: output.filename_template.clone(),
        }
    }
}

/// Generate a PNG filename based on the template and current time.
pub fn generate_filename(template: &str) -> String {
    let now = Local::now();
    format!("{}.png", now.format(template))
}

/// Ensure the directory exists, creating it if necessary.
///
/// Returns the canonicalized path when it can be resolved.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create {}", directory.display()))?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Encode `buffer` as PNG at exactly `path`.
pub fn write_png(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    buffer
        .write_png(&mut writer)
        .with_context(|| format!("Failed to encode PNG to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    // Set permissions to user read/write only
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o600))?;
    }

    log::info!(
        "Saved {}x{} image to {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}

/// Save `buffer` into the configured directory under a templated name.
///
/// Returns the path written.
pub fn save_png(buffer: &PixelBuffer, config: &ExportConfig) -> Result<PathBuf> {
    let directory = ensure_directory_exists(&config.directory)?;
    let path = directory.join(generate_filename(&config.filename_template));
    write_png(buffer, &path)?;
    Ok(path)
}

/// Read a PNG file into a pixel buffer.
pub fn read_png(path: &Path) -> Result<PixelBuffer> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let buffer = PixelBuffer::from_png(&mut file)
        .with_context(|| format!("Failed to decode PNG {}", path.display()))?;
    log::debug!(
        "Loaded {}x{} image from {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(buffer)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
