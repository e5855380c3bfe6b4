use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rasterlayer::export::{self, ExportConfig};
use rasterlayer::viewer::ViewOp;
use rasterlayer::{Config, Viewer, notification};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rasterlayer")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("RASTERLAYER_GIT_HASH"), ")"),
    about = "Pan, zoom and flatten raster layers with Cairo"
)]
struct Cli {
    /// Image for the bottom layer (PNG)
    #[arg(
        long,
        short = 'i',
        value_name = "PNG",
        required_unless_present_any = ["init_config", "save_config"]
    )]
    image: Option<PathBuf>,

    /// Annotation for the top layer (PNG, same size as the image)
    #[arg(long, short = 'a', value_name = "PNG")]
    annotation: Option<PathBuf>,

    /// View operation, applied in order: zoom:SX,SY,CX,CY | pan:TX,TY | reset | show | hide
    #[arg(long = "op", value_name = "OP")]
    ops: Vec<ViewOp>,

    /// Merge the annotation layer into the image layer after the operations
    #[arg(long, action = ArgAction::SetTrue)]
    flatten: bool,

    /// Start with the annotation layer hidden
    #[arg(long, action = ArgAction::SetTrue)]
    hide_annotation: bool,

    /// Write the result here instead of the configured output directory
    #[arg(long, short = 'o', value_name = "PNG")]
    output: Option<PathBuf>,

    /// Never send desktop notifications
    #[arg(long, action = ArgAction::SetTrue)]
    no_notify: bool,

    /// Read settings from this file instead of ~/.config/rasterlayer/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// Write the effective settings (after clamping) to the default config
    /// location and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "init_config")]
    save_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created default config at {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if cli.save_config {
        config.save()?;
        println!("Saved config to {}", Config::get_config_path()?.display());
        return Ok(());
    }

    let image_path = cli
        .image
        .as_deref()
        .context("An --image to display is required")?;

    let written = render(&cli, &config, image_path)?;
    println!("{}", written.display());
    Ok(())
}

/// Loads the layers, applies the requested view changes and writes the
/// composited result, returning where it was written.
fn render(cli: &Cli, config: &Config, image_path: &Path) -> Result<PathBuf> {
    let image = export::read_png(image_path)?;
    let annotation = cli
        .annotation
        .as_deref()
        .map(export::read_png)
        .transpose()?;

    let mut viewer = Viewer::new(config);
    if let Err(err) = viewer.initialise(image.width() as i32, image.height() as i32) {
        log::error!("{err}");
        if config.notifications.enabled && !cli.no_notify {
            notification::send_notification_blocking("Layer unavailable", &err.to_string());
        }
        return Err(err).context("Failed to initialise layers");
    }

    viewer.load_image(image).context("Failed to load image")?;
    if let Some(annotation) = annotation {
        viewer
            .load_annotation(annotation)
            .context("Failed to load annotation")?;
    }
    if cli.hide_annotation {
        viewer.set_annotation_visible(false)?;
    }

    for op in &cli.ops {
        match viewer.apply(*op) {
            Ok(()) => log::info!("Applied {op}"),
            Err(e) if e.is_rejection() => log::warn!("Skipped {op}: {e}"),
            Err(e) => return Err(e).with_context(|| format!("Failed to apply {op}")),
        }
    }

    if cli.flatten {
        viewer.flatten().context("Failed to flatten layers")?;
        log::info!("Flattened annotation into image");
    }

    let frame = viewer.snapshot()?;
    match &cli.output {
        Some(path) => {
            export::write_png(&frame, path)?;
            Ok(path.clone())
        }
        None => export::save_png(&frame, &ExportConfig::from(&config.output)),
    }
}
