//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kerf",
    version = crate::VERSION,
    about = "G-code driver for GRBL-based laser cutters"
)]
pub struct Cli {
    /// Device configuration file (.toml or .json); defaults to the
    /// platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List serial ports that look like laser controllers
    Ports,

    /// Engrave a bitmap image
    Engrave(EngraveArgs),

    /// Write a default configuration file
    InitConfig {
        /// Destination path (.toml or .json); defaults to the platform
        /// config directory
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct EngraveArgs {
    /// Image file to engrave
    pub image: PathBuf,

    /// Engrave with per-pixel intensity instead of a bilevel threshold
    #[arg(long)]
    pub grayscale: bool,

    /// Laser power in percent
    #[arg(long, default_value_t = 80)]
    pub power: u8,

    /// Speed in percent of the configured maximum rate
    #[arg(long, default_value_t = 100)]
    pub speed: u8,

    /// Engraving resolution in dots per inch
    #[arg(long, default_value_t = 500.0)]
    pub dpi: f64,

    /// Output width in millimetres
    #[arg(long, default_value_t = 100.0)]
    pub width_mm: f64,

    /// Output height in millimetres; keeps the aspect ratio when unset
    #[arg(long)]
    pub height_mm: Option<f64>,

    /// Luma cutoff for bilevel engraving; darker pixels burn
    #[arg(long, default_value_t = 128)]
    pub threshold: u8,

    /// Swap the dark/light mapping
    #[arg(long)]
    pub invert: bool,

    /// Write the encoded G-code to a file instead of sending it
    #[arg(long)]
    pub output: Option<PathBuf>,
}
