//! CLI configuration

use crate::output::DEFAULT_OUTPUT_DIR;
use clap::Parser;
use std::path::PathBuf;

/// Flatten the visible top-level layers of a PSD file into PNG images.
///
/// Each visible top-level layer that contains raster data produces one
/// `<layer-name>.png` in the output directory. The output directory must
/// already exist.
#[derive(Parser, Debug, Clone)]
#[command(name = "psdflat")]
#[command(author, version, about)]
pub struct Config {
    /// Path to the input .psd file.
    pub input: PathBuf,

    /// Directory the PNG files are written into (not created if missing).
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
