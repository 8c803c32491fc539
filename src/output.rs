//! PNG output for composited layers

use crate::error::FlattenError;
use image::{ImageFormat, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Characters that cannot appear in a filename on the supported platforms
const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Turn a layer name into a safe filename stem
///
/// Reserved and control characters become underscores. Layer names that
/// sanitize to nothing fall back to `layer`. Two layers sharing a name will
/// still overwrite each other's output (last writer wins); that mirrors the
/// source document's own ambiguity.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if RESERVED_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "layer".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Encode a composited canvas as `<out_dir>/<name>.png`
///
/// The output directory must already exist; a missing directory surfaces as
/// the file-creation error. The file handle is scoped to this call and
/// released on every exit path.
pub fn write_layer_png(
    canvas: &RgbaImage,
    name: &str,
    out_dir: &Path,
) -> Result<PathBuf, FlattenError> {
    let path = out_dir.join(format!("{}.png", sanitize_name(name)));

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    canvas.write_to(&mut writer, ImageFormat::Png)?;

    tracing::info!(
        "Wrote layer '{}' ({}x{}) to {:?}",
        name,
        canvas.width(),
        canvas.height(),
        path
    );

    Ok(path)
}
