//! psdflat - flatten visible PSD layers into individual PNG images
//!
//! Decodes a Photoshop document, drops hidden top-level layers, composites
//! each remaining top-level layer's descendant raster tiles into one canvas
//! and writes it out as `<layer-name>.png`.

pub mod compose;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod psd;

use document::Document;
use error::FlattenError;
use std::path::Path;

/// A per-layer failure from a batch run
///
/// Write failures for one layer do not stop the batch; they are collected
/// and handed back so the caller can report them.
#[derive(Debug)]
pub struct LayerFailure {
    pub layer: String,
    pub error: FlattenError,
}

/// Flatten every visible top-level layer of a document into `out_dir`
///
/// Layers are processed strictly in stored order, one canvas at a time.
/// Hidden top-level layers are skipped entirely; visible layers without any
/// descendant raster data produce no file. Returns the failures that
/// occurred; an empty vector means every writable layer was written.
pub fn flatten_document(document: &Document, out_dir: &Path) -> Vec<LayerFailure> {
    let mut failures = Vec::new();

    for layer in &document.layers {
        if !layer.visible {
            tracing::debug!("Skipping hidden layer '{}'", layer.name);
            continue;
        }

        let Some(canvas) = compose::flatten_layer(layer) else {
            continue;
        };

        if let Err(error) = output::write_layer_png(&canvas, &layer.name, out_dir) {
            tracing::debug!("Layer '{}' failed: {}", layer.name, error);
            failures.push(LayerFailure {
                layer: layer.name.clone(),
                error,
            });
        }
    }

    failures
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use document::{Bounds, Layer, Tile};
    use image::{Rgba, RgbaImage};

    fn tile(bounds: Bounds, color: [u8; 4]) -> Tile {
        Tile::new(
            bounds,
            RgbaImage::from_pixel(bounds.width(), bounds.height(), Rgba(color)),
        )
    }

    fn layer_with_child(name: &str, visible: bool) -> Layer {
        let mut layer = Layer::group(name, visible, Bounds::new(0, 0, 4, 4));
        layer.children.push(Layer::raster(
            "child",
            true,
            tile(Bounds::new(0, 0, 4, 4), [50, 60, 70, 255]),
        ));
        layer
    }

    fn document(layers: Vec<Layer>) -> Document {
        Document {
            width: 16,
            height: 16,
            layers,
        }
    }

    #[test]
    fn test_no_visible_layers_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let doc = document(vec![layer_with_child("hidden", false)]);

        let failures = flatten_document(&doc, dir.path());
        assert!(failures.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_hidden_layer_excluded_visible_written() {
        let dir = tempfile::tempdir().unwrap();
        let doc = document(vec![
            layer_with_child("Shown", true),
            layer_with_child("Hidden", false),
        ]);

        let failures = flatten_document(&doc, dir.path());
        assert!(failures.is_empty());
        assert!(dir.path().join("Shown.png").exists());
        assert!(!dir.path().join("Hidden.png").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_layer_without_tiles_produces_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut empty = Layer::group("Empty", true, Bounds::new(0, 0, 8, 8));
        empty
            .children
            .push(Layer::group("inner", true, Bounds::default()));
        let doc = document(vec![empty]);

        let failures = flatten_document(&doc, dir.path());
        assert!(failures.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_output_sized_to_layer_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut layer = Layer::group("Sized", true, Bounds::new(0, 0, 12, 7));
        layer.children.push(Layer::raster(
            "child",
            true,
            tile(Bounds::new(1, 1, 3, 3), [0, 0, 0, 255]),
        ));
        let doc = document(vec![layer]);

        assert!(flatten_document(&doc, dir.path()).is_empty());
        let written = image::open(dir.path().join("Sized.png")).unwrap().to_rgba8();
        assert_eq!((written.width(), written.height()), (12, 7));
    }

    #[test]
    fn test_write_failure_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let doc = document(vec![
            layer_with_child("First", true),
            layer_with_child("Second", true),
        ]);

        // Both writes fail, both failures are reported, in order.
        let failures = flatten_document(&doc, &missing);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].layer, "First");
        assert_eq!(failures[1].layer, "Second");
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let doc = document(vec![layer_with_child("Stable", true)]);

        assert!(flatten_document(&doc, dir_a.path()).is_empty());
        assert!(flatten_document(&doc, dir_b.path()).is_empty());

        let a = std::fs::read(dir_a.path().join("Stable.png")).unwrap();
        let b = std::fs::read(dir_b.path().join("Stable.png")).unwrap();
        assert_eq!(a, b);
    }
}
