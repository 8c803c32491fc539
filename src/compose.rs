//! Layer compositing
//!
//! Collects every raster tile reachable under a top-level layer and paints
//! them, in traversal order, onto one transparent canvas using source-over
//! alpha blending. Later tiles end up on top.

use crate::document::{Bounds, Layer, Tile};
use image::{imageops, RgbaImage};

/// Collect the tiles of a layer subtree, depth-first and pre-order
///
/// The layer's own tile (if any) comes first, then each child subtree in
/// sequence order. Every call returns a fresh vector; nothing is shared
/// across recursive calls. Visibility of the visited layers is not
/// consulted.
pub fn collect_tiles(layer: &Layer) -> Vec<&Tile> {
    let mut tiles = Vec::new();
    if let Some(tile) = &layer.tile {
        tiles.push(tile);
    }
    for child in &layer.children {
        tiles.extend(collect_tiles(child));
    }
    tiles
}

/// Composite a top-level layer's descendant tiles into a single canvas
///
/// Only the layer's children subtrees contribute; the top-level layer's own
/// tile is not part of its composite. Returns `None` when no descendant
/// carries pixel data.
///
/// The canvas is sized to the layer's recorded bounds. PSD group records
/// routinely carry an empty rectangle, in which case the union of the
/// collected tile bounds is used instead.
pub fn flatten_layer(layer: &Layer) -> Option<RgbaImage> {
    let tiles: Vec<&Tile> = layer
        .children
        .iter()
        .flat_map(collect_tiles)
        .collect();

    if tiles.is_empty() {
        tracing::debug!("Layer '{}' has no raster tiles, skipping", layer.name);
        return None;
    }

    let bounds = if layer.bounds.is_empty() {
        tiles
            .iter()
            .fold(Bounds::default(), |acc, tile| acc.union(&tile.bounds))
    } else {
        layer.bounds
    };

    tracing::debug!(
        "Compositing {} tile(s) for layer '{}' into {}x{} canvas",
        tiles.len(),
        layer.name,
        bounds.width(),
        bounds.height()
    );

    // RgbaImage::new zero-fills, so the canvas starts fully transparent.
    let mut canvas = RgbaImage::new(bounds.width(), bounds.height());

    for tile in tiles {
        // Tile bounds are document coordinates, same space as the canvas
        // bounds; only the canvas origin shifts. overlay() clips whatever
        // falls outside and blends source-over.
        let x = i64::from(tile.bounds.left) - i64::from(bounds.left);
        let y = i64::from(tile.bounds.top) - i64::from(bounds.top);
        imageops::overlay(&mut canvas, &tile.pixels, x, y);
    }

    Some(canvas)
}
