//! PSD document loader using the `psd` crate
//!
//! Converts a decoded PSD into the [`Document`] layer tree. The psd crate
//! exposes groups and raster layers as two flat sequences linked by parent
//! id; this module reassembles them into an owned tree. The merged preview
//! image is never materialized (the crate only decodes it on demand, and we
//! never ask).

use crate::document::{Bounds, Document, Layer, Tile};
use crate::error::FlattenError;
use ::psd::{Psd, PsdLayer};
use image::{imageops, RgbaImage};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Load a PSD file and convert it to a Document tree
pub fn load_document(path: &Path) -> Result<Document, FlattenError> {
    tracing::info!("Loading PSD file: {:?}", path);

    let data = std::fs::read(path)?;
    let psd = Psd::from_bytes(&data)
        .map_err(|e| FlattenError::InvalidFormat(format!("PSD parse error: {}", e)))?;

    let width = psd.width();
    let height = psd.height();
    let doc_bounds = Bounds::new(0, 0, width as i32, height as i32);

    tracing::debug!("PSD dimensions: {}x{}", width, height);

    // Group records become interior nodes. PSD group records carry no
    // useful rectangle of their own; the compositor falls back to the
    // union of tile bounds.
    let mut groups = Vec::new();
    for id in psd.group_ids_in_order() {
        if let Some(group) = psd.groups().get(id) {
            groups.push(GroupRecord {
                id: *id,
                parent: group.parent_id(),
                // The psd crate reads the PSD visibility bit backwards
                // (bit set means hidden), so invert it here.
                layer: Layer::group(group.name(), !group.visible(), Bounds::default()),
            });
        }
    }

    let mut rasters = Vec::new();
    for (idx, psd_layer) in psd.layers().iter().enumerate() {
        let tile = layer_tile(psd_layer, &doc_bounds)?;
        tracing::debug!(
            "Converted layer {}: '{}' (tile: {})",
            idx,
            psd_layer.name(),
            tile.is_some()
        );

        let layer = Layer {
            name: psd_layer.name().to_string(),
            // Same inverted-bit workaround as for groups.
            visible: !psd_layer.visible(),
            bounds: Bounds::new(
                psd_layer.layer_left(),
                psd_layer.layer_top(),
                psd_layer.layer_right(),
                psd_layer.layer_bottom(),
            ),
            tile,
            children: Vec::new(),
        };
        rasters.push((psd_layer.parent_id(), layer));
    }

    let layers = assemble_tree(groups, rasters);
    tracing::info!("Loaded {} top-level layer(s) from PSD", layers.len());

    Ok(Document {
        width,
        height,
        layers,
    })
}

/// A group record before tree assembly
struct GroupRecord {
    id: u32,
    parent: Option<u32>,
    layer: Layer,
}

/// Rebuild the layer tree from flat group and raster sequences
///
/// Within one parent, subgroup children come first (in group order),
/// followed by raster children (in stored layer order); the decoder does
/// not expose the interleaved sibling order. A parent id that matches no
/// group record attaches the child at the top level.
fn assemble_tree(groups: Vec<GroupRecord>, rasters: Vec<(Option<u32>, Layer)>) -> Vec<Layer> {
    let known: HashSet<u32> = groups.iter().map(|g| g.id).collect();
    let normalize = |parent: Option<u32>| parent.filter(|id| known.contains(id));

    let mut nodes: HashMap<u32, Layer> = HashMap::new();
    let mut group_children: HashMap<Option<u32>, Vec<u32>> = HashMap::new();
    for record in groups {
        let parent = normalize(record.parent);
        if parent != record.parent {
            tracing::warn!(
                "Group '{}' references unknown parent {:?}, attaching at top level",
                record.layer.name,
                record.parent
            );
        }
        group_children.entry(parent).or_default().push(record.id);
        nodes.insert(record.id, record.layer);
    }

    let mut raster_children: HashMap<Option<u32>, Vec<Layer>> = HashMap::new();
    for (parent, layer) in rasters {
        let parent = normalize(parent);
        raster_children.entry(parent).or_default().push(layer);
    }

    fn build(
        id: u32,
        nodes: &mut HashMap<u32, Layer>,
        group_children: &HashMap<Option<u32>, Vec<u32>>,
        raster_children: &mut HashMap<Option<u32>, Vec<Layer>>,
    ) -> Layer {
        let mut node = nodes
            .remove(&id)
            .unwrap_or_else(|| Layer::group(format!("group-{}", id), true, Bounds::default()));
        if let Some(child_ids) = group_children.get(&Some(id)) {
            for &child_id in child_ids {
                let child = build(child_id, nodes, group_children, raster_children);
                node.children.push(child);
            }
        }
        if let Some(children) = raster_children.remove(&Some(id)) {
            node.children.extend(children);
        }
        node
    }

    let mut layers = Vec::new();
    if let Some(top_ids) = group_children.get(&None) {
        for &id in top_ids {
            layers.push(build(id, &mut nodes, &group_children, &mut raster_children));
        }
    }
    if let Some(top_rasters) = raster_children.remove(&None) {
        layers.extend(top_rasters);
    }
    layers
}

/// Extract a layer's raster tile, cropped to the document rectangle
///
/// The psd crate returns full-canvas RGBA for a layer, with the content
/// already placed at its offset; layer-sized data is accepted as a
/// fallback since both shapes show up in the wild. A layer whose rectangle
/// lies fully outside the document carries no tile.
fn layer_tile(psd_layer: &PsdLayer, doc_bounds: &Bounds) -> Result<Option<Tile>, FlattenError> {
    let recorded = Bounds::new(
        psd_layer.layer_left(),
        psd_layer.layer_top(),
        psd_layer.layer_right(),
        psd_layer.layer_bottom(),
    );
    let bounds = recorded.intersect(doc_bounds);
    if bounds.is_empty() {
        return Ok(None);
    }

    let rgba = psd_layer.rgba();
    let full_size = doc_bounds.width() as usize * doc_bounds.height() as usize * 4;
    let recorded_size = recorded.width() as usize * recorded.height() as usize * 4;

    let pixels = if rgba.len() == full_size {
        let full = RgbaImage::from_raw(doc_bounds.width(), doc_bounds.height(), rgba)
            .ok_or_else(|| FlattenError::InvalidFormat("Invalid layer RGBA data".into()))?;
        imageops::crop_imm(
            &full,
            bounds.left as u32,
            bounds.top as u32,
            bounds.width(),
            bounds.height(),
        )
        .to_image()
    } else if rgba.len() == recorded_size {
        let img = RgbaImage::from_raw(recorded.width(), recorded.height(), rgba)
            .ok_or_else(|| FlattenError::InvalidFormat("Invalid layer RGBA data".into()))?;
        if bounds == recorded {
            img
        } else {
            imageops::crop_imm(
                &img,
                (bounds.left - recorded.left) as u32,
                (bounds.top - recorded.top) as u32,
                bounds.width(),
                bounds.height(),
            )
            .to_image()
        }
    } else {
        return Err(FlattenError::InvalidFormat(format!(
            "Layer '{}': unexpected RGBA payload ({} bytes for {}x{} layer in {}x{} document)",
            psd_layer.name(),
            rgba.len(),
            recorded.width(),
            recorded.height(),
            doc_bounds.width(),
            doc_bounds.height()
        )));
    };

    Ok(Some(Tile::new(bounds, pixels)))
}
