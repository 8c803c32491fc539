//! In-memory model of a decoded layered document
//!
//! A [`Document`] owns an ordered sequence of top-level [`Layer`]s; each
//! layer owns its children. Raster pixels live in [`Tile`]s on the layers
//! that directly carry image data. The tree is built once by the loader and
//! is read-only afterwards.

use image::RgbaImage;

/// Half-open pixel rectangle in document coordinates
///
/// `left`/`top` are inclusive, `right`/`bottom` exclusive. PSD layer records
/// use the same top/left/bottom/right convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// True if the rectangle encloses no pixels
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Smallest rectangle containing both `self` and `other`
    ///
    /// An empty rectangle contributes nothing.
    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Bounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Overlap of `self` and `other`; may be empty
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }
}

/// A rectangular grid of pixels, directly paintable
///
/// Invariant: `pixels` dimensions equal the `bounds` dimensions, and
/// `bounds` is expressed in document coordinates.
#[derive(Debug, Clone)]
pub struct Tile {
    pub bounds: Bounds,
    pub pixels: RgbaImage,
}

impl Tile {
    pub fn new(bounds: Bounds, pixels: RgbaImage) -> Self {
        debug_assert_eq!(bounds.width(), pixels.width());
        debug_assert_eq!(bounds.height(), pixels.height());
        Self { bounds, pixels }
    }
}

/// A node in the document's layer tree
///
/// Groups are layers with children and no tile; raster layers carry a tile
/// and usually no children. Both shapes are allowed.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    pub bounds: Bounds,
    pub tile: Option<Tile>,
    pub children: Vec<Layer>,
}

impl Layer {
    /// Create a layer with no pixel data and no children
    pub fn group(name: impl Into<String>, visible: bool, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            visible,
            bounds,
            tile: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf layer carrying a raster tile
    pub fn raster(name: impl Into<String>, visible: bool, tile: Tile) -> Self {
        Self {
            name: name.into(),
            visible,
            bounds: tile.bounds,
            tile: Some(tile),
            children: Vec::new(),
        }
    }
}

/// A decoded layered document
#[derive(Debug, Clone)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    /// Top-level layers, in stored (back-to-front) order
    pub layers: Vec<Layer>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_dimensions() {
        let b = Bounds::new(10, 20, 40, 35);
        assert_eq!(b.width(), 30);
        assert_eq!(b.height(), 15);
        assert!(!b.is_empty());
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Bounds::default().is_empty());
        assert!(Bounds::new(5, 5, 5, 10).is_empty());
        // Inverted rect reports zero size rather than underflowing
        let b = Bounds::new(10, 10, 0, 0);
        assert!(b.is_empty());
        assert_eq!(b.width(), 0);
        assert_eq!(b.height(), 0);
    }

    #[test]
    fn test_union() {
        let a = Bounds::new(0, 0, 10, 10);
        let b = Bounds::new(5, -5, 20, 8);
        assert_eq!(a.union(&b), Bounds::new(0, -5, 20, 10));
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Bounds::new(2, 3, 7, 9);
        assert_eq!(a.union(&Bounds::default()), a);
        assert_eq!(Bounds::default().union(&a), a);
    }

    #[test]
    fn test_intersect() {
        let a = Bounds::new(0, 0, 10, 10);
        let b = Bounds::new(5, 5, 20, 20);
        assert_eq!(a.intersect(&b), Bounds::new(5, 5, 10, 10));

        let c = Bounds::new(50, 50, 60, 60);
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn test_tile_dimensions_match_bounds() {
        let bounds = Bounds::new(4, 4, 8, 10);
        let tile = Tile::new(bounds, RgbaImage::new(4, 6));
        assert_eq!(tile.pixels.width(), bounds.width());
        assert_eq!(tile.pixels.height(), bounds.height());
    }
}
