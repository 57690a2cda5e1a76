//! Tileset configuration: atlas grid, image and per-tile data

use crate::property::Properties;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tsxkit_animation::TileAnimation;
use tsxkit_wang::{Color, WangSet};
use uuid::Uuid;

/// Format version written by Tiled 1.10 and later
pub const DEFAULT_FORMAT_VERSION: &str = "1.10";

fn default_probability() -> f32 {
    1.0
}

fn default_format_version() -> String {
    DEFAULT_FORMAT_VERSION.to_string()
}

/// An image file backing the atlas, or a single tile of a collection tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetImage {
    /// Path to the image file (relative to the tileset file)
    pub source: String,
    pub width: u32,
    pub height: u32,
    /// Color treated as transparent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<Color>,
}

impl TilesetImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            transparent: None,
        }
    }
}

/// Drawing offset applied to every tile, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

/// Per-tile data like class, animation, and custom metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    /// Weight used by editors when picking among equivalent tiles
    #[serde(default = "default_probability")]
    pub probability: f32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
    /// Own image, for collection tilesets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TilesetImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<TileAnimation>,
}

impl Default for TileData {
    fn default() -> Self {
        Self {
            class: String::new(),
            probability: 1.0,
            properties: Properties::new(),
            image: None,
            animation: None,
        }
    }
}

impl TileData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this tile has an animation
    pub fn has_animation(&self) -> bool {
        self.animation.is_some()
    }

    /// Set animation for this tile
    pub fn with_animation(mut self, animation: TileAnimation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Set the class for this tile
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Check if any data is set (non-default)
    pub fn is_empty(&self) -> bool {
        self.class.is_empty()
            && self.probability == 1.0
            && self.properties.is_empty()
            && self.image.is_none()
            && self.animation.is_none()
    }
}

/// A Tiled tileset: a grid-sliced image atlas plus metadata for its tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    /// Session identity; not serialized, so exports of the same file match
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Pixels between neighboring tiles in the image
    #[serde(default)]
    pub spacing: u32,
    /// Pixels around the tiles in the image
    #[serde(default)]
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    /// Shared atlas image; None for collection tilesets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TilesetImage>,
    #[serde(default)]
    pub tile_offset: TileOffset,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
    /// Per-tile data, keyed by local tile id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tiles: BTreeMap<u32, TileData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wang_sets: Vec<WangSet>,
    /// `version` attribute of the file format
    #[serde(default = "default_format_version")]
    pub version: String,
    /// Tiled release that wrote the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiled_version: Option<String>,
}

impl Tileset {
    /// Create a new tileset without an image
    pub fn new(
        name: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        tile_count: u32,
        columns: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            class: String::new(),
            tile_width,
            tile_height,
            spacing: 0,
            margin: 0,
            tile_count,
            columns,
            image: None,
            tile_offset: TileOffset::default(),
            properties: Properties::new(),
            tiles: BTreeMap::new(),
            wang_sets: Vec::new(),
            version: default_format_version(),
            tiled_version: None,
        }
    }

    /// Attach the atlas image
    pub fn with_image(mut self, image: TilesetImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Number of grid rows, rounding up a partial last row
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            0
        } else {
            self.tile_count.div_ceil(self.columns)
        }
    }

    /// Whether a local tile id lies inside the atlas
    pub fn contains_tile(&self, tile_id: u32) -> bool {
        tile_id < self.tile_count
    }

    /// Whether this is a collection tileset (no shared atlas image)
    pub fn is_collection(&self) -> bool {
        self.image.is_none()
    }

    /// Convert a tile id to (column, row) within the atlas
    pub fn tile_to_grid(&self, tile_id: u32) -> Option<(u32, u32)> {
        if self.columns == 0 || !self.contains_tile(tile_id) {
            return None;
        }
        Some((tile_id % self.columns, tile_id / self.columns))
    }

    /// Convert (column, row) to a tile id
    pub fn grid_to_tile(&self, col: u32, row: u32) -> Option<u32> {
        if col >= self.columns {
            return None;
        }
        let tile_id = row.checked_mul(self.columns)?.checked_add(col)?;
        self.contains_tile(tile_id).then_some(tile_id)
    }

    /// Pixel rectangle (x, y, width, height) of a tile inside the atlas image
    ///
    /// None when the position does not fit in `u32` pixels.
    pub fn tile_rect(&self, tile_id: u32) -> Option<(u32, u32, u32, u32)> {
        let (col, row) = self.tile_to_grid(tile_id)?;
        let x = self.cell_origin(col, self.tile_width)?;
        let y = self.cell_origin(row, self.tile_height)?;
        Some((x, y, self.tile_width, self.tile_height))
    }

    fn cell_origin(&self, index: u32, tile: u32) -> Option<u32> {
        let stride = u64::from(tile) + u64::from(self.spacing);
        let offset = u64::from(index).checked_mul(stride)?;
        u32::try_from(offset.checked_add(u64::from(self.margin))?).ok()
    }

    /// Columns that fit in the image width
    pub fn columns_from_image(&self) -> Option<u32> {
        let image = self.image.as_ref()?;
        Self::cells_in(image.width, self.tile_width, self.margin, self.spacing)
    }

    /// Rows that fit in the image height
    pub fn rows_from_image(&self) -> Option<u32> {
        let image = self.image.as_ref()?;
        Self::cells_in(image.height, self.tile_height, self.margin, self.spacing)
    }

    fn cells_in(extent: u32, tile: u32, margin: u32, spacing: u32) -> Option<u32> {
        if tile == 0 {
            return None;
        }
        // Widened so huge margin/spacing values cannot overflow
        let (extent, tile, margin, spacing) = (
            u64::from(extent),
            u64::from(tile),
            u64::from(margin),
            u64::from(spacing),
        );
        let usable = extent.saturating_sub(2 * margin) + spacing;
        u32::try_from(usable / (tile + spacing)).ok()
    }

    /// Get data for a tile
    pub fn tile(&self, tile_id: u32) -> Option<&TileData> {
        self.tiles.get(&tile_id)
    }

    /// Get mutable data for a tile, creating default if not exists
    pub fn tile_mut(&mut self, tile_id: u32) -> &mut TileData {
        self.tiles.entry(tile_id).or_default()
    }

    /// Set data for a tile; empty data removes the entry
    pub fn set_tile(&mut self, tile_id: u32, data: TileData) {
        if data.is_empty() {
            self.tiles.remove(&tile_id);
        } else {
            self.tiles.insert(tile_id, data);
        }
    }

    /// Animation attached to a tile
    pub fn animation(&self, tile_id: u32) -> Option<&TileAnimation> {
        self.tiles.get(&tile_id)?.animation.as_ref()
    }

    /// All animated tiles in id order
    pub fn animated_tiles(&self) -> impl Iterator<Item = (u32, &TileAnimation)> {
        self.tiles
            .iter()
            .filter_map(|(id, data)| data.animation.as_ref().map(|a| (*id, a)))
    }

    /// Get a wang set by name
    pub fn wang_set(&self, name: &str) -> Option<&WangSet> {
        self.wang_sets.iter().find(|ws| ws.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsxkit_animation::Frame;

    fn water() -> Tileset {
        Tileset::new("AutoWater1", 48, 48, 441, 21)
            .with_image(TilesetImage::new("../image/water.png", 1008, 1008))
    }

    #[test]
    fn test_grid_dimensions() {
        let tileset = water();
        assert_eq!(tileset.rows(), 21);
        assert_eq!(tileset.columns_from_image(), Some(21));
        assert_eq!(tileset.rows_from_image(), Some(21));
        assert!(tileset.contains_tile(440));
        assert!(!tileset.contains_tile(441));
    }

    #[test]
    fn test_id_is_not_serialized() {
        let tileset = water();
        let json = serde_json::to_value(&tileset).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "AutoWater1");

        let back: Tileset = serde_json::from_value(json).unwrap();
        assert_ne!(back.id, tileset.id);
        assert_eq!(back.image, tileset.image);
    }

    #[test]
    fn test_partial_last_row() {
        let tileset = Tileset::new("Odd", 16, 16, 10, 4);
        assert_eq!(tileset.rows(), 3);
        assert_eq!(tileset.tile_to_grid(9), Some((1, 2)));
        assert_eq!(tileset.grid_to_tile(2, 2), None);
        assert_eq!(Tileset::new("Empty", 16, 16, 0, 0).rows(), 0);
    }

    #[test]
    fn test_tile_to_grid_round_trip() {
        let tileset = water();
        assert_eq!(tileset.tile_to_grid(0), Some((0, 0)));
        assert_eq!(tileset.tile_to_grid(105), Some((0, 5)));
        assert_eq!(tileset.tile_to_grid(441), None);
        assert_eq!(tileset.grid_to_tile(0, 5), Some(105));
        assert_eq!(tileset.grid_to_tile(21, 0), None);
    }

    #[test]
    fn test_tile_rect_with_margin_and_spacing() {
        let mut tileset = Tileset::new("Spaced", 16, 16, 4, 2)
            .with_image(TilesetImage::new("spaced.png", 2 + 16 + 1 + 16 + 2, 37));
        tileset.margin = 2;
        tileset.spacing = 1;

        assert_eq!(tileset.tile_rect(0), Some((2, 2, 16, 16)));
        assert_eq!(tileset.tile_rect(3), Some((19, 19, 16, 16)));
        assert_eq!(tileset.columns_from_image(), Some(2));
        assert_eq!(tileset.rows_from_image(), Some(2));
    }

    #[test]
    fn test_huge_spacing_and_margin() {
        let mut tileset = Tileset::new("Wide", 1, 1, 4, 2)
            .with_image(TilesetImage::new("wide.png", 16, 16));
        tileset.spacing = u32::MAX;

        assert_eq!(tileset.columns_from_image(), Some(1));
        assert_eq!(tileset.tile_rect(0), Some((0, 0, 1, 1)));
        assert_eq!(tileset.tile_rect(1), None);

        tileset.spacing = 0;
        tileset.margin = 3_000_000_000;
        assert_eq!(tileset.columns_from_image(), Some(0));
        assert_eq!(tileset.rows_from_image(), Some(0));
        assert_eq!(tileset.tile_rect(0), Some((3_000_000_000, 3_000_000_000, 1, 1)));

        tileset.margin = u32::MAX;
        assert_eq!(tileset.tile_rect(3), None);
    }

    #[test]
    fn test_tile_data_lifecycle() {
        let mut tileset = water();
        let anim = TileAnimation::new(vec![Frame::new(0, 800), Frame::new(105, 800)]);

        tileset.set_tile(0, TileData::new().with_animation(anim.clone()));
        tileset.tile_mut(3).class = "wall".to_string();

        assert_eq!(tileset.animation(0), Some(&anim));
        assert_eq!(tileset.animated_tiles().count(), 1);
        assert_eq!(tileset.tile(3).map(|t| t.class.as_str()), Some("wall"));

        tileset.set_tile(0, TileData::new());
        assert!(tileset.tile(0).is_none());
        assert!(tileset.animation(0).is_none());
    }

    #[test]
    fn test_collection_tileset() {
        assert!(Tileset::new("Props", 32, 32, 0, 0).is_collection());
        assert!(!water().is_collection());
        assert_eq!(Tileset::new("Props", 32, 32, 0, 0).columns_from_image(), None);
    }
}
