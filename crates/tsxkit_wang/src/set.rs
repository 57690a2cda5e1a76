//! Wang sets, their colors and member tiles

use crate::color::Color;
use crate::wang::{WangId, WangPosition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Type of wang set - determines which slots carry meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WangSetType {
    /// 4 corners per tile
    /// Good for basic terrain transitions
    Corner,
    /// 4 edges per tile
    /// Good for roads, platforms, paths
    Edge,
    /// 4 corners + 4 edges per tile
    /// Most flexible, requires more tiles
    #[default]
    Mixed,
}

impl WangSetType {
    /// Name used by the `type` attribute in `.tsx` files
    pub fn as_str(&self) -> &'static str {
        match self {
            WangSetType::Corner => "corner",
            WangSetType::Edge => "edge",
            WangSetType::Mixed => "mixed",
        }
    }

    /// Get the number of positions used by this set type
    pub fn position_count(&self) -> usize {
        match self {
            WangSetType::Corner => 4,
            WangSetType::Edge => 4,
            WangSetType::Mixed => 8,
        }
    }

    /// Whether a tile of this set type may color the given slot
    pub fn uses_position(&self, position: WangPosition) -> bool {
        match self {
            WangSetType::Corner => position.is_corner(),
            WangSetType::Edge => !position.is_corner(),
            WangSetType::Mixed => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown wang set type '{0}'")]
pub struct ParseWangSetTypeError(pub String);

impl FromStr for WangSetType {
    type Err = ParseWangSetTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corner" => Ok(WangSetType::Corner),
            "edge" => Ok(WangSetType::Edge),
            "mixed" => Ok(WangSetType::Mixed),
            other => Err(ParseWangSetTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for WangSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_probability() -> f32 {
    1.0
}

/// A terrain color within a set (e.g., "Grass", "Dirt", "Water")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangColor {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    /// Display color for editors
    pub color: Color,
    /// Representative tile for this color
    #[serde(default)]
    pub tile: Option<u32>,
    #[serde(default = "default_probability")]
    pub probability: f32,
}

impl WangColor {
    pub fn new(name: String, color: Color) -> Self {
        Self {
            name,
            class: String::new(),
            color,
            tile: None,
            probability: 1.0,
        }
    }

    pub fn with_tile(mut self, tile: u32) -> Self {
        self.tile = Some(tile);
        self
    }
}

/// A tile's membership in a wang set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WangTile {
    pub tile_id: u32,
    pub wang_id: WangId,
}

/// A named autotile rule table attached to a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangSet {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    pub set_type: WangSetType,
    /// Representative tile shown for the whole set
    #[serde(default)]
    pub tile: Option<u32>,
    pub colors: Vec<WangColor>,
    /// Member tiles in file order. Duplicates are kept so they can be reported.
    pub tiles: Vec<WangTile>,
}

impl WangSet {
    pub fn new(name: String, set_type: WangSetType) -> Self {
        Self {
            name,
            class: String::new(),
            set_type,
            tile: None,
            colors: Vec::new(),
            tiles: Vec::new(),
        }
    }

    /// Add a new color to this set, returning its 0-based index
    pub fn add_color(&mut self, color: WangColor) -> usize {
        self.colors.push(color);
        self.colors.len() - 1
    }

    /// Get color index by name
    pub fn color_index(&self, name: &str) -> Option<usize> {
        self.colors.iter().position(|c| c.name == name)
    }

    /// Set the signature of a tile, replacing an existing entry
    pub fn set_tile(&mut self, tile_id: u32, wang_id: WangId) {
        match self.tiles.iter_mut().find(|t| t.tile_id == tile_id) {
            Some(existing) => existing.wang_id = wang_id,
            None => self.tiles.push(WangTile { tile_id, wang_id }),
        }
    }

    /// Get the first entry for a tile
    pub fn get_tile(&self, tile_id: u32) -> Option<&WangTile> {
        self.tiles.iter().find(|t| t.tile_id == tile_id)
    }

    /// Find all tiles fully covered by one color (useful for finding "fill" tiles)
    pub fn find_uniform_tiles(&self, color: usize) -> Vec<u32> {
        let used: Vec<WangPosition> = WangPosition::ALL
            .into_iter()
            .filter(|p| self.set_type.uses_position(*p))
            .collect();

        self.tiles
            .iter()
            .filter(|t| used.iter().all(|p| t.wang_id.color_at(*p) == Some(color)))
            .map(|t| t.tile_id)
            .collect()
    }

    /// All tiles that reference a color in any slot
    pub fn tiles_with_color(&self, color: usize) -> Vec<u32> {
        self.tiles
            .iter()
            .filter(|t| t.wang_id.has_color(color))
            .map(|t| t.tile_id)
            .collect()
    }
}
