//! Core data structures for tsxkit
//!
//! This crate provides the in-memory model of a Tiled tileset (`.tsx`):
//! - `Tileset` - Atlas grid, image reference, per-tile data and wang sets
//! - `TilesetImage` - Image file backing the atlas (or a single tile)
//! - `TileData` - Class, probability, properties and animation of one tile
//! - `PropertyValue` - Typed custom property value

mod property;
mod tileset;

pub use property::{ParsePropertyError, Properties, PropertyValue};
pub use tileset::{TileData, TileOffset, Tileset, TilesetImage, DEFAULT_FORMAT_VERSION};

pub use tsxkit_animation::{Frame, TileAnimation};
pub use tsxkit_wang::{Color, WangColor, WangId, WangPosition, WangSet, WangSetType, WangTile};
