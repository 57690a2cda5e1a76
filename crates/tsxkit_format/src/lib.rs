//! Reader and writer for Tiled `.tsx` tileset files
//!
//! Converts between the Tiled XML tileset format (version 1.10) and the
//! [`tsxkit_core::Tileset`] model.
//!
//! # Example
//!
//! ```rust,ignore
//! use tsxkit_format::{load_tileset, write_tileset, TilesetCache};
//!
//! let tileset = load_tileset("assets/tilesets/water.tsx")?;
//! println!("{} has {} wang sets", tileset.name, tileset.wang_sets.len());
//!
//! // Re-serialize in Tiled's layout
//! let xml = write_tileset(&tileset)?;
//!
//! // Share parsed tilesets between maps
//! let mut cache = TilesetCache::new(16);
//! let water = cache.get_or_load("assets/tilesets/water.tsx")?;
//! ```

mod cache;
mod reader;
mod writer;

pub use cache::TilesetCache;

use std::path::Path;
use thiserror::Error;
use tsxkit_core::Tileset;

/// Errors that can occur when reading or writing `.tsx` files
#[derive(Debug, Error)]
pub enum TsxError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("File is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Expected a <tileset> root element, found {0}")]
    UnexpectedRoot(String),
    #[error("Missing attribute '{attribute}' in <{element}>")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("Invalid value '{value}' for attribute '{attribute}' in <{element}>: {reason}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
        reason: String,
    },
    #[error("Tile {0} is defined more than once")]
    DuplicateTile(u32),
    #[error("Document ended inside <{0}>")]
    UnexpectedEof(String),
}

/// Parse a tileset from a `.tsx` XML string
pub fn parse_tileset(xml: &str) -> Result<Tileset, TsxError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    reader::read_tileset(xml)
}

/// Parse a tileset from raw file bytes
pub fn parse_tileset_from_bytes(bytes: &[u8]) -> Result<Tileset, TsxError> {
    let xml = std::str::from_utf8(bytes)?;
    parse_tileset(xml)
}

/// Load a tileset from a `.tsx` file
pub fn load_tileset(path: impl AsRef<Path>) -> Result<Tileset, TsxError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let tileset = parse_tileset(&content)?;

    tracing::debug!(
        path = %path.display(),
        name = %tileset.name,
        tiles = tileset.tile_count,
        wang_sets = tileset.wang_sets.len(),
        animations = tileset.animated_tiles().count(),
        "loaded tileset"
    );

    Ok(tileset)
}

/// Serialize a tileset to `.tsx` XML
pub fn write_tileset(tileset: &Tileset) -> Result<String, TsxError> {
    writer::write_tileset(tileset)
}

/// Save a tileset to a `.tsx` file
pub fn save_tileset(tileset: &Tileset, path: impl AsRef<Path>) -> Result<(), TsxError> {
    let content = write_tileset(tileset)?;
    std::fs::write(path, content)?;
    Ok(())
}
