//! Bevy asset loading for Tiled `.tsx` tilesets
//!
//! Adds a [`TilesetAsset`] type and a loader for the `tsx` extension. Loaded
//! tilesets are validated; warnings are logged and errors fail the load.
//! With Bevy's `file_watcher` feature, saving a tileset in Tiled reloads it.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tsxkit_bevy::{TilesetAsset, TsxTilesetPlugin};
//!
//! #[derive(Resource)]
//! struct Water(Handle<TilesetAsset>);
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.insert_resource(Water(asset_server.load("tilesets/water.tsx")));
//! }
//!
//! fn report(water: Res<Water>, tilesets: Res<Assets<TilesetAsset>>) {
//!     if let Some(tileset) = tilesets.get(&water.0) {
//!         info!("{} has {} animated tiles", tileset.name, tileset.animated_tiles().count());
//!     }
//! }
//!
//! App::new()
//!     .add_plugins((DefaultPlugins, TsxTilesetPlugin))
//!     .add_systems(Startup, setup)
//!     .add_systems(Update, report)
//!     .run();
//! ```

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use thiserror::Error;
use tsxkit_core::Tileset;
use tsxkit_format::TsxError;
use tsxkit_validate::{validate_tileset, ValidationError, ValidationOptions};

/// A parsed and validated tileset
#[derive(Asset, TypePath, Debug, Clone, Deref, DerefMut)]
pub struct TilesetAsset(pub Tileset);

/// Error type for tileset loading failures
#[derive(Debug, Error)]
pub enum TsxLoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse tileset: {0}")]
    Parse(#[from] TsxError),
    #[error("Invalid tileset: {0}")]
    Invalid(#[from] ValidationError),
}

/// Asset loader for Tiled `.tsx` files
///
/// Image files are not checked; Bevy loads those through its own loaders.
#[derive(Default, TypePath)]
pub struct TsxTilesetLoader;

impl AssetLoader for TsxTilesetLoader {
    type Asset = TilesetAsset;
    type Settings = ();
    type Error = TsxLoadError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let label = format!("{:?}", load_context.path());
        decode_tileset(&bytes, &label)
    }

    fn extensions(&self) -> &[&str] {
        &["tsx"]
    }
}

/// Parse and validate `.tsx` bytes, logging warnings under `label`
pub fn decode_tileset(bytes: &[u8], label: &str) -> Result<TilesetAsset, TsxLoadError> {
    let tileset = tsxkit_format::parse_tileset_from_bytes(bytes)?;

    let options = ValidationOptions {
        check_images: false,
        strict: false,
    };
    let report = validate_tileset(&tileset, &options, None);
    for issue in report.warnings() {
        warn!("{label}: {}", issue.message);
    }
    for issue in report.errors() {
        error!("{label}: {}", issue.message);
    }
    report.into_result(options.strict)?;

    debug!(
        "Loaded tileset '{}' from {label} ({} wang sets, {} animated tiles)",
        tileset.name,
        tileset.wang_sets.len(),
        tileset.animated_tiles().count()
    );

    Ok(TilesetAsset(tileset))
}

/// Registers [`TilesetAsset`] and its `.tsx` loader
pub struct TsxTilesetPlugin;

impl Plugin for TsxTilesetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TilesetAsset>()
            .init_asset_loader::<TsxTilesetLoader>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &[u8] = include_bytes!("../../../assets/tilesets/water.tsx");

    #[test]
    fn test_decode_shipped_tileset() {
        let asset = decode_tileset(WATER, "tilesets/water.tsx").unwrap();
        assert_eq!(asset.name, "AutoWater1");
        assert_eq!(asset.wang_sets.len(), 5);
        assert_eq!(asset.animated_tiles().count(), 130);
    }

    #[test]
    fn test_decode_rejects_invalid_tileset() {
        let xml = br#"<tileset version="1.10" name="Bad" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <tile id="0">
  <animation>
   <frame tileid="9" duration="100"/>
  </animation>
 </tile>
</tileset>"#;

        let result = decode_tileset(xml, "bad.tsx");
        assert!(matches!(
            result,
            Err(TsxLoadError::Invalid(ValidationError::Errors { count: 1, .. }))
        ));
    }

    #[test]
    fn test_decode_keeps_warnings() {
        let xml = br#"<tileset version="1.10" name="Loose" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <wangsets>
  <wangset name="Unfinished" type="corner" tile="-1"/>
 </wangsets>
</tileset>"#;

        let asset = decode_tileset(xml, "loose.tsx").unwrap();
        assert_eq!(asset.wang_sets[0].name, "Unfinished");
    }

    #[test]
    fn test_decode_parse_error() {
        let result = decode_tileset(b"<map/>", "level.tsx");
        assert!(matches!(
            result,
            Err(TsxLoadError::Parse(TsxError::UnexpectedRoot(_)))
        ));
    }

    #[test]
    fn test_loader_extension() {
        assert_eq!(TsxTilesetLoader.extensions(), &["tsx"]);
    }
}
