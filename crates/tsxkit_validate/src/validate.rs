//! The individual checks

use crate::{IssueKind, ValidationOptions, ValidationReport};
use std::collections::HashSet;
use std::path::Path;
use tsxkit_core::{TileAnimation, Tileset, TilesetImage, WangSet};

/// Run every check against a tileset
///
/// `base_dir` is the directory the `.tsx` file lives in; image sources are
/// resolved against it. Without it the image existence check is skipped.
pub fn validate_tileset(
    tileset: &Tileset,
    options: &ValidationOptions,
    base_dir: Option<&Path>,
) -> ValidationReport {
    let mut report = ValidationReport::new(tileset.name.clone());

    check_grid(tileset, &mut report);
    if options.check_images {
        if let Some(dir) = base_dir {
            check_images(tileset, dir, &mut report);
        }
    }
    check_tiles(tileset, &mut report);
    for set in &tileset.wang_sets {
        check_wang_set(tileset, set, &mut report);
    }

    tracing::debug!(
        tileset = %tileset.name,
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validated tileset"
    );

    report
}

/// Whether `tile_id` names a tile of this tileset
///
/// Collection tiles may have ids past `tile_count` after deletions in Tiled;
/// those still count when the tile carries its own image.
fn tile_exists(tileset: &Tileset, tile_id: u32) -> bool {
    if tileset.is_collection() {
        tileset
            .tile(tile_id)
            .is_some_and(|data| data.image.is_some())
            || tileset.contains_tile(tile_id)
    } else {
        tileset.contains_tile(tile_id)
    }
}

fn check_grid(tileset: &Tileset, report: &mut ValidationReport) {
    if tileset.tile_width == 0 || tileset.tile_height == 0 {
        report.push(
            IssueKind::InvalidGrid,
            format!(
                "tile size {}x{} has a zero dimension",
                tileset.tile_width, tileset.tile_height
            ),
        );
    }

    // Collection tilesets legitimately have no columns
    if tileset.is_collection() {
        return;
    }

    if tileset.columns == 0 && tileset.tile_count > 0 {
        report.push(
            IssueKind::InvalidGrid,
            format!("{} tiles declared with 0 columns", tileset.tile_count),
        );
        return;
    }

    if let (Some(columns), Some(rows)) = (tileset.columns_from_image(), tileset.rows_from_image()) {
        if columns != tileset.columns || rows != tileset.rows() {
            report.push(
                IssueKind::ImageGridMismatch,
                format!(
                    "image fits {columns}x{rows} tiles but the tileset declares {}x{}",
                    tileset.columns,
                    tileset.rows()
                ),
            );
        }
    }
}

fn check_images(tileset: &Tileset, base_dir: &Path, report: &mut ValidationReport) {
    let mut check = |image: &TilesetImage, owner: String| {
        if !base_dir.join(&image.source).exists() {
            report.push(
                IssueKind::MissingImage,
                format!("{owner} image '{}' not found", image.source),
            );
        }
    };

    if let Some(image) = &tileset.image {
        check(image, "atlas".to_string());
    }
    for (id, data) in &tileset.tiles {
        if let Some(image) = &data.image {
            check(image, format!("tile {id}"));
        }
    }
}

fn check_tiles(tileset: &Tileset, report: &mut ValidationReport) {
    for (&id, data) in &tileset.tiles {
        if !tile_exists(tileset, id) {
            report.push(
                IssueKind::TileOutOfRange,
                format!(
                    "tile {id} is outside the tileset ({} tiles)",
                    tileset.tile_count
                ),
            );
        }
        if let Some(animation) = &data.animation {
            check_animation(tileset, id, animation, report);
        }
    }
}

fn check_animation(
    tileset: &Tileset,
    tile_id: u32,
    animation: &TileAnimation,
    report: &mut ValidationReport,
) {
    if animation.is_empty() {
        report.push(
            IssueKind::EmptyAnimation,
            format!("tile {tile_id} has an animation without frames"),
        );
        return;
    }

    for (index, frame) in animation.frames.iter().enumerate() {
        if !tile_exists(tileset, frame.tile_id) {
            report.push(
                IssueKind::TileOutOfRange,
                format!(
                    "tile {tile_id} frame {index} shows tile {} outside the tileset",
                    frame.tile_id
                ),
            );
        }
        if frame.duration_ms == 0 {
            report.push(
                IssueKind::NonPositiveDuration,
                format!("tile {tile_id} frame {index} lasts 0 ms"),
            );
        }
    }
}

fn check_wang_set(tileset: &Tileset, set: &WangSet, report: &mut ValidationReport) {
    let name = &set.name;

    if set.colors.is_empty() {
        report.push(
            IssueKind::EmptyWangSet,
            format!("wang set '{name}' has no colors"),
        );
    }

    if let Some(tile) = set.tile.filter(|&t| !tile_exists(tileset, t)) {
        report.push(
            IssueKind::TileOutOfRange,
            format!("wang set '{name}' icon tile {tile} is outside the tileset"),
        );
    }

    for color in &set.colors {
        if let Some(tile) = color.tile.filter(|&t| !tile_exists(tileset, t)) {
            report.push(
                IssueKind::TileOutOfRange,
                format!(
                    "wang color '{}' in '{name}' uses tile {tile} outside the tileset",
                    color.name
                ),
            );
        }
    }

    let mut seen = HashSet::new();
    let mut mismatched = Vec::new();
    for wang_tile in &set.tiles {
        let id = wang_tile.tile_id;

        if !seen.insert(id) {
            report.push(
                IssueKind::DuplicateWangTile,
                format!("tile {id} is listed more than once in wang set '{name}'"),
            );
        }

        if !tile_exists(tileset, id) {
            report.push(
                IssueKind::TileOutOfRange,
                format!("wang set '{name}' references tile {id} outside the tileset"),
            );
        }

        if let Some(max) = wang_tile.wang_id.max_color() {
            if max >= set.colors.len() {
                report.push(
                    IssueKind::WangColorOutOfRange,
                    format!(
                        "tile {id} in wang set '{name}' uses color {} but the set has {}",
                        max + 1,
                        set.colors.len()
                    ),
                );
            }
        }

        if wang_tile
            .wang_id
            .occupied()
            .any(|position| !set.set_type.uses_position(position))
        {
            mismatched.push(id);
        }
    }

    if !mismatched.is_empty() {
        report.push(
            IssueKind::WangPositionMismatch,
            format!(
                "{} tile(s) in {} set '{name}' use slots the set type ignores: {:?}",
                mismatched.len(),
                set.set_type,
                mismatched
            ),
        );
    }
}
