//! Subcommand implementations
//!
//! Each command renders its output to a `String`; `main` decides where it goes.

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::discover::discover_tilesets;
use anyhow::Context;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tsxkit_core::Tileset;
use tsxkit_validate::{validate_tileset, ValidationOptions, ValidationReport};

/// Outcome of checking one file
#[derive(Debug, Serialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
    /// Set when the file could not be loaded at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct CheckArgs<'a> {
    pub paths: &'a [PathBuf],
    pub no_images: bool,
    pub json: bool,
    pub strict: bool,
}

/// Validate every tileset found under `paths`; returns the output and whether all passed
pub fn check(config: &Config, args: &CheckArgs<'_>) -> anyhow::Result<(String, bool)> {
    let files = discover_tilesets(args.paths)?;
    let options = ValidationOptions {
        check_images: config.validation.check_images && !args.no_images,
        strict: config.validation.strict || args.strict,
    };

    let results: Vec<FileCheck> = files
        .into_iter()
        .map(|path| check_file(path, &options))
        .collect();
    let all_passed = results.iter().all(|result| result.passed);

    let output = if args.json {
        let mut json = serde_json::to_string_pretty(&results)?;
        json.push('\n');
        json
    } else {
        render_checks(&results)
    };

    Ok((output, all_passed))
}

fn check_file(path: PathBuf, options: &ValidationOptions) -> FileCheck {
    let tileset = match tsxkit_format::load_tileset(&path) {
        Ok(tileset) => tileset,
        Err(err) => {
            tracing::debug!(path = %path.display(), "failed to load tileset");
            return FileCheck {
                path,
                passed: false,
                report: None,
                error: Some(err.to_string()),
            };
        }
    };

    let report = validate_tileset(&tileset, options, path.parent());
    let passed = report.clone().into_result(options.strict).is_ok();

    FileCheck {
        path,
        passed,
        report: Some(report),
        error: None,
    }
}

fn render_checks(results: &[FileCheck]) -> String {
    let mut out = String::new();

    for result in results {
        let path = result.path.display();
        match (&result.report, &result.error) {
            (_, Some(error)) => {
                let _ = writeln!(out, "{path}: failed to load: {error}");
            }
            (Some(report), None) if report.is_clean() => {
                let _ = writeln!(out, "{path}: ok ({})", report.tileset);
            }
            (Some(report), None) => {
                let _ = writeln!(
                    out,
                    "{path}: {} error(s), {} warning(s)",
                    report.errors().count(),
                    report.warnings().count()
                );
                for issue in &report.issues {
                    let _ = writeln!(out, "  {issue}");
                }
            }
            (None, None) => {}
        }
    }

    let failed = results.iter().filter(|result| !result.passed).count();
    let _ = writeln!(
        out,
        "checked {} file(s): {} passed, {} failed",
        results.len(),
        results.len() - failed,
        failed
    );
    out
}

/// Human-readable summary of a tileset
pub fn inspect(path: &Path) -> anyhow::Result<String> {
    let tileset = tsxkit_format::load_tileset(path)
        .with_context(|| format!("Loading {}", path.display()))?;
    Ok(render_inspect(&tileset))
}

fn render_inspect(tileset: &Tileset) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", tileset.name);
    let _ = writeln!(
        out,
        "  tiles:     {} ({}x{} px, {} columns x {} rows)",
        tileset.tile_count,
        tileset.tile_width,
        tileset.tile_height,
        tileset.columns,
        tileset.rows()
    );
    match &tileset.image {
        Some(image) => {
            let _ = writeln!(
                out,
                "  image:     {} ({}x{} px)",
                image.source, image.width, image.height
            );
        }
        None => {
            let _ = writeln!(out, "  image:     none (collection)");
        }
    }
    if tileset.spacing != 0 || tileset.margin != 0 {
        let _ = writeln!(
            out,
            "  spacing:   {} px, margin {} px",
            tileset.spacing, tileset.margin
        );
    }

    let _ = writeln!(out, "  wang sets: {}", tileset.wang_sets.len());
    for set in &tileset.wang_sets {
        let colors: Vec<&str> = set.colors.iter().map(|c| c.name.as_str()).collect();
        let _ = writeln!(
            out,
            "    '{}' {} [{}], {} tiles",
            set.name,
            set.set_type,
            colors.join(", "),
            set.tiles.len()
        );
        for (index, color) in set.colors.iter().enumerate() {
            let uniform = set.find_uniform_tiles(index);
            if !uniform.is_empty() {
                let _ = writeln!(out, "      {} fill: {:?}", color.name, uniform);
            }
        }
    }

    let animations: Vec<_> = tileset.animated_tiles().collect();
    let _ = writeln!(out, "  animations: {}", animations.len());
    for (id, animation) in animations {
        let _ = writeln!(
            out,
            "    tile {id}: {} frames, {} ms cycle",
            animation.len(),
            animation.total_duration_ms()
        );
    }

    out
}

/// Serialize a tileset as JSON or `.tsx`
pub fn export(path: &Path, format: ExportFormat) -> anyhow::Result<String> {
    let tileset = tsxkit_format::load_tileset(path)
        .with_context(|| format!("Loading {}", path.display()))?;

    let output = match format {
        ExportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&tileset)?;
            json.push('\n');
            json
        }
        ExportFormat::Tsx => tsxkit_format::write_tileset(&tileset)?,
    };

    Ok(output)
}
