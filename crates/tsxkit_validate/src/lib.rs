//! Invariant checks for Tiled tilesets
//!
//! The parser accepts anything that is well-formed XML so that broken files
//! can still be opened and reported on. This crate checks the rules Tiled
//! itself relies on (tile ids inside the atlas, unique wang tiles, positive
//! frame durations and so on) and collects every violation into a
//! [`ValidationReport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tsxkit_validate::{validate_tileset, ValidationOptions};
//!
//! let tileset = tsxkit_format::load_tileset("assets/tilesets/water.tsx")?;
//! let report = validate_tileset(&tileset, &ValidationOptions::default(), Some("assets/tilesets".as_ref()));
//! for issue in &report.issues {
//!     println!("{issue}");
//! }
//! report.into_result(false)?;
//! ```

mod validate;

pub use validate::validate_tileset;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Tiled loads the file, but something is probably unintended
    Warning,
    /// The data breaks an invariant tools depend on
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Which check produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    InvalidGrid,
    ImageGridMismatch,
    MissingImage,
    TileOutOfRange,
    DuplicateWangTile,
    WangColorOutOfRange,
    WangPositionMismatch,
    EmptyWangSet,
    EmptyAnimation,
    NonPositiveDuration,
}

impl IssueKind {
    /// Severity this kind of issue is always reported with
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::ImageGridMismatch
            | IssueKind::MissingImage
            | IssueKind::WangPositionMismatch
            | IssueKind::EmptyWangSet => Severity::Warning,
            IssueKind::InvalidGrid
            | IssueKind::TileOutOfRange
            | IssueKind::DuplicateWangTile
            | IssueKind::WangColorOutOfRange
            | IssueKind::EmptyAnimation
            | IssueKind::NonPositiveDuration => Severity::Error,
        }
    }
}

/// A single problem found in a tileset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Switches for the checks, as read from the `[validation]` config table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Check that referenced image files exist
    pub check_images: bool,
    /// Treat warnings as failures in [`ValidationReport::into_result`]
    pub strict: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_images: true,
            strict: false,
        }
    }
}

/// All issues found in one tileset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Name of the validated tileset
    pub tileset: String,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new(tileset: impl Into<String>) -> Self {
        Self {
            tileset: tileset.into(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(Issue::new(kind, message));
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of one kind
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Fail on errors, and on warnings too when `strict` is set
    pub fn into_result(self, strict: bool) -> Result<Self, ValidationError> {
        let errors = self.errors().count();
        if errors > 0 {
            return Err(ValidationError::Errors {
                tileset: self.tileset,
                count: errors,
                issues: self.issues,
            });
        }

        let warnings = self.warnings().count();
        if strict && warnings > 0 {
            return Err(ValidationError::Warnings {
                tileset: self.tileset,
                count: warnings,
                issues: self.issues,
            });
        }

        Ok(self)
    }
}

/// A report that did not pass
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Tileset '{tileset}' has {count} error(s)")]
    Errors {
        tileset: String,
        count: usize,
        issues: Vec<Issue>,
    },
    #[error("Tileset '{tileset}' has {count} warning(s) and strict mode is on")]
    Warnings {
        tileset: String,
        count: usize,
        issues: Vec<Issue>,
    },
}

impl ValidationError {
    /// Every issue of the failed report
    pub fn issues(&self) -> &[Issue] {
        match self {
            ValidationError::Errors { issues, .. } | ValidationError::Warnings { issues, .. } => {
                issues
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(kinds: &[IssueKind]) -> ValidationReport {
        let mut report = ValidationReport::new("Test");
        for kind in kinds {
            report.push(*kind, format!("{kind:?}"));
        }
        report
    }

    #[test]
    fn test_severity_per_kind() {
        assert_eq!(IssueKind::MissingImage.severity(), Severity::Warning);
        assert_eq!(IssueKind::TileOutOfRange.severity(), Severity::Error);
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn test_clean_report_passes_strict() {
        let report = report(&[]);
        assert!(report.is_clean());
        assert!(report.into_result(true).is_ok());
    }

    #[test]
    fn test_warnings_fail_only_when_strict() {
        let report = report(&[IssueKind::EmptyWangSet]);
        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 1);
        assert!(report.clone().into_result(false).is_ok());

        let err = report.into_result(true).unwrap_err();
        assert!(matches!(err, ValidationError::Warnings { count: 1, .. }));
        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn test_errors_always_fail() {
        let report = report(&[IssueKind::EmptyWangSet, IssueKind::DuplicateWangTile]);
        let err = report.into_result(false).unwrap_err();
        assert!(matches!(err, ValidationError::Errors { count: 1, .. }));
        assert_eq!(err.to_string(), "Tileset 'Test' has 1 error(s)");
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_options_from_toml() {
        let options: ValidationOptions = toml::from_str("strict = true").unwrap();
        assert!(options.check_images);
        assert!(options.strict);

        let options: ValidationOptions = toml::from_str("check_images = false").unwrap();
        assert_eq!(
            options,
            ValidationOptions {
                check_images: false,
                strict: false
            }
        );
    }

    #[test]
    fn test_issue_json() {
        let issue = Issue::new(IssueKind::NonPositiveDuration, "tile 3 frame 0 lasts 0 ms");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["kind"], "non_positive_duration");
        assert_eq!(issue.to_string(), "error: tile 3 frame 0 lasts 0 ms");
    }
}
