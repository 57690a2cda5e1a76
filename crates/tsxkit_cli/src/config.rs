//! `tsxkit.toml` settings

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tsxkit_validate::ValidationOptions;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "tsxkit.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter directive; `RUST_LOG` takes precedence
    pub log_filter: String,
    pub validation: ValidationOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            validation: ValidationOptions::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Parsing config {}", path.display()))
    }

    /// Load the explicit config, else `tsxkit.toml` in `dir`, else defaults
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_path(path)?, Some(path.to_path_buf())));
        }

        let local = dir.join(CONFIG_FILE);
        if local.is_file() {
            return Ok((Self::from_path(&local)?, Some(local)));
        }

        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
log_filter = "tsxkit_format=debug,info"

[validation]
check_images = false
strict = true
"#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "tsxkit_format=debug,info");
        assert!(!config.validation.check_images);
        assert!(config.validation.strict);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml("[validation]\nstrict = true\n").unwrap();

        assert_eq!(config.log_filter, "info");
        assert!(config.validation.check_images);
        assert!(config.validation.strict);
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_bad_types() {
        assert!(Config::from_toml("[validation]\nstrict = \"yes\"\n").is_err());
    }

    #[test]
    fn test_load_order() {
        let dir = tempfile::tempdir().unwrap();

        let (config, source) = Config::load(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(source.is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "log_filter = \"warn\"\n").unwrap();
        let (config, source) = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.log_filter, "warn");
        assert_eq!(source, Some(dir.path().join(CONFIG_FILE)));

        let explicit = dir.path().join("ci.toml");
        std::fs::write(&explicit, "[validation]\ncheck_images = false\n").unwrap();
        let (config, _) = Config::load(Some(&explicit), dir.path()).unwrap();
        assert_eq!(config.log_filter, "info");
        assert!(!config.validation.check_images);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = Config::load(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("Reading config"));
    }
}
