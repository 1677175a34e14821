//! CLI configuration
//!
//! Loaded from `--config <path>`, or `tagform.toml` in the working directory
//! when present. Every field is optional.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tagform::{TagCatalog, TagSuggestion, DEFAULT_SUGGESTION_LIMIT};

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tagform.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Key-value file the `edit` session is saved to
    pub state_file: PathBuf,
    /// Suggestions returned for an empty query
    pub suggestion_limit: usize,
    /// Tag catalog; the sample catalog is used when empty
    pub tags: Vec<TagSuggestion>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            state_file: PathBuf::from("formula.json"),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            tags: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default file if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the tag catalog this config describes
    pub fn catalog(&self) -> Result<TagCatalog> {
        let catalog = if self.tags.is_empty() {
            TagCatalog::sample()
        } else {
            let mut catalog = TagCatalog::new(Vec::new());
            for tag in &self.tags {
                catalog.insert(tag.clone())?;
            }
            catalog
        };
        Ok(catalog.with_default_limit(self.suggestion_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagform::TagResolver;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.catalog().unwrap().value_of("name 3"), Some(95.0));
    }

    #[test]
    fn test_custom_tags() {
        let config = Config::parse(
            r#"
            suggestion_limit = 1

            [[tags]]
            name = "revenue"
            category = "finance"
            value = 120.5
            id = "r1"

            [[tags]]
            name = "cost"
            category = "finance"
            value = 20.5
            id = "c1"
            "#,
        )
        .unwrap();

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("").len(), 1);
        assert_eq!(catalog.value_of("cost"), Some(20.5));
        assert_eq!(catalog.value_of("name 1"), None);
    }

    #[test]
    fn test_duplicate_tags_rejected() {
        let config = Config::parse(
            r#"
            [[tags]]
            name = "x"
            category = "a"
            value = 1.0
            id = "1"

            [[tags]]
            name = "x"
            category = "b"
            value = 2.0
            id = "2"
            "#,
        )
        .unwrap();
        assert!(config.catalog().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tagform.toml");
        std::fs::write(&path, "state_file = \"state/session.json\"\nlog_level = \"debug\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.state_file, PathBuf::from("state/session.json"));
        assert_eq!(config.log_level, "debug");

        assert!(Config::load(Some(dir.path().join("missing.toml").as_path())).is_err());
    }
}
