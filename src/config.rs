//! Category configuration.
//!
//! The CLI always runs with the built-in [`CategoryTable`], but library callers
//! can describe their own categories in TOML:
//!
//! ```toml
//! [categories]
//! Images = [".jpg", ".png", "webp"]
//! Books = ["epub", "mobi"]
//! ```
//!
//! Extensions are normalized (trimmed, lowercased, leading dot added) and must
//! be unique across the whole table. Loading fails on the first conflict, so a
//! table that loads successfully classifies every extension unambiguously.

use crate::file_category::CategoryTable;
use crate::orchestrator::Concurrency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building a category table.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML syntax or structure.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(#[from] toml::de::Error),

    /// A label that cannot be used as a directory name.
    #[error("invalid category label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    /// The same label appears twice (compared ignoring ASCII case).
    #[error("category {0:?} is defined more than once")]
    DuplicateCategory(String),

    /// An extension that cannot match a file suffix.
    #[error("invalid extension {extension:?} in category {category:?}")]
    InvalidExtension { extension: String, category: String },

    /// One extension claimed by two categories, or twice by one.
    #[error("extension {extension:?} is mapped to both {first:?} and {second:?}")]
    DuplicateExtension {
        extension: String,
        first: String,
        second: String,
    },
}

/// Serialized form of a category table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category label to the extensions it owns.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl CategoryConfig {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist,
    /// `ConfigError::Io` if it cannot be read and
    /// `ConfigError::ConfigInvalid` if TOML parsing fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validates the configuration into a lookup table.
    pub fn into_table(self) -> Result<CategoryTable, ConfigError> {
        self.categories
            .into_iter()
            .fold(CategoryTable::builder(), |builder, (label, extensions)| {
                builder.category(label, extensions)
            })
            .build()
    }
}

/// Everything a run needs besides the directory and the dry-run flag.
#[derive(Debug, Clone, Default)]
pub struct OrganizerConfig {
    /// Classification table shared by every task.
    pub table: CategoryTable,
    /// How tasks are scheduled.
    pub concurrency: Concurrency,
}

impl OrganizerConfig {
    /// Builds a configuration around a custom category table.
    pub fn with_table(table: CategoryTable) -> Self {
        Self {
            table,
            concurrency: Concurrency::default(),
        }
    }

    /// Loads the category table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let table = CategoryConfig::load(path)?.into_table()?;
        Ok(Self::with_table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::Category;
    use tempfile::TempDir;

    #[test]
    fn test_parse_and_build_table() {
        let config = CategoryConfig::from_toml_str(
            r#"
            [categories]
            Books = ["epub", ".MOBI"]
            Images = [".png"]
            "#,
        )
        .unwrap();
        let table = config.into_table().unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.classify(".mobi", false),
            Category::Named("Books".to_string())
        );
        assert_eq!(table.classify(".jpg", false), Category::Other);
    }

    #[test]
    fn test_empty_document_gives_empty_table() {
        let table = CategoryConfig::from_toml_str("").unwrap().into_table().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = CategoryConfig::from_toml_str("[categories\nBooks = 1");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let result = CategoryConfig::from_toml_str("[categories]\nBooks = \"epub\"");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_colliding_extensions_are_rejected() {
        let config = CategoryConfig::from_toml_str(
            r#"
            [categories]
            Docs = ["pdf"]
            Papers = ["PDF"]
            "#,
        )
        .unwrap();
        let err = config.into_table().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateExtension { .. }));
        assert!(err.to_string().contains(".pdf"));
    }

    #[test]
    fn test_reserved_label_is_rejected() {
        let config = CategoryConfig::from_toml_str("[categories]\nOther = [\"bak\"]").unwrap();
        assert!(matches!(
            config.into_table(),
            Err(ConfigError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = CategoryConfig::load(Path::new("/non/existent/filesort.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_organizer_config_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("filesort.toml");
        fs::write(&path, "[categories]\nArchives = [\"zip\", \"tar\"]\n")
            .expect("Failed to write config");

        let config = OrganizerConfig::from_file(&path).unwrap();
        assert_eq!(
            config.table.category_for_extension(".zip"),
            Some("Archives")
        );
        assert_eq!(config.concurrency, Concurrency::Unbounded);
    }

    #[test]
    fn test_default_organizer_config_uses_standard_table() {
        let config = OrganizerConfig::default();
        assert_eq!(config.table.category_for_extension(".pdf"), Some("Docs"));
    }
}
