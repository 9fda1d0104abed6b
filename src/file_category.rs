/// File categorization by extension.
///
/// This module maps lowercase file extensions (with their leading dot) to
/// category labels. Every category becomes a subdirectory name when files are
/// organized, so the table is validated when it is built: an extension may
/// belong to only one category, and labels must be usable as directory names.
///
/// # Examples
///
/// ```
/// use filesort::file_category::{Category, CategoryTable};
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify(".pdf", false), Category::Named("Docs".to_string()));
/// assert_eq!(table.classify(".xyz", false), Category::Other);
/// assert_eq!(table.classify(".pdf", true), Category::Folder);
/// ```
use crate::config::ConfigError;
use std::collections::HashMap;
use std::fmt;

/// Label given to every directory entry.
pub const FOLDER_LABEL: &str = "Folder";

/// Label given to files whose extension is not in the table.
pub const OTHER_LABEL: &str = "Other";

/// The category assigned to a scanned entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Any directory, regardless of its name.
    Folder,
    /// A category from the table.
    Named(String),
    /// Fallback for files with an unknown or empty extension.
    Other,
}

impl Category {
    /// Returns the label, which is also the destination directory name.
    ///
    /// ```
    /// use filesort::file_category::Category;
    ///
    /// assert_eq!(Category::Folder.label(), "Folder");
    /// assert_eq!(Category::Named("Images".into()).label(), "Images");
    /// assert_eq!(Category::Other.label(), "Other");
    /// ```
    pub fn label(&self) -> &str {
        match self {
            Category::Folder => FOLDER_LABEL,
            Category::Named(label) => label,
            Category::Other => OTHER_LABEL,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
struct CategoryEntry {
    label: String,
    extensions: Vec<String>,
}

/// Immutable mapping from extensions to category labels.
///
/// Built once at startup through [`CategoryTableBuilder`] (or
/// [`crate::config::CategoryConfig`]) and shared by reference afterwards.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<CategoryEntry>,
    extension_index: HashMap<String, usize>,
}

impl CategoryTable {
    /// Starts an empty table.
    pub fn builder() -> CategoryTableBuilder {
        CategoryTableBuilder::default()
    }

    /// Classifies an entry from its extension and directory flag.
    ///
    /// Directories are always [`Category::Folder`]. Lookups are exact, so the
    /// extension must already be lowercased and carry its leading dot, which
    /// is how [`crate::record::extension_of`] produces it.
    pub fn classify(&self, extension: &str, is_dir: bool) -> Category {
        if is_dir {
            return Category::Folder;
        }
        self.category_for_extension(extension)
            .map(|label| Category::Named(label.to_string()))
            .unwrap_or(Category::Other)
    }

    /// Returns the label owning `extension`, if any.
    pub fn category_for_extension(&self, extension: &str) -> Option<&str> {
        self.extension_index
            .get(extension)
            .map(|&idx| self.categories[idx].label.as_str())
    }

    /// Category labels in the order they were added.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|entry| entry.label.as_str())
    }

    /// Normalized extensions of one category.
    pub fn extensions(&self, label: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.extensions.as_slice())
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when no category is defined; every file then classifies as `Other`.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Categories used when no configuration is supplied.
const STANDARD_CATEGORIES: [(&str, &[&str]); 4] = [
    ("Images", &[".jpg", ".jpeg", ".png", ".gif"]),
    ("Docs", &[".pdf", ".docx", ".txt", ".md"]),
    ("Videos", &[".mp4", ".mov", ".avi", ".mkv"]),
    ("Audio", &[".mp3", ".wav", ".ogg"]),
];

impl Default for CategoryTable {
    fn default() -> Self {
        // The standard list is already normalized and collision free.
        let mut categories = Vec::with_capacity(STANDARD_CATEGORIES.len());
        let mut extension_index = HashMap::new();
        for (idx, (label, extensions)) in STANDARD_CATEGORIES.iter().enumerate() {
            for ext in extensions.iter() {
                extension_index.insert((*ext).to_string(), idx);
            }
            categories.push(CategoryEntry {
                label: (*label).to_string(),
                extensions: extensions.iter().map(|ext| (*ext).to_string()).collect(),
            });
        }
        Self {
            categories,
            extension_index,
        }
    }
}

/// Collects categories and validates them into a [`CategoryTable`].
///
/// ```
/// use filesort::file_category::CategoryTable;
///
/// let table = CategoryTable::builder()
///     .category("Books", ["epub", ".MOBI"])
///     .build()
///     .unwrap();
/// assert_eq!(table.category_for_extension(".mobi"), Some("Books"));
///
/// let clash = CategoryTable::builder()
///     .category("Books", ["pdf"])
///     .category("Docs", ["pdf"])
///     .build();
/// assert!(clash.is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct CategoryTableBuilder {
    pending: Vec<(String, Vec<String>)>,
}

impl CategoryTableBuilder {
    /// Adds a category with its extensions. Extensions may be given with or
    /// without the leading dot and in any case.
    pub fn category<L, I, E>(mut self, label: L, extensions: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        self.pending.push((
            label.into(),
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_string())
                .collect(),
        ));
        self
    }

    /// Validates labels and extensions and builds the lookup index.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: an unusable label, a label
    /// used twice, an empty extension, or an extension claimed by two
    /// categories.
    pub fn build(self) -> Result<CategoryTable, ConfigError> {
        let mut categories: Vec<CategoryEntry> = Vec::with_capacity(self.pending.len());
        let mut extension_index: HashMap<String, usize> = HashMap::new();

        for (raw_label, raw_extensions) in self.pending {
            let label = validate_label(&raw_label)?;
            if categories
                .iter()
                .any(|entry| entry.label.eq_ignore_ascii_case(&label))
            {
                return Err(ConfigError::DuplicateCategory(label));
            }

            let idx = categories.len();
            let mut extensions = Vec::with_capacity(raw_extensions.len());
            for raw_ext in raw_extensions {
                let ext = normalize_extension(&raw_ext).ok_or_else(|| {
                    ConfigError::InvalidExtension {
                        extension: raw_ext.clone(),
                        category: label.clone(),
                    }
                })?;
                if let Some(&owner) = extension_index.get(&ext) {
                    let first = if owner == idx {
                        label.clone()
                    } else {
                        categories[owner].label.clone()
                    };
                    return Err(ConfigError::DuplicateExtension {
                        extension: ext,
                        first,
                        second: label,
                    });
                }
                extension_index.insert(ext.clone(), idx);
                extensions.push(ext);
            }

            categories.push(CategoryEntry { label, extensions });
        }

        Ok(CategoryTable {
            categories,
            extension_index,
        })
    }
}

/// Trims and lowercases an extension and gives it a leading dot.
///
/// Returns `None` for extensions that cannot name a file suffix: empty, a
/// bare dot, or containing a path separator or whitespace.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if bare.is_empty()
        || bare.contains(['/', '\\', '.'])
        || bare.chars().any(char::is_whitespace)
    {
        return None;
    }
    Some(format!(".{}", bare.to_lowercase()))
}

fn validate_label(raw: &str) -> Result<String, ConfigError> {
    let label = raw.trim();
    let reason = if label.is_empty() {
        Some("label is empty")
    } else if label == "." || label == ".." {
        Some("label cannot be a relative directory reference")
    } else if label.contains(['/', '\\']) {
        Some("label cannot contain a path separator")
    } else if label.eq_ignore_ascii_case(FOLDER_LABEL) || label.eq_ignore_ascii_case(OTHER_LABEL) {
        Some("label is reserved")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidLabel {
            label: raw.to_string(),
            reason,
        }),
        None => Ok(label.to_string()),
    }
}
