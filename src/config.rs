use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid shelf name")]
    InvalidShelf,

    #[error("documents directory not found")]
    NoDocumentsDir,
}

/// Where a [`crate::store::SqliteStore`] keeps its database.
///
/// Notes are grouped in shelves. By default a shelf lives under
/// `~/Documents/shelves/{shelf}`; set `root` to put the shelves elsewhere
/// (tests point it at a temporary directory).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub shelf: String,
    pub root: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            shelf: "notes".to_string(),
            root: None,
        }
    }
}

impl StoreConfig {
    pub fn new(shelf: &str) -> Self {
        Self {
            shelf: shelf.to_string(),
            ..Default::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Directory holding this shelf.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidShelf`] if the shelf name is empty or has invalid characters
    /// - [`ConfigError::NoDocumentsDir`] if no `root` is set and the user's
    ///   documents directory cannot be determined
    pub fn shelf_dir(&self) -> Result<PathBuf, ConfigError> {
        let shelf = Self::valid_shelf(&self.shelf)?;

        let base = match &self.root {
            Some(root) => root.clone(),
            None => dirs::document_dir()
                .ok_or(ConfigError::NoDocumentsDir)?
                .join("shelves"),
        };

        Ok(base.join(shelf))
    }

    /// Full path of the shelf's SQLite database file.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.shelf_dir()?.join(".shelf.db"))
    }

    /// Validates a shelf name for filesystem safety.
    ///
    /// Trims whitespace, ensures it is not empty, and rejects
    /// `/`, `\`, `:`, `"`, `*`, `?`, `<`, `>`, `|`.
    fn valid_shelf(shelf: &str) -> Result<String, ConfigError> {
        let trimmed = shelf.trim();

        if trimmed.is_empty() {
            return Err(ConfigError::InvalidShelf);
        }

        if trimmed.contains(&['/', '\\', ':', '"', '*', '?', '<', '>', '|'][..]) {
            return Err(ConfigError::InvalidShelf);
        }

        Ok(trimmed.to_owned())
    }
}
