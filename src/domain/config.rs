use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{GenreFilter, SortKey};

/// Configuration for a library.
///
/// Controls where the book list is stored and the criteria a new session
/// starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The key the book list is stored under.
    storage_key: String,

    /// The sort key a session starts with.
    pub default_sort: SortKey,

    /// The genre filter a session starts with.
    pub default_genre: GenreFilter,

    /// Whether deleting a book asks for confirmation first.
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            default_sort: SortKey::default(),
            default_genre: GenreFilter::default(),
            confirm_delete: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The key the book list is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Sets the storage key.
    ///
    /// Blank keys are ignored, since they cannot name a stored value.
    /// Returns `true` if the key was changed.
    pub fn set_storage_key(&mut self, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() || key == self.storage_key {
            false
        } else {
            key.clone_into(&mut self.storage_key);
            true
        }
    }
}

fn default_storage_key() -> String {
    "books".to_string()
}

const fn default_confirm_delete() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_storage_key")]
        storage_key: String,

        #[serde(default)]
        default_sort: SortKey,

        #[serde(default)]
        default_genre: GenreFilter,

        #[serde(default = "default_confirm_delete")]
        confirm_delete: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                storage_key,
                default_sort,
                default_genre,
                confirm_delete,
            } => {
                let storage_key = if storage_key.trim().is_empty() {
                    default_storage_key()
                } else {
                    storage_key
                };
                Self {
                    storage_key,
                    default_sort,
                    default_genre,
                    confirm_delete,
                }
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            storage_key: config.storage_key,
            default_sort: config.default_sort,
            default_genre: config.default_genre,
            confirm_delete: config.confirm_delete,
        }
    }
}
