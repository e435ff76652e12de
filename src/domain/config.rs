use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::query::{SortCriteria, SortDirection, SortField};

/// Configuration for a practice tracker.
///
/// This struct holds settings that control where questions are stored and
/// how the question list is ordered when no sort is requested explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// File name of the question store, relative to the tracker root.
    data_file: String,

    /// Field the question list is sorted by when none is given.
    ///
    /// Unknown names leave the list in insertion order.
    default_sort: String,

    /// Direction of the default sort.
    default_direction: SortDirection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            default_sort: default_sort(),
            default_direction: default_direction(),
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

    /// Returns the file name of the question store.
    #[must_use]
    pub fn data_file(&self) -> &str {
        &self.data_file
    }

    /// Returns the sort applied when the user does not pick one.
    #[must_use]
    pub fn default_sort(&self) -> SortCriteria {
        SortCriteria::new(SortField::parse(&self.default_sort), self.default_direction)
    }

    /// Sets the default sort field and direction.
    pub fn set_default_sort(&mut self, field: Option<SortField>, direction: SortDirection) {
        self.default_sort = field.map(SortField::name).unwrap_or_default().to_string();
        self.default_direction = direction;
    }
}

fn default_data_file() -> String {
    "questions.json".to_string()
}

fn default_sort() -> String {
    SortField::CreatedAt.name().to_string()
}

const fn default_direction() -> SortDirection {
    SortDirection::Desc
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_file")]
        data_file: String,

        /// Attribute name as used in the data file, e.g. `createdAt`.
        #[serde(default = "default_sort")]
        default_sort: String,

        #[serde(default = "default_direction")]
        default_direction: SortDirection,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                default_sort,
                default_direction,
            } => Self {
                data_file,
                default_sort,
                default_direction,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_file: config.data_file,
            default_sort: config.default_sort,
            default_direction: config.default_direction,
        }
    }
}
