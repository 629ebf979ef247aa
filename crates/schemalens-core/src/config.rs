//! Heuristics configuration (schemalens.toml)
//!
//! The root-entity vocabulary and parent-token derivation are inherited
//! domain guesses, not verified facts, so they are injected here and
//! overridable instead of being hard-coded in the classifiers.

use serde::{Deserialize, Serialize};

fn default_root_entities() -> Vec<String> {
    ["cart", "order", "user", "account", "customer"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_parent_token_delimiter() -> char {
    '_'
}

fn default_match_item_cap() -> Option<usize> {
    Some(100)
}

/// Tunable heuristics shared by the classifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    /// Root-entity tokens used by the FK risk classifier; a table/column
    /// pair containing the same token is treated as a core-entity edge
    #[serde(default = "default_root_entities")]
    pub root_entities: Vec<String>,

    /// Delimiter for deriving a parent token from a table name
    /// ("cart_item" -> "cart")
    #[serde(default = "default_parent_token_delimiter")]
    pub parent_token_delimiter: char,

    /// Cap on materialized MATCH items per drift section; None disables
    /// the cap. Population counts are kept exact either way.
    #[serde(default = "default_match_item_cap")]
    pub match_item_cap: Option<usize>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            root_entities: default_root_entities(),
            parent_token_delimiter: default_parent_token_delimiter(),
            match_item_cap: default_match_item_cap(),
        }
    }
}

impl HeuristicsConfig {
    /// Load config from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Load config from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Root-entity tokens contained in a name (case-insensitive), in
    /// vocabulary order; a name may carry several tokens
    pub fn root_entities_in(&self, name: &str) -> Vec<&str> {
        let lowered = name.to_lowercase();
        self.root_entities
            .iter()
            .filter(|entity| lowered.contains(entity.to_lowercase().as_str()))
            .map(|entity| entity.as_str())
            .collect()
    }

    /// Parent token of a table name ("cart_item" -> "cart")
    pub fn parent_token<'a>(&self, table: &'a str) -> &'a str {
        table
            .split(self.parent_token_delimiter)
            .next()
            .unwrap_or(table)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
