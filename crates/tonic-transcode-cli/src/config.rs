//! Project-level resolver configuration loaded from YAML or TOML.
//!
//! # File format
//!
//! ```yaml
//! # transcode.yaml
//! # Only resolve services declared in these proto packages (default: all).
//! packages:
//!   - users.v1
//!
//! # Messages bound from a single query value instead of being flattened.
//! leaf_messages:
//!   - core.v1.Uuid
//!
//! # Treat google.protobuf.Timestamp, FieldMask, wrappers, ... as leaves.
//! well_known_leaves: true
//!
//! # Maximum field-path length and query flattening depth.
//! max_depth: 32
//!
//! # Resolve `additional_bindings` after the primary rule.
//! additional_bindings: true
//! ```
//!
//! The same keys are accepted from a `.toml` file.

use std::path::Path;

use serde::Deserialize;
use tonic_transcode::ResolverConfig;

use crate::error::{Error, Result};

/// Resolver knobs read from a project config file.
///
/// Loaded via [`ProjectConfig::load`], then applied to a [`ResolverConfig`]
/// via [`ProjectConfig::apply`].
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Proto packages to resolve. Empty means every package.
    pub packages: Vec<String>,

    /// Fully-qualified messages treated as query leaves.
    pub leaf_messages: Vec<String>,

    /// Keep the well-known leaf messages (`google.protobuf.Timestamp`, ...).
    pub well_known_leaves: bool,

    /// Override for the recursion limit.
    pub max_depth: Option<usize>,

    /// Resolve `additional_bindings`.
    pub additional_bindings: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            leaf_messages: Vec::new(),
            well_known_leaves: true,
            max_depth: None,
            additional_bindings: true,
        }
    }
}

impl ProjectConfig {
    /// Load config from a `.yaml`/`.yml` or `.toml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its
    /// extension is not recognized.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let content = std::fs::read_to_string(path)?;
        match extension.as_str() {
            "yaml" | "yml" => Ok(serde_yaml_ng::from_str(&content)?),
            "toml" => Ok(toml::from_str(&content)?),
            _ => Err(Error::UnsupportedConfigFormat { extension }),
        }
    }

    /// Apply these settings on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: ResolverConfig) -> ResolverConfig {
        if !self.well_known_leaves {
            config = config.without_well_known_leaves();
        }
        for message in &self.leaf_messages {
            config = config.leaf_message(message);
        }
        for package in &self.packages {
            config = config.package(package);
        }
        if let Some(depth) = self.max_depth {
            config = config.max_depth(depth);
        }
        config.additional_bindings(self.additional_bindings)
    }
}
