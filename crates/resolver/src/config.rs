//! TOML configuration for defaults compilation and resolution.
//!
//! ```toml
//! minimum_edition = "PROTO2"
//! maximum_edition = "2024"
//! extensions = ["pb.cpp", "pb.java"]
//!
//! [overrides]
//! check_targets = true
//! forbid_fixed = true
//! redundant = "warn"
//! ```

use std::path::Path;

use protofeat_edition::Edition;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::resolver::OverridePolicy;

/// Earliest edition compiled when no minimum is configured.
pub const DEFAULT_MINIMUM_EDITION: Edition = Edition::Proto2;

/// Resolver settings loaded from a TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
	pub minimum_edition: Option<Edition>,
	pub maximum_edition: Option<Edition>,
	/// Feature extensions to compile defaults for.
	pub extensions: Vec<String>,
	pub overrides: OverridePolicy,
}

impl ResolverConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a config file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(domain = "features", path = %path.display(), "loaded resolver config");
		Ok(config)
	}

	pub fn minimum_edition(&self) -> Edition {
		self.minimum_edition.clone().unwrap_or(DEFAULT_MINIMUM_EDITION)
	}

	/// The configured maximum, or `fallback` when unset.
	pub fn maximum_edition(&self, fallback: &Edition) -> Edition {
		self.maximum_edition.clone().unwrap_or_else(|| fallback.clone())
	}
}
