//! Error types for defaults compilation and feature resolution.

use std::path::PathBuf;

use protofeat_edition::{Edition, EditionError};
use protofeat_schema::{SchemaError, Target, TextError};
use thiserror::Error;

/// Errors raised while compiling defaults or resolving features.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// An edition identifier could not be parsed.
	#[error(transparent)]
	InvalidEdition(#[from] EditionError),

	/// The requested edition range is empty.
	#[error("Invalid edition range, edition {minimum} is newer than edition {maximum}.")]
	InvalidRange { minimum: Edition, maximum: Edition },

	/// A feature message or extension has an unsupported shape.
	#[error("{0}")]
	Shape(String),

	/// A type or extension lookup failed.
	#[error(transparent)]
	Schema(#[from] SchemaError),

	/// No edition default applies at `edition`.
	#[error("No valid default found for edition {edition} in feature field {feature}")]
	NoDefault { edition: Edition, feature: String },

	/// An edition default's text could not be parsed.
	#[error(
		"Parsing error in edition_defaults for feature field {feature}. Could not parse: {text} (edition {edition}): {source}"
	)]
	DefaultParse {
		edition: Edition,
		feature: String,
		text: String,
		source: TextError,
	},

	/// An enum feature resolved to its zero value or was left unset.
	#[error("Feature field {feature} must resolve to a known value, found {value}")]
	UnknownValue { feature: String, value: String },

	/// A feature was overridden on a descriptor kind it does not target.
	#[error("Feature field {feature} cannot be set on {target}")]
	WrongTarget { feature: String, target: Target },

	/// A feature was overridden at an edition where it is fixed.
	#[error("Feature field {feature} is fixed in edition {edition} and cannot be overridden")]
	FixedOverride { feature: String, edition: Edition },

	/// An override restates the inherited value.
	#[error("Feature field {feature} is overridden with the value it already inherits")]
	RedundantOverride { feature: String },

	/// Defaults entries are not in strictly increasing edition order.
	#[error(
		"Feature set defaults are not strictly increasing. Edition {previous} is greater than or equal to edition {next}."
	)]
	UnsortedDefaults { previous: Edition, next: Edition },

	/// The resolver's edition precedes the defaults' minimum.
	#[error("Edition {edition} is earlier than the minimum supported edition {minimum}")]
	EditionTooEarly { edition: Edition, minimum: Edition },

	/// The resolver's edition follows the defaults' maximum.
	#[error("Edition {edition} is later than the maximum supported edition {maximum}")]
	EditionTooLate { edition: Edition, maximum: Edition },
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur when loading a [`crate::ResolverConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or an unexpected key.
	#[error("failed to parse resolver config: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Errors raised when encoding or decoding a defaults table.
#[derive(Debug, Error)]
pub enum CodecError {
	#[error("binary defaults: {0}")]
	Binary(#[from] postcard::Error),

	#[error("JSON defaults: {0}")]
	Json(#[from] serde_json::Error),
}
