use std::path::PathBuf;

use protofeat_descriptor::{BuildError, BuildFailure};
use protofeat_resolver::{CodecError, ConfigError, ResolveError};
use protofeat_schema::SchemaError;
use thiserror::Error;

/// Errors surfaced by `protofeat` subcommands.
#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Resolve(#[from] ResolveError),

	#[error(transparent)]
	Schema(#[from] SchemaError),

	#[error(transparent)]
	Codec(#[from] CodecError),

	#[error(transparent)]
	Describe(#[from] BuildError),

	#[error(transparent)]
	Build(#[from] BuildFailure),

	/// No bundled catalog provides the extension.
	#[error("Unknown feature extension {name}.{hint}")]
	UnknownExtension { name: String, hint: String },

	#[error("I/O error on {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("failed to write output: {0}")]
	Output(#[source] std::io::Error),
}
