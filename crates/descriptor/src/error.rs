//! Descriptor build errors.

use protofeat_edition::Edition;
use protofeat_resolver::ResolveError;
use protofeat_schema::TextError;
use thiserror::Error;

/// A single problem found while building a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
	/// The file description is not valid JSON for [`crate::FileProto`].
	/// `line` and `column` are 1-based; both are 0 when the input ended early.
	#[error("invalid file description: {message}")]
	Json { message: String, line: usize, column: usize },

	#[error("File {file} uses editions syntax but declares no edition")]
	MissingEdition { file: String },

	#[error("File {file} is already built")]
	DuplicateFile { file: String },

	/// No resolver could be created for the file's edition.
	#[error("Cannot resolve features of {file} at edition {edition}: {source}")]
	Resolver {
		file: String,
		edition: Edition,
		source: ResolveError,
	},

	/// A node's features text did not parse.
	#[error("{name}: invalid features: {source}")]
	Features { name: String, source: TextError },

	/// Features declared in a `proto2` or `proto3` file.
	#[error("{name}: Features are only valid under editions.")]
	FeaturesOutsideEditions { name: String },

	/// A legacy construct used in an editions file.
	#[error("{name}: {construct} is not allowed under editions. {replacement}")]
	NotAllowedInEditions {
		name: String,
		construct: &'static str,
		replacement: &'static str,
	},

	/// `packed` on a field that cannot use packed encoding.
	#[error("{name}: [packed = true] can only be specified for repeated primitive fields.")]
	NotPackable { name: String },

	#[error("{name}: oneof index {index} is out of range")]
	OneofIndex { name: String, index: usize },

	/// Feature resolution failed at a node.
	#[error("{name} (edition {edition}): {source}")]
	Resolve {
		name: String,
		edition: Edition,
		source: ResolveError,
	},

	/// A feature or value used outside its lifetime.
	#[error("{name} (edition {edition}): {message}")]
	Lifetime {
		name: String,
		edition: Edition,
		message: String,
	},
}

impl From<serde_json::Error> for BuildError {
	fn from(error: serde_json::Error) -> Self {
		Self::Json {
			message: error.to_string(),
			line: error.line(),
			column: error.column(),
		}
	}
}

/// Every error found while building one file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} error(s) building {file}", errors.len())]
pub struct BuildFailure {
	pub file: String,
	pub errors: Vec<BuildError>,
	/// Warnings gathered before the build failed.
	pub warnings: Vec<String>,
}

impl BuildFailure {
	pub(crate) fn single(file: &str, error: BuildError) -> Self {
		Self {
			file: file.to_string(),
			errors: vec![error],
			warnings: Vec::new(),
		}
	}
}
