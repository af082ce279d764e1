//! Error types for type lookups and pool construction.

use thiserror::Error;

/// Errors raised by the type model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
	/// No message or enum with this full name is registered.
	#[error("Unable to find definition of {0} in the type pool")]
	UnknownType(String),

	/// No extension with this full name is registered.
	#[error("Unknown extension {0}")]
	UnknownExtension(String),

	/// A definition with the same full name already exists.
	#[error("duplicate definition of {0}")]
	Duplicate(String),
}

/// Result type for type-model operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
