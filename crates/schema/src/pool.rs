//! Name-indexed registry of type definitions.

use rustc_hash::FxHashMap;

use crate::error::{Result, SchemaError};
use crate::types::{EnumDef, ExtensionDef, MessageDef};

/// Registry of messages, enums and extensions, keyed by full name.
///
/// The pool is append-only; once built it is typically shared behind an
/// `Arc` by resolvers and descriptor pools.
#[derive(Debug, Clone, Default)]
pub struct TypePool {
	messages: FxHashMap<String, MessageDef>,
	enums: FxHashMap<String, EnumDef>,
	extensions: FxHashMap<String, ExtensionDef>,
}

impl TypePool {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_message(&mut self, message: MessageDef) -> Result<()> {
		if self.messages.contains_key(&message.full_name) {
			return Err(SchemaError::Duplicate(message.full_name));
		}
		self.messages.insert(message.full_name.clone(), message);
		Ok(())
	}

	pub fn add_enum(&mut self, def: EnumDef) -> Result<()> {
		if self.enums.contains_key(&def.full_name) {
			return Err(SchemaError::Duplicate(def.full_name));
		}
		self.enums.insert(def.full_name.clone(), def);
		Ok(())
	}

	pub fn add_extension(&mut self, ext: ExtensionDef) -> Result<()> {
		if self.extensions.contains_key(&ext.full_name) {
			return Err(SchemaError::Duplicate(ext.full_name));
		}
		self.extensions.insert(ext.full_name.clone(), ext);
		Ok(())
	}

	/// Moves every definition of `other` into this pool.
	pub fn merge(&mut self, other: TypePool) -> Result<()> {
		for message in other.messages.into_values() {
			self.add_message(message)?;
		}
		for def in other.enums.into_values() {
			self.add_enum(def)?;
		}
		for ext in other.extensions.into_values() {
			self.add_extension(ext)?;
		}
		Ok(())
	}

	pub fn message(&self, name: &str) -> Option<&MessageDef> {
		self.messages.get(name)
	}

	pub fn enumeration(&self, name: &str) -> Option<&EnumDef> {
		self.enums.get(name)
	}

	pub fn extension(&self, name: &str) -> Option<&ExtensionDef> {
		self.extensions.get(name)
	}

	pub fn require_message(&self, name: &str) -> Result<&MessageDef> {
		self.message(name).ok_or_else(|| SchemaError::UnknownType(name.to_string()))
	}

	pub fn require_enum(&self, name: &str) -> Result<&EnumDef> {
		self.enumeration(name).ok_or_else(|| SchemaError::UnknownType(name.to_string()))
	}

	pub fn require_extension(&self, name: &str) -> Result<&ExtensionDef> {
		self.extension(name)
			.ok_or_else(|| SchemaError::UnknownExtension(name.to_string()))
	}

	/// Extensions of `extendee`, sorted by full name.
	pub fn extensions_of(&self, extendee: &str) -> Vec<&ExtensionDef> {
		let mut found: Vec<_> = self
			.extensions
			.values()
			.filter(|ext| ext.extendee == extendee)
			.collect();
		found.sort_by(|a, b| a.full_name.cmp(&b.full_name));
		found
	}

	/// Extension names with a close spelling, for diagnostics.
	pub fn similar_extension(&self, name: &str) -> Option<&str> {
		crate::text::closest(name, self.extensions.keys().map(String::as_str))
	}
}
