//! Precomputed per-edition feature defaults.

use protofeat_edition::Edition;
use protofeat_schema::text::print_message;
use protofeat_schema::{FeatureSet, TypePool};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Defaults of every feature at one edition, split by mutability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionDefaults {
	pub edition: Edition,
	/// Features schemas may override at this edition.
	pub overridable_features: FeatureSet,
	/// Features outside their lifetime at this edition.
	pub fixed_features: FeatureSet,
}

impl EditionDefaults {
	/// The effective defaults: fixed values overlaid by overridable ones.
	pub fn merged(&self) -> FeatureSet {
		let mut merged = self.fixed_features.clone();
		merged.merge_from(&self.overridable_features);
		merged
	}
}

/// A compiled defaults table covering `[minimum_edition, maximum_edition]`.
///
/// Entries are strictly ascending by edition; the defaults in effect at any
/// supported edition are those of the greatest entry at or before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSetDefaults {
	pub minimum_edition: Edition,
	pub maximum_edition: Edition,
	pub defaults: Vec<EditionDefaults>,
}

impl FeatureSetDefaults {
	/// The entry in effect at `edition`.
	pub fn entry_for(&self, edition: &Edition) -> Option<&EditionDefaults> {
		let idx = edition.floor_index(&self.defaults, |d| &d.edition)?;
		self.defaults.get(idx)
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
		Ok(postcard::to_stdvec(self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
		Ok(postcard::from_bytes(bytes)?)
	}

	pub fn to_json(&self) -> Result<String, CodecError> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	pub fn from_json(text: &str) -> Result<Self, CodecError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Renders the table in text format, one line per entry and payload.
	pub fn to_text(&self, pool: &TypePool, feature_set_type: &str) -> String {
		let mut out = format!(
			"minimum_edition: {}\nmaximum_edition: {}\n",
			self.minimum_edition, self.maximum_edition
		);
		for entry in &self.defaults {
			out.push_str(&format!(
				"defaults {{\n  edition: {}\n  overridable_features {}\n  fixed_features {}\n}}\n",
				entry.edition,
				block(&print_message(pool, feature_set_type, &entry.overridable_features)),
				block(&print_message(pool, feature_set_type, &entry.fixed_features)),
			));
		}
		out
	}
}

fn block(body: &str) -> String {
	if body.is_empty() {
		"{ }".to_string()
	} else {
		format!("{{ {body} }}")
	}
}
