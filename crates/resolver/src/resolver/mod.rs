//! Inherited feature resolution.
//!
//! A [`FeatureResolver`] is created for one edition from a compiled
//! [`FeatureSetDefaults`] table. Its base feature set is the table's entry for
//! that edition with fixed values overlaid by overridable ones. Resolving a
//! descriptor node layers, in order:
//!
//! 1. the base
//! 2. the parent's already-resolved features
//! 3. the node's own unmerged features (minus `raw_features`)
//!
//! and then requires every enum feature to hold a non-zero value.

use std::collections::BTreeSet;
use std::sync::Arc;

use protofeat_edition::Edition;
use protofeat_schema::{
	DynamicMessage, FeatureSet, FieldDef, FieldType, MessageDef, Mutability, Target, TypePool, Value,
};
use serde::{Deserialize, Serialize};

use crate::compile::{default_at, mutability, sorted_defaults};
use crate::defaults::FeatureSetDefaults;
use crate::error::{ResolveError, Result};
use crate::shape;


/// How overrides that restate an inherited value are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Redundant {
	#[default]
	Allow,
	Warn,
	Deny,
}

/// Checks applied to a node's local overrides before merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverridePolicy {
	/// Reject features set on descriptor kinds outside their targets.
	pub check_targets: bool,
	/// Reject features set at an edition where they are fixed.
	pub forbid_fixed: bool,
	pub redundant: Redundant,
}

impl OverridePolicy {
	/// Every check enabled, with redundant overrides reported as warnings.
	pub fn strict() -> Self {
		Self {
			check_targets: true,
			forbid_fixed: true,
			redundant: Redundant::Warn,
		}
	}
}

/// Outcome of [`FeatureResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
	pub features: FeatureSet,
	/// Non-fatal findings, e.g. redundant overrides under [`Redundant::Warn`].
	pub warnings: Vec<ResolveError>,
}

/// One feature set in a node's local overrides.
struct Override<'a> {
	full_name: String,
	field: &'a FieldDef,
	extension: Option<&'a str>,
	value: &'a Value,
}

/// Resolves effective feature sets for descriptors of a single edition.
#[derive(Debug, Clone)]
pub struct FeatureResolver {
	edition: Edition,
	pool: Arc<TypePool>,
	feature_set_type: String,
	base: FeatureSet,
	extensions: BTreeSet<String>,
	policy: OverridePolicy,
}

impl FeatureResolver {
	/// Creates a resolver for `edition` from a compiled defaults table.
	///
	/// Extensions present in the table are considered registered.
	///
	/// # Errors
	///
	/// Fails when the table is not strictly ascending, when `edition` lies
	/// outside the table's range or before its first entry, and when the
	/// resulting base leaves an enum feature unset or zero.
	pub fn create(
		edition: Edition,
		pool: Arc<TypePool>,
		feature_set_type: &str,
		defaults: &FeatureSetDefaults,
	) -> Result<Self> {
		for pair in defaults.defaults.windows(2) {
			if pair[0].edition >= pair[1].edition {
				return Err(ResolveError::UnsortedDefaults {
					previous: pair[0].edition.clone(),
					next: pair[1].edition.clone(),
				});
			}
		}
		if edition < defaults.minimum_edition {
			return Err(ResolveError::EditionTooEarly {
				edition,
				minimum: defaults.minimum_edition.clone(),
			});
		}
		if edition > defaults.maximum_edition {
			return Err(ResolveError::EditionTooLate {
				edition,
				maximum: defaults.maximum_edition.clone(),
			});
		}
		let Some(entry) = defaults.entry_for(&edition) else {
			return Err(ResolveError::NoDefault {
				edition,
				feature: feature_set_type.to_string(),
			});
		};
		pool.require_message(feature_set_type)?;

		let base = entry.merged();
		let extensions: BTreeSet<String> = entry
			.fixed_features
			.extensions
			.keys()
			.chain(entry.overridable_features.extensions.keys())
			.cloned()
			.collect();
		let resolver = Self {
			edition,
			pool,
			feature_set_type: feature_set_type.to_string(),
			base,
			extensions,
			policy: OverridePolicy::default(),
		};
		resolver.check_known_values(&resolver.base)?;
		tracing::debug!(
			domain = "features",
			edition = %resolver.edition,
			extensions = ?resolver.extensions,
			"created feature resolver",
		);
		Ok(resolver)
	}

	/// Replaces the override policy applied by [`Self::resolve`].
	pub fn with_policy(mut self, policy: OverridePolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn edition(&self) -> &Edition {
		&self.edition
	}

	pub fn policy(&self) -> OverridePolicy {
		self.policy
	}

	pub fn pool(&self) -> &Arc<TypePool> {
		&self.pool
	}

	pub fn feature_set_type(&self) -> &str {
		&self.feature_set_type
	}

	/// The resolver's base feature set.
	pub fn base(&self) -> &FeatureSet {
		&self.base
	}

	pub fn is_registered(&self, extension: &str) -> bool {
		self.extensions.contains(extension)
	}

	fn feature_set(&self) -> Result<&MessageDef> {
		Ok(self.pool.require_message(&self.feature_set_type)?)
	}

	/// Registers a feature extension, materializing its defaults for the
	/// resolver's edition into the base. Registering twice is a no-op.
	pub fn register_extension(&mut self, name: &str) -> Result<()> {
		if self.extensions.contains(name) {
			return Ok(());
		}
		let pool = Arc::clone(&self.pool);
		let feature_set = pool.require_message(&self.feature_set_type)?;
		let (ext, message) = shape::validate_extension(&pool, feature_set, name)?;

		let mut values = DynamicMessage::new();
		for field in message.features() {
			let full_name = message.field_full_name(field);
			let defaults = sorted_defaults(&full_name, field);
			if let Some(value) = default_at(&pool, &full_name, field, &defaults, &self.edition)? {
				values.set(field.number, value);
			}
		}
		let mut candidate = self.base.clone();
		candidate.extension_mut(&ext.full_name).merge_from(&values);
		self.check_extension_values(&candidate, &ext.full_name, message)?;

		self.base = candidate;
		self.extensions.insert(ext.full_name.clone());
		tracing::debug!(
			domain = "features",
			edition = %self.edition,
			extension = name,
			"registered feature extension",
		);
		Ok(())
	}

	/// Merges `parent` and `child_raw` over the base.
	///
	/// Set fields of `child_raw` override the parent's, message-valued
	/// features merge field-wise and `raw_features` is ignored.
	pub fn merge_features(&self, parent: &FeatureSet, child_raw: &FeatureSet) -> Result<FeatureSet> {
		let feature_set = self.feature_set()?;
		let mut merged = self.base.clone();
		merged.merge_from(parent);
		let mut child = child_raw.clone();
		strip_raw_features(feature_set, &mut child);
		merged.merge_from(&child);
		strip_raw_features(feature_set, &mut merged);
		self.check_known_values(&merged)?;
		Ok(merged)
	}

	/// Applies the override policy to `child_raw` for a node of kind
	/// `target`, then merges as [`Self::merge_features`] does.
	pub fn resolve(&self, parent: &FeatureSet, child_raw: &FeatureSet, target: Target) -> Result<Resolution> {
		let mut warnings = Vec::new();
		if self.policy != OverridePolicy::default() {
			let mut inherited = self.base.clone();
			inherited.merge_from(parent);
			for item in self.overrides(child_raw)? {
				self.check_override(&item, &inherited, target, &mut warnings)?;
			}
		}
		let features = self.merge_features(parent, child_raw)?;
		Ok(Resolution { features, warnings })
	}

	fn check_override(
		&self,
		item: &Override<'_>,
		inherited: &FeatureSet,
		target: Target,
		warnings: &mut Vec<ResolveError>,
	) -> Result<()> {
		if self.policy.check_targets && !item.field.targets.allows(target) {
			return Err(ResolveError::WrongTarget {
				feature: item.full_name.clone(),
				target,
			});
		}
		if self.policy.forbid_fixed && mutability(item.field, &self.edition) == Mutability::Fixed {
			return Err(ResolveError::FixedOverride {
				feature: item.full_name.clone(),
				edition: self.edition.clone(),
			});
		}
		if self.policy.redundant == Redundant::Allow {
			return Ok(());
		}
		let current = match item.extension {
			Some(name) => inherited.extension(name).and_then(|m| m.get(item.field.number)),
			None => inherited.get(item.field.number),
		};
		if !is_redundant(current, item.value) {
			return Ok(());
		}
		let finding = ResolveError::RedundantOverride {
			feature: item.full_name.clone(),
		};
		if self.policy.redundant == Redundant::Deny {
			return Err(finding);
		}
		tracing::warn!(domain = "features", feature = %item.full_name, "redundant feature override");
		warnings.push(finding);
		Ok(())
	}

	/// Lists the features set in `raw`, core fields first, then extensions.
	fn overrides<'a>(&'a self, raw: &'a FeatureSet) -> Result<Vec<Override<'a>>> {
		let feature_set = self.feature_set()?;
		let mut found = Vec::new();
		for field in feature_set.features() {
			if let Some(value) = raw.get(field.number) {
				found.push(Override {
					full_name: feature_set.field_full_name(field),
					field,
					extension: None,
					value,
				});
			}
		}
		for (name, values) in &raw.extensions {
			let ext = self.pool.require_extension(name)?;
			let FieldType::Message(ty) = &ext.ty else {
				continue;
			};
			let message = self.pool.require_message(ty)?;
			for field in message.features() {
				if let Some(value) = values.get(field.number) {
					found.push(Override {
						full_name: message.field_full_name(field),
						field,
						extension: Some(name.as_str()),
						value,
					});
				}
			}
		}
		Ok(found)
	}

	/// Every enum feature of the feature-set type and of each registered
	/// extension must be set to a non-zero value.
	fn check_known_values(&self, features: &FeatureSet) -> Result<()> {
		let feature_set = self.feature_set()?;
		self.check_enum_fields(feature_set, features)?;
		for name in &self.extensions {
			let ext = self.pool.require_extension(name)?;
			let FieldType::Message(ty) = &ext.ty else {
				continue;
			};
			let message = self.pool.require_message(ty)?;
			self.check_extension_values(features, name, message)?;
		}
		Ok(())
	}

	fn check_extension_values(&self, features: &FeatureSet, name: &str, message: &MessageDef) -> Result<()> {
		let empty = DynamicMessage::new();
		self.check_enum_fields(message, features.extension(name).unwrap_or(&empty))
	}

	fn check_enum_fields(&self, message: &MessageDef, values: &DynamicMessage) -> Result<()> {
		for field in message.features() {
			let FieldType::Enum(ty) = &field.ty else {
				continue;
			};
			let number = values.get(field.number).and_then(Value::as_enum).unwrap_or(0);
			if number != 0 {
				continue;
			}
			let value = self
				.pool
				.enumeration(ty)
				.and_then(|def| def.by_number(0))
				.map_or_else(|| "0".to_string(), |v| v.name.clone());
			return Err(ResolveError::UnknownValue {
				feature: message.field_full_name(field),
				value,
			});
		}
		Ok(())
	}
}

fn strip_raw_features(feature_set: &MessageDef, features: &mut FeatureSet) {
	for field in &feature_set.fields {
		if feature_set.is_raw_features(field) {
			features.clear(field.number);
		}
	}
}

/// True if merging `value` over `inherited` changes nothing.
fn is_redundant(inherited: Option<&Value>, value: &Value) -> bool {
	match (inherited, value) {
		(Some(Value::Message(current)), Value::Message(patch)) => {
			let mut merged = current.clone();
			merged.merge_from(patch);
			merged == *current
		}
		(Some(current), value) => current == value,
		(None, _) => false,
	}
}
