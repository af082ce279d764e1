//! Compilation of per-edition feature-set defaults.
//!
//! Given the feature-set type and the feature extensions a generator uses,
//! [`compile_defaults`] evaluates every feature's `edition_defaults` at each
//! edition where some default changes, producing a [`FeatureSetDefaults`]
//! table a resolver can be created from.

use std::collections::BTreeSet;

use protofeat_edition::Edition;
use protofeat_schema::text::parse_value;
use protofeat_schema::{
	DynamicMessage, EditionDefault, FeatureSet, FieldDef, MessageDef, Mutability, TypePool, Value,
};

use crate::defaults::{EditionDefaults, FeatureSetDefaults};
use crate::error::{ResolveError, Result};
use crate::shape;


/// A feature message contributing to a feature set: the feature-set type
/// itself (`extension: None`) or one of its extensions.
pub(crate) struct FeatureGroup<'p> {
	pub extension: Option<&'p str>,
	pub message: &'p MessageDef,
}

impl FeatureGroup<'_> {
	/// Stores `value` for `field` in the payload this group writes to.
	fn store(&self, payload: &mut FeatureSet, field: &FieldDef, value: Value) {
		match self.extension {
			Some(name) => payload.extension_mut(name).set(field.number, value),
			None => payload.set(field.number, value),
		}
	}
}

/// Returns a field's edition defaults stable-sorted by edition.
///
/// Defaults sharing an edition keep declaration order so the last declared
/// one is found by a floor lookup.
pub(crate) fn sorted_defaults(full_name: &str, field: &FieldDef) -> Vec<EditionDefault> {
	let mut defaults = field.edition_defaults.clone();
	defaults.sort_by(|a, b| a.edition.cmp(&b.edition));
	for pair in defaults.windows(2) {
		if pair[0].edition == pair[1].edition {
			tracing::warn!(
				domain = "features",
				feature = full_name,
				edition = %pair[0].edition,
				"duplicate edition default; the last declared value wins",
			);
		}
	}
	defaults
}

fn parse_default(pool: &TypePool, full_name: &str, field: &FieldDef, default: &EditionDefault) -> Result<Value> {
	parse_value(pool, &field.ty, &default.value).map_err(|source| ResolveError::DefaultParse {
		edition: default.edition.clone(),
		feature: full_name.to_string(),
		text: default.value.clone(),
		source,
	})
}

/// Evaluates a feature's default at `edition` from its sorted defaults.
///
/// Scalar and enum features take the greatest default at or before
/// `edition`; message features merge every such default in order. Returns
/// `None` only for `LEGACY` when no default applies.
pub(crate) fn default_at(
	pool: &TypePool,
	full_name: &str,
	field: &FieldDef,
	defaults: &[EditionDefault],
	edition: &Edition,
) -> Result<Option<Value>> {
	let Some(idx) = edition.floor_index(defaults, |d| &d.edition) else {
		if *edition == Edition::Legacy {
			return Ok(None);
		}
		return Err(ResolveError::NoDefault {
			edition: edition.clone(),
			feature: full_name.to_string(),
		});
	};
	if !field.ty.is_message() {
		return parse_default(pool, full_name, field, &defaults[idx]).map(Some);
	}
	let mut merged = DynamicMessage::new();
	for default in &defaults[..=idx] {
		if let Value::Message(part) = parse_default(pool, full_name, field, default)? {
			merged.merge_from(&part);
		}
	}
	Ok(Some(Value::Message(merged)))
}

/// Mutability of `field` at `edition`; features without lifetime metadata
/// are always overridable. Nothing is overridable at `LEGACY`.
pub(crate) fn mutability(field: &FieldDef, edition: &Edition) -> Mutability {
	if *edition == Edition::Legacy {
		return Mutability::Fixed;
	}
	field
		.feature_support
		.as_ref()
		.map_or(Mutability::Overridable, |s| s.mutability_at(edition))
}

/// Validates the feature-set type and the named extensions, returning the
/// feature groups in a stable order: the core type first, then extensions
/// sorted by name.
pub(crate) fn feature_groups<'p>(
	pool: &'p TypePool,
	feature_set_type: &str,
	extensions: &[String],
) -> Result<(&'p MessageDef, Vec<FeatureGroup<'p>>)> {
	let feature_set = pool.require_message(feature_set_type)?;
	shape::validate_feature_message(pool, feature_set)?;

	let mut groups = vec![FeatureGroup {
		extension: None,
		message: feature_set,
	}];
	let names: BTreeSet<&str> = extensions.iter().map(String::as_str).collect();
	for name in names {
		let (ext, message) = shape::validate_extension(pool, feature_set, name)?;
		groups.push(FeatureGroup {
			extension: Some(ext.full_name.as_str()),
			message,
		});
	}
	Ok((feature_set, groups))
}

/// Compiles the defaults of `feature_set_type` and `extensions` for every
/// edition in `[minimum, maximum]`.
///
/// The table holds an entry for `LEGACY`, `minimum`, `maximum` and every
/// edition in range at which some feature declares a default, is introduced
/// or is removed.
///
/// # Errors
///
/// Fails with [`ResolveError::InvalidRange`] when `minimum > maximum`,
/// [`ResolveError::Shape`] for malformed feature definitions,
/// [`ResolveError::NoDefault`] when a feature has no default at a compiled
/// edition, and [`ResolveError::DefaultParse`] when a consulted default does
/// not parse.
pub fn compile_defaults(
	pool: &TypePool,
	feature_set_type: &str,
	extensions: &[String],
	minimum: &Edition,
	maximum: &Edition,
) -> Result<FeatureSetDefaults> {
	if minimum > maximum {
		return Err(ResolveError::InvalidRange {
			minimum: minimum.clone(),
			maximum: maximum.clone(),
		});
	}
	let (_, groups) = feature_groups(pool, feature_set_type, extensions)?;

	let mut features = Vec::new();
	for group in &groups {
		for field in group.message.features() {
			let full_name = group.message.field_full_name(field);
			let defaults = sorted_defaults(&full_name, field);
			features.push((group, field, full_name, defaults));
		}
	}

	let mut editions = BTreeSet::from([Edition::Legacy, minimum.clone(), maximum.clone()]);
	for (_, field, _, defaults) in &features {
		let bounds = field
			.feature_support
			.iter()
			.flat_map(|s| [&s.edition_introduced, &s.edition_removed])
			.flatten();
		editions.extend(
			defaults
				.iter()
				.map(|d| &d.edition)
				.chain(bounds)
				.filter(|e| *e >= minimum && *e <= maximum)
				.cloned(),
		);
	}

	let mut entries = Vec::with_capacity(editions.len());
	for edition in editions {
		let mut overridable = FeatureSet::new();
		let mut fixed = FeatureSet::new();
		for group in &groups {
			if let Some(name) = group.extension {
				overridable.extension_mut(name);
				fixed.extension_mut(name);
			}
		}
		for (group, field, full_name, defaults) in &features {
			let Some(value) = default_at(pool, full_name, field, defaults, &edition)? else {
				continue;
			};
			let payload = match mutability(field, &edition) {
				Mutability::Overridable => &mut overridable,
				Mutability::Fixed => &mut fixed,
			};
			group.store(payload, field, value);
		}
		tracing::debug!(
			domain = "features",
			edition = %edition,
			overridable = overridable.fields.len(),
			fixed = fixed.fields.len(),
			"compiled edition defaults",
		);
		entries.push(EditionDefaults {
			edition,
			overridable_features: overridable,
			fixed_features: fixed,
		});
	}

	Ok(FeatureSetDefaults {
		minimum_edition: minimum.clone(),
		maximum_edition: maximum.clone(),
		defaults: entries,
	})
}
