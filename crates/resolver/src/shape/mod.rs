//! Structural validation of feature messages and feature extensions.
//!
//! A feature message may only contain singular, non-oneof, enum, bool or
//! message fields, each declaring at least one target, a consistent lifetime
//! and no defaults past its removal. Feature extensions must be singular,
//! message-typed extensions of the feature-set type whose message satisfies
//! the same rules and declares no nested extensions.

use protofeat_edition::Edition;
use protofeat_schema::{ExtensionDef, FieldDef, FieldType, Label, MessageDef, ScalarType, TypePool};

use crate::error::{ResolveError, Result};

#[cfg(test)]
mod tests;

fn shape(message: String) -> ResolveError {
	ResolveError::Shape(message)
}

/// Validates every feature field of `message`.
pub fn validate_feature_message(pool: &TypePool, message: &MessageDef) -> Result<()> {
	for field in message.features() {
		validate_feature_field(pool, &message.field_full_name(field), field)?;
	}
	Ok(())
}

fn validate_feature_field(pool: &TypePool, name: &str, field: &FieldDef) -> Result<()> {
	if field.oneof.is_some() {
		return Err(shape(format!("Feature field {name} is an unsupported oneof feature field.")));
	}
	match field.label {
		Label::Required => return Err(shape(format!("Feature field {name} is an unsupported required field."))),
		Label::Repeated => return Err(shape(format!("Feature field {name} is an unsupported repeated field."))),
		Label::Optional => {}
	}
	if field.targets.is_empty() {
		return Err(shape(format!("Feature field {name} has no target specified.")));
	}
	match &field.ty {
		FieldType::Scalar(ScalarType::Bool) | FieldType::Enum(_) => {}
		FieldType::Message(ty) => validate_message_value(pool, name, ty)?,
		FieldType::Scalar(_) => {
			return Err(shape(format!("Feature field {name} is not an enum or boolean.")));
		}
	}

	let Some(support) = &field.feature_support else {
		return Err(shape(format!("Feature field {name} has no feature support specified.")));
	};
	support
		.check_consistency()
		.map_err(|issue| shape(format!("Feature field {name} {issue}.")))?;
	if let Some(removed) = &support.edition_removed {
		for default in &field.edition_defaults {
			if default.edition != Edition::Legacy && default.edition > *removed {
				return Err(shape(format!(
					"Feature field {name} has a default specified for edition {}, after it was removed.",
					default.edition
				)));
			}
		}
	}

	if let FieldType::Enum(ty) = &field.ty {
		validate_enum_values(pool, name, field, ty)?;
	}
	Ok(())
}

/// Subfields of a message-valued feature are plain singular values.
fn validate_message_value(pool: &TypePool, name: &str, ty: &str) -> Result<()> {
	let message = pool.require_message(ty)?;
	for sub in &message.fields {
		if sub.label == Label::Repeated || sub.ty.is_message() {
			return Err(shape(format!(
				"Feature field {name} has unsupported subfield {}; only singular scalar and enum subfields are supported.",
				message.field_full_name(sub)
			)));
		}
	}
	Ok(())
}

fn validate_enum_values(pool: &TypePool, name: &str, field: &FieldDef, ty: &str) -> Result<()> {
	let def = pool.require_enum(ty)?;
	let Some(feature) = &field.feature_support else {
		return Ok(());
	};
	for value in &def.values {
		let Some(support) = &value.feature_support else {
			continue;
		};
		let value_name = def.value_full_name(value);
		support
			.check_ordering()
			.map_err(|issue| shape(format!("Feature value {value_name} {issue}.")))?;
		if let (Some(introduced), Some(feature_introduced)) =
			(&support.edition_introduced, &feature.edition_introduced)
			&& introduced < feature_introduced
		{
			return Err(shape(format!(
				"Feature value {value_name} was introduced before feature {name} was introduced."
			)));
		}
		if let (Some(removed), Some(feature_removed)) = (&support.edition_removed, &feature.edition_removed)
			&& removed > feature_removed
		{
			return Err(shape(format!(
				"Feature value {value_name} was removed after feature {name} was removed."
			)));
		}
		if let (Some(deprecated), Some(feature_deprecated)) =
			(&support.edition_deprecated, &feature.edition_deprecated)
			&& deprecated > feature_deprecated
		{
			return Err(shape(format!(
				"Feature value {value_name} was deprecated after feature {name} was deprecated."
			)));
		}
	}
	Ok(())
}

/// Validates extension `name` as a feature extension of `feature_set` and
/// returns it together with its feature message.
pub fn validate_extension<'p>(
	pool: &'p TypePool,
	feature_set: &MessageDef,
	name: &str,
) -> Result<(&'p ExtensionDef, &'p MessageDef)> {
	let ext = pool.require_extension(name)?;
	if ext.extendee != feature_set.full_name {
		return Err(shape(format!(
			"Extension {name} is not an extension of {}.",
			feature_set.full_name
		)));
	}
	let FieldType::Message(ty) = &ext.ty else {
		return Err(shape(format!("Feature extension {name} is not of message type.")));
	};
	if ext.label == Label::Repeated {
		return Err(shape(format!(
			"Only singular features extensions are supported. Found repeated extension {name}."
		)));
	}
	let message = pool.require_message(ty)?;
	if !message.nested_extensions.is_empty() || !message.extension_ranges.is_empty() {
		return Err(shape(format!(
			"Nested extensions in feature extension {name} are not supported."
		)));
	}
	validate_feature_message(pool, message)?;
	Ok((ext, message))
}
