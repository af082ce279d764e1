//! Lifetime validation of explicitly set features.
//!
//! Unlike resolution, this looks only at the features a descriptor sets
//! itself and reports each one used outside its lifetime. Enum values carry
//! their own lifetimes and are checked the same way.

use protofeat_edition::Edition;
use protofeat_schema::{DynamicMessage, FeatureSet, FeatureSupport, FieldType, MessageDef, TypePool, Value};

use crate::error::Result;

/// Findings of [`validate_feature_lifetimes`]: errors reject the descriptor,
/// warnings are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifetimeReport {
	pub errors: Vec<String>,
	pub warnings: Vec<String>,
}

impl LifetimeReport {
	pub fn is_clean(&self) -> bool {
		self.errors.is_empty() && self.warnings.is_empty()
	}

	fn check(&mut self, name: &str, support: &FeatureSupport, edition: &Edition) {
		if !support.is_introduced_at(edition)
			&& let Some(introduced) = &support.edition_introduced
		{
			self.errors.push(format!(
				"{name} wasn't introduced until edition {introduced} and can't be used in edition {edition}"
			));
		}
		if support.is_removed_at(edition)
			&& let Some(removed) = &support.edition_removed
		{
			self.errors.push(format!(
				"{name} has been removed in edition {removed} and can't be used in edition {edition}"
			));
		} else if support.is_deprecated_at(edition)
			&& let Some(deprecated) = &support.edition_deprecated
		{
			let warning = support.deprecation_warning.as_deref().unwrap_or_default();
			self.warnings
				.push(format!("{name} has been deprecated in edition {deprecated}: {warning}"));
		}
	}
}

/// Validates the lifetimes of every feature set in `raw`, including features
/// of extensions known to `pool`. Unknown extensions are skipped.
pub fn validate_feature_lifetimes(
	pool: &TypePool,
	feature_set_type: &str,
	edition: &Edition,
	raw: &FeatureSet,
) -> Result<LifetimeReport> {
	let mut report = LifetimeReport::default();
	let feature_set = pool.require_message(feature_set_type)?;
	check_message(pool, feature_set, raw, edition, &mut report);
	for (name, values) in &raw.extensions {
		let Some(ext) = pool.extension(name) else {
			tracing::trace!(domain = "features", extension = %name, "skipping unknown extension");
			continue;
		};
		let Some(message) = pool.message(ext.ty.type_name()) else {
			continue;
		};
		check_message(pool, message, values, edition, &mut report);
	}
	Ok(report)
}

fn check_message(
	pool: &TypePool,
	message: &MessageDef,
	values: &DynamicMessage,
	edition: &Edition,
	report: &mut LifetimeReport,
) {
	for field in message.features() {
		let Some(value) = values.get(field.number) else {
			continue;
		};
		let name = message.field_full_name(field);
		if let Some(support) = &field.feature_support {
			report.check(&name, support, edition);
		}
		let (FieldType::Enum(ty), Value::Enum(number)) = (&field.ty, value) else {
			continue;
		};
		let Some(def) = pool.enumeration(ty) else {
			continue;
		};
		let Some(entry) = def.by_number(*number) else {
			report
				.errors
				.push(format!("Feature {name} has no known value {number}"));
			continue;
		};
		if let Some(support) = &entry.feature_support {
			report.check(&def.value_full_name(entry), support, edition);
		}
	}
}
