//! Features implied by `proto2`/`proto3` constructs.
//!
//! Legacy files cannot write features; the behavior their syntax selects is
//! expressed as features on the field instead, so resolution treats both
//! worlds uniformly.

use protofeat_schema::feature_set::{FIELD_PRESENCE, MESSAGE_ENCODING, REPEATED_FIELD_ENCODING};
use protofeat_schema::{FeatureSet, FieldPresence, Label, MessageEncoding, RepeatedFieldEncoding};

use crate::error::BuildError;
use crate::proto::{FieldKind, FieldProto, Syntax};

/// Features a legacy-syntax field implies.
pub fn infer_field_features(syntax: Syntax, field: &FieldProto) -> FeatureSet {
	let mut features = FeatureSet::new();
	if syntax == Syntax::Editions {
		return features;
	}
	if field.label == Label::Required {
		features.set(FIELD_PRESENCE, FieldPresence::LegacyRequired);
	}
	if field.kind == FieldKind::Group {
		features.set(MESSAGE_ENCODING, MessageEncoding::Delimited);
	}
	match (syntax, field.packed) {
		(Syntax::Proto2, Some(true)) => features.set(REPEATED_FIELD_ENCODING, RepeatedFieldEncoding::Packed),
		(Syntax::Proto3, Some(false)) => features.set(REPEATED_FIELD_ENCODING, RepeatedFieldEncoding::Expanded),
		_ => {}
	}
	features
}

/// Rejects `packed = true` on a `proto2`/`proto3` field that is not a
/// repeated primitive.
pub fn check_legacy_field(name: &str, field: &FieldProto) -> Result<(), BuildError> {
	if field.packed == Some(true) && !(field.label == Label::Repeated && field.kind.is_packable()) {
		return Err(BuildError::NotPackable { name: name.to_string() });
	}
	Ok(())
}

/// Rejects legacy constructs in an editions file field.
pub fn check_editions_field(name: &str, field: &FieldProto) -> Result<(), BuildError> {
	let reject = |construct, replacement| BuildError::NotAllowedInEditions {
		name: name.to_string(),
		construct,
		replacement,
	};
	if field.label == Label::Required {
		return Err(reject(
			"Required label",
			"Use the feature field_presence = LEGACY_REQUIRED to control this behavior.",
		));
	}
	if field.kind == FieldKind::Group {
		return Err(reject(
			"Group syntax",
			"Use a message field with the feature message_encoding = DELIMITED instead.",
		));
	}
	if field.packed.is_some() {
		return Err(reject(
			"Field option packed",
			"Use the repeated_field_encoding feature to control this behavior.",
		));
	}
	Ok(())
}
