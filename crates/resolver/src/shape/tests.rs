use protofeat_edition::Edition;
use protofeat_schema::builtin::register_core;
use protofeat_schema::feature_set::FEATURE_SET;
use protofeat_schema::{
	EnumDef, EnumValueDef, ExtensionDef, FeatureSupport, FieldDef, Label, MessageDef, ScalarType, Target,
	TypePool, fixtures,
};

use super::*;

const EXT: &str = "pb.bad";
const MESSAGE: &str = "pb.BadFeatures";
const ENUM: &str = "pb.BadEnum";

fn ed(n: u64) -> Edition {
	Edition::from_number(n)
}

fn enum_def() -> EnumDef {
	EnumDef::new(ENUM)
		.value(EnumValueDef::new("BAD_UNKNOWN", 0))
		.value(EnumValueDef::new("GOOD", 1))
}

/// A well-formed enum feature to mutate in individual tests.
fn feature() -> FieldDef {
	FieldDef::enumeration("feature", 1, ENUM)
		.targets(Target::Field)
		.support(FeatureSupport::introduced(ed(2023)))
		.default_at(Edition::Legacy, "GOOD")
}

fn pool_with(message: MessageDef, values: EnumDef) -> TypePool {
	let mut pool = TypePool::new();
	register_core(&mut pool).expect("core features");
	pool.add_enum(values).expect("enum");
	pool.add_message(message).expect("message");
	pool.add_extension(ExtensionDef::message(EXT, 9995, FEATURE_SET, MESSAGE))
		.expect("extension");
	pool
}

fn check(field: FieldDef) -> Result<()> {
	check_with(MessageDef::new(MESSAGE).field(field), enum_def())
}

fn check_with(message: MessageDef, values: EnumDef) -> Result<()> {
	let pool = pool_with(message, values);
	let feature_set = pool.require_message(FEATURE_SET).expect("feature set");
	validate_extension(&pool, feature_set, EXT).map(|_| ())
}

fn shape_message(result: Result<()>) -> String {
	match result {
		Err(ResolveError::Shape(message)) => message,
		other => panic!("expected a shape error, got {other:?}"),
	}
}

#[test]
fn bundled_features_are_valid() {
	let pool = fixtures::pool().expect("fixture pool");
	let feature_set = pool.require_message(FEATURE_SET).expect("feature set");
	validate_feature_message(&pool, feature_set).expect("core features");
	let (ext, message) = validate_extension(&pool, feature_set, fixtures::EXTENSION).expect("pb.test");
	assert_eq!(ext.full_name, fixtures::EXTENSION);
	assert_eq!(message.full_name, fixtures::MESSAGE);

	let pool = protofeat_schema::builtin::pool().expect("builtin pool");
	let feature_set = pool.require_message(FEATURE_SET).expect("feature set");
	for (name, _) in protofeat_schema::builtin::GENERATORS {
		validate_extension(&pool, feature_set, name).expect("generator features");
	}
}

#[test]
fn well_formed_feature_passes() {
	check(feature()).expect("valid feature");
}

#[test]
fn oneof_feature() {
	let message = shape_message(check(feature().in_oneof("choice")));
	assert_eq!(message, "Feature field pb.BadFeatures.feature is an unsupported oneof feature field.");
}

#[test]
fn required_and_repeated_features() {
	let message = shape_message(check(feature().label(Label::Required)));
	assert!(message.contains("unsupported required field"), "{message}");
	let message = shape_message(check(feature().label(Label::Repeated)));
	assert!(message.contains("unsupported repeated field"), "{message}");
}

#[test]
fn feature_without_target() {
	let mut field = feature();
	field.targets = Default::default();
	let message = shape_message(check(field));
	assert_eq!(message, "Feature field pb.BadFeatures.feature has no target specified.");
}

#[test]
fn integer_feature() {
	let field = FieldDef::scalar("feature", 1, ScalarType::Int32)
		.targets(Target::Field)
		.support(FeatureSupport::introduced(ed(2023)))
		.default_at(Edition::Legacy, "1");
	let message = shape_message(check(field));
	assert_eq!(message, "Feature field pb.BadFeatures.feature is not an enum or boolean.");
}

#[test]
fn message_feature_with_repeated_subfield() {
	let mut pool = pool_with(
		MessageDef::new(MESSAGE).field(
			FieldDef::message("feature", 1, "pb.Nested")
				.targets(Target::Field)
				.support(FeatureSupport::introduced(ed(2023)))
				.default_at(Edition::Legacy, ""),
		),
		enum_def(),
	);
	pool.add_message(
		MessageDef::new("pb.Nested").field(FieldDef::scalar("items", 1, ScalarType::Int32).label(Label::Repeated)),
	)
	.expect("nested");
	let feature_set = pool.require_message(FEATURE_SET).expect("feature set");
	let message = shape_message(validate_extension(&pool, feature_set, EXT).map(|_| ()));
	assert!(message.contains("unsupported subfield pb.Nested.items"), "{message}");
}

#[test]
fn missing_feature_support() {
	let mut field = feature();
	field.feature_support = None;
	let message = shape_message(check(field));
	assert_eq!(message, "Feature field pb.BadFeatures.feature has no feature support specified.");
}

#[test]
fn missing_introduced_edition() {
	let field = feature().support(FeatureSupport {
		edition_removed: Some(ed(2024)),
		..FeatureSupport::default()
	});
	let message = shape_message(check(field));
	assert!(message.contains("doesn't specify which edition it was introduced in"), "{message}");
}

#[test]
fn deprecation_warning_pairing() {
	let field = feature().support(FeatureSupport {
		edition_deprecated: Some(ed(2024)),
		..FeatureSupport::introduced(ed(2023))
	});
	let message = shape_message(check(field));
	assert!(message.contains("does not specify a deprecation warning"), "{message}");

	let field = feature().support(FeatureSupport {
		deprecation_warning: Some("stop".into()),
		..FeatureSupport::introduced(ed(2023))
	});
	let message = shape_message(check(field));
	assert!(message.contains("not marked deprecated"), "{message}");
}

#[test]
fn lifetime_ordering() {
	let field = feature().support(FeatureSupport::introduced(ed(2024)).deprecated(ed(2023), "old"));
	let message = shape_message(check(field));
	assert!(message.contains("deprecated before it was introduced"), "{message}");

	let field = feature().support(
		FeatureSupport::introduced(ed(2023))
			.deprecated(ed(2025), "old")
			.removed(ed(2024)),
	);
	let message = shape_message(check(field));
	assert!(message.contains("deprecated after it was removed"), "{message}");

	let field = feature().support(FeatureSupport::introduced(ed(2024)).removed(ed(2023)));
	let message = shape_message(check(field));
	assert!(message.contains("removed before it was introduced"), "{message}");
}

#[test]
fn default_after_removal() {
	let field = feature()
		.support(FeatureSupport::introduced(ed(2023)).removed(ed(2024)))
		.default_at(ed(2024), "GOOD");
	check(field).expect("a default at the removal edition is allowed");

	let field = feature()
		.support(FeatureSupport::introduced(ed(2023)).removed(ed(2024)))
		.default_at(ed(2025), "GOOD");
	let message = shape_message(check(field));
	assert_eq!(
		message,
		"Feature field pb.BadFeatures.feature has a default specified for edition 2025, after it was removed."
	);
}

#[test]
fn value_lifetime_bounded_by_feature() {
	let values = |support: FeatureSupport| {
		EnumDef::new(ENUM)
			.value(EnumValueDef::new("BAD_UNKNOWN", 0))
			.value(EnumValueDef::new("GOOD", 1).support(support))
	};
	let message = shape_message(check_with(
		MessageDef::new(MESSAGE).field(feature()),
		values(FeatureSupport::introduced(Edition::Proto3)),
	));
	assert_eq!(
		message,
		"Feature value pb.GOOD was introduced before feature pb.BadFeatures.feature was introduced."
	);

	let removed_feature = feature().support(FeatureSupport::introduced(ed(2023)).removed(ed(2024)));
	let message = shape_message(check_with(
		MessageDef::new(MESSAGE).field(removed_feature),
		values(FeatureSupport::introduced(ed(2023)).removed(ed(2025))),
	));
	assert!(message.contains("was removed after feature"), "{message}");

	let message = shape_message(check_with(
		MessageDef::new(MESSAGE).field(feature()),
		values(FeatureSupport::introduced(ed(2024)).removed(ed(2023))),
	));
	assert!(message.starts_with("Feature value pb.GOOD"), "{message}");
}

#[test]
fn extension_of_wrong_message() {
	let mut pool = pool_with(MessageDef::new(MESSAGE).field(feature()), enum_def());
	pool.add_message(MessageDef::new("pb.Other")).expect("other");
	pool.add_extension(ExtensionDef::message("pb.stray", 1000, "pb.Other", MESSAGE))
		.expect("stray");
	let feature_set = pool.require_message(FEATURE_SET).expect("feature set");
	let message = shape_message(validate_extension(&pool, feature_set, "pb.stray").map(|_| ()));
	assert_eq!(message, "Extension pb.stray is not an extension of google.protobuf.FeatureSet.");
}

#[test]
fn scalar_and_repeated_extensions() {
	let mut pool = pool_with(MessageDef::new(MESSAGE).field(feature()), enum_def());
	pool.add_extension(ExtensionDef {
		full_name: "pb.flag".into(),
		number: 9996,
		extendee: FEATURE_SET.into(),
		label: Label::Optional,
		ty: FieldType::Scalar(ScalarType::Bool),
	})
	.expect("flag");
	pool.add_extension(ExtensionDef::message("pb.many", 9997, FEATURE_SET, MESSAGE).label(Label::Repeated))
		.expect("many");
	let feature_set = pool.require_message(FEATURE_SET).expect("feature set");

	let message = shape_message(validate_extension(&pool, feature_set, "pb.flag").map(|_| ()));
	assert_eq!(message, "Feature extension pb.flag is not of message type.");
	let message = shape_message(validate_extension(&pool, feature_set, "pb.many").map(|_| ()));
	assert_eq!(
		message,
		"Only singular features extensions are supported. Found repeated extension pb.many."
	);
}

#[test]
fn nested_extensions() {
	let message = shape_message(check_with(
		MessageDef::new(MESSAGE).field(feature()).extension_range(100, 200),
		enum_def(),
	));
	assert_eq!(message, "Nested extensions in feature extension pb.bad are not supported.");
}

#[test]
fn unknown_extension() {
	let pool = fixtures::pool().expect("fixture pool");
	let feature_set = pool.require_message(FEATURE_SET).expect("feature set");
	let err = validate_extension(&pool, feature_set, "pb.missing").map(|_| ()).expect_err("unknown");
	assert!(matches!(err, ResolveError::Schema(_)), "{err:?}");
}
