//! Test feature catalog (`pb.test`).
//!
//! Exercises every corner of feature resolution: per-target features,
//! message-valued defaults spread over several editions, features that are
//! not yet introduced or already removed, and enum values with their own
//! lifetimes. Enabled by the `fixtures` cargo feature.

use protofeat_edition::Edition;

use crate::builtin::{edition, register_core};
use crate::error::Result;
use crate::feature_set::FEATURE_SET;
use crate::pool::TypePool;
use crate::support::FeatureSupport;
use crate::target::{Target, TargetSet};
use crate::types::{EnumDef, EnumValueDef, ExtensionDef, FieldDef, MessageDef, ScalarType};

pub const EXTENSION: &str = "pb.test";
pub const MESSAGE: &str = "pb.TestFeatures";
pub const ENUM_FEATURE: &str = "pb.EnumFeature";
pub const VALUE_LIFETIME: &str = "pb.ValueLifetimeFeature";
pub const MESSAGE_FEATURE: &str = "pb.MessageFeature";

pub const DEPRECATION_WARNING: &str = "Custom feature deprecation warning";

pub const FILE_FEATURE: u32 = 1;
pub const EXTENSION_RANGE_FEATURE: u32 = 2;
pub const MESSAGE_FEATURE_FIELD: u32 = 3;
pub const FIELD_FEATURE: u32 = 4;
pub const ONEOF_FEATURE: u32 = 5;
pub const ENUM_FEATURE_FIELD: u32 = 6;
pub const ENUM_ENTRY_FEATURE: u32 = 7;
pub const SERVICE_FEATURE: u32 = 8;
pub const METHOD_FEATURE: u32 = 9;
pub const MULTIPLE_FEATURE: u32 = 10;
pub const BOOL_FIELD_FEATURE: u32 = 11;
pub const MESSAGE_FIELD_FEATURE: u32 = 12;
pub const FUTURE_FEATURE: u32 = 13;
pub const LEGACY_FEATURE: u32 = 14;
pub const REMOVED_FEATURE: u32 = 15;
pub const VALUE_LIFETIME_FEATURE: u32 = 17;

fn test_only(number: u64) -> Edition {
	Edition::test_only(number)
}

fn enum_feature() -> EnumDef {
	(1..=8).fold(
		EnumDef::new(ENUM_FEATURE).value(EnumValueDef::new("TEST_ENUM_FEATURE_UNKNOWN", 0)),
		|def, n| def.value(EnumValueDef::new(format!("VALUE{n}"), n)),
	)
}

fn value_lifetime() -> EnumDef {
	EnumDef::new(VALUE_LIFETIME)
		.value(EnumValueDef::new("TEST_VALUE_LIFETIME_UNKNOWN", 0))
		.value(EnumValueDef::new("VALUE_LIFETIME_INHERITED", 1))
		.value(
			EnumValueDef::new("VALUE_LIFETIME_SUPPORT", 2).support(
				FeatureSupport::introduced(edition(2023))
					.deprecated(test_only(99998), DEPRECATION_WARNING)
					.removed(test_only(99999)),
			),
		)
		.value(EnumValueDef::new("VALUE_LIFETIME_EMPTY_SUPPORT", 3).support(FeatureSupport::default()))
		.value(
			EnumValueDef::new("VALUE_LIFETIME_FUTURE", 4)
				.support(FeatureSupport::introduced(test_only(99997))),
		)
		.value(EnumValueDef::new("VALUE_LIFETIME_DEPRECATED", 5).support(FeatureSupport {
			edition_deprecated: Some(test_only(99997)),
			deprecation_warning: Some(DEPRECATION_WARNING.to_string()),
			..FeatureSupport::default()
		}))
		.value(
			EnumValueDef::new("VALUE_LIFETIME_REMOVED", 6).support(
				FeatureSupport::introduced(edition(2023))
					.deprecated(edition(2024), DEPRECATION_WARNING)
					.removed(test_only(99997)),
			),
		)
}

fn message_feature() -> MessageDef {
	MessageDef::new(MESSAGE_FEATURE)
		.field(FieldDef::scalar("bool_field", 1, ScalarType::Bool))
		.field(FieldDef::scalar("int_field", 2, ScalarType::Int32))
		.field(FieldDef::scalar("float_field", 3, ScalarType::Float))
		.field(FieldDef::scalar("string_field", 4, ScalarType::String))
}

fn single_target(name: &str, number: u32, target: Target) -> FieldDef {
	FieldDef::enumeration(name, number, ENUM_FEATURE)
		.targets(target)
		.support(FeatureSupport::introduced(edition(2023)))
		.default_at(Edition::Legacy, "VALUE1")
}

/// The `pb.TestFeatures` message.
pub fn test_features() -> MessageDef {
	let all = Target::ALL.into_iter().collect::<TargetSet>();
	let since_2023 = || FeatureSupport::introduced(edition(2023));

	MessageDef::new(MESSAGE)
		.field(
			FieldDef::enumeration("file_feature", FILE_FEATURE, ENUM_FEATURE)
				.targets(all)
				.support(since_2023())
				.default_at(Edition::Legacy, "VALUE1")
				.default_at(Edition::Proto3, "VALUE2")
				.default_at(edition(2023), "VALUE3")
				.default_at(edition(2024), "VALUE3")
				.default_at(edition(2025), "VALUE4")
				.default_at(test_only(99998), "VALUE5"),
		)
		.field(single_target("extension_range_feature", EXTENSION_RANGE_FEATURE, Target::ExtensionRange))
		.field(single_target("message_feature", MESSAGE_FEATURE_FIELD, Target::Message))
		.field(single_target("field_feature", FIELD_FEATURE, Target::Field))
		.field(single_target("oneof_feature", ONEOF_FEATURE, Target::Oneof))
		.field(single_target("enum_feature", ENUM_FEATURE_FIELD, Target::Enum))
		.field(single_target("enum_entry_feature", ENUM_ENTRY_FEATURE, Target::EnumEntry))
		.field(single_target("service_feature", SERVICE_FEATURE, Target::Service))
		.field(single_target("method_feature", METHOD_FEATURE, Target::Method))
		.field(
			FieldDef::enumeration("multiple_feature", MULTIPLE_FEATURE, ENUM_FEATURE)
				.targets(all)
				.support(since_2023())
				.default_at(Edition::Legacy, "VALUE1"),
		)
		.field(
			FieldDef::scalar("bool_field_feature", BOOL_FIELD_FEATURE, ScalarType::Bool)
				.targets(TargetSet::FIELD | TargetSet::FILE)
				.support(since_2023())
				.default_at(Edition::Legacy, "false")
				.default_at(test_only(99997), "true"),
		)
		.field(
			FieldDef::message("message_field_feature", MESSAGE_FIELD_FEATURE, MESSAGE_FEATURE)
				.targets(TargetSet::FIELD | TargetSet::FILE)
				.support(since_2023())
				.default_at(Edition::Legacy, "")
				.default_at(edition(2023), "bool_field: true int_field: 1 string_field: \"2023\"")
				.default_at(Edition::from_segments(&[2023, 1]), "int_field: 2")
				.default_at(edition(2024), "string_field: \"2024\""),
		)
		.field(
			FieldDef::enumeration("future_feature", FUTURE_FEATURE, ENUM_FEATURE)
				.targets(TargetSet::FIELD | TargetSet::FILE)
				.support(FeatureSupport::introduced(edition(2024)))
				.default_at(Edition::Legacy, "VALUE1")
				.default_at(edition(2024), "VALUE2"),
		)
		.field(
			FieldDef::enumeration("legacy_feature", LEGACY_FEATURE, ENUM_FEATURE)
				.targets(TargetSet::FIELD | TargetSet::FILE)
				.support(FeatureSupport::introduced(Edition::Proto2).removed(edition(2023)))
				.default_at(Edition::Legacy, "VALUE1")
				.default_at(edition(2023), "VALUE2"),
		)
		.field(
			FieldDef::enumeration("removed_feature", REMOVED_FEATURE, ENUM_FEATURE)
				.targets(TargetSet::FIELD | TargetSet::FILE)
				.support(
					FeatureSupport::introduced(edition(2023))
						.deprecated(edition(2023), DEPRECATION_WARNING)
						.removed(edition(2024)),
				)
				.default_at(Edition::Legacy, "VALUE1")
				.default_at(edition(2023), "VALUE2")
				.default_at(edition(2024), "VALUE3"),
		)
		.field(
			FieldDef::enumeration("value_lifetime_feature", VALUE_LIFETIME_FEATURE, VALUE_LIFETIME)
				.targets(TargetSet::FIELD | TargetSet::FILE)
				.support(since_2023().deprecated(test_only(99998), DEPRECATION_WARNING))
				.default_at(Edition::Legacy, "VALUE_LIFETIME_INHERITED"),
		)
}

/// Installs the `pb.test` catalog.
pub fn register(pool: &mut TypePool) -> Result<()> {
	pool.add_enum(enum_feature())?;
	pool.add_enum(value_lifetime())?;
	pool.add_message(message_feature())?;
	pool.add_message(test_features())?;
	pool.add_extension(ExtensionDef::message(EXTENSION, 9999, FEATURE_SET, MESSAGE))
}

/// A pool holding the core feature set and the `pb.test` catalog.
pub fn pool() -> Result<TypePool> {
	let mut pool = TypePool::new();
	register_core(&mut pool)?;
	register(&mut pool)?;
	Ok(pool)
}
