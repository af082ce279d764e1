//! Java generator features (`pb.java`).

use protofeat_edition::Edition;

use super::edition;
use crate::error::Result;
use crate::feature_set::FEATURE_SET;
use crate::pool::TypePool;
use crate::support::FeatureSupport;
use crate::target::TargetSet;
use crate::types::{EnumDef, EnumValueDef, ExtensionDef, FieldDef, MessageDef, ScalarType};

pub const EXTENSION: &str = "pb.java";
pub const MESSAGE: &str = "pb.JavaFeatures";
pub const UTF8_VALIDATION: &str = "pb.JavaFeatures.Utf8Validation";

const LEGACY_CLOSED_ENUM_WARNING: &str = "The legacy closed enum treatment in Java is deprecated and is scheduled to be removed in edition 2025.  Mark enum type on the enum definitions themselves rather than on fields.";
const UTF8_VALIDATION_WARNING: &str = "The Java-specific utf8 validation feature is deprecated and is scheduled to be removed in edition 2025.  Utf8 validation behavior should use the global cross-language utf8_validation feature.";

pub fn register(pool: &mut TypePool) -> Result<()> {
	pool.add_enum(
		EnumDef::new(UTF8_VALIDATION)
			.value(EnumValueDef::new("UTF8_VALIDATION_UNKNOWN", 0))
			.value(EnumValueDef::new("DEFAULT", 1))
			.value(EnumValueDef::new("VERIFY", 2)),
	)?;
	pool.add_message(
		MessageDef::new(MESSAGE)
			.field(
				FieldDef::scalar("legacy_closed_enum", 1, ScalarType::Bool)
					.targets(TargetSet::FIELD | TargetSet::FILE)
					.support(FeatureSupport::introduced(edition(2023)).deprecated(edition(2023), LEGACY_CLOSED_ENUM_WARNING))
					.default_at(Edition::Legacy, "true")
					.default_at(Edition::Proto3, "false"),
			)
			.field(
				FieldDef::enumeration("utf8_validation", 2, UTF8_VALIDATION)
					.targets(TargetSet::FIELD | TargetSet::FILE)
					.support(FeatureSupport::introduced(edition(2023)).deprecated(edition(2024), UTF8_VALIDATION_WARNING))
					.default_at(Edition::Legacy, "DEFAULT"),
			)
			.field(
				FieldDef::scalar("large_enum", 3, ScalarType::Bool)
					.targets(TargetSet::ENUM)
					.support(FeatureSupport::introduced(edition(2024)))
					.default_at(Edition::Legacy, "false"),
			)
			.field(
				FieldDef::scalar("use_old_outer_classname_default", 4, ScalarType::Bool)
					.targets(TargetSet::FILE)
					.support(FeatureSupport::introduced(edition(2024)).removed(edition(2025)))
					.default_at(Edition::Legacy, "true")
					.default_at(edition(2024), "false"),
			),
	)?;
	pool.add_extension(ExtensionDef::message(EXTENSION, 1001, FEATURE_SET, MESSAGE))
}
