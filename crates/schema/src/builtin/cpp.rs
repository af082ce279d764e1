//! C++ generator features (`pb.cpp`).

use protofeat_edition::Edition;

use super::edition;
use crate::error::Result;
use crate::feature_set::FEATURE_SET;
use crate::pool::TypePool;
use crate::support::FeatureSupport;
use crate::target::{Target, TargetSet};
use crate::types::{EnumDef, EnumValueDef, ExtensionDef, FieldDef, MessageDef, ScalarType};

pub const EXTENSION: &str = "pb.cpp";
pub const MESSAGE: &str = "pb.CppFeatures";
pub const STRING_TYPE: &str = "pb.CppFeatures.StringType";

pub const LEGACY_CLOSED_ENUM: u32 = 1;
pub const STRING_TYPE_FIELD: u32 = 2;
pub const ENUM_NAME_USES_STRING_VIEW: u32 = 3;

const LEGACY_CLOSED_ENUM_WARNING: &str = "The legacy closed enum behavior in C++ is deprecated and is scheduled to be removed in edition 2025.  See http://protobuf.dev/programming-guides/enum/#cpp for more information.";

pub fn register(pool: &mut TypePool) -> Result<()> {
	pool.add_enum(
		EnumDef::new(STRING_TYPE)
			.value(EnumValueDef::new("STRING_TYPE_UNKNOWN", 0))
			.value(EnumValueDef::new("VIEW", 1))
			.value(EnumValueDef::new("CORD", 2))
			.value(EnumValueDef::new("STRING", 3)),
	)?;
	pool.add_message(
		MessageDef::new(MESSAGE)
			.field(
				FieldDef::scalar("legacy_closed_enum", LEGACY_CLOSED_ENUM, ScalarType::Bool)
					.targets(TargetSet::FIELD | TargetSet::FILE)
					.support(FeatureSupport::introduced(edition(2023)).deprecated(edition(2023), LEGACY_CLOSED_ENUM_WARNING))
					.default_at(Edition::Legacy, "true")
					.default_at(Edition::Proto3, "false"),
			)
			.field(
				FieldDef::enumeration("string_type", STRING_TYPE_FIELD, STRING_TYPE)
					.targets(TargetSet::FIELD | TargetSet::FILE)
					.support(FeatureSupport::introduced(edition(2023)))
					.default_at(Edition::Legacy, "STRING")
					.default_at(edition(2024), "VIEW"),
			)
			.field(
				FieldDef::scalar("enum_name_uses_string_view", ENUM_NAME_USES_STRING_VIEW, ScalarType::Bool)
					.targets([Target::Enum, Target::File].into_iter().collect::<TargetSet>())
					.support(FeatureSupport::introduced(edition(2024)))
					.default_at(Edition::Legacy, "false")
					.default_at(edition(2024), "true"),
			),
	)?;
	pool.add_extension(ExtensionDef::message(EXTENSION, 1000, FEATURE_SET, MESSAGE))
}
