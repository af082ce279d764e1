//! Built-in feature definitions.
//!
//! [`register_core`] installs `google.protobuf.FeatureSet` and its enums.
//! Generator catalogs ([`cpp`], [`java`]) install a feature message and the
//! extension that plugs it into the core set.

use protofeat_edition::Edition;

use crate::error::Result;
use crate::feature_set::{
	self, EnforceNamingStyle, EnumType, FEATURE_SET, FieldPresence, JsonFormat, MessageEncoding,
	RepeatedFieldEncoding, Utf8Validation,
};
use crate::pool::TypePool;
use crate::support::FeatureSupport;
use crate::target::{Target, TargetSet};
use crate::types::{FieldDef, MessageDef};

pub mod cpp;
pub mod java;

/// Installs a generator's feature message and extension into a pool.
pub type RegisterFn = fn(&mut TypePool) -> Result<()>;

/// Bundled generator catalogs keyed by extension name.
pub const GENERATORS: &[(&str, RegisterFn)] = &[
	(cpp::EXTENSION, cpp::register),
	(java::EXTENSION, java::register),
];

/// Looks up a bundled generator catalog by extension name.
pub fn generator(extension: &str) -> Option<RegisterFn> {
	GENERATORS
		.iter()
		.find(|(name, _)| *name == extension)
		.map(|(_, register)| *register)
}

pub(crate) fn edition(number: u64) -> Edition {
	Edition::from_number(number)
}

/// The core feature-set message.
pub fn feature_set_message() -> MessageDef {
	let file_and = |targets: &[Target]| targets.iter().copied().chain([Target::File]).collect::<TargetSet>();
	let since_2023 = || FeatureSupport::introduced(edition(2023));

	MessageDef::new(FEATURE_SET)
		.field(
			FieldDef::enumeration("field_presence", feature_set::FIELD_PRESENCE, FieldPresence::TYPE_NAME)
				.targets(file_and(&[Target::Field]))
				.support(since_2023())
				.default_at(Edition::Legacy, "EXPLICIT")
				.default_at(Edition::Proto3, "IMPLICIT")
				.default_at(edition(2023), "EXPLICIT"),
		)
		.field(
			FieldDef::enumeration("enum_type", feature_set::ENUM_TYPE, EnumType::TYPE_NAME)
				.targets(file_and(&[Target::Enum]))
				.support(since_2023())
				.default_at(Edition::Legacy, "CLOSED")
				.default_at(Edition::Proto3, "OPEN"),
		)
		.field(
			FieldDef::enumeration(
				"repeated_field_encoding",
				feature_set::REPEATED_FIELD_ENCODING,
				RepeatedFieldEncoding::TYPE_NAME,
			)
			.targets(file_and(&[Target::Field]))
			.support(since_2023())
			.default_at(Edition::Legacy, "EXPANDED")
			.default_at(Edition::Proto3, "PACKED"),
		)
		.field(
			FieldDef::enumeration("utf8_validation", feature_set::UTF8_VALIDATION, Utf8Validation::TYPE_NAME)
				.targets(file_and(&[Target::Field]))
				.support(since_2023())
				.default_at(Edition::Legacy, "NONE")
				.default_at(Edition::Proto3, "VERIFY"),
		)
		.field(
			FieldDef::enumeration("message_encoding", feature_set::MESSAGE_ENCODING, MessageEncoding::TYPE_NAME)
				.targets(file_and(&[Target::Field]))
				.support(since_2023())
				.default_at(Edition::Legacy, "LENGTH_PREFIXED"),
		)
		.field(
			FieldDef::enumeration("json_format", feature_set::JSON_FORMAT, JsonFormat::TYPE_NAME)
				.targets(file_and(&[Target::Message, Target::Enum]))
				.support(since_2023())
				.default_at(Edition::Legacy, "LEGACY_BEST_EFFORT")
				.default_at(Edition::Proto3, "ALLOW"),
		)
		.field(
			FieldDef::enumeration(
				"enforce_naming_style",
				feature_set::ENFORCE_NAMING_STYLE,
				EnforceNamingStyle::TYPE_NAME,
			)
			.targets(Target::ALL.into_iter().collect::<TargetSet>())
			.support(FeatureSupport::introduced(edition(2024)))
			.default_at(Edition::Legacy, "STYLE_LEGACY")
			.default_at(edition(2024), "STYLE2024"),
		)
		.field(FieldDef::message("raw_features", feature_set::RAW_FEATURES, FEATURE_SET))
		.extension_range(1000, 10001)
}

/// Installs the core feature-set message and its enums.
pub fn register_core(pool: &mut TypePool) -> Result<()> {
	pool.add_enum(FieldPresence::enum_def())?;
	pool.add_enum(EnumType::enum_def())?;
	pool.add_enum(RepeatedFieldEncoding::enum_def())?;
	pool.add_enum(Utf8Validation::enum_def())?;
	pool.add_enum(MessageEncoding::enum_def())?;
	pool.add_enum(JsonFormat::enum_def())?;
	pool.add_enum(EnforceNamingStyle::enum_def())?;
	pool.add_message(feature_set_message())
}

/// A pool holding the core feature set and every bundled generator catalog.
pub fn pool() -> Result<TypePool> {
	let mut pool = TypePool::new();
	register_core(&mut pool)?;
	for (_, register) in GENERATORS {
		register(&mut pool)?;
	}
	Ok(pool)
}
