//! Feature-set values and the typed core features.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::types::{EnumDef, EnumValueDef};
use crate::value::{DynamicMessage, Value};

/// Full name of the core feature-set message.
pub const FEATURE_SET: &str = "google.protobuf.FeatureSet";

pub const FIELD_PRESENCE: u32 = 1;
pub const ENUM_TYPE: u32 = 2;
pub const REPEATED_FIELD_ENCODING: u32 = 3;
pub const UTF8_VALIDATION: u32 = 4;
pub const MESSAGE_ENCODING: u32 = 5;
pub const JSON_FORMAT: u32 = 6;
pub const ENFORCE_NAMING_STYLE: u32 = 7;
pub const RAW_FEATURES: u32 = 999;

/// Declares a typed core feature enum together with its [`EnumDef`].
///
/// The zero value is the enum's `*_UNKNOWN` sentinel and has no Rust variant.
macro_rules! feature_enum {
	(
		$(#[$meta:meta])*
		$name:ident = $type_name:literal, unknown = $unknown:literal {
			$($variant:ident = $number:literal => $label:literal),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum $name {
			$($variant = $number),+
		}

		impl $name {
			/// Full name of the enum type.
			pub const TYPE_NAME: &'static str = $type_name;

			pub const fn number(self) -> i32 {
				self as i32
			}

			pub const fn name(self) -> &'static str {
				match self {
					$(Self::$variant => $label),+
				}
			}

			pub fn from_number(number: i32) -> Option<Self> {
				match number {
					$($number => Some(Self::$variant),)+
					_ => None,
				}
			}

			pub fn enum_def() -> EnumDef {
				EnumDef::new($type_name)
					.value(EnumValueDef::new($unknown, 0))
					$(.value(EnumValueDef::new($label, $number)))+
			}
		}

		impl From<$name> for Value {
			fn from(v: $name) -> Self {
				Value::Enum(v.number())
			}
		}
	};
}

feature_enum! {
	FieldPresence = "google.protobuf.FeatureSet.FieldPresence", unknown = "FIELD_PRESENCE_UNKNOWN" {
		Explicit = 1 => "EXPLICIT",
		Implicit = 2 => "IMPLICIT",
		LegacyRequired = 3 => "LEGACY_REQUIRED",
	}
}

feature_enum! {
	EnumType = "google.protobuf.FeatureSet.EnumType", unknown = "ENUM_TYPE_UNKNOWN" {
		Open = 1 => "OPEN",
		Closed = 2 => "CLOSED",
	}
}

feature_enum! {
	RepeatedFieldEncoding = "google.protobuf.FeatureSet.RepeatedFieldEncoding", unknown = "REPEATED_FIELD_ENCODING_UNKNOWN" {
		Packed = 1 => "PACKED",
		Expanded = 2 => "EXPANDED",
	}
}

feature_enum! {
	Utf8Validation = "google.protobuf.FeatureSet.Utf8Validation", unknown = "UTF8_VALIDATION_UNKNOWN" {
		Verify = 2 => "VERIFY",
		None = 3 => "NONE",
	}
}

feature_enum! {
	MessageEncoding = "google.protobuf.FeatureSet.MessageEncoding", unknown = "MESSAGE_ENCODING_UNKNOWN" {
		LengthPrefixed = 1 => "LENGTH_PREFIXED",
		Delimited = 2 => "DELIMITED",
	}
}

feature_enum! {
	JsonFormat = "google.protobuf.FeatureSet.JsonFormat", unknown = "JSON_FORMAT_UNKNOWN" {
		Allow = 1 => "ALLOW",
		LegacyBestEffort = 2 => "LEGACY_BEST_EFFORT",
	}
}

feature_enum! {
	EnforceNamingStyle = "google.protobuf.FeatureSet.EnforceNamingStyle", unknown = "ENFORCE_NAMING_STYLE_UNKNOWN" {
		Style2024 = 1 => "STYLE2024",
		StyleLegacy = 2 => "STYLE_LEGACY",
	}
}

/// A bag of feature values: a [`DynamicMessage`] of the feature-set type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(DynamicMessage);

impl FeatureSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, number: u32, value: impl Into<Value>) -> Self {
		self.0.set(number, value);
		self
	}

	pub fn with_extension(mut self, name: impl Into<String>, message: DynamicMessage) -> Self {
		self.0.extensions.insert(name.into(), message);
		self
	}

	pub fn into_message(self) -> DynamicMessage {
		self.0
	}

	fn typed<T>(&self, number: u32, decode: fn(i32) -> Option<T>) -> Option<T> {
		self.0.get(number).and_then(Value::as_enum).and_then(decode)
	}

	pub fn field_presence(&self) -> Option<FieldPresence> {
		self.typed(FIELD_PRESENCE, FieldPresence::from_number)
	}

	pub fn enum_type(&self) -> Option<EnumType> {
		self.typed(ENUM_TYPE, EnumType::from_number)
	}

	pub fn repeated_field_encoding(&self) -> Option<RepeatedFieldEncoding> {
		self.typed(REPEATED_FIELD_ENCODING, RepeatedFieldEncoding::from_number)
	}

	pub fn utf8_validation(&self) -> Option<Utf8Validation> {
		self.typed(UTF8_VALIDATION, Utf8Validation::from_number)
	}

	pub fn message_encoding(&self) -> Option<MessageEncoding> {
		self.typed(MESSAGE_ENCODING, MessageEncoding::from_number)
	}

	pub fn json_format(&self) -> Option<JsonFormat> {
		self.typed(JSON_FORMAT, JsonFormat::from_number)
	}

	pub fn enforce_naming_style(&self) -> Option<EnforceNamingStyle> {
		self.typed(ENFORCE_NAMING_STYLE, EnforceNamingStyle::from_number)
	}
}

impl Deref for FeatureSet {
	type Target = DynamicMessage;

	fn deref(&self) -> &DynamicMessage {
		&self.0
	}
}

impl DerefMut for FeatureSet {
	fn deref_mut(&mut self) -> &mut DynamicMessage {
		&mut self.0
	}
}

impl From<DynamicMessage> for FeatureSet {
	fn from(message: DynamicMessage) -> Self {
		Self(message)
	}
}

impl From<FeatureSet> for Value {
	fn from(features: FeatureSet) -> Self {
		Value::Message(features.0)
	}
}
