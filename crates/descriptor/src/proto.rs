//! Serializable file descriptions fed to the [`crate::DescriptorPool`].
//!
//! The shape follows `FileDescriptorProto` loosely. Features are written in
//! text format against the feature-set type, e.g.
//! `"features": "field_presence: IMPLICIT [pb.cpp] { string_type: VIEW }"`.

use protofeat_edition::Edition;
use protofeat_schema::Label;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// How a file declares its dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
	#[default]
	Proto2,
	Proto3,
	Editions,
}

/// Wire type of a described field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
	Double,
	Float,
	Int32,
	Int64,
	Uint32,
	Uint64,
	Sint32,
	Sint64,
	Fixed32,
	Fixed64,
	Sfixed32,
	Sfixed64,
	Bool,
	String,
	Bytes,
	Enum,
	Message,
	/// Proto2 group: a message with delimited encoding.
	Group,
}

impl FieldKind {
	/// Whether repeated fields of this kind may use packed encoding.
	pub fn is_packable(self) -> bool {
		!matches!(self, Self::String | Self::Bytes | Self::Message | Self::Group)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileProto {
	pub name: String,
	pub package: String,
	pub syntax: Syntax,
	/// Required for [`Syntax::Editions`], ignored otherwise.
	pub edition: Option<Edition>,
	pub features: Option<String>,
	pub message_types: Vec<MessageProto>,
	pub enum_types: Vec<EnumProto>,
	pub services: Vec<ServiceProto>,
	pub extensions: Vec<FieldProto>,
}

impl FileProto {
	pub fn from_json(text: &str) -> Result<Self, BuildError> {
		Ok(serde_json::from_str(text)?)
	}

	/// The edition a file is built at.
	pub fn effective_edition(&self) -> Result<Edition, BuildError> {
		match self.syntax {
			Syntax::Proto2 => Ok(Edition::Proto2),
			Syntax::Proto3 => Ok(Edition::Proto3),
			Syntax::Editions => self.edition.clone().ok_or_else(|| BuildError::MissingEdition {
				file: self.name.clone(),
			}),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageProto {
	pub name: String,
	pub features: Option<String>,
	pub fields: Vec<FieldProto>,
	pub oneofs: Vec<OneofProto>,
	pub extension_ranges: Vec<ExtensionRangeProto>,
	pub nested_types: Vec<MessageProto>,
	pub enum_types: Vec<EnumProto>,
	pub extensions: Vec<FieldProto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldProto {
	pub name: String,
	pub number: u32,
	#[serde(default)]
	pub label: Label,
	#[serde(rename = "type")]
	pub kind: FieldKind,
	/// Index into the containing message's `oneofs`.
	#[serde(default)]
	pub oneof_index: Option<usize>,
	/// The legacy `packed` field option.
	#[serde(default)]
	pub packed: Option<bool>,
	/// Extended message, for extension fields.
	#[serde(default)]
	pub extendee: Option<String>,
	#[serde(default)]
	pub features: Option<String>,
}

impl FieldProto {
	pub fn new(name: impl Into<String>, number: u32, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			number,
			label: Label::Optional,
			kind,
			oneof_index: None,
			packed: None,
			extendee: None,
			features: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OneofProto {
	pub name: String,
	pub features: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionRangeProto {
	pub start: u32,
	pub end: u32,
	pub features: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnumProto {
	pub name: String,
	pub features: Option<String>,
	pub values: Vec<EnumValueProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnumValueProto {
	pub name: String,
	pub number: i32,
	pub features: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceProto {
	pub name: String,
	pub features: Option<String>,
	pub methods: Vec<MethodProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethodProto {
	pub name: String,
	pub features: Option<String>,
}
