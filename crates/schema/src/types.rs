//! Definitions of messages, enums, fields and extensions.

use protofeat_edition::Edition;
use serde::{Deserialize, Serialize};

use crate::support::FeatureSupport;
use crate::target::TargetSet;

/// Name of the self-typed field carrying a node's unmerged features.
pub const RAW_FEATURES_FIELD: &str = "raw_features";

/// Scalar wire types a field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
	Bool,
	Int32,
	Int64,
	Uint32,
	Uint64,
	Float,
	Double,
	String,
	Bytes,
}

impl ScalarType {
	pub fn name(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int32 => "int32",
			Self::Int64 => "int64",
			Self::Uint32 => "uint32",
			Self::Uint64 => "uint64",
			Self::Float => "float",
			Self::Double => "double",
			Self::String => "string",
			Self::Bytes => "bytes",
		}
	}
}

/// Type of a field: a scalar or a reference to a named enum or message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
	Scalar(ScalarType),
	Enum(String),
	Message(String),
}

impl FieldType {
	pub fn is_message(&self) -> bool {
		matches!(self, Self::Message(_))
	}

	pub fn is_enum(&self) -> bool {
		matches!(self, Self::Enum(_))
	}

	pub fn type_name(&self) -> &str {
		match self {
			Self::Scalar(s) => s.name(),
			Self::Enum(name) | Self::Message(name) => name,
		}
	}
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
	#[default]
	Optional,
	Required,
	Repeated,
}

/// One `(edition, textual value)` entry of a feature's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionDefault {
	pub edition: Edition,
	pub value: String,
}

impl EditionDefault {
	pub fn new(edition: Edition, value: impl Into<String>) -> Self {
		Self {
			edition,
			value: value.into(),
		}
	}
}

/// A field of a message.
///
/// On feature messages the field additionally carries the feature metadata:
/// targets, edition defaults and lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
	pub name: String,
	pub number: u32,
	pub label: Label,
	pub ty: FieldType,
	pub oneof: Option<String>,
	pub targets: TargetSet,
	pub edition_defaults: Vec<EditionDefault>,
	pub feature_support: Option<FeatureSupport>,
}

impl FieldDef {
	pub fn new(name: impl Into<String>, number: u32, ty: FieldType) -> Self {
		Self {
			name: name.into(),
			number,
			label: Label::Optional,
			ty,
			oneof: None,
			targets: TargetSet::empty(),
			edition_defaults: Vec::new(),
			feature_support: None,
		}
	}

	pub fn scalar(name: impl Into<String>, number: u32, ty: ScalarType) -> Self {
		Self::new(name, number, FieldType::Scalar(ty))
	}

	pub fn enumeration(name: impl Into<String>, number: u32, ty: impl Into<String>) -> Self {
		Self::new(name, number, FieldType::Enum(ty.into()))
	}

	pub fn message(name: impl Into<String>, number: u32, ty: impl Into<String>) -> Self {
		Self::new(name, number, FieldType::Message(ty.into()))
	}

	pub fn label(mut self, label: Label) -> Self {
		self.label = label;
		self
	}

	pub fn in_oneof(mut self, oneof: impl Into<String>) -> Self {
		self.oneof = Some(oneof.into());
		self
	}

	pub fn targets(mut self, targets: impl Into<TargetSet>) -> Self {
		self.targets = targets.into();
		self
	}

	pub fn default_at(mut self, edition: Edition, value: impl Into<String>) -> Self {
		self.edition_defaults.push(EditionDefault::new(edition, value));
		self
	}

	pub fn support(mut self, support: FeatureSupport) -> Self {
		self.feature_support = Some(support);
		self
	}
}

/// A value of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDef {
	pub name: String,
	pub number: i32,
	pub feature_support: Option<FeatureSupport>,
}

impl EnumValueDef {
	pub fn new(name: impl Into<String>, number: i32) -> Self {
		Self {
			name: name.into(),
			number,
			feature_support: None,
		}
	}

	pub fn support(mut self, support: FeatureSupport) -> Self {
		self.feature_support = Some(support);
		self
	}
}

/// An enum definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
	pub full_name: String,
	pub values: Vec<EnumValueDef>,
}

impl EnumDef {
	pub fn new(full_name: impl Into<String>) -> Self {
		Self {
			full_name: full_name.into(),
			values: Vec::new(),
		}
	}

	pub fn value(mut self, value: EnumValueDef) -> Self {
		self.values.push(value);
		self
	}

	pub fn by_name(&self, name: &str) -> Option<&EnumValueDef> {
		self.values.iter().find(|v| v.name == name)
	}

	pub fn by_number(&self, number: i32) -> Option<&EnumValueDef> {
		self.values.iter().find(|v| v.number == number)
	}

	/// Full name of a value. Enum values are scoped to the enum's parent, so
	/// `pb.EnumFeature.VALUE1` is named `pb.VALUE1`.
	pub fn value_full_name(&self, value: &EnumValueDef) -> String {
		match self.full_name.rsplit_once('.') {
			Some((scope, _)) => format!("{scope}.{}", value.name),
			None => value.name.clone(),
		}
	}
}

/// An extension declared against some message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDef {
	pub full_name: String,
	pub number: u32,
	pub extendee: String,
	pub label: Label,
	pub ty: FieldType,
}

impl ExtensionDef {
	/// Singular message-typed extension.
	pub fn message(
		full_name: impl Into<String>,
		number: u32,
		extendee: impl Into<String>,
		ty: impl Into<String>,
	) -> Self {
		Self {
			full_name: full_name.into(),
			number,
			extendee: extendee.into(),
			label: Label::Optional,
			ty: FieldType::Message(ty.into()),
		}
	}

	pub fn label(mut self, label: Label) -> Self {
		self.label = label;
		self
	}
}

/// A message definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDef {
	pub full_name: String,
	pub fields: Vec<FieldDef>,
	pub extension_ranges: Vec<(u32, u32)>,
	/// Extensions declared inside this message's scope.
	pub nested_extensions: Vec<String>,
}

impl MessageDef {
	pub fn new(full_name: impl Into<String>) -> Self {
		Self {
			full_name: full_name.into(),
			fields: Vec::new(),
			extension_ranges: Vec::new(),
			nested_extensions: Vec::new(),
		}
	}

	pub fn field(mut self, field: FieldDef) -> Self {
		self.fields.push(field);
		self
	}

	pub fn extension_range(mut self, start: u32, end: u32) -> Self {
		self.extension_ranges.push((start, end));
		self
	}

	pub fn nested_extension(mut self, name: impl Into<String>) -> Self {
		self.nested_extensions.push(name.into());
		self
	}

	pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn field_by_number(&self, number: u32) -> Option<&FieldDef> {
		self.fields.iter().find(|f| f.number == number)
	}

	pub fn field_full_name(&self, field: &FieldDef) -> String {
		format!("{}.{}", self.full_name, field.name)
	}

	/// Returns true for the self-typed `raw_features` field, which is
	/// metadata rather than a feature.
	pub fn is_raw_features(&self, field: &FieldDef) -> bool {
		field.name == RAW_FEATURES_FIELD
			&& matches!(&field.ty, FieldType::Message(ty) if *ty == self.full_name)
	}

	/// Fields that are features, i.e. everything but `raw_features`.
	pub fn features(&self) -> impl Iterator<Item = &FieldDef> {
		self.fields.iter().filter(|f| !self.is_raw_features(f))
	}
}
