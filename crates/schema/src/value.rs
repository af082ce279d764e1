//! Dynamic field values and messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{FieldType, ScalarType};

/// The value of a singular field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
	Bool(bool),
	I32(i32),
	I64(i64),
	U32(u32),
	U64(u64),
	F32(f32),
	F64(f64),
	String(String),
	Bytes(Vec<u8>),
	/// Enum value by number.
	Enum(i32),
	Message(DynamicMessage),
}

impl Value {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the enum number if this is an `Enum` variant.
	pub fn as_enum(&self) -> Option<i32> {
		match self {
			Value::Enum(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns any integer variant widened to `i128`.
	pub fn as_integer(&self) -> Option<i128> {
		match self {
			Value::I32(v) => Some((*v).into()),
			Value::I64(v) => Some((*v).into()),
			Value::U32(v) => Some((*v).into()),
			Value::U64(v) => Some((*v).into()),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_message(&self) -> Option<&DynamicMessage> {
		match self {
			Value::Message(v) => Some(v),
			_ => None,
		}
	}

	/// Returns true if this value can be stored in a field of type `ty`.
	pub fn matches_type(&self, ty: &FieldType) -> bool {
		matches!(
			(self, ty),
			(Value::Bool(_), FieldType::Scalar(ScalarType::Bool))
				| (Value::I32(_), FieldType::Scalar(ScalarType::Int32))
				| (Value::I64(_), FieldType::Scalar(ScalarType::Int64))
				| (Value::U32(_), FieldType::Scalar(ScalarType::Uint32))
				| (Value::U64(_), FieldType::Scalar(ScalarType::Uint64))
				| (Value::F32(_), FieldType::Scalar(ScalarType::Float))
				| (Value::F64(_), FieldType::Scalar(ScalarType::Double))
				| (Value::String(_), FieldType::Scalar(ScalarType::String))
				| (Value::Bytes(_), FieldType::Scalar(ScalarType::Bytes))
				| (Value::Enum(_), FieldType::Enum(_))
				| (Value::Message(_), FieldType::Message(_))
		)
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Bool(_) => "bool",
			Value::I32(_) => "int32",
			Value::I64(_) => "int64",
			Value::U32(_) => "uint32",
			Value::U64(_) => "uint64",
			Value::F32(_) => "float",
			Value::F64(_) => "double",
			Value::String(_) => "string",
			Value::Bytes(_) => "bytes",
			Value::Enum(_) => "enum",
			Value::Message(_) => "message",
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::String(v.to_string())
	}
}

impl From<DynamicMessage> for Value {
	fn from(v: DynamicMessage) -> Self {
		Value::Message(v)
	}
}

/// A message whose shape is described by a [`crate::MessageDef`].
///
/// Fields are keyed by number; extensions by full extension name. An unset
/// field is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicMessage {
	#[serde(default)]
	pub fields: BTreeMap<u32, Value>,
	#[serde(default)]
	pub extensions: BTreeMap<String, DynamicMessage>,
}

impl DynamicMessage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty() && self.extensions.is_empty()
	}

	pub fn get(&self, number: u32) -> Option<&Value> {
		self.fields.get(&number)
	}

	pub fn has(&self, number: u32) -> bool {
		self.fields.contains_key(&number)
	}

	pub fn set(&mut self, number: u32, value: impl Into<Value>) {
		self.fields.insert(number, value.into());
	}

	/// Builder form of [`Self::set`].
	pub fn with(mut self, number: u32, value: impl Into<Value>) -> Self {
		self.set(number, value);
		self
	}

	pub fn clear(&mut self, number: u32) -> Option<Value> {
		self.fields.remove(&number)
	}

	pub fn extension(&self, name: &str) -> Option<&DynamicMessage> {
		self.extensions.get(name)
	}

	/// Returns the extension message, inserting an empty one if absent.
	pub fn extension_mut(&mut self, name: &str) -> &mut DynamicMessage {
		self.extensions.entry(name.to_string()).or_default()
	}

	pub fn with_extension(mut self, name: impl Into<String>, message: DynamicMessage) -> Self {
		self.extensions.insert(name.into(), message);
		self
	}

	/// Deep merge: set scalars and enums in `other` overwrite, messages merge
	/// field-wise and extensions merge like top-level message fields.
	pub fn merge_from(&mut self, other: &DynamicMessage) {
		for (number, value) in &other.fields {
			match (self.fields.get_mut(number), value) {
				(Some(Value::Message(mine)), Value::Message(theirs)) => mine.merge_from(theirs),
				_ => {
					self.fields.insert(*number, value.clone());
				}
			}
		}
		for (name, theirs) in &other.extensions {
			self.extension_mut(name).merge_from(theirs);
		}
	}
}
