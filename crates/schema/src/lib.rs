//! Reflective model of feature-set messages.
//!
//! Feature sets are extensible: code generators plug their own feature
//! messages into `google.protobuf.FeatureSet` as extensions. Rather than
//! generated types, this crate describes those messages at runtime:
//!
//! - [`types`] - message, enum, field and extension definitions
//! - [`pool`] - [`TypePool`], the name-indexed registry of definitions
//! - [`value`] - [`Value`] and [`DynamicMessage`], with deep merge
//! - [`feature_set`] - the [`FeatureSet`] wrapper and typed core features
//! - [`text`] - text-format grammar used for edition defaults
//! - [`builtin`] - the core feature-set type and bundled generator features

pub mod builtin;
mod error;
pub mod feature_set;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod pool;
pub mod support;
pub mod target;
pub mod text;
pub mod types;
pub mod value;

pub use error::{Result, SchemaError};
pub use feature_set::{
	EnforceNamingStyle, EnumType, FeatureSet, FieldPresence, JsonFormat, MessageEncoding,
	RepeatedFieldEncoding, Utf8Validation,
};
pub use pool::TypePool;
pub use protofeat_edition::Edition;
pub use support::{FeatureSupport, LifetimeIssue, Mutability};
pub use target::{Target, TargetSet};
pub use text::TextError;
pub use types::{
	EditionDefault, EnumDef, EnumValueDef, ExtensionDef, FieldDef, FieldType, Label, MessageDef,
	ScalarType,
};
pub use value::{DynamicMessage, Value};
