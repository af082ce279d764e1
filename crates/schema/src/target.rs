//! Descriptor kinds a feature may be applied to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of descriptor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
	File,
	ExtensionRange,
	Message,
	Field,
	Oneof,
	Enum,
	EnumEntry,
	Service,
	Method,
}

bitflags::bitflags! {
	/// A set of descriptor kinds.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct TargetSet: u16 {
		const FILE = 1 << 0;
		const EXTENSION_RANGE = 1 << 1;
		const MESSAGE = 1 << 2;
		const FIELD = 1 << 3;
		const ONEOF = 1 << 4;
		const ENUM = 1 << 5;
		const ENUM_ENTRY = 1 << 6;
		const SERVICE = 1 << 7;
		const METHOD = 1 << 8;
	}
}

impl Target {
	/// Every descriptor kind, in declaration order.
	pub const ALL: [Target; 9] = [
		Target::File,
		Target::ExtensionRange,
		Target::Message,
		Target::Field,
		Target::Oneof,
		Target::Enum,
		Target::EnumEntry,
		Target::Service,
		Target::Method,
	];

	/// Returns the bitflag for this kind.
	pub const fn as_set(self) -> TargetSet {
		match self {
			Self::File => TargetSet::FILE,
			Self::ExtensionRange => TargetSet::EXTENSION_RANGE,
			Self::Message => TargetSet::MESSAGE,
			Self::Field => TargetSet::FIELD,
			Self::Oneof => TargetSet::ONEOF,
			Self::Enum => TargetSet::ENUM,
			Self::EnumEntry => TargetSet::ENUM_ENTRY,
			Self::Service => TargetSet::SERVICE,
			Self::Method => TargetSet::METHOD,
		}
	}

	/// Name used in diagnostics, e.g. `TARGET_TYPE_FIELD`.
	pub const fn name(self) -> &'static str {
		match self {
			Self::File => "TARGET_TYPE_FILE",
			Self::ExtensionRange => "TARGET_TYPE_EXTENSION_RANGE",
			Self::Message => "TARGET_TYPE_MESSAGE",
			Self::Field => "TARGET_TYPE_FIELD",
			Self::Oneof => "TARGET_TYPE_ONEOF",
			Self::Enum => "TARGET_TYPE_ENUM",
			Self::EnumEntry => "TARGET_TYPE_ENUM_ENTRY",
			Self::Service => "TARGET_TYPE_SERVICE",
			Self::Method => "TARGET_TYPE_METHOD",
		}
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl From<Target> for TargetSet {
	fn from(target: Target) -> Self {
		target.as_set()
	}
}

impl FromIterator<Target> for TargetSet {
	fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
		let mut set = TargetSet::empty();
		for target in iter {
			set |= target.as_set();
		}
		set
	}
}

impl TargetSet {
	/// Returns true if `target` is a member of this set.
	pub fn allows(self, target: Target) -> bool {
		self.contains(target.as_set())
	}

	/// Iterates the member kinds in declaration order.
	pub fn targets(self) -> impl Iterator<Item = Target> {
		Target::ALL.into_iter().filter(move |t| self.allows(*t))
	}
}
