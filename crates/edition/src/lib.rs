//! Edition identifiers and their total order.
//!
//! An edition is either one of the named pre-editions dialects (`LEGACY`,
//! `PROTO2`, `PROTO3`) or a dotted sequence of decimal segments such as
//! `2023`, `2023.1` or `99997_TEST_ONLY`.
//!
//! # Ordering
//!
//! ```text
//! LEGACY < PROTO2 < PROTO3 < every dotted edition
//! ```
//!
//! Dotted editions compare segment by segment. Within a segment the shorter
//! decimal string is smaller and equal-length segments compare
//! lexicographically, which agrees with numeric order without ever parsing the
//! digits. When every shared segment is equal the shorter sequence is smaller,
//! so `2023 < 2023.1 < 2023.90 < 2024`. The `_TEST_ONLY` marker only breaks
//! ties.
//!
//! The `UNKNOWN` sentinel is not an edition: parsing or deserializing it fails
//! with [`EditionError::Invalid`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

const TEST_ONLY_SUFFIX: &str = "_TEST_ONLY";
const PROTO_PREFIX: &str = "EDITION_";

/// Errors produced while parsing or comparing edition identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditionError {
	/// The input is not a usable edition identifier.
	#[error("Invalid edition {input}: {reason}")]
	Invalid { input: String, reason: &'static str },
}

impl EditionError {
	fn invalid(input: &str, reason: &'static str) -> Self {
		Self::Invalid {
			input: input.to_string(),
			reason,
		}
	}
}

/// A schema dialect version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Edition {
	/// Placeholder preceding every real edition; carries pre-editions semantics.
	Legacy,
	/// Files declared with `syntax = "proto2"`.
	Proto2,
	/// Files declared with `syntax = "proto3"`.
	Proto3,
	/// A dotted numeric edition.
	Numbered(EditionId),
}

impl Edition {
	/// Single-segment edition, e.g. `Edition::from_number(2023)`.
	pub fn from_number(number: u64) -> Self {
		Self::Numbered(EditionId {
			digits: number.to_string().into_boxed_str(),
			test_only: false,
		})
	}

	/// Single-segment test-only edition, e.g. `99997_TEST_ONLY`.
	pub fn test_only(number: u64) -> Self {
		Self::Numbered(EditionId {
			digits: number.to_string().into_boxed_str(),
			test_only: true,
		})
	}

	/// Dotted edition from its numeric segments, e.g. `[2023, 1]` for `2023.1`.
	///
	/// An empty slice yields edition `0`.
	pub fn from_segments(segments: &[u64]) -> Self {
		let digits = if segments.is_empty() {
			"0".to_string()
		} else {
			segments.iter().map(u64::to_string).collect::<Vec<_>>().join(".")
		};
		Self::Numbered(EditionId {
			digits: digits.into_boxed_str(),
			test_only: false,
		})
	}

	/// Returns true for the named pre-editions dialects.
	pub fn is_legacy_syntax(&self) -> bool {
		!matches!(self, Self::Numbered(_))
	}

	/// Compares two textual editions without building intermediate values
	/// the caller has to keep.
	pub fn compare_str(a: &str, b: &str) -> Result<Ordering, EditionError> {
		Ok(a.parse::<Edition>()?.cmp(&b.parse::<Edition>()?))
	}

	/// Returns the greatest element of `sorted` that is `<= self`, by index.
	///
	/// `sorted` must be ascending.
	pub fn floor_index<T>(&self, sorted: &[T], key: impl Fn(&T) -> &Edition) -> Option<usize> {
		let upper = sorted.partition_point(|item| key(item) <= self);
		upper.checked_sub(1)
	}
}

impl fmt::Display for Edition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Legacy => f.write_str("LEGACY"),
			Self::Proto2 => f.write_str("PROTO2"),
			Self::Proto3 => f.write_str("PROTO3"),
			Self::Numbered(id) => id.fmt(f),
		}
	}
}

impl FromStr for Edition {
	type Err = EditionError;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		let name = input.trim();
		let name = name.strip_prefix(PROTO_PREFIX).unwrap_or(name);
		match name {
			"" => Err(EditionError::invalid(input, "empty edition")),
			"UNKNOWN" => Err(EditionError::invalid(input, "UNKNOWN is a sentinel, not an edition")),
			"LEGACY" => Ok(Self::Legacy),
			"PROTO2" => Ok(Self::Proto2),
			"PROTO3" => Ok(Self::Proto3),
			_ => EditionId::parse(input, name).map(Self::Numbered),
		}
	}
}

impl From<Edition> for String {
	fn from(edition: Edition) -> Self {
		edition.to_string()
	}
}

impl TryFrom<String> for Edition {
	type Error = EditionError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

/// Dotted numeric edition identifier.
///
/// Digits are kept as text; see the crate docs for the comparison rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditionId {
	digits: Box<str>,
	test_only: bool,
}

impl EditionId {
	fn parse(input: &str, name: &str) -> Result<Self, EditionError> {
		let (digits, test_only) = match name.strip_suffix(TEST_ONLY_SUFFIX) {
			Some(rest) => (rest, true),
			None => (name, false),
		};
		for segment in digits.split('.') {
			if segment.is_empty() {
				return Err(EditionError::invalid(input, "empty segment"));
			}
			if !segment.bytes().all(|b| b.is_ascii_digit()) {
				return Err(EditionError::invalid(input, "segments must be decimal digits"));
			}
			if segment.len() > 1 && segment.starts_with('0') {
				return Err(EditionError::invalid(input, "segments must not have leading zeros"));
			}
		}
		Ok(Self {
			digits: digits.into(),
			test_only,
		})
	}

	/// Decimal segments in order.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.digits.split('.')
	}
}

fn cmp_segment(a: &str, b: &str) -> Ordering {
	a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for EditionId {
	fn cmp(&self, other: &Self) -> Ordering {
		let mut lhs = self.segments();
		let mut rhs = other.segments();
		loop {
			match (lhs.next(), rhs.next()) {
				(Some(a), Some(b)) => match cmp_segment(a, b) {
					Ordering::Equal => continue,
					unequal => return unequal,
				},
				(None, Some(_)) => return Ordering::Less,
				(Some(_), None) => return Ordering::Greater,
				(None, None) => return self.test_only.cmp(&other.test_only),
			}
		}
	}
}

impl PartialOrd for EditionId {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for EditionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.digits)?;
		if self.test_only {
			f.write_str(TEST_ONLY_SUFFIX)?;
		}
		Ok(())
	}
}
