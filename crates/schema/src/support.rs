//! Feature lifetimes.
//!
//! Every feature (and every value of an enum-typed feature) records the
//! edition it was introduced in and, optionally, when it was deprecated and
//! removed. Outside its lifetime a feature is [`Mutability::Fixed`]: it still
//! has a value, but schemas may not override it.

use protofeat_edition::Edition;
use serde::{Deserialize, Serialize};

/// Lifetime of a feature or feature value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSupport {
	pub edition_introduced: Option<Edition>,
	pub edition_deprecated: Option<Edition>,
	pub deprecation_warning: Option<String>,
	pub edition_removed: Option<Edition>,
}

/// An internally inconsistent lifetime. Displays as a predicate, e.g.
/// "was removed before it was introduced".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifetimeIssue {
	#[error("doesn't specify which edition it was introduced in")]
	MissingIntroduced,
	#[error("is deprecated but does not specify a deprecation warning")]
	MissingWarning,
	#[error("specifies a deprecation warning but is not marked deprecated")]
	UnmarkedWarning,
	#[error("was deprecated before it was introduced")]
	DeprecatedBeforeIntroduced,
	#[error("was deprecated after it was removed")]
	DeprecatedAfterRemoved,
	#[error("was removed before it was introduced")]
	RemovedBeforeIntroduced,
}

/// Whether schemas may override a feature at a given edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
	Overridable,
	Fixed,
}

impl FeatureSupport {
	/// Support introduced at `edition` and never deprecated or removed.
	pub fn introduced(edition: Edition) -> Self {
		Self {
			edition_introduced: Some(edition),
			..Self::default()
		}
	}

	pub fn deprecated(mut self, edition: Edition, warning: impl Into<String>) -> Self {
		self.edition_deprecated = Some(edition);
		self.deprecation_warning = Some(warning.into());
		self
	}

	pub fn removed(mut self, edition: Edition) -> Self {
		self.edition_removed = Some(edition);
		self
	}

	/// Mutability at `edition`: fixed before introduction and from removal on.
	pub fn mutability_at(&self, edition: &Edition) -> Mutability {
		if !self.is_introduced_at(edition) || self.is_removed_at(edition) {
			Mutability::Fixed
		} else {
			Mutability::Overridable
		}
	}

	pub fn is_deprecated_at(&self, edition: &Edition) -> bool {
		self.edition_deprecated.as_ref().is_some_and(|d| edition >= d)
	}

	pub fn is_removed_at(&self, edition: &Edition) -> bool {
		self.edition_removed.as_ref().is_some_and(|r| edition >= r)
	}

	pub fn is_introduced_at(&self, edition: &Edition) -> bool {
		self.edition_introduced.as_ref().is_none_or(|i| edition >= i)
	}

	/// Checks that the lifetime names an introduction edition and is ordered.
	pub fn check_consistency(&self) -> Result<(), LifetimeIssue> {
		if self.edition_introduced.is_none() {
			return Err(LifetimeIssue::MissingIntroduced);
		}
		self.check_ordering()
	}

	/// Like [`Self::check_consistency`], but every edition is optional. Used
	/// for enum values, which inherit missing bounds from their feature.
	pub fn check_ordering(&self) -> Result<(), LifetimeIssue> {
		match (&self.edition_deprecated, &self.deprecation_warning) {
			(Some(_), None) => return Err(LifetimeIssue::MissingWarning),
			(None, Some(_)) => return Err(LifetimeIssue::UnmarkedWarning),
			_ => {}
		}
		if let Some(deprecated) = &self.edition_deprecated {
			if let Some(introduced) = &self.edition_introduced
				&& deprecated < introduced
			{
				return Err(LifetimeIssue::DeprecatedBeforeIntroduced);
			}
			if let Some(removed) = &self.edition_removed
				&& deprecated >= removed
			{
				return Err(LifetimeIssue::DeprecatedAfterRemoved);
			}
		}
		if let (Some(removed), Some(introduced)) = (&self.edition_removed, &self.edition_introduced)
			&& removed <= introduced
		{
			return Err(LifetimeIssue::RemovedBeforeIntroduced);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ed(n: u64) -> Edition {
		Edition::from_number(n)
	}

	#[test]
	fn fixed_outside_lifetime() {
		let support = FeatureSupport::introduced(ed(2023)).removed(ed(2025));
		assert_eq!(support.mutability_at(&Edition::Legacy), Mutability::Fixed);
		assert_eq!(support.mutability_at(&ed(2023)), Mutability::Overridable);
		assert_eq!(support.mutability_at(&ed(2024)), Mutability::Overridable);
		assert_eq!(support.mutability_at(&ed(2025)), Mutability::Fixed);
	}

	#[test]
	fn consistency_rules() {
		assert_eq!(FeatureSupport::default().check_consistency(), Err(LifetimeIssue::MissingIntroduced));

		let mut support = FeatureSupport::introduced(ed(2023));
		support.edition_deprecated = Some(ed(2024));
		assert_eq!(support.check_consistency(), Err(LifetimeIssue::MissingWarning));

		let mut support = FeatureSupport::introduced(ed(2023));
		support.deprecation_warning = Some("x".into());
		assert_eq!(support.check_consistency(), Err(LifetimeIssue::UnmarkedWarning));

		let support = FeatureSupport::introduced(ed(2024)).deprecated(ed(2023), "x");
		assert_eq!(support.check_consistency(), Err(LifetimeIssue::DeprecatedBeforeIntroduced));

		let support = FeatureSupport::introduced(ed(2023))
			.deprecated(ed(2025), "x")
			.removed(ed(2024));
		assert_eq!(support.check_consistency(), Err(LifetimeIssue::DeprecatedAfterRemoved));

		let support = FeatureSupport::introduced(ed(2024)).removed(ed(2024));
		assert_eq!(support.check_consistency(), Err(LifetimeIssue::RemovedBeforeIntroduced));

		let support = FeatureSupport::introduced(ed(2023))
			.deprecated(ed(2023), "x")
			.removed(ed(2024));
		assert_eq!(support.check_consistency(), Ok(()));
	}

	#[test]
	fn value_support_may_leave_bounds_open() {
		assert_eq!(FeatureSupport::default().check_ordering(), Ok(()));
		let support = FeatureSupport {
			edition_deprecated: Some(ed(2024)),
			deprecation_warning: Some("x".into()),
			..FeatureSupport::default()
		};
		assert_eq!(support.check_ordering(), Ok(()));
	}
}
