//! Top-down feature resolution over any descriptor model.

use protofeat_edition::Edition;
use protofeat_resolver::{FeatureResolver, validate_feature_lifetimes};
use protofeat_schema::{FeatureSet, Target};

use crate::error::BuildError;

/// Access to a descriptor tree for feature resolution.
///
/// A tree belongs to a single file and therefore a single edition.
pub trait FeatureTree {
	/// Handle to one node.
	type Node: Copy;

	fn edition(&self) -> &Edition;

	/// Every node, parents before their children.
	fn nodes(&self) -> Vec<Self::Node>;

	fn parent(&self, node: Self::Node) -> Option<Self::Node>;

	fn target(&self, node: Self::Node) -> Target;

	fn full_name(&self, node: Self::Node) -> &str;

	/// Features written on the node itself.
	fn raw_features(&self, node: Self::Node) -> &FeatureSet;

	/// Features implied by the node's legacy syntax. They sit between the
	/// parent's features and [`Self::raw_features`] and are exempt from the
	/// override policy.
	fn inferred_features(&self, _node: Self::Node) -> Option<&FeatureSet> {
		None
	}

	/// Features previously stored by [`Self::set_effective_features`].
	fn effective_features(&self, node: Self::Node) -> Option<&FeatureSet>;

	fn set_effective_features(&mut self, node: Self::Node, features: FeatureSet);
}

/// Outcome of [`resolve_tree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeReport {
	pub errors: Vec<BuildError>,
	pub warnings: Vec<String>,
}

/// Resolves and stores effective features for every node of `tree`.
///
/// A node whose resolution fails is reported with its full name and edition
/// and its descendants are skipped; siblings still resolve, so one pass
/// reports every independent failure. Lifetime checks apply to the raw
/// features of editions files only.
pub fn resolve_tree<T: FeatureTree>(tree: &mut T, resolver: &FeatureResolver) -> TreeReport {
	let mut report = TreeReport::default();
	let edition = tree.edition().clone();
	let check_lifetimes = !edition.is_legacy_syntax();
	let empty = FeatureSet::new();

	for node in tree.nodes() {
		let name = tree.full_name(node).to_string();
		let parent = match tree.parent(node) {
			Some(parent) => match tree.effective_features(parent) {
				Some(features) => features,
				None => {
					tracing::trace!(domain = "features", node = %name, "skipping node below failed parent");
					continue;
				}
			},
			None => &empty,
		};
		let layered = tree.inferred_features(node).map(|inferred| {
			let mut layered = parent.clone();
			layered.merge_from(inferred);
			layered
		});
		let parent = layered.as_ref().unwrap_or(parent);
		let raw = tree.raw_features(node);

		if check_lifetimes {
			match validate_feature_lifetimes(resolver.pool(), resolver.feature_set_type(), &edition, raw) {
				Ok(lifetimes) => {
					report.errors.extend(lifetimes.errors.into_iter().map(|message| BuildError::Lifetime {
						name: name.clone(),
						edition: edition.clone(),
						message,
					}));
					report
						.warnings
						.extend(lifetimes.warnings.into_iter().map(|w| format!("{name}: {w}")));
				}
				Err(source) => {
					report.errors.push(BuildError::Resolve {
						name,
						edition: edition.clone(),
						source,
					});
					continue;
				}
			}
		}

		match resolver.resolve(parent, raw, tree.target(node)) {
			Ok(resolution) => {
				report
					.warnings
					.extend(resolution.warnings.iter().map(|w| format!("{name}: {w}")));
				tracing::trace!(domain = "features", node = %name, "resolved features");
				tree.set_effective_features(node, resolution.features);
			}
			Err(source) => {
				tracing::debug!(domain = "features", node = %name, error = %source, "feature resolution failed");
				report.errors.push(BuildError::Resolve {
					name,
					edition: edition.clone(),
					source,
				});
			}
		}
	}
	report
}
