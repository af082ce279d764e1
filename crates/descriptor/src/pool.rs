//! Arena-backed descriptors and the pool that builds them.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use protofeat_edition::Edition;
use protofeat_resolver::{FeatureResolver, FeatureSetDefaults, OverridePolicy, ResolverConfig, compile_defaults};
use protofeat_schema::feature_set::FEATURE_SET;
use protofeat_schema::text::parse_message;
use protofeat_schema::{FeatureSet, Target, TypePool};
use rustc_hash::FxHashMap;

use crate::error::{BuildError, BuildFailure};
use crate::legacy::{check_editions_field, check_legacy_field, infer_field_features};
use crate::proto::{EnumProto, FieldProto, FileProto, MessageProto, Syntax};
use crate::tree::{FeatureTree, resolve_tree};

#[cfg(test)]
mod tests;

/// Index of a node within its [`FileDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
	#[inline]
	pub fn as_usize(self) -> usize {
		self.0 as usize
	}
}

/// One descriptor in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	pub target: Target,
	pub full_name: String,
	pub parent: Option<NodeId>,
	/// Features written on the node.
	pub raw_features: FeatureSet,
	/// Features implied by legacy syntax, layered below `raw_features`.
	pub inferred_features: FeatureSet,
	/// Set once the node resolved successfully.
	pub features: Option<FeatureSet>,
}

/// A built file: its nodes in top-down order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
	name: String,
	edition: Edition,
	nodes: Vec<Node>,
	warnings: Vec<String>,
}

impl FileDescriptor {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn edition(&self) -> &Edition {
		&self.edition
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.as_usize())
	}

	pub fn find(&self, full_name: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.full_name == full_name)
	}

	/// Effective features of the node named `full_name`.
	pub fn features(&self, full_name: &str) -> Option<&FeatureSet> {
		self.find(full_name).and_then(|n| n.features.as_ref())
	}

	pub fn warnings(&self) -> &[String] {
		&self.warnings
	}
}

impl FeatureTree for FileDescriptor {
	type Node = NodeId;

	fn edition(&self) -> &Edition {
		&self.edition
	}

	fn nodes(&self) -> Vec<NodeId> {
		(0..self.nodes.len() as u32).map(NodeId).collect()
	}

	fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes[node.as_usize()].parent
	}

	fn target(&self, node: NodeId) -> Target {
		self.nodes[node.as_usize()].target
	}

	fn full_name(&self, node: NodeId) -> &str {
		&self.nodes[node.as_usize()].full_name
	}

	fn raw_features(&self, node: NodeId) -> &FeatureSet {
		&self.nodes[node.as_usize()].raw_features
	}

	fn inferred_features(&self, node: NodeId) -> Option<&FeatureSet> {
		let inferred = &self.nodes[node.as_usize()].inferred_features;
		(!inferred.is_empty()).then_some(inferred)
	}

	fn effective_features(&self, node: NodeId) -> Option<&FeatureSet> {
		self.nodes[node.as_usize()].features.as_ref()
	}

	fn set_effective_features(&mut self, node: NodeId, features: FeatureSet) {
		self.nodes[node.as_usize()].features = Some(features);
	}
}

/// Flattens a [`FileProto`] into arena nodes, parents first.
struct FileBuilder<'a> {
	types: &'a TypePool,
	feature_set_type: &'a str,
	syntax: Syntax,
	nodes: Vec<Node>,
	errors: Vec<BuildError>,
}

impl FileBuilder<'_> {
	fn push(&mut self, target: Target, full_name: String, parent: Option<NodeId>, features: Option<&str>) -> NodeId {
		let raw_features = self.parse_features(&full_name, features);
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(Node {
			target,
			full_name,
			parent,
			raw_features,
			inferred_features: FeatureSet::new(),
			features: None,
		});
		id
	}

	fn parse_features(&mut self, name: &str, text: Option<&str>) -> FeatureSet {
		let Some(text) = text else {
			return FeatureSet::new();
		};
		if self.syntax != Syntax::Editions {
			self.errors.push(BuildError::FeaturesOutsideEditions { name: name.to_string() });
			return FeatureSet::new();
		}
		match parse_message(self.types, self.feature_set_type, text) {
			Ok(message) => FeatureSet::from(message),
			Err(source) => {
				self.errors.push(BuildError::Features {
					name: name.to_string(),
					source,
				});
				FeatureSet::new()
			}
		}
	}

	fn file(&mut self, proto: &FileProto) {
		let file = self.push(Target::File, proto.name.clone(), None, proto.features.as_deref());
		let scope = proto.package.as_str();
		for message in &proto.message_types {
			self.message(scope, file, message);
		}
		for def in &proto.enum_types {
			self.enumeration(scope, file, def);
		}
		for service in &proto.services {
			let service_name = qualify(scope, &service.name);
			let id = self.push(
				Target::Service,
				service_name.clone(),
				Some(file),
				service.features.as_deref(),
			);
			for method in &service.methods {
				self.push(
					Target::Method,
					qualify(&service_name, &method.name),
					Some(id),
					method.features.as_deref(),
				);
			}
		}
		for ext in &proto.extensions {
			self.field(scope, file, ext);
		}
	}

	fn message(&mut self, scope: &str, parent: NodeId, proto: &MessageProto) {
		let name = qualify(scope, &proto.name);
		let id = self.push(Target::Message, name.clone(), Some(parent), proto.features.as_deref());

		let oneofs: Vec<NodeId> = proto
			.oneofs
			.iter()
			.map(|oneof| self.push(Target::Oneof, qualify(&name, &oneof.name), Some(id), oneof.features.as_deref()))
			.collect();
		for field in &proto.fields {
			let parent = match field.oneof_index {
				Some(index) => match oneofs.get(index) {
					Some(oneof) => *oneof,
					None => {
						self.errors.push(BuildError::OneofIndex {
							name: qualify(&name, &field.name),
							index,
						});
						continue;
					}
				},
				None => id,
			};
			self.field(&name, parent, field);
		}
		for range in &proto.extension_ranges {
			self.push(
				Target::ExtensionRange,
				format!("{name}.extensions[{}, {})", range.start, range.end),
				Some(id),
				range.features.as_deref(),
			);
		}
		for nested in &proto.nested_types {
			self.message(&name, id, nested);
		}
		for def in &proto.enum_types {
			self.enumeration(&name, id, def);
		}
		for ext in &proto.extensions {
			self.field(&name, id, ext);
		}
	}

	fn field(&mut self, scope: &str, parent: NodeId, proto: &FieldProto) {
		let name = qualify(scope, &proto.name);
		let checked = match self.syntax {
			Syntax::Editions => check_editions_field(&name, proto),
			Syntax::Proto2 | Syntax::Proto3 => check_legacy_field(&name, proto),
		};
		if let Err(error) = checked {
			self.errors.push(error);
		}
		let id = self.push(Target::Field, name, Some(parent), proto.features.as_deref());
		self.nodes[id.as_usize()].inferred_features = infer_field_features(self.syntax, proto);
	}

	/// Enum values are scoped to the enum's parent, as in protobuf.
	fn enumeration(&mut self, scope: &str, parent: NodeId, proto: &EnumProto) {
		let id = self.push(
			Target::Enum,
			qualify(scope, &proto.name),
			Some(parent),
			proto.features.as_deref(),
		);
		for value in &proto.values {
			self.push(
				Target::EnumEntry,
				qualify(scope, &value.name),
				Some(id),
				value.features.as_deref(),
			);
		}
	}
}

fn qualify(scope: &str, name: &str) -> String {
	if scope.is_empty() {
		name.to_string()
	} else {
		format!("{scope}.{name}")
	}
}

/// Builds files, resolving features at every node.
///
/// Resolvers are created lazily, one per edition, from a shared compiled
/// defaults table.
#[derive(Debug)]
pub struct DescriptorPool {
	types: Arc<TypePool>,
	feature_set_type: String,
	defaults: FeatureSetDefaults,
	policy: OverridePolicy,
	extensions: Vec<String>,
	resolvers: FxHashMap<Edition, FeatureResolver>,
	files: FxHashMap<String, FileDescriptor>,
}

impl DescriptorPool {
	pub fn new(types: Arc<TypePool>, defaults: FeatureSetDefaults) -> Self {
		Self {
			types,
			feature_set_type: FEATURE_SET.to_string(),
			defaults,
			policy: OverridePolicy::default(),
			extensions: Vec::new(),
			resolvers: FxHashMap::default(),
			files: FxHashMap::default(),
		}
	}

	/// Compiles defaults for the configured range and extensions and applies
	/// the configured override policy.
	pub fn from_config(
		types: Arc<TypePool>,
		config: &ResolverConfig,
		maximum_fallback: &Edition,
	) -> Result<Self, protofeat_resolver::ResolveError> {
		let defaults = compile_defaults(
			&types,
			FEATURE_SET,
			&config.extensions,
			&config.minimum_edition(),
			&config.maximum_edition(maximum_fallback),
		)?;
		Ok(Self::new(types, defaults).with_policy(config.overrides))
	}

	pub fn with_policy(mut self, policy: OverridePolicy) -> Self {
		self.policy = policy;
		self.resolvers.clear();
		self
	}

	/// Registers an extension on every resolver, present and future.
	pub fn with_extension(mut self, name: impl Into<String>) -> Self {
		self.extensions.push(name.into());
		self.resolvers.clear();
		self
	}

	pub fn types(&self) -> &Arc<TypePool> {
		&self.types
	}

	pub fn defaults(&self) -> &FeatureSetDefaults {
		&self.defaults
	}

	pub fn file(&self, name: &str) -> Option<&FileDescriptor> {
		self.files.get(name)
	}

	fn resolver(&mut self, file: &str, edition: &Edition) -> Result<&FeatureResolver, BuildError> {
		let slot = match self.resolvers.entry(edition.clone()) {
			Entry::Occupied(slot) => return Ok(slot.into_mut()),
			Entry::Vacant(slot) => slot,
		};
		let wrap = |source| BuildError::Resolver {
			file: file.to_string(),
			edition: edition.clone(),
			source,
		};
		let mut resolver =
			FeatureResolver::create(edition.clone(), Arc::clone(&self.types), &self.feature_set_type, &self.defaults)
				.map_err(wrap)?
				.with_policy(self.policy);
		for name in &self.extensions {
			resolver.register_extension(name).map_err(wrap)?;
		}
		tracing::debug!(domain = "features", edition = %edition, "cached resolver");
		Ok(slot.insert(resolver))
	}

	/// Builds `proto`, resolving features at every node.
	///
	/// All independent errors are collected into the returned
	/// [`BuildFailure`]; nothing is added to the pool on failure.
	pub fn build_file(&mut self, proto: &FileProto) -> Result<&FileDescriptor, BuildFailure> {
		if self.files.contains_key(&proto.name) {
			return Err(BuildFailure::single(
				&proto.name,
				BuildError::DuplicateFile {
					file: proto.name.clone(),
				},
			));
		}
		let edition = proto
			.effective_edition()
			.map_err(|e| BuildFailure::single(&proto.name, e))?;

		let mut builder = FileBuilder {
			types: &self.types,
			feature_set_type: &self.feature_set_type,
			syntax: proto.syntax,
			nodes: Vec::new(),
			errors: Vec::new(),
		};
		builder.file(proto);
		let FileBuilder { nodes, mut errors, .. } = builder;

		let mut file = FileDescriptor {
			name: proto.name.clone(),
			edition: edition.clone(),
			nodes,
			warnings: Vec::new(),
		};
		let resolver = self
			.resolver(&proto.name, &edition)
			.map_err(|e| BuildFailure::single(&proto.name, e))?;
		let report = resolve_tree(&mut file, resolver);
		errors.extend(report.errors);
		file.warnings = report.warnings;

		tracing::debug!(
			domain = "features",
			file = %proto.name,
			edition = %edition,
			nodes = file.nodes.len(),
			errors = errors.len(),
			"built file",
		);
		if !errors.is_empty() {
			return Err(BuildFailure {
				file: proto.name.clone(),
				errors,
				warnings: file.warnings,
			});
		}
		let name = proto.name.clone();
		Ok(self.files.entry(name).or_insert(file))
	}
}
