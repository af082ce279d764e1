//! Descriptor construction with edition feature resolution.
//!
//! [`DescriptorPool::build_file`] flattens a [`FileProto`] into an arena of
//! nodes and resolves every node's effective features top-down through a
//! per-edition [`protofeat_resolver::FeatureResolver`]. The walk itself is
//! [`resolve_tree`], generic over [`FeatureTree`] so other descriptor models
//! can reuse it.

mod error;
pub mod legacy;
pub mod pool;
pub mod proto;
pub mod tree;

pub use error::{BuildError, BuildFailure};
pub use pool::{DescriptorPool, FileDescriptor, Node, NodeId};
pub use proto::{
	EnumProto, EnumValueProto, ExtensionRangeProto, FieldKind, FieldProto, FileProto, MessageProto, MethodProto,
	OneofProto, ServiceProto, Syntax,
};
pub use tree::{FeatureTree, TreeReport, resolve_tree};
