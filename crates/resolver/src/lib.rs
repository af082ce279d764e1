//! Edition feature defaults compilation and resolution.
//!
//! Two phases:
//!
//! - [`compile_defaults`] evaluates every feature's per-edition defaults into a
//!   [`FeatureSetDefaults`] table, split into overridable and fixed values.
//! - [`FeatureResolver`] is created from such a table for one edition and
//!   merges parent and local features into each descriptor's effective
//!   feature set.
//!
//! [`validate_feature_lifetimes`] reports features a descriptor sets outside
//! their introduced/removed window, and deprecated ones as warnings.

pub mod compile;
pub mod config;
pub mod defaults;
mod error;
pub mod lifetimes;
pub mod resolver;
pub mod shape;

pub use compile::compile_defaults;
pub use config::ResolverConfig;
pub use defaults::{EditionDefaults, FeatureSetDefaults};
pub use error::{CodecError, ConfigError, ResolveError, Result};
pub use lifetimes::{LifetimeReport, validate_feature_lifetimes};
pub use resolver::{FeatureResolver, OverridePolicy, Redundant, Resolution};
