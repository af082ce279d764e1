//! Subcommand implementations, writing their primary output to `out`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use protofeat_descriptor::{DescriptorPool, FileProto};
use protofeat_edition::Edition;
use protofeat_resolver::{FeatureSetDefaults, ResolverConfig, compile_defaults};
use protofeat_schema::builtin::{self, GENERATORS};
use protofeat_schema::feature_set::FEATURE_SET;
use protofeat_schema::text::{closest, print_message};
use protofeat_schema::TypePool;
use tracing::{info, warn};

use crate::cli::{Cli, Command, Format};
use crate::error::CliError;


/// Latest edition covered when neither flags nor config name one.
pub fn default_maximum() -> Edition {
	Edition::from_number(2024)
}

pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
	let config = match &cli.config {
		Some(path) => ResolverConfig::load(path)?,
		None => ResolverConfig::default(),
	};
	match &cli.command {
		Command::Defaults {
			minimum,
			maximum,
			extensions,
			format,
			out: path,
		} => {
			let minimum = minimum.clone().unwrap_or_else(|| config.minimum_edition());
			let maximum = maximum.clone().unwrap_or_else(|| config.maximum_edition(&default_maximum()));
			let extensions = if extensions.is_empty() {
				config.extensions.clone()
			} else {
				extensions.clone()
			};
			let (pool, defaults) = compile(&extensions, &minimum, &maximum)?;
			let bytes = encode(&pool, &defaults, *format)?;
			match path {
				Some(path) => {
					std::fs::write(path, &bytes).map_err(|error| CliError::Io {
						path: path.clone(),
						error,
					})?;
					info!(path = %path.display(), entries = defaults.defaults.len(), "wrote feature set defaults");
				}
				None => out.write_all(&bytes).map_err(CliError::Output)?,
			}
			Ok(())
		}
		Command::Resolve { file } => resolve(&config, file, out),
	}
}

/// A pool holding the core feature set and the named bundled catalogs.
fn catalog_pool(extensions: &[String]) -> Result<TypePool, CliError> {
	let mut pool = TypePool::new();
	builtin::register_core(&mut pool)?;
	for name in extensions {
		let Some(register) = builtin::generator(name) else {
			let hint = closest(name, GENERATORS.iter().map(|(n, _)| *n))
				.map(|s| format!(" Did you mean \"{s}\"?"))
				.unwrap_or_default();
			return Err(CliError::UnknownExtension {
				name: name.clone(),
				hint,
			});
		};
		if pool.extension(name).is_none() {
			register(&mut pool)?;
		}
	}
	Ok(pool)
}

pub fn compile(
	extensions: &[String],
	minimum: &Edition,
	maximum: &Edition,
) -> Result<(TypePool, FeatureSetDefaults), CliError> {
	let pool = catalog_pool(extensions)?;
	let defaults = compile_defaults(&pool, FEATURE_SET, extensions, minimum, maximum)?;
	Ok((pool, defaults))
}

fn encode(pool: &TypePool, defaults: &FeatureSetDefaults, format: Format) -> Result<Vec<u8>, CliError> {
	Ok(match format {
		Format::Json => {
			let mut json = defaults.to_json()?;
			json.push('\n');
			json.into_bytes()
		}
		Format::Binary => defaults.to_bytes()?,
		Format::Text => defaults.to_text(pool, FEATURE_SET).into_bytes(),
	})
}

fn resolve(config: &ResolverConfig, path: &Path, out: &mut impl Write) -> Result<(), CliError> {
	let text = std::fs::read_to_string(path).map_err(|error| CliError::Io {
		path: PathBuf::from(path),
		error,
	})?;
	let proto = FileProto::from_json(&text)?;

	let mut config = config.clone();
	if config.extensions.is_empty() {
		config.extensions = GENERATORS.iter().map(|(name, _)| name.to_string()).collect();
	}
	let types = Arc::new(catalog_pool(&config.extensions)?);
	let mut pool = DescriptorPool::from_config(Arc::clone(&types), &config, &default_maximum())?;
	let file = pool.build_file(&proto)?;

	for warning in file.warnings() {
		warn!("{warning}");
	}
	for node in file.nodes() {
		let features = node
			.features
			.as_ref()
			.map(|f| print_message(&types, FEATURE_SET, f))
			.unwrap_or_default();
		writeln!(out, "{} {}: {{ {features} }}", node.target, node.full_name).map_err(CliError::Output)?;
	}
	Ok(())
}
