use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use protofeat_edition::Edition;

#[derive(Parser, Debug)]
#[command(name = "protofeat")]
#[command(about = "Compile edition feature defaults and resolve descriptor features")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Resolver config file (TOML)
	#[arg(long, short = 'c', global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Compile feature-set defaults for an edition range
	Defaults {
		/// Earliest edition to cover (default PROTO2)
		#[arg(long, value_name = "EDITION")]
		minimum: Option<Edition>,
		/// Latest edition to cover (default 2024)
		#[arg(long, value_name = "EDITION")]
		maximum: Option<Edition>,
		/// Bundled feature extension to include (repeatable)
		#[arg(long = "extension", short = 'e', value_name = "NAME")]
		extensions: Vec<String>,
		/// Output encoding
		#[arg(long, value_enum, default_value_t = Format::Json)]
		format: Format,
		/// Write to a file instead of stdout
		#[arg(long, short = 'o', value_name = "PATH")]
		out: Option<PathBuf>,
	},
	/// Build a JSON-described file and print every node's effective features
	Resolve {
		/// File description (JSON)
		file: PathBuf,
	},
}

/// Encodings for compiled defaults.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
	Json,
	Binary,
	Text,
}
