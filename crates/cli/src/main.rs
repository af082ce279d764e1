//! `protofeat`: compiles edition feature defaults and resolves the features
//! of JSON-described schema files.

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod error;

use cli::Cli;
use error::CliError;

fn main() -> ExitCode {
	let args = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
		eprintln!("failed to install logger: {err}");
	}

	let mut stdout = std::io::stdout().lock();
	match commands::run(&args, &mut stdout) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			report(&err);
			ExitCode::FAILURE
		}
	}
}

fn report(err: &CliError) {
	match err {
		CliError::Build(failure) => {
			for warning in &failure.warnings {
				tracing::warn!("{warning}");
			}
			for error in &failure.errors {
				tracing::error!("{error}");
			}
			eprintln!("error: {failure}");
		}
		other => eprintln!("error: {other}"),
	}
}
