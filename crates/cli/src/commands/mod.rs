mod classify;
mod login;

use std::time::Instant;

use serde::Serialize;

use crate::cli::{Cli, Commands};
use crate::config::FileConfig;
use crate::error::Result;
use crate::output::{self, OutputFormat, ResultBuilder, Timings};

/// Runs the selected command and prints its result.
pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let file_config = FileConfig::load(cli.config.as_deref())?;
	let started = Instant::now();

	match cli.command {
		Commands::Login(args) => {
			let data = login::execute(&args, &file_config).await?;
			emit("login", data, started, format, login::print_text)
		}
		Commands::Classify(args) => {
			let data = classify::execute(&args, &file_config)?;
			emit("classify", data, started, format, classify::print_text)
		}
	}
}

fn emit<T: Serialize>(command: &str, data: T, started: Instant, format: OutputFormat, print_text: fn(&T)) -> Result<()> {
	match format {
		OutputFormat::Text => print_text(&data),
		OutputFormat::Json => {
			let result = ResultBuilder::new(command).data(data).timings(Timings::from(started.elapsed())).build();
			output::print_json(&result);
		}
	}
	Ok(())
}
