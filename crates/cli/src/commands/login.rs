//! `bbauth login`: run the handshake against the configured endpoints.

use bbauth::{Stage, authenticate};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::cli::LoginArgs;
use crate::config::{FileConfig, PASSWORD_ENV};
use crate::error::Result;
use crate::output::print_field;
use crate::prompt;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
	pub username: String,
	pub stages: Vec<Stage>,
	pub hops: usize,
	pub round_trips: usize,
	pub final_url: String,
	pub confirmed: bool,
	/// Cookies the session holds for the landing URL.
	pub cookies: usize,
}

pub async fn execute(args: &LoginArgs, file: &FileConfig) -> Result<LoginData> {
	let config = file.handshake_config(&args.endpoints, Some(args))?;
	let username = args.username.clone().or_else(|| file.username.clone());
	let password = std::env::var(PASSWORD_ENV).ok();
	let credentials = prompt::credentials(username, password)?;

	let landing_url = config.endpoints.landing_url.clone();
	info!(target = "bbauth", url = %landing_url, max_hops = config.max_hops, "starting login");

	let (session, report) = authenticate(&credentials, None, config).await?;

	Ok(LoginData {
		username: credentials.username().to_string(),
		hops: report.hops(),
		stages: report.stages,
		round_trips: report.round_trips,
		final_url: report.final_url.to_string(),
		confirmed: report.confirmed,
		cookies: session.cookie_count(&landing_url),
	})
}

pub fn print_text(data: &LoginData) {
	println!("{} as {}", "Authenticated".green().bold(), data.username.bold());
	let path = data.stages.iter().map(Stage::to_string).collect::<Vec<_>>().join(" -> ");
	print_field("stages", path);
	print_field("round trips", data.round_trips);
	print_field("landing", &data.final_url);
	print_field("cookies", data.cookies);
	if !data.confirmed {
		println!("{}", "warning: confirmation fetch did not show the welcome page".yellow());
	}
}
