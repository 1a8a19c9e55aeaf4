//! Credential prompts.
//!
//! The username is echoed, the password is not. Prompting requires an
//! interactive terminal; scripted use supplies `--username` and
//! `BBAUTH_PASSWORD` instead.

use std::io::IsTerminal;

use bbauth::Credentials;
use dialoguer::{Input, Password};

use crate::error::{CliError, Result};

/// Checks if both stdin and stderr are connected to a terminal.
pub fn is_interactive_terminal() -> bool {
	std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Assembles credentials, prompting for whichever half is missing.
pub fn credentials(username: Option<String>, password: Option<String>) -> Result<Credentials> {
	resolve_credentials(username, password, is_interactive_terminal(), prompt_username, prompt_password)
}

fn resolve_credentials(
	username: Option<String>,
	password: Option<String>,
	interactive: bool,
	ask_username: impl FnOnce() -> Result<String>,
	ask_password: impl FnOnce() -> Result<String>,
) -> Result<Credentials> {
	if !interactive && (username.is_none() || password.is_none()) {
		return Err(CliError::Prompt(
			"not running in a terminal; pass --username and set BBAUTH_PASSWORD for scripted use".into(),
		));
	}

	let username = match username {
		Some(username) => username,
		None => ask_username()?,
	};
	let password = match password {
		Some(password) => password,
		None => ask_password()?,
	};

	Ok(Credentials::new(username, password))
}

fn prompt_username() -> Result<String> {
	Input::<String>::new()
		.with_prompt("Please enter your username")
		.interact_text()
		.map_err(|e| CliError::Prompt(e.to_string()))
}

fn prompt_password() -> Result<String> {
	Password::new()
		.with_prompt("Please enter your password")
		.interact()
		.map_err(|e| CliError::Prompt(e.to_string()))
}
