use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Handshake(#[from] bbauth::Error),

	/// Credentials could not be read from the terminal.
	#[error("credential prompt failed: {0}")]
	Prompt(String),

	#[error("invalid configuration in {path}: {source}")]
	Config {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},

	#[error("cannot read {path}: {source}")]
	ReadPage {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			CliError::Handshake(err) => handshake_code(err),
			CliError::Prompt(_) => (ErrorCode::PromptFailed, None),
			CliError::Config { path, .. } => (ErrorCode::ConfigError, Some(serde_json::json!({ "path": path }))),
			CliError::ReadPage { path, .. } => (ErrorCode::IoError, Some(serde_json::json!({ "path": path }))),
			CliError::Io(_) => (ErrorCode::IoError, None),
			CliError::Json(_) => (ErrorCode::InternalError, None),
		};

		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}
}

fn handshake_code(err: &bbauth::Error) -> (ErrorCode, Option<serde_json::Value>) {
	use bbauth::Error;

	match err {
		Error::MalformedPage { element, attribute } => (
			ErrorCode::MalformedPage,
			Some(serde_json::json!({ "element": element, "attribute": attribute })),
		),
		Error::Transport { url, .. } | Error::TransportMessage { url, .. } => (ErrorCode::NetworkError, Some(serde_json::json!({ "url": url }))),
		Error::InvalidUrl { url, .. } => (ErrorCode::InvalidInput, Some(serde_json::json!({ "url": url }))),
		Error::UnexpectedStage(stage) => (ErrorCode::InternalError, Some(serde_json::json!({ "stage": stage }))),
		Error::TooManyHops { hops } => (ErrorCode::TooManyHops, Some(serde_json::json!({ "hops": hops }))),
		Error::Timeout { ms } => (ErrorCode::Timeout, Some(serde_json::json!({ "timeout_ms": ms }))),
	}
}
