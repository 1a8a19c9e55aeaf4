//! Configuration file loading and precedence.
//!
//! Settings come from, highest first: command-line flags, environment
//! (`BBAUTH_USERNAME`, `BBAUTH_PASSWORD`), the JSON config file, then the
//! library defaults. The password is never read from the config file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use bbauth::{Endpoints, HandshakeConfig};
use serde::{Deserialize, Serialize};

use crate::cli::{EndpointArgs, LoginArgs};
use crate::error::{CliError, Result};

/// Schema version for config files.
pub const SCHEMA_VERSION: u32 = 1;

pub const PASSWORD_ENV: &str = "BBAUTH_PASSWORD";

/// On-disk configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
	#[serde(default)]
	pub schema: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub landing_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub login_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_hops: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_secs: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request_timeout_secs: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
}

impl FileConfig {
	/// Loads `explicit` if given (it must exist), otherwise the default
	/// location if present, otherwise an empty config.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		match explicit {
			Some(path) => Self::load_from(path),
			None => match default_config_path() {
				Some(path) if path.is_file() => Self::load_from(&path),
				_ => Ok(Self::default()),
			},
		}
	}

	pub fn load_from(path: &Path) -> Result<Self> {
		let parse = || -> anyhow::Result<Self> {
			let content = fs::read_to_string(path).context("failed to read config file")?;
			let config = serde_json::from_str(&content).context("failed to parse config file")?;
			Ok(config)
		};
		let config: Self = parse().map_err(|source| CliError::Config {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(target = "bbauth", path = %path.display(), schema = config.schema, "loaded config");
		Ok(config)
	}

	/// Builds the handshake config, letting `endpoints` flags and the login bounds override file values.
	pub fn handshake_config(&self, endpoints: &EndpointArgs, login: Option<&LoginArgs>) -> Result<HandshakeConfig> {
		let mut config = HandshakeConfig::default();

		let landing_url = endpoints.landing_url.as_deref().or(self.landing_url.as_deref());
		let login_url = endpoints.login_url.as_deref().or(self.login_url.as_deref());
		if landing_url.is_some() || login_url.is_some() {
			let defaults = Endpoints::default();
			config.endpoints = Endpoints::parse(
				landing_url.unwrap_or(defaults.landing_url.as_str()),
				login_url.unwrap_or(defaults.login_url.as_str()),
			)?;
		}

		if let Some(max_hops) = login.and_then(|args| args.max_hops).or(self.max_hops) {
			config.max_hops = max_hops;
		}
		if let Some(secs) = login.and_then(|args| args.timeout_secs).or(self.timeout_secs) {
			config.timeout = Duration::from_secs(secs);
		}
		if let Some(secs) = self.request_timeout_secs {
			config.request_timeout = Duration::from_secs(secs);
		}
		if let Some(user_agent) = &self.user_agent {
			config.user_agent = Some(user_agent.clone());
		}

		Ok(config)
	}
}

/// `$XDG_CONFIG_HOME/bbauth/config.json`, falling back to the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
	let config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from).or_else(dirs::config_dir)?;
	Some(config_home.join("bbauth").join("config.json"))
}
