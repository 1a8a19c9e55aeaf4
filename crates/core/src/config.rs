//! Handshake configuration: fixed endpoints and loop bounds.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default service provider landing page.
pub const DEFAULT_LANDING_URL: &str = "https://blackboard.qut.edu.au";

/// Default identity provider login endpoint.
pub const DEFAULT_LOGIN_URL: &str = "https://esoe.qut.edu.au/qut-login/login";

/// Default cap on stage transitions before giving up.
pub const DEFAULT_MAX_HOPS: usize = 16;

/// Default deadline for the whole handshake.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed URLs the handshake starts from and recovers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
	/// Service provider page that greets an authenticated user.
	pub landing_url: Url,
	/// Identity provider endpoint that accepts the credential post.
	pub login_url: Url,
}

impl Endpoints {
	/// Builds endpoints from string URLs.
	pub fn parse(landing_url: &str, login_url: &str) -> Result<Self> {
		Ok(Self {
			landing_url: parse_url(landing_url)?,
			login_url: parse_url(login_url)?,
		})
	}
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			landing_url: Url::parse(DEFAULT_LANDING_URL).expect("default landing URL is valid"),
			login_url: Url::parse(DEFAULT_LOGIN_URL).expect("default login URL is valid"),
		}
	}
}

/// Settings for one handshake run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
	pub endpoints: Endpoints,
	/// Maximum number of stage transitions (HTTP round trips after the
	/// initial landing fetch) before [`Error::TooManyHops`].
	pub max_hops: usize,
	/// Deadline for the whole handshake.
	pub timeout: Duration,
	/// Timeout applied to each HTTP request by [`HttpSession`](crate::HttpSession).
	pub request_timeout: Duration,
	/// User agent sent by [`HttpSession`](crate::HttpSession), if overridden.
	pub user_agent: Option<String>,
}

impl Default for HandshakeConfig {
	fn default() -> Self {
		Self {
			endpoints: Endpoints::default(),
			max_hops: DEFAULT_MAX_HOPS,
			timeout: DEFAULT_TIMEOUT,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			user_agent: None,
		}
	}
}

impl HandshakeConfig {
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;
		self
	}

	pub fn with_max_hops(mut self, max_hops: usize) -> Self {
		self.max_hops = max_hops;
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
	Url::parse(url).map_err(|source| Error::InvalidUrl {
		url: url.to_string(),
		source,
	})
}
