//! HTTP seam between the handshake driver and the network.
//!
//! The driver only needs two verbs, both of which must share cookie state
//! across calls. [`HttpSession`] is the `reqwest` implementation; tests use
//! [`MockTransport`](crate::testing::MockTransport).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use tracing::debug;
use url::Url;

use crate::config::HandshakeConfig;
use crate::error::{Error, Result};

/// A fetched response, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
	/// Final URL after redirects.
	pub url: Url,
	pub status: u16,
	pub body: String,
}

/// Stateful HTTP client used by the handshake.
///
/// Implementations keep cookies and connections between calls; the driver
/// never touches cookies itself.
#[async_trait]
pub trait Transport: Send {
	/// Fetches `url`, following redirects.
	async fn get(&mut self, url: &Url) -> Result<Response>;

	/// Posts `fields` to `url` as `application/x-www-form-urlencoded`.
	async fn post_form(&mut self, url: &Url, fields: &[(String, String)]) -> Result<Response>;
}

/// `reqwest`-backed session with a persistent cookie jar.
#[derive(Debug, Clone)]
pub struct HttpSession {
	client: reqwest::Client,
	jar: Arc<Jar>,
}

impl HttpSession {
	/// Creates a session with default settings.
	pub fn new() -> Result<Self> {
		Self::from_config(&HandshakeConfig::default())
	}

	/// Creates a session using the request timeout and user agent in `config`.
	pub fn from_config(config: &HandshakeConfig) -> Result<Self> {
		let jar = Arc::new(Jar::default());
		let mut builder = reqwest::Client::builder()
			.cookie_provider(Arc::clone(&jar))
			.timeout(config.request_timeout);
		if let Some(user_agent) = &config.user_agent {
			builder = builder.user_agent(user_agent.as_str());
		}

		let client = builder.build().map_err(|source| Error::Transport {
			url: config.endpoints.landing_url.to_string(),
			source,
		})?;

		Ok(Self { client, jar })
	}

	/// Wraps an existing client. `jar` must be the cookie provider `client` was built with.
	pub fn with_client(client: reqwest::Client, jar: Arc<Jar>) -> Self {
		Self { client, jar }
	}

	/// Underlying client, for requests made after authentication.
	pub fn client(&self) -> &reqwest::Client {
		&self.client
	}

	pub fn jar(&self) -> &Arc<Jar> {
		&self.jar
	}

	/// `Cookie` header value the session would send to `url`.
	pub fn cookie_header(&self, url: &Url) -> Option<String> {
		self.jar.cookies(url).and_then(|value| value.to_str().ok().map(str::to_string))
	}

	/// Number of cookies the session would send to `url`.
	pub fn cookie_count(&self, url: &Url) -> usize {
		self.cookie_header(url).map_or(0, |header| header.split("; ").filter(|pair| !pair.is_empty()).count())
	}

	async fn read(url: &Url, request: reqwest::RequestBuilder) -> Result<Response> {
		let transport_error = |source| Error::Transport {
			url: url.to_string(),
			source,
		};

		let response = request.send().await.map_err(transport_error)?;
		let status = response.status();
		let final_url = response.url().clone();
		if !status.is_success() {
			debug!(target = "bbauth", url = %final_url, status = status.as_u16(), "non-success response");
		}
		let body = response.text().await.map_err(transport_error)?;

		Ok(Response {
			url: final_url,
			status: status.as_u16(),
			body,
		})
	}
}

#[async_trait]
impl Transport for HttpSession {
	async fn get(&mut self, url: &Url) -> Result<Response> {
		Self::read(url, self.client.get(url.clone())).await
	}

	async fn post_form(&mut self, url: &Url, fields: &[(String, String)]) -> Result<Response> {
		Self::read(url, self.client.post(url.clone()).form(fields)).await
	}
}
