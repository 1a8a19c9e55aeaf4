//! The handshake driver.
//!
//! Each iteration classifies the current page, performs exactly one HTTP
//! round trip, and replaces the page with the response:
//!
//! | Stage | Next request |
//! |---|---|
//! | [`Stage::AwaitingSaml`] | POST `SAMLResponse` to the form action |
//! | [`Stage::AwaitingJwt`] | POST `jwtPayload` to the form action |
//! | [`Stage::AwaitingLogin`] | POST username/password to the login URL |
//! | [`Stage::Unrecognized`] | GET the login URL |
//! | [`Stage::Authenticated`] | GET the landing URL once to confirm, then stop |
//!
//! The loop is bounded by [`HandshakeConfig::max_hops`] and
//! [`HandshakeConfig::timeout`].

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::HandshakeConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::page::Page;
use crate::stage::{Stage, classify};
use crate::submit::{FormSubmission, login_submission, token_submission};
use crate::transport::{HttpSession, Response, Transport};

/// The request chosen for a classified page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextRequest {
	Get(Url),
	Post(FormSubmission),
}

impl NextRequest {
	pub fn url(&self) -> &Url {
		match self {
			NextRequest::Get(url) => url,
			NextRequest::Post(submission) => &submission.url,
		}
	}
}

/// Summary of a completed handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeReport {
	/// Stage of every page seen, in order, ending with [`Stage::Authenticated`].
	pub stages: Vec<Stage>,
	/// HTTP round trips performed, including the first landing fetch and the confirmation fetch.
	pub round_trips: usize,
	/// URL of the confirmed landing page.
	pub final_url: Url,
	/// Whether the confirmation fetch still showed the landing page.
	pub confirmed: bool,
}

impl HandshakeReport {
	/// Stage transitions performed before reaching the landing page.
	pub fn hops(&self) -> usize {
		self.stages.len().saturating_sub(1)
	}
}

/// Drives a [`Transport`] through the handshake.
#[derive(Debug)]
pub struct Handshake<T: Transport> {
	transport: T,
	config: HandshakeConfig,
}

impl<T: Transport> Handshake<T> {
	pub fn new(transport: T, config: HandshakeConfig) -> Self {
		Self { transport, config }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	pub fn into_transport(self) -> T {
		self.transport
	}

	/// Decides the request that advances `page`, already classified as `stage`.
	///
	/// Returns [`None`] for [`Stage::Authenticated`].
	pub fn next_request(&self, page: &Page, stage: Stage, credentials: &Credentials) -> Result<Option<NextRequest>> {
		let request = match stage {
			Stage::Authenticated => return Ok(None),
			Stage::AwaitingSaml | Stage::AwaitingJwt => NextRequest::Post(token_submission(page, stage)?),
			Stage::AwaitingLogin => NextRequest::Post(login_submission(credentials, &self.config.endpoints)),
			Stage::Unrecognized => NextRequest::Get(self.config.endpoints.login_url.clone()),
		};
		Ok(Some(request))
	}

	/// Runs the handshake until the landing page greets the user.
	///
	/// # Errors
	///
	/// * [`Error::MalformedPage`] if a page cannot be classified or submitted.
	/// * [`Error::Transport`] / [`Error::TransportMessage`] if a request fails.
	/// * [`Error::TooManyHops`] after [`HandshakeConfig::max_hops`] transitions.
	/// * [`Error::Timeout`] once [`HandshakeConfig::timeout`] elapses.
	pub async fn run(&mut self, credentials: &Credentials) -> Result<HandshakeReport> {
		let timeout = self.config.timeout;
		match tokio::time::timeout(timeout, self.drive(credentials)).await {
			Ok(result) => result,
			Err(_) => Err(Error::Timeout { ms: duration_ms(timeout) }),
		}
	}

	async fn drive(&mut self, credentials: &Credentials) -> Result<HandshakeReport> {
		let landing_url = self.config.endpoints.landing_url.clone();
		info!(target = "bbauth", username = credentials.username(), url = %landing_url, "beginning authentication");

		let mut page = self.fetch(NextRequest::Get(landing_url.clone())).await?;
		let mut stages = Vec::new();
		let mut round_trips = 1;

		loop {
			let stage = classify(&page)?;
			stages.push(stage);
			debug!(target = "bbauth", url = %page.url(), title = page.title().unwrap_or_default(), %stage, "classified page");

			if stage.is_terminal() {
				break;
			}
			let request = self.next_request(&page, stage, credentials)?.ok_or(Error::UnexpectedStage(stage))?;

			let hops = stages.len();
			if hops > self.config.max_hops {
				return Err(Error::TooManyHops { hops: self.config.max_hops });
			}

			match stage {
				Stage::AwaitingSaml => info!(target = "bbauth", url = %request.url(), "submitting SAMLResponse"),
				Stage::AwaitingJwt => info!(target = "bbauth", url = %request.url(), "submitting jwtPayload"),
				Stage::AwaitingLogin => {
					info!(target = "bbauth", title = page.title().unwrap_or_default(), username = credentials.username(), "submitting login form")
				}
				Stage::Unrecognized => warn!(target = "bbauth", url = %page.url(), "unexpected page, returning to login portal"),
				Stage::Authenticated => {}
			}

			page = self.fetch(request).await?;
			round_trips += 1;
		}

		info!(target = "bbauth", hops = stages.len() - 1, "successfully authenticated");

		let confirmation = self.fetch(NextRequest::Get(landing_url)).await?;
		round_trips += 1;
		let confirmed = matches!(classify(&confirmation), Ok(Stage::Authenticated));
		if !confirmed {
			warn!(target = "bbauth", url = %confirmation.url(), "landing page no longer shows a welcome title");
		}

		Ok(HandshakeReport {
			stages,
			round_trips,
			final_url: confirmation.url().clone(),
			confirmed,
		})
	}

	async fn fetch(&mut self, request: NextRequest) -> Result<Page> {
		let Response { url, status, body } = match &request {
			NextRequest::Get(url) => self.transport.get(url).await?,
			NextRequest::Post(submission) => self.transport.post_form(&submission.url, &submission.fields).await?,
		};
		debug!(target = "bbauth", %url, status, bytes = body.len(), "fetched");
		Ok(Page::parse(url, &body))
	}
}

/// Authenticates `session`, creating one from `config` if none is given.
///
/// Returns the session with its cookie jar populated for the landing site.
pub async fn authenticate(
	credentials: &Credentials,
	session: Option<HttpSession>,
	config: HandshakeConfig,
) -> Result<(HttpSession, HandshakeReport)> {
	let session = match session {
		Some(session) => session,
		None => {
			info!(target = "bbauth", "initiating new session");
			HttpSession::from_config(&config)?
		}
	};

	let mut handshake = Handshake::new(session, config);
	let report = handshake.run(credentials).await?;
	Ok((handshake.into_transport(), report))
}

fn duration_ms(duration: Duration) -> u64 {
	u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
