//! Test doubles for the handshake.
//!
//! [`MockTransport`] serves scripted responses in order and records every
//! request it receives, so driver behaviour can be asserted without a network.
//!
//! # Example
//!
//! ```ignore
//! use bbauth::testing::MockTransport;
//!
//! let transport = MockTransport::new();
//! transport.push_html("https://blackboard.qut.edu.au/", "<title>Welcome</title>");
//! let recorded = transport.requests();
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::{Response, Transport};

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
	Get { url: Url },
	Post { url: Url, fields: Vec<(String, String)> },
}

impl RecordedRequest {
	pub fn url(&self) -> &Url {
		match self {
			RecordedRequest::Get { url } | RecordedRequest::Post { url, .. } => url,
		}
	}
}

#[derive(Debug, Default)]
struct MockState {
	responses: VecDeque<Result<Response>>,
	fallback: Option<Response>,
	delay: Option<Duration>,
	requests: Vec<RecordedRequest>,
}

/// Scripted [`Transport`].
///
/// Responses are returned in the order they were pushed, regardless of the
/// requested URL. Once the script is exhausted the fallback response is
/// served if set, otherwise requests fail with a transport error.
/// Clones share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
	state: Arc<Mutex<MockState>>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues an HTML response served from `url`.
	pub fn push_html(&self, url: &str, body: &str) -> &Self {
		let url = Url::parse(url).expect("mock response URL must be absolute");
		self.state.lock().responses.push_back(Ok(Response {
			url,
			status: 200,
			body: body.to_string(),
		}));
		self
	}

	/// Queues a transport failure.
	pub fn push_error(&self, url: &str, message: &str) -> &Self {
		self.state.lock().responses.push_back(Err(Error::TransportMessage {
			url: url.to_string(),
			message: message.to_string(),
		}));
		self
	}

	/// Serves this page forever once the script is exhausted.
	pub fn set_fallback_html(&self, url: &str, body: &str) {
		let url = Url::parse(url).expect("mock response URL must be absolute");
		self.state.lock().fallback = Some(Response {
			url,
			status: 200,
			body: body.to_string(),
		});
	}

	/// Holds every later request for `delay` before answering it.
	///
	/// The request is recorded before the wait, the response is taken after it.
	pub fn set_delay(&self, delay: Duration) {
		self.state.lock().delay = Some(delay);
	}

	/// Requests received so far, in order.
	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.state.lock().requests.clone()
	}

	/// Number of scripted responses not yet served.
	pub fn remaining(&self) -> usize {
		self.state.lock().responses.len()
	}

	async fn respond(&self, request: RecordedRequest) -> Result<Response> {
		let url = request.url().to_string();
		let delay = {
			let mut state = self.state.lock();
			state.requests.push(request);
			state.delay
		};
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}

		let mut state = self.state.lock();
		match state.responses.pop_front() {
			Some(response) => response,
			None => state.fallback.clone().ok_or(Error::TransportMessage {
				url,
				message: "mock transport script exhausted".to_string(),
			}),
		}
	}
}

#[async_trait]
impl Transport for MockTransport {
	async fn get(&mut self, url: &Url) -> Result<Response> {
		self.respond(RecordedRequest::Get { url: url.clone() }).await
	}

	async fn post_form(&mut self, url: &Url, fields: &[(String, String)]) -> Result<Response> {
		self.respond(RecordedRequest::Post {
			url: url.clone(),
			fields: fields.to_vec(),
		})
		.await
	}
}
