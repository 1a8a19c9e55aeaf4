//! Error types for the handshake.

use thiserror::Error;

use crate::stage::Stage;

/// Result type alias for handshake operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the handshake.
#[derive(Debug, Error)]
pub enum Error {
	/// A page lacked the element or attribute needed to decide or perform the next step.
	#[error("malformed page: {}", describe_missing(.element, .attribute))]
	MalformedPage {
		/// Element tag name (`input` or `form`).
		element: &'static str,
		/// Attribute name, or [`None`] when the element itself is absent.
		attribute: Option<&'static str>,
	},

	/// HTTP request failed (network, TLS, DNS, redirect loop).
	#[error("request to {url} failed: {source}")]
	Transport {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	/// Transport failure reported by a non-reqwest transport.
	#[error("request to {url} failed: {message}")]
	TransportMessage { url: String, message: String },

	/// A URL taken from configuration or a page could not be parsed.
	#[error("invalid URL '{url}': {source}")]
	InvalidUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	/// A submitter was asked to act on a page classified for another step.
	#[error("cannot submit a token for stage {0}")]
	UnexpectedStage(Stage),

	/// The handshake did not reach the landing page within the hop budget.
	#[error("handshake did not complete after {hops} hops")]
	TooManyHops { hops: usize },

	/// The handshake deadline elapsed.
	#[error("handshake timed out after {ms}ms")]
	Timeout { ms: u64 },
}

fn describe_missing(element: &str, attribute: &Option<&'static str>) -> String {
	match attribute {
		Some(attribute) => format!("first <{element}> element has no '{attribute}' attribute"),
		None => format!("no <{element}> element"),
	}
}

impl Error {
	pub(crate) fn missing_element(element: &'static str) -> Self {
		Error::MalformedPage { element, attribute: None }
	}

	pub(crate) fn missing_attribute(element: &'static str, attribute: &'static str) -> Self {
		Error::MalformedPage {
			element,
			attribute: Some(attribute),
		}
	}

	/// Returns true if the error came from the HTTP layer.
	pub fn is_transport(&self) -> bool {
		matches!(self, Error::Transport { .. } | Error::TransportMessage { .. })
	}

	/// Returns true if the handshake gave up because of its hop or time bound.
	pub fn is_exhausted(&self) -> bool {
		matches!(self, Error::TooManyHops { .. } | Error::Timeout { .. })
	}
}
