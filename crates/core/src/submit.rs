//! Builders for the POSTs that advance the handshake.
//!
//! Submitters only describe the request as a [`FormSubmission`]; the driver
//! sends it through the shared transport.

use url::Url;

use crate::config::Endpoints;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::page::Page;
use crate::stage::Stage;

/// A form POST: destination plus its entire body, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
	pub url: Url,
	pub fields: Vec<(String, String)>,
}

impl FormSubmission {
	/// Returns the value of field `name`.
	pub fn field(&self, name: &str) -> Option<&str> {
		self.fields.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}
}

/// Re-posts the hidden token on a SAML or JWT page to its form's `action`.
///
/// The first `<input>`'s `value` is sent as `SAMLResponse` or `jwtPayload`.
/// A relative `action` is resolved against the page URL.
///
/// # Errors
///
/// Returns [`Error::UnexpectedStage`] for stages without a token, and
/// [`Error::MalformedPage`] if the input value or form action is missing.
pub fn token_submission(page: &Page, stage: Stage) -> Result<FormSubmission> {
	let field = stage.token_field().ok_or(Error::UnexpectedStage(stage))?;
	let value = page.require_input_attr("value")?;
	let action = page.require_form_attr("action")?;

	let url = page.url().join(action).map_err(|source| Error::InvalidUrl {
		url: action.to_string(),
		source,
	})?;

	Ok(FormSubmission {
		url,
		fields: vec![(field.to_string(), value.to_string())],
	})
}

/// Posts the credential pair to the fixed identity provider login URL.
pub fn login_submission(credentials: &Credentials, endpoints: &Endpoints) -> FormSubmission {
	FormSubmission {
		url: endpoints.login_url.clone(),
		fields: vec![
			("username".to_string(), credentials.username().to_string()),
			("password".to_string(), credentials.password().to_string()),
		],
	}
}
