//! Handshake stage classification.
//!
//! The classifier is an ordered rule table: rules are tried top to bottom and
//! the first predicate that holds decides the [`Stage`]. `Authenticated` comes
//! first because the final landing page has no hidden token form to inspect.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::page::Page;

/// Title prefix of the service provider's landing page.
pub const WELCOME_PREFIX: &str = "Welcome";

/// Name of the form the identity provider renders around its login fields.
pub const LOGIN_FORM_NAME: &str = "loginSuccessful";

/// Where a page sits in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
	/// Landing page reached, session is authenticated.
	Authenticated,
	/// Hidden form carrying a SAML response or request.
	AwaitingSaml,
	/// Hidden form carrying a JWT payload.
	AwaitingJwt,
	/// Identity provider login form.
	AwaitingLogin,
	/// Anything else: error pages, unexpected layouts.
	Unrecognized,
}

impl Stage {
	/// Form field the hidden token is posted under, for token stages.
	pub fn token_field(self) -> Option<&'static str> {
		match self {
			Stage::AwaitingSaml => Some("SAMLResponse"),
			Stage::AwaitingJwt => Some("jwtPayload"),
			_ => None,
		}
	}

	/// Whether the handshake stops at this stage.
	pub fn is_terminal(self) -> bool {
		self == Stage::Authenticated
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Stage::Authenticated => write!(f, "authenticated"),
			Stage::AwaitingSaml => write!(f, "awaitingSaml"),
			Stage::AwaitingJwt => write!(f, "awaitingJwt"),
			Stage::AwaitingLogin => write!(f, "awaitingLogin"),
			Stage::Unrecognized => write!(f, "unrecognized"),
		}
	}
}

/// Predicate deciding whether a page belongs to a stage.
pub type StageRule = fn(&Page) -> bool;

/// Classification rules in evaluation order. [`Stage::Unrecognized`] is the
/// fallback and has no rule.
pub const CLASSIFICATION_ORDER: [(Stage, StageRule); 4] = [
	(Stage::Authenticated, is_welcome_page),
	(Stage::AwaitingSaml, has_saml_input),
	(Stage::AwaitingJwt, has_jwt_input),
	(Stage::AwaitingLogin, has_login_form),
];

fn is_welcome_page(page: &Page) -> bool {
	page.title().is_some_and(|title| title.starts_with(WELCOME_PREFIX))
}

fn has_saml_input(page: &Page) -> bool {
	matches!(page.input_attr("name"), Some("SAMLResponse" | "SAMLRequest"))
}

fn has_jwt_input(page: &Page) -> bool {
	page.input_attr("name") == Some("jwtPayload")
}

fn has_login_form(page: &Page) -> bool {
	page.form_attr("name") == Some(LOGIN_FORM_NAME)
}

/// Classifies `page` into exactly one [`Stage`].
///
/// # Errors
///
/// Returns [`Error::MalformedPage`] if the page is not the landing page and
/// has neither an `<input>` nor a `<form>`, since no step can be chosen.
pub fn classify(page: &Page) -> Result<Stage> {
	let (first_stage, first_rule) = CLASSIFICATION_ORDER[0];
	if first_rule(page) {
		return Ok(first_stage);
	}

	if page.is_bare() {
		return Err(Error::missing_element("input"));
	}

	let stage = CLASSIFICATION_ORDER[1..]
		.iter()
		.find(|(_, rule)| rule(page))
		.map_or(Stage::Unrecognized, |(stage, _)| *stage);

	Ok(stage)
}

#[cfg(test)]
mod tests {
	use url::Url;

	use super::*;

	fn page(html: &str) -> Page {
		Page::parse(Url::parse("https://sp.example/").unwrap(), html)
	}

	#[test]
	fn welcome_title_wins_over_everything() {
		let page = page(
			r#"<title>Welcome to Blackboard</title>
			<form name="loginSuccessful"><input name="SAMLResponse" value="x"></form>"#,
		);
		assert_eq!(classify(&page).unwrap(), Stage::Authenticated);
	}

	#[test]
	fn welcome_page_without_elements_is_authenticated() {
		let page = page("<title>Welcome, Student</title><h1>Courses</h1>");
		assert_eq!(classify(&page).unwrap(), Stage::Authenticated);
	}

	#[test]
	fn welcome_match_is_case_sensitive_prefix() {
		let lower = page(r#"<title>welcome</title><input name="q">"#);
		assert_eq!(classify(&lower).unwrap(), Stage::Unrecognized);

		let infix = page(r#"<title>Not Welcome</title><input name="q">"#);
		assert_eq!(classify(&infix).unwrap(), Stage::Unrecognized);
	}

	#[test]
	fn saml_response_and_request_inputs() {
		for name in ["SAMLResponse", "SAMLRequest"] {
			let html = format!(r#"<form action="/acs"><input type="hidden" name="{name}" value="abc"></form>"#);
			assert_eq!(classify(&page(&html)).unwrap(), Stage::AwaitingSaml, "input name {name}");
		}
	}

	#[test]
	fn jwt_input() {
		let page = page(r#"<form action="/jwt"><input type="hidden" name="jwtPayload" value="eyJ"></form>"#);
		assert_eq!(classify(&page).unwrap(), Stage::AwaitingJwt);
	}

	#[test]
	fn login_form() {
		let page = page(
			r#"<title>QUT Login</title>
			<form name="loginSuccessful" action="/qut-login/login">
				<input name="username"><input name="password" type="password">
			</form>"#,
		);
		assert_eq!(classify(&page).unwrap(), Stage::AwaitingLogin);
	}

	#[test]
	fn only_first_input_is_considered() {
		let page = page(r#"<form><input name="csrf" value="1"><input name="SAMLResponse" value="abc"></form>"#);
		assert_eq!(classify(&page).unwrap(), Stage::Unrecognized);
	}

	#[test]
	fn unmatched_elements_are_unrecognized() {
		let page = page(r#"<title>Service unavailable</title><form name="retry"><input name="q"></form>"#);
		assert_eq!(classify(&page).unwrap(), Stage::Unrecognized);
	}

	#[test]
	fn input_without_name_is_unrecognized() {
		let page = page(r#"<title>Oops</title><input type="submit">"#);
		assert_eq!(classify(&page).unwrap(), Stage::Unrecognized);
	}

	#[test]
	fn bare_page_is_malformed() {
		let page = page("<title>Internal Server Error</title><p>try again later</p>");
		assert!(matches!(classify(&page), Err(Error::MalformedPage { element: "input", .. })));
	}

	#[test]
	fn classification_is_repeatable() {
		let page = page(r#"<form action="/jwt"><input name="jwtPayload" value="eyJ"></form>"#);
		let first = classify(&page).unwrap();
		for _ in 0..3 {
			assert_eq!(classify(&page).unwrap(), first);
		}
	}

	#[test]
	fn rule_table_order() {
		let order: Vec<Stage> = CLASSIFICATION_ORDER.iter().map(|(stage, _)| *stage).collect();
		assert_eq!(order, [Stage::Authenticated, Stage::AwaitingSaml, Stage::AwaitingJwt, Stage::AwaitingLogin]);
	}

	#[test]
	fn token_fields() {
		assert_eq!(Stage::AwaitingSaml.token_field(), Some("SAMLResponse"));
		assert_eq!(Stage::AwaitingJwt.token_field(), Some("jwtPayload"));
		assert_eq!(Stage::AwaitingLogin.token_field(), None);
		assert!(Stage::Authenticated.is_terminal());
		assert!(!Stage::Unrecognized.is_terminal());
	}

	#[test]
	fn display_matches_serialized_name() {
		for stage in [
			Stage::Authenticated,
			Stage::AwaitingSaml,
			Stage::AwaitingJwt,
			Stage::AwaitingLogin,
			Stage::Unrecognized,
		] {
			let serialized = serde_json::to_value(stage).unwrap();
			assert_eq!(serialized, serde_json::Value::String(stage.to_string()));
		}
		assert_eq!(Stage::AwaitingSaml.to_string(), "awaitingSaml");
	}
}
