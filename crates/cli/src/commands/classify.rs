//! `bbauth classify`: offline view of how the handshake treats a saved page.

use std::fs;

use bbauth::{Credentials, Page, Stage, classify, login_submission, token_submission};
use colored::Colorize;
use serde::Serialize;
use url::Url;

use crate::cli::ClassifyArgs;
use crate::config::FileConfig;
use crate::error::{CliError, Result};
use crate::output::print_field;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyData {
	pub url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	pub stage: Stage,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next: Option<NextStep>,
}

/// The request the handshake would send after this page. Field values are omitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
	pub method: &'static str,
	pub url: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub fields: Vec<String>,
}

pub fn execute(args: &ClassifyArgs, file: &FileConfig) -> Result<ClassifyData> {
	let config = file.handshake_config(&args.endpoints, None)?;
	let html = fs::read_to_string(&args.file).map_err(|source| CliError::ReadPage {
		path: args.file.clone(),
		source,
	})?;

	let url = match &args.url {
		Some(url) => Url::parse(url).map_err(|source| bbauth::Error::InvalidUrl { url: url.clone(), source })?,
		None => config.endpoints.landing_url.clone(),
	};

	let page = Page::parse(url, &html);
	let stage = classify(&page)?;

	let next = match stage {
		Stage::Authenticated => None,
		Stage::AwaitingSaml | Stage::AwaitingJwt => Some(post_step(token_submission(&page, stage)?)),
		Stage::AwaitingLogin => {
			let placeholder = Credentials::new("", "");
			Some(post_step(login_submission(&placeholder, &config.endpoints)))
		}
		Stage::Unrecognized => Some(NextStep {
			method: "GET",
			url: config.endpoints.login_url.to_string(),
			fields: Vec::new(),
		}),
	};

	Ok(ClassifyData {
		url: page.url().to_string(),
		title: page.title().map(str::to_string),
		stage,
		next,
	})
}

fn post_step(submission: bbauth::FormSubmission) -> NextStep {
	NextStep {
		method: "POST",
		url: submission.url.to_string(),
		fields: submission.fields.into_iter().map(|(name, _)| name).collect(),
	}
}

pub fn print_text(data: &ClassifyData) {
	println!("{}", data.stage.to_string().cyan().bold());
	if let Some(title) = &data.title {
		print_field("title", title);
	}
	match &data.next {
		Some(next) if next.fields.is_empty() => print_field("next", format!("{} {}", next.method, next.url)),
		Some(next) => print_field("next", format!("{} {} ({})", next.method, next.url, next.fields.join(", "))),
		None => print_field("next", "done"),
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;
	use std::path::PathBuf;

	use super::*;
	use crate::cli::EndpointArgs;

	fn classify_html(html: &str, url: Option<&str>) -> Result<ClassifyData> {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(html.as_bytes()).unwrap();
		let args = ClassifyArgs {
			file: file.path().to_path_buf(),
			url: url.map(str::to_string),
			endpoints: EndpointArgs::default(),
		};
		execute(&args, &FileConfig::default())
	}

	#[test]
	fn saml_page_shows_post_to_action() {
		let data = classify_html(
			r#"<form action="/Shibboleth.sso/SAML2/POST"><input name="SAMLResponse" value="secret"></form>"#,
			Some("https://esoe.qut.edu.au/sso"),
		)
		.unwrap();

		assert_eq!(data.stage, Stage::AwaitingSaml);
		let next = data.next.unwrap();
		assert_eq!(next.method, "POST");
		assert_eq!(next.url, "https://esoe.qut.edu.au/Shibboleth.sso/SAML2/POST");
		assert_eq!(next.fields, vec!["SAMLResponse".to_string()]);
	}

	#[test]
	fn login_page_targets_configured_login_url() {
		let data = classify_html(r#"<title>QUT Login</title><form name="loginSuccessful"><input name="username"></form>"#, None).unwrap();

		assert_eq!(data.stage, Stage::AwaitingLogin);
		assert_eq!(data.title.as_deref(), Some("QUT Login"));
		let next = data.next.unwrap();
		assert_eq!(next.url, bbauth::config::DEFAULT_LOGIN_URL);
		assert_eq!(next.fields, vec!["username".to_string(), "password".to_string()]);
	}

	#[test]
	fn welcome_page_has_no_next_step() {
		let data = classify_html("<title>Welcome to Blackboard</title>", None).unwrap();
		assert_eq!(data.stage, Stage::Authenticated);
		assert!(data.next.is_none());
	}

	#[test]
	fn bare_page_is_an_error() {
		let err = classify_html("<title>Oops</title>", None).unwrap_err();
		assert!(matches!(err, CliError::Handshake(bbauth::Error::MalformedPage { .. })));
	}

	#[test]
	fn missing_file_reports_path() {
		let args = ClassifyArgs {
			file: PathBuf::from("/nonexistent/page.html"),
			url: None,
			endpoints: EndpointArgs::default(),
		};
		let err = execute(&args, &FileConfig::default()).unwrap_err();
		assert!(matches!(err, CliError::ReadPage { .. }));
	}
}
