//! Local service provider / identity provider pair for handshake tests.
//!
//! Routes mirror a Shibboleth deployment:
//!
//! * `GET /` - landing page; welcomes a visitor holding `bb_session`, otherwise
//!   auto-posts a `SAMLRequest` to the IdP
//! * `POST /idp/sso` - IdP entry; renders the `loginSuccessful` form
//! * `POST /idp/login` - checks credentials, hands out a `jwtPayload`
//! * `POST /idp/jwt` - exchanges the JWT for a `SAMLResponse` back to the SP
//! * `POST /Shibboleth.sso/SAML2/POST` - SP assertion consumer; sets `bb_session`
//! * `GET /stale` - cached landing page that skips the IdP login and posts
//!   straight to `/idp/jwt`, which answers `401` without an IdP session

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const USERNAME: &str = "n1234567";
pub const PASSWORD: &str = "hunter2";

#[derive(Default)]
struct Counters {
	login_attempts: AtomicUsize,
}

#[derive(Clone)]
struct AppState {
	base: String,
	counters: Arc<Counters>,
}

pub struct TestServer {
	base: String,
	counters: Arc<Counters>,
	shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
	pub async fn start() -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
		let addr = listener.local_addr().expect("local addr");
		let base = format!("http://{addr}");
		let counters = Arc::new(Counters::default());

		let state = AppState {
			base: base.clone(),
			counters: Arc::clone(&counters),
		};
		let app = Router::new()
			.route("/", get(landing))
			.route("/stale", get(stale_landing))
			.route("/idp/sso", post(idp_sso))
			.route("/idp/login", post(idp_login))
			.route("/idp/jwt", post(idp_jwt))
			.route("/Shibboleth.sso/SAML2/POST", post(assertion_consumer))
			.with_state(state);

		let (tx, rx) = oneshot::channel();
		tokio::spawn(async move {
			axum::serve(listener, app)
				.with_graceful_shutdown(async {
					let _ = rx.await;
				})
				.await
				.expect("test server");
		});

		Self {
			base,
			counters,
			shutdown: Some(tx),
		}
	}

	pub fn url(&self) -> &str {
		&self.base
	}

	pub fn landing_url(&self) -> String {
		format!("{}/", self.base)
	}

	pub fn stale_landing_url(&self) -> String {
		format!("{}/stale", self.base)
	}

	pub fn jwt_url(&self) -> String {
		format!("{}/idp/jwt", self.base)
	}

	pub fn login_url(&self) -> String {
		format!("{}/idp/login", self.base)
	}

	pub fn login_attempts(&self) -> usize {
		self.counters.login_attempts.load(Ordering::SeqCst)
	}

	pub fn shutdown(mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

fn has_cookie(headers: &HeaderMap, pair: &str) -> bool {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.any(|value| value.split("; ").any(|cookie| cookie == pair))
}

fn hidden_form(title: &str, action: &str, name: &str, value: &str) -> String {
	format!(
		r#"<html><head><title>{title}</title></head>
<body onload="document.forms[0].submit()">
<form action="{action}" method="post"><input type="hidden" name="{name}" value="{value}"><noscript><button>Continue</button></noscript></form>
</body></html>"#
	)
}

const LOGIN_PAGE: &str = r#"<html><head><title>QUT Login</title></head><body>
<form name="loginSuccessful" action="/idp/login" method="post">
<input name="username" type="text"><input name="password" type="password"><button>Log in</button>
</form></body></html>"#;

async fn landing(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
	if has_cookie(&headers, "bb_session=ok") {
		return Html("<html><head><title>Welcome to Blackboard</title></head><body><h1>My Courses</h1></body></html>".to_string());
	}
	Html(hidden_form("Redirecting", &format!("{}/idp/sso", state.base), "SAMLRequest", "req-1"))
}

async fn stale_landing(State(state): State<AppState>) -> Html<String> {
	Html(hidden_form("Redirecting", &format!("{}/idp/jwt", state.base), "SAMLResponse", "req-1"))
}

async fn idp_sso(Form(form): Form<HashMap<String, String>>) -> Response {
	if form.get("SAMLResponse").map(String::as_str) != Some("req-1") {
		return (StatusCode::BAD_REQUEST, Html("<title>Bad SAML</title>")).into_response();
	}
	([(SET_COOKIE, "idp_flow=1; Path=/")], Html(LOGIN_PAGE)).into_response()
}

async fn idp_login(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
	state.counters.login_attempts.fetch_add(1, Ordering::SeqCst);

	let valid = form.get("username").map(String::as_str) == Some(USERNAME) && form.get("password").map(String::as_str) == Some(PASSWORD);
	if !valid || !has_cookie(&headers, "idp_flow=1") {
		return Html(LOGIN_PAGE).into_response();
	}

	let page = hidden_form("Signing in", "/idp/jwt", "jwtPayload", "eyJhbGciOiJIUzI1NiJ9.e30.sig");
	([(SET_COOKIE, "idp_session=1; Path=/")], Html(page)).into_response()
}

async fn idp_jwt(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
	if !has_cookie(&headers, "idp_session=1") || !form.contains_key("jwtPayload") {
		return (StatusCode::UNAUTHORIZED, Html("<title>Unauthorized</title><p>no session</p>")).into_response();
	}
	let action = format!("{}/Shibboleth.sso/SAML2/POST", state.base);
	Html(hidden_form("Redirecting", &action, "SAMLResponse", "assertion-1")).into_response()
}

async fn assertion_consumer(Form(form): Form<HashMap<String, String>>) -> Response {
	if form.get("SAMLResponse").map(String::as_str) != Some("assertion-1") {
		return (StatusCode::FORBIDDEN, Html("<title>Forbidden</title><p>bad assertion</p>")).into_response();
	}
	(
		[(SET_COOKIE, "bb_session=ok; Path=/")],
		Html("<html><head><title>Welcome to Blackboard</title></head><body>Signed in</body></html>"),
	)
		.into_response()
}
