//! bbauth: authenticate an HTTP session through a Shibboleth/SAML handshake
//!
//! The service provider (QUT Blackboard by default) redirects an anonymous
//! visitor through a chain of auto-submitting forms: a SAML request to the
//! identity provider, a login form, a JWT hand-off, and a SAML response back
//! to the service provider. This crate plays that chain with a plain HTTP
//! client: every response is parsed into a [`Page`], [classified](classify)
//! into a [`Stage`], and answered with the matching POST until the landing
//! page greets the user.
//!
//! # Example
//!
//! ```ignore
//! use bbauth::{Credentials, HandshakeConfig, authenticate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::new("n1234567", "correct horse battery staple");
//!     let (session, report) = authenticate(&creds, None, HandshakeConfig::default()).await?;
//!
//!     println!("authenticated after {} hops", report.hops());
//!     let home = session.client().get("https://blackboard.qut.edu.au/").send().await?;
//!     println!("{}", home.status());
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Handshake`] - The driver loop over any [`Transport`]
//! - [`HttpSession`] - `reqwest` transport with a persistent cookie jar
//! - [`Page`] - Title plus first `<input>`/`<form>` of a response
//! - [`Stage`] - Classification of a page, see [`CLASSIFICATION_ORDER`]

pub mod config;
mod credentials;
pub mod error;
mod handshake;
mod page;
mod stage;
mod submit;
pub mod testing;
mod transport;

pub use config::{Endpoints, HandshakeConfig};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use handshake::{Handshake, HandshakeReport, NextRequest, authenticate};
pub use page::{Element, Page};
pub use stage::{CLASSIFICATION_ORDER, LOGIN_FORM_NAME, Stage, StageRule, WELCOME_PREFIX, classify};
pub use submit::{FormSubmission, login_submission, token_submission};
pub use transport::{HttpSession, Response, Transport};
