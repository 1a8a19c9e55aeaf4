use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;
use crate::styles::cli_styles;


#[derive(Parser, Debug)]
#[command(name = "bbauth")]
#[command(about = "Authenticate to QUT Blackboard through the Shibboleth single-sign-on handshake")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default) or json
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Configuration file (defaults to $XDG_CONFIG_HOME/bbauth/config.json)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the handshake and report the authenticated session
	Login(LoginArgs),

	/// Classify a saved HTML page and show the request the handshake would send next
	Classify(ClassifyArgs),
}

impl Commands {
	/// Command name used in output envelopes.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Login(_) => "login",
			Commands::Classify(_) => "classify",
		}
	}
}

/// Endpoint and bound overrides shared by commands that need a handshake config.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct EndpointArgs {
	/// Service provider landing page
	#[arg(long, value_name = "URL")]
	pub landing_url: Option<String>,

	/// Identity provider login endpoint that receives the credential post
	#[arg(long, value_name = "URL")]
	pub login_url: Option<String>,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct LoginArgs {
	/// Username (prompted for when omitted)
	#[arg(short, long, env = "BBAUTH_USERNAME", value_name = "USER")]
	pub username: Option<String>,

	#[command(flatten)]
	pub endpoints: EndpointArgs,

	/// Give up after this many handshake steps
	#[arg(long, value_name = "N")]
	pub max_hops: Option<usize>,

	/// Deadline for the whole handshake in seconds
	#[arg(short = 't', long = "timeout", value_name = "SECONDS")]
	pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ClassifyArgs {
	/// Saved HTML page
	#[arg(value_name = "FILE")]
	pub file: PathBuf,

	/// URL the page was served from, used to resolve relative form actions
	#[arg(long, value_name = "URL")]
	pub url: Option<String>,

	#[command(flatten)]
	pub endpoints: EndpointArgs,
}
