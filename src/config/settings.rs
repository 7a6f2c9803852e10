//! Process settings parsed from the command line, the environment, and `.env`.

// std
use std::{net::SocketAddr, path::PathBuf};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	auth::ScopeSet,
	config::{ClientConfig, load_credentials},
	error::ConfigError,
	provider::{GOOGLE_USERINFO_EMAIL_SCOPE, GOOGLE_USERINFO_PROFILE_SCOPE, GOOGLE_USERINFO_URL},
};

/// Runtime settings for the login server.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Settings {
	/// Socket address the HTTP listener binds to.
	#[arg(long, env = "OAUTH2_LOGIN_BIND", default_value = "127.0.0.1:8080")]
	pub bind: SocketAddr,

	/// Path to the provider-issued client credentials JSON.
	#[arg(long, env = "OAUTH2_LOGIN_CREDENTIALS", default_value = "client-cred.json")]
	pub credentials: PathBuf,

	/// Userinfo resource queried after a successful exchange.
	#[arg(long, env = "OAUTH2_LOGIN_USERINFO_ENDPOINT", default_value = GOOGLE_USERINFO_URL)]
	pub userinfo_endpoint: Url,

	/// Comma separated scopes requested during authorization.
	#[arg(
		long,
		env = "OAUTH2_LOGIN_SCOPES",
		value_delimiter = ',',
		default_values = [GOOGLE_USERINFO_EMAIL_SCOPE, GOOGLE_USERINFO_PROFILE_SCOPE]
	)]
	pub scopes: Vec<String>,

	/// Upper bound in seconds for each provider call (token exchange, userinfo).
	#[arg(long, env = "OAUTH2_LOGIN_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
	pub request_timeout_secs: u64,

	/// Lifetime in seconds of the state cookie set on `/login`.
	#[arg(long, env = "OAUTH2_LOGIN_STATE_COOKIE_TTL_SECS", default_value_t = 600)]
	pub state_cookie_ttl_secs: u64,

	/// Drop the `Secure` cookie attribute so the flow works over plain-HTTP localhost.
	#[arg(long, env = "OAUTH2_LOGIN_INSECURE_COOKIES")]
	pub insecure_cookies: bool,
}
impl Settings {
	/// Loads `.env` (when present) and parses the process arguments.
	pub fn load() -> Self {
		let _ = dotenvy::dotenv();

		Self::parse()
	}

	/// Provider call timeout as a std duration.
	pub fn request_timeout(&self) -> StdDuration {
		StdDuration::from_secs(self.request_timeout_secs)
	}

	/// State cookie lifetime.
	pub fn state_cookie_ttl(&self) -> Duration {
		Duration::seconds(i64::try_from(self.state_cookie_ttl_secs).unwrap_or(i64::MAX))
	}

	/// Loads the credentials file and applies the scope/userinfo overrides.
	pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
		load_credentials(&self.credentials)?
			.scopes(ScopeSet::new(self.scopes.iter().cloned())?)
			.userinfo_endpoint(self.userinfo_endpoint.clone())
			.build()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_the_google_setup() {
		let settings = Settings::parse_from(["oauth2-login"]);

		assert_eq!(settings.bind.to_string(), "127.0.0.1:8080");
		assert_eq!(settings.credentials, PathBuf::from("client-cred.json"));
		assert_eq!(settings.userinfo_endpoint.as_str(), GOOGLE_USERINFO_URL);
		assert_eq!(settings.scopes, vec![GOOGLE_USERINFO_EMAIL_SCOPE, GOOGLE_USERINFO_PROFILE_SCOPE]);
		assert_eq!(settings.request_timeout(), StdDuration::from_secs(10));
		assert_eq!(settings.state_cookie_ttl(), Duration::minutes(10));
		assert!(!settings.insecure_cookies);
	}

	#[test]
	fn flags_override_defaults() {
		let settings = Settings::parse_from([
			"oauth2-login",
			"--bind",
			"0.0.0.0:9000",
			"--scopes",
			"openid,email",
			"--request-timeout-secs",
			"3",
			"--insecure-cookies",
		]);

		assert_eq!(settings.bind.port(), 9000);
		assert_eq!(settings.scopes, vec!["openid", "email"]);
		assert_eq!(settings.request_timeout(), StdDuration::from_secs(3));
		assert!(settings.insecure_cookies);
	}

	#[test]
	fn missing_credentials_file_is_a_config_error() {
		let settings = Settings::parse_from([
			"oauth2-login",
			"--credentials",
			"/nonexistent/oauth2-login/client-cred.json",
		]);
		let err = settings.client_config().expect_err("Missing credentials must be fatal.");

		assert!(matches!(err, ConfigError::ReadCredentials { .. }));
	}
}
