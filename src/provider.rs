//! Provider-facing endpoint data and the error classification strategy.
//!
//! [`ProviderEndpoints`] holds the three URLs the login flow talks to, validated so that
//! every endpoint uses HTTPS (loopback hosts excepted for local development and tests).
//! [`strategy`] defines [`ProviderStrategy`], the hook that maps token endpoint failures
//! onto [`RejectionKind`](crate::error::RejectionKind).

pub mod strategy;

pub use strategy::*;

// std
use std::net::IpAddr;
// self
use crate::{_prelude::*, error::ConfigError};

/// Google's OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
/// Google's OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Google's userinfo (v2) resource endpoint.
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
/// Scope granting read access to the user's email address.
pub const GOOGLE_USERINFO_EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";
/// Scope granting read access to the user's basic profile.
pub const GOOGLE_USERINFO_PROFILE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.profile";

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Endpoint set consumed by the login flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the browser is redirected to.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// Userinfo resource returning the authenticated profile.
	pub userinfo: Url,
}
impl ProviderEndpoints {
	/// Validates that every endpoint is served over HTTPS (or a loopback host).
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("authorization", &self.authorization)?;
		validate_endpoint("token", &self.token)?;
		validate_endpoint("userinfo", &self.userinfo)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(url)) {
		Ok(())
	} else {
		Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(url::Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn endpoints(authorization: &str, token: &str, userinfo: &str) -> ProviderEndpoints {
		ProviderEndpoints {
			authorization: Url::parse(authorization).expect("Authorization URL should parse."),
			token: Url::parse(token).expect("Token URL should parse."),
			userinfo: Url::parse(userinfo).expect("Userinfo URL should parse."),
		}
	}

	#[test]
	fn https_and_loopback_endpoints_pass() {
		assert!(endpoints(GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL).validate().is_ok());
		assert!(
			endpoints(
				"http://localhost:9000/auth",
				"http://127.0.0.1:9000/token",
				"http://[::1]:9000/me"
			)
			.validate()
			.is_ok()
		);
	}

	#[test]
	fn plain_http_on_remote_hosts_is_rejected() {
		let err = endpoints(GOOGLE_AUTH_URL, "http://provider.example.com/token", GOOGLE_USERINFO_URL)
			.validate()
			.expect_err("Remote plain-HTTP token endpoints must be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "token", .. }));
	}
}
