//! Token values produced by the authorization code exchange.

// self
use crate::{_prelude::*, auth::Secret};

/// Token type reported by the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenType {
	/// RFC 6750 bearer token.
	Bearer,
	/// Any other provider-specific type, kept verbatim.
	Other(String),
}
impl TokenType {
	/// Parses the `token_type` field case-insensitively.
	pub fn parse(value: &str) -> Self {
		if value.eq_ignore_ascii_case("bearer") {
			Self::Bearer
		} else {
			Self::Other(value.to_owned())
		}
	}

	/// Returns the wire label.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Bearer => "bearer",
			Self::Other(value) => value,
		}
	}
}

/// Access (and optional refresh) token issued for a single login flow.
///
/// Owned by the flow for the duration of the callback request and dropped afterwards;
/// nothing here is persisted.
#[derive(Clone)]
pub struct TokenExchangeResult {
	/// Access token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Token type reported by the provider.
	pub token_type: TokenType,
	/// Expiry instant derived from `expires_in`, when the provider supplied one.
	pub expires_at: Option<OffsetDateTime>,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<Secret>,
}
impl TokenExchangeResult {
	/// Creates a bearer token result without expiry or refresh token.
	pub fn bearer(access_token: impl Into<String>) -> Self {
		Self {
			access_token: Secret::new(access_token),
			token_type: TokenType::Bearer,
			expires_at: None,
			refresh_token: None,
		}
	}

	/// Derives the expiry from a relative lifetime measured from `issued_at`.
	pub fn with_expires_in(mut self, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		self.expires_at = Some(issued_at + expires_in);

		self
	}
}
impl Debug for TokenExchangeResult {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchangeResult")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_at", &self.expires_at)
			.field("refresh_token_set", &self.refresh_token.is_some())
			.finish()
	}
}
