//! Provider strategy hooks that classify token endpoint failures.
//!
//! Implementations map OAuth error fields and HTTP statuses onto [`RejectionKind`]
//! without tying the exchanger to any particular HTTP client.

// self
use crate::{_prelude::*, error::RejectionKind};

/// Strategy hook that allows providers to classify token endpoint errors.
///
/// Implementors are required to be `Send + Sync` and only see crate-owned data, so
/// custom strategies never depend on reqwest or `oauth2` types.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a failed token response onto the rejection taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> RejectionKind;
}

/// Context passed to provider strategies when classifying token errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
}
impl ProviderErrorContext {
	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}
}

/// Default strategy that applies RFC 6749 §5.2 heuristics.
///
/// It prioritizes the structured `error` field, then hints inside
/// `error_description`, and finally the HTTP status code.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> RejectionKind {
		ctx.oauth_error
			.as_deref()
			.and_then(match_exact_value)
			.or_else(|| ctx.error_description.as_deref().and_then(classify_text))
			.unwrap_or_else(|| classify_status(ctx.http_status))
	}
}

fn match_exact_value(value: &str) -> Option<RejectionKind> {
	if value.eq_ignore_ascii_case("invalid_grant") {
		Some(RejectionKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(RejectionKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("server_error")
		|| value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("invalid_request")
		|| value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("unsupported_grant_type")
	{
		Some(RejectionKind::Other)
	} else {
		None
	}
}

fn classify_text(text: &str) -> Option<RejectionKind> {
	let lowered = text.to_ascii_lowercase();

	if lowered.contains("invalid_grant") {
		Some(RejectionKind::InvalidGrant)
	} else if lowered.contains("invalid_client") {
		Some(RejectionKind::InvalidClient)
	} else {
		None
	}
}

fn classify_status(status: Option<u16>) -> RejectionKind {
	match status {
		Some(400) => RejectionKind::InvalidGrant,
		Some(401) => RejectionKind::InvalidClient,
		_ => RejectionKind::Other,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth_error_field_wins_over_status() {
		let strategy = DefaultProviderStrategy;
		let ctx =
			ProviderErrorContext::default().with_http_status(401).with_oauth_error("invalid_grant");

		assert_eq!(strategy.classify_token_error(&ctx), RejectionKind::InvalidGrant);

		let ctx =
			ProviderErrorContext::default().with_http_status(400).with_oauth_error("invalid_client");

		assert_eq!(strategy.classify_token_error(&ctx), RejectionKind::InvalidClient);
	}

	#[test]
	fn description_hints_are_used_when_error_is_unknown() {
		let strategy = DefaultProviderStrategy;
		let ctx = ProviderErrorContext::default()
			.with_http_status(500)
			.with_oauth_error("vendor_specific")
			.with_error_description("invalid_grant: code already used");

		assert_eq!(strategy.classify_token_error(&ctx), RejectionKind::InvalidGrant);
	}

	#[test]
	fn status_fallback_covers_server_errors() {
		let strategy = DefaultProviderStrategy;

		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::default().with_http_status(500)),
			RejectionKind::Other
		);
		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::default().with_http_status(400)),
			RejectionKind::InvalidGrant
		);
		assert_eq!(
			strategy.classify_token_error(&ProviderErrorContext::default()),
			RejectionKind::Other
		);
	}
}
