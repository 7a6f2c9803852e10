//! HTTP rendering of login flow failures.

// crates.io
use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
// self
use crate::{
	error::{ExchangeError, FetchError, FlowError, RejectionKind, TransportError},
	view,
};

impl FlowError {
	/// HTTP status returned to the browser for this failure.
	pub fn status_code(&self) -> StatusCode {
		match self {
			FlowError::InvalidState
			| FlowError::AuthorizationDenied { .. }
			| FlowError::MissingCode => StatusCode::BAD_REQUEST,
			FlowError::ExchangeFailed(ExchangeError::ProviderRejected {
				kind: RejectionKind::InvalidGrant,
				..
			}) => StatusCode::BAD_REQUEST,
			FlowError::ExchangeFailed(ExchangeError::Network(e))
			| FlowError::FetchFailed(FetchError::Network(e)) => gateway_status(e),
			FlowError::FetchFailed(FetchError::Unauthorized { .. }) => StatusCode::UNAUTHORIZED,
			FlowError::ExchangeFailed(_) | FlowError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
		}
	}

	fn title(&self) -> &'static str {
		match self {
			FlowError::InvalidState => "Login session expired or invalid",
			FlowError::AuthorizationDenied { .. } => "Authorization denied",
			FlowError::MissingCode => "Missing authorization code",
			FlowError::ExchangeFailed(_) => "Token exchange failed",
			FlowError::FetchFailed(_) => "Profile fetch failed",
		}
	}
}
impl IntoResponse for FlowError {
	fn into_response(self) -> Response {
		let message = match &self {
			FlowError::AuthorizationDenied { error, description: Some(description) } =>
				format!("{error}: {description}"),
			other => other.to_string(),
		};

		(self.status_code(), view::render_error(self.title(), &message)).into_response()
	}
}

fn gateway_status(e: &TransportError) -> StatusCode {
	if e.is_timeout() { StatusCode::GATEWAY_TIMEOUT } else { StatusCode::BAD_GATEWAY }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn rejected(kind: RejectionKind, status: u16) -> FlowError {
		ExchangeError::ProviderRejected { kind, status: Some(status), reason: "x".into() }.into()
	}

	#[test]
	fn client_side_failures_are_bad_requests() {
		assert_eq!(FlowError::InvalidState.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(FlowError::MissingCode.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(
			FlowError::AuthorizationDenied { error: "access_denied".into(), description: None }
				.status_code(),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(rejected(RejectionKind::InvalidGrant, 400).status_code(), StatusCode::BAD_REQUEST);
	}

	#[test]
	fn provider_failures_are_gateway_errors() {
		assert_eq!(rejected(RejectionKind::Other, 500).status_code(), StatusCode::BAD_GATEWAY);
		assert_eq!(rejected(RejectionKind::InvalidClient, 401).status_code(), StatusCode::BAD_GATEWAY);
		assert_eq!(
			FlowError::from(ExchangeError::Network(TransportError::Timeout)).status_code(),
			StatusCode::GATEWAY_TIMEOUT
		);
		assert_eq!(
			FlowError::from(ExchangeError::Malformed { message: "x".into() }).status_code(),
			StatusCode::BAD_GATEWAY
		);
		assert_eq!(
			FlowError::from(FetchError::Unauthorized { status: 401 }).status_code(),
			StatusCode::UNAUTHORIZED
		);
		assert_eq!(
			FlowError::from(FetchError::ProviderRejected { status: 503 }).status_code(),
			StatusCode::BAD_GATEWAY
		);
		assert_eq!(
			FlowError::from(FetchError::Network(TransportError::Timeout)).status_code(),
			StatusCode::GATEWAY_TIMEOUT
		);
	}

	#[test]
	fn error_pages_carry_the_status() {
		let response = FlowError::InvalidState.into_response();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
