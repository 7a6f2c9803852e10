//! Error taxonomy shared by configuration loading, provider calls, and the login flow.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by process-level APIs (startup and serving).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Startup configuration problem; fatal before any request is served.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Listener or socket failure.
	#[error("Server I/O failed.")]
	Io(#[from] std::io::Error),
}

/// Configuration and validation failures raised while loading client credentials.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Credentials file could not be read.
	#[error("Unable to read credentials file `{path}`.")]
	ReadCredentials {
		/// Path that failed to load.
		path: String,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// Credentials JSON could not be parsed.
	#[error("Credentials JSON is malformed.")]
	ParseCredentials(#[source] serde_path_to_error::Error<serde_json::Error>),
	/// Credentials JSON contains neither a `web` nor an `installed` section.
	#[error("Credentials JSON must contain a `web` or `installed` client section.")]
	MissingClientSection,
	/// Credentials JSON lists no redirect URIs.
	#[error("Credentials JSON is missing a redirect URI.")]
	MissingRedirectUri,
	/// A required builder field was never supplied.
	#[error("Client configuration is missing the {field}.")]
	MissingField {
		/// Name of the absent field.
		field: &'static str,
	},
	/// Endpoint or redirect URL cannot be parsed.
	#[error("The {name} URL is invalid.")]
	InvalidUrl {
		/// Which URL failed to parse.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Scope delimiters must be printable.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, deadlines).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Request could not be built from the prepared parts.
	#[error("Provider request could not be constructed.")]
	Request(#[from] oauth2::http::Error),
	/// The call context deadline elapsed before the provider answered.
	#[error("Provider call exceeded its deadline.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns `true` when the failure was a deadline expiry.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout)
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Coarse classification of a token endpoint rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionKind {
	/// The authorization code was invalid, expired, or already used.
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Any other provider-side refusal, including 5xx responses.
	Other,
}

/// Failures raised while exchanging an authorization code for a token.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Token endpoint was unreachable or timed out.
	#[error("Token endpoint could not be reached.")]
	Network(#[from] TransportError),
	/// Token endpoint answered with a non-success status or an OAuth error body.
	#[error("Token endpoint rejected the exchange: {reason}.")]
	ProviderRejected {
		/// Classified rejection.
		kind: RejectionKind,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Provider- or client-supplied reason string.
		reason: String,
	},
	/// Token endpoint answered successfully but the body could not be decoded.
	#[error("Token endpoint returned a malformed response: {message}.")]
	Malformed {
		/// Decoding failure summary.
		message: String,
	},
}

/// Failures raised while fetching the user profile.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// Userinfo endpoint was unreachable or timed out.
	#[error("Userinfo endpoint could not be reached.")]
	Network(#[from] TransportError),
	/// Access token was rejected as invalid or expired.
	#[error("Userinfo endpoint rejected the access token (HTTP {status}).")]
	Unauthorized {
		/// HTTP status code (401 or 403).
		status: u16,
	},
	/// Userinfo endpoint answered with another non-success status.
	#[error("Userinfo endpoint returned HTTP {status}.")]
	ProviderRejected {
		/// HTTP status code.
		status: u16,
	},
	/// Userinfo body could not be decoded into a profile.
	#[error("Userinfo endpoint returned a malformed profile: {message}.")]
	Malformed {
		/// Decoding failure summary.
		message: String,
	},
}

/// Stage-level label for a failed login flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowErrorKind {
	/// Callback state did not match the issued state.
	InvalidState,
	/// Provider redirected back with an `error` parameter.
	AuthorizationDenied,
	/// Callback carried a valid state but no authorization code.
	MissingCode,
	/// Code-for-token exchange failed.
	ExchangeFailed,
	/// Userinfo fetch failed.
	FetchFailed,
}
impl FlowErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowErrorKind::InvalidState => "invalid_state",
			FlowErrorKind::AuthorizationDenied => "authorization_denied",
			FlowErrorKind::MissingCode => "missing_code",
			FlowErrorKind::ExchangeFailed => "exchange_failed",
			FlowErrorKind::FetchFailed => "fetch_failed",
		}
	}
}
impl Display for FlowErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Per-request login flow failure; always recoverable.
#[derive(Debug, ThisError)]
pub enum FlowError {
	/// Callback state was missing or did not match the issued state.
	#[error("Authorization state is missing or does not match.")]
	InvalidState,
	/// Provider reported an authorization error (e.g. the user denied consent).
	#[error("Provider denied the authorization request: {error}.")]
	AuthorizationDenied {
		/// OAuth `error` code echoed by the provider.
		error: String,
		/// Optional `error_description` echoed by the provider.
		description: Option<String>,
	},
	/// Callback carried no authorization code.
	#[error("Callback is missing the authorization code.")]
	MissingCode,
	/// Code-for-token exchange failed.
	#[error(transparent)]
	ExchangeFailed(#[from] ExchangeError),
	/// Userinfo fetch failed.
	#[error(transparent)]
	FetchFailed(#[from] FetchError),
}
impl FlowError {
	/// Returns the stage-level label for the failure.
	pub fn kind(&self) -> FlowErrorKind {
		match self {
			FlowError::InvalidState => FlowErrorKind::InvalidState,
			FlowError::AuthorizationDenied { .. } => FlowErrorKind::AuthorizationDenied,
			FlowError::MissingCode => FlowErrorKind::MissingCode,
			FlowError::ExchangeFailed(_) => FlowErrorKind::ExchangeFailed,
			FlowError::FetchFailed(_) => FlowErrorKind::FetchFailed,
		}
	}
}
