//! Token exchanger backed by the `oauth2` crate's [`BasicClient`].
//!
//! The exchanger posts the authorization code to the token endpoint through a
//! [`TokenHttpClient`] handle and maps every failure onto [`ExchangeError`]. Non-success
//! responses whose bodies are not valid OAuth error documents are recognized through the
//! [`ResponseMetadataSlot`] status, so an HTTP 500 with an empty body still surfaces as a
//! provider rejection rather than a decoding failure.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenExchangeResult, TokenType},
	config::ClientConfig,
	error::{ExchangeError, TransportError},
	flows::{CallContext, FlowFuture, TokenExchanger},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	provider::{ClientAuthMethod, ProviderErrorContext, ProviderStrategy},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Authorization-code exchanger for a single configured client.
pub struct OAuthClient<C = ReqwestHttpClient>
where
	C: ?Sized + TokenHttpClient,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	strategy: Arc<dyn ProviderStrategy>,
}
impl<C> OAuthClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Builds the exchanger from the validated client configuration.
	pub fn new(
		config: &ClientConfig,
		http_client: impl Into<Arc<C>>,
		strategy: Arc<dyn ProviderStrategy>,
	) -> Self {
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_auth_uri(AuthUrl::from_url(config.endpoints.authorization.clone()))
			.set_token_uri(TokenUrl::from_url(config.endpoints.token.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_redirect_uri(RedirectUrl::from_url(config.redirect_uri.clone()));

		if matches!(config.client_auth, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Self { oauth_client, http_client: http_client.into(), strategy }
	}

	async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResult, ExchangeError> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(self.strategy.as_ref(), meta.take(), err))?;

		Ok(map_token_response(response, OffsetDateTime::now_utc()))
	}
}
impl<C> TokenExchanger for OAuthClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn exchange<'a>(
		&'a self,
		code: &'a str,
		ctx: &'a CallContext,
	) -> FlowFuture<'a, TokenExchangeResult, ExchangeError> {
		Box::pin(async move { ctx.bound(self.exchange_code(code)).await? })
	}
}
impl<C> Debug for OAuthClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("token_url", &self.oauth_client.token_uri().as_str())
			.finish_non_exhaustive()
	}
}

fn map_token_response(response: BasicTokenResponse, issued_at: OffsetDateTime) -> TokenExchangeResult {
	let mut result = TokenExchangeResult {
		access_token: Secret::new(response.access_token().secret().to_owned()),
		token_type: TokenType::parse(response.token_type().as_ref()),
		expires_at: None,
		refresh_token: response.refresh_token().map(|token| Secret::new(token.secret().to_owned())),
	};

	if let Some(expires_in) = response.expires_in().and_then(|value| Duration::try_from(value).ok())
	{
		result = result.with_expires_in(issued_at, expires_in);
	}

	result
}

fn map_request_error<E>(
	strategy: &dyn ProviderStrategy,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> ExchangeError
where
	E: 'static + Send + Sync + StdError + Into<TransportError>,
{
	let meta = meta.unwrap_or_default();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response(strategy, response, meta.status),
		RequestTokenError::Request(err) => map_transport_error(err).into(),
		RequestTokenError::Parse(err, _body) =>
			map_unexpected_body(strategy, &meta, err.to_string()),
		RequestTokenError::Other(message) => map_unexpected_body(strategy, &meta, message),
	}
}

fn map_server_response(
	strategy: &dyn ProviderStrategy,
	response: BasicErrorResponse,
	status: Option<u16>,
) -> ExchangeError {
	let error = response.error().as_ref().to_owned();
	let mut ctx = ProviderErrorContext::default().with_oauth_error(error.clone());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}
	if let Some(status) = status {
		ctx = ctx.with_http_status(status);
	}

	let kind = strategy.classify_token_error(&ctx);
	let reason = match response.error_description() {
		Some(description) => format!("{error}: {description}"),
		None => error,
	};

	ExchangeError::ProviderRejected { kind, status, reason }
}

fn map_unexpected_body(
	strategy: &dyn ProviderStrategy,
	meta: &ResponseMetadata,
	message: String,
) -> ExchangeError {
	match meta.status {
		Some(status) if meta.is_error_status() => {
			let ctx = ProviderErrorContext::default().with_http_status(status);

			ExchangeError::ProviderRejected {
				kind: strategy.classify_token_error(&ctx),
				status: Some(status),
				reason: format!("HTTP {status}"),
			}
		},
		_ => ExchangeError::Malformed { message },
	}
}

fn map_transport_error<E>(err: HttpClientError<E>) -> TransportError
where
	E: 'static + Send + Sync + StdError + Into<TransportError>,
{
	match err {
		HttpClientError::Reqwest(inner) => (*inner).into(),
		HttpClientError::Http(inner) => TransportError::Request(inner),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		HttpClientError::Other(message) => TransportError::Io(std::io::Error::other(message)),
		_ => TransportError::Io(std::io::Error::other("Unknown HTTP client failure.")),
	}
}
