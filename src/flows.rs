//! Login flow orchestration: the authorization-code state machine.
//!
//! A flow instance starts [`Idle`](FlowStage::Idle), moves to
//! [`AwaitingCallback`](FlowStage::AwaitingCallback) once the login redirect is issued,
//! then walks `Exchanging → FetchingProfile → Rendered` on the callback request. Any
//! failure after `Idle` ends in [`Errored`](FlowStage::Errored). Instances are
//! request-local; the only state shared across requests is the read-only
//! [`ClientConfig`] and the collaborator handles owned by [`LoginFlow`].

pub mod authorize;
pub mod callback;

pub use authorize::*;
pub use callback::*;

// self
use crate::{
	_prelude::*,
	auth::TokenExchangeResult,
	config::ClientConfig,
	error::{ExchangeError, FetchError, FlowError, FlowErrorKind, TransportError},
	http::ReqwestHttpClient,
	oauth::OAuthClient,
	provider::{DefaultProviderStrategy, ProviderStrategy},
	userinfo::{UserInfoClient, UserProfile},
};

/// Boxed future returned by flow collaborators.
pub type FlowFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Performs the code-for-token exchange against the provider's token endpoint.
pub trait TokenExchanger
where
	Self: Send + Sync,
{
	/// Exchanges `code` for a token, honoring the deadline carried by `ctx`.
	fn exchange<'a>(
		&'a self,
		code: &'a str,
		ctx: &'a CallContext,
	) -> FlowFuture<'a, TokenExchangeResult, ExchangeError>;
}

/// Fetches the authenticated user's profile with an access token.
pub trait ProfileFetcher
where
	Self: Send + Sync,
{
	/// Calls the userinfo resource with `token` as a bearer credential.
	fn fetch_profile<'a>(
		&'a self,
		token: &'a TokenExchangeResult,
		ctx: &'a CallContext,
	) -> FlowFuture<'a, UserProfile, FetchError>;
}

/// Deadline-bound execution context for provider calls.
///
/// Created per request; dropping the request future (client disconnect) cancels every
/// call awaited under it.
#[derive(Clone, Copy, Debug)]
pub struct CallContext {
	deadline: tokio::time::Instant,
}
impl CallContext {
	/// Creates a context expiring `timeout` from now.
	pub fn with_timeout(timeout: StdDuration) -> Self {
		Self { deadline: tokio::time::Instant::now() + timeout }
	}

	/// Instant after which calls fail with [`TransportError::Timeout`].
	pub fn deadline(&self) -> tokio::time::Instant {
		self.deadline
	}

	/// Time left before the deadline (zero once it passed).
	pub fn remaining(&self) -> StdDuration {
		self.deadline.saturating_duration_since(tokio::time::Instant::now())
	}

	/// Runs `fut` until completion or the deadline, whichever comes first.
	pub async fn bound<F>(&self, fut: F) -> Result<F::Output, TransportError>
	where
		F: Future,
	{
		tokio::time::timeout_at(self.deadline, fut).await.map_err(|_| TransportError::Timeout)
	}
}

/// States of a single login flow instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// No login has been started.
	Idle,
	/// Redirect issued; waiting for the provider to call back.
	AwaitingCallback,
	/// Exchanging the authorization code for a token.
	Exchanging,
	/// Fetching the user profile with the access token.
	FetchingProfile,
	/// Profile fetched and handed to the view.
	Rendered,
	/// Flow terminated with the given failure.
	Errored(FlowErrorKind),
}
impl FlowStage {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Idle => "idle",
			FlowStage::AwaitingCallback => "awaiting_callback",
			FlowStage::Exchanging => "exchanging",
			FlowStage::FetchingProfile => "fetching_profile",
			FlowStage::Rendered => "rendered",
			FlowStage::Errored(_) => "errored",
		}
	}

	/// Returns `true` for `Rendered` and `Errored`.
	pub const fn is_terminal(self) -> bool {
		matches!(self, FlowStage::Rendered | FlowStage::Errored(_))
	}

	fn permits(self, next: FlowStage) -> bool {
		matches!(
			(self, next),
			(FlowStage::Idle, FlowStage::AwaitingCallback)
				| (FlowStage::AwaitingCallback, FlowStage::Exchanging)
				| (FlowStage::Exchanging, FlowStage::FetchingProfile)
				| (FlowStage::FetchingProfile, FlowStage::Rendered)
		) || (matches!(next, FlowStage::Errored(_))
			&& !matches!(self, FlowStage::Idle)
			&& !self.is_terminal())
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			FlowStage::Errored(kind) => write!(f, "errored({kind})"),
			stage => f.write_str(stage.as_str()),
		}
	}
}

/// Request-local record of where a login flow currently is.
#[derive(Debug)]
pub struct FlowInstance {
	stage: FlowStage,
}
impl FlowInstance {
	/// Starts a new instance in [`FlowStage::Idle`].
	pub fn new() -> Self {
		Self { stage: FlowStage::Idle }
	}

	/// Resumes an instance whose redirect was issued by an earlier request.
	pub fn resume() -> Self {
		Self { stage: FlowStage::AwaitingCallback }
	}

	/// Current stage.
	pub fn stage(&self) -> FlowStage {
		self.stage
	}

	fn advance(&mut self, next: FlowStage) {
		if !self.stage.permits(next) {
			tracing::warn!(from = %self.stage, to = %next, "Ignoring illegal login flow transition.");

			return;
		}

		tracing::debug!(from = %self.stage, to = %next, "Login flow transition.");

		self.stage = next;
	}

	fn fail(&mut self, err: FlowError) -> FlowError {
		self.advance(FlowStage::Errored(err.kind()));

		err
	}
}
impl Default for FlowInstance {
	fn default() -> Self {
		Self::new()
	}
}

/// Coordinates the login flow against a single provider.
///
/// The flow owns the shared client configuration plus the token exchanger and profile
/// fetcher, so request handlers only deal with redirects, cookies, and rendering.
#[derive(Clone)]
pub struct LoginFlow {
	/// Immutable client configuration shared by every request.
	pub config: Arc<ClientConfig>,
	/// Token endpoint collaborator.
	pub exchanger: Arc<dyn TokenExchanger>,
	/// Userinfo collaborator.
	pub fetcher: Arc<dyn ProfileFetcher>,
}
impl LoginFlow {
	/// Creates a flow from explicit collaborators.
	pub fn new(
		config: Arc<ClientConfig>,
		exchanger: Arc<dyn TokenExchanger>,
		fetcher: Arc<dyn ProfileFetcher>,
	) -> Self {
		Self { config, exchanger, fetcher }
	}

	/// Creates a flow whose exchanger and fetcher share one reqwest transport.
	pub fn with_http_client(config: Arc<ClientConfig>, http_client: ReqwestHttpClient) -> Self {
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);
		let http_client = Arc::new(http_client);
		let exchanger =
			OAuthClient::<ReqwestHttpClient>::new(&config, http_client.clone(), strategy);
		let fetcher = UserInfoClient::new(config.endpoints.userinfo.clone(), http_client);

		Self::new(config, Arc::new(exchanger), Arc::new(fetcher))
	}
}
impl Debug for LoginFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginFlow").field("config", &self.config).finish_non_exhaustive()
	}
}
