//! HTTP surface: the axum router, its handlers, and the serve loop.
//!
//! Handlers are thin. `/login` asks [`LoginFlow::begin`] for a redirect and stores the
//! issued state in a cookie; `/callback` reads the cookie back (removing it on every
//! outcome) and hands the query to [`LoginFlow::complete`] under a fresh
//! [`CallContext`]. Errors become HTML responses; none of them stop the server.

pub mod cookie;
pub mod error;

pub use cookie::*;

// crates.io
use axum::{
	Router,
	extract::{Query, State, rejection::QueryRejection},
	response::{Html, IntoResponse, Redirect, Response},
	routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
// self
use crate::{
	_prelude::*,
	config::{ClientConfig, Settings},
	error::FlowError,
	flows::{CallContext, CallbackParams, FlowInstance, LoginFlow},
	http::ReqwestHttpClient,
	view,
};

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
	flow: Arc<LoginFlow>,
	request_timeout: StdDuration,
	state_cookie: StateCookie,
}
impl AppState {
	/// Default upper bound for the provider calls of one callback.
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Wraps a flow with the default timeout and cookie settings.
	pub fn new(flow: LoginFlow) -> Self {
		Self {
			flow: Arc::new(flow),
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
			state_cookie: StateCookie::default(),
		}
	}

	/// Derives timeout and cookie settings from the process settings.
	pub fn from_settings(flow: LoginFlow, settings: &Settings) -> Self {
		Self::new(flow)
			.request_timeout(settings.request_timeout())
			.state_cookie(StateCookie::new(settings.state_cookie_ttl(), !settings.insecure_cookies))
	}

	/// Overrides the callback deadline.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the state cookie attributes.
	pub fn state_cookie(mut self, state_cookie: StateCookie) -> Self {
		self.state_cookie = state_cookie;

		self
	}
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(index))
		.route("/login", get(login))
		.route("/callback", get(callback))
		.route("/healthz", get(healthz))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Binds the listener and serves until Ctrl-C.
pub async fn serve(settings: &Settings, config: ClientConfig) -> Result<()> {
	let http_client = ReqwestHttpClient::new(settings.request_timeout())?;
	let flow = LoginFlow::with_http_client(Arc::new(config), http_client);
	let app = router(AppState::from_settings(flow, settings));
	let listener = TcpListener::bind(settings.bind).await?;

	tracing::info!(addr = %settings.bind, "Login server listening.");

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

	tracing::info!("Login server stopped.");

	Ok(())
}

async fn index() -> Html<String> {
	view::render_index(None)
}

async fn login(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
	let mut instance = FlowInstance::new();
	let redirect = state.flow.begin(&mut instance);
	let jar = jar.add(state.state_cookie.issue(&redirect.state));

	(jar, Redirect::temporary(redirect.authorize_url.as_str()))
}

async fn callback(
	State(state): State<AppState>,
	query: Result<Query<CallbackParams>, QueryRejection>,
	jar: CookieJar,
) -> Response {
	let issued = state.state_cookie.read(&jar);
	let jar = jar.remove(state.state_cookie.removal());
	// An unreadable query cannot carry a trustworthy state.
	let Ok(Query(params)) = query.inspect_err(|e| {
		tracing::warn!(error = %e, "Rejected callback query.");
	}) else {
		return (jar, FlowError::InvalidState).into_response();
	};
	let ctx = CallContext::with_timeout(state.request_timeout);
	let mut instance = FlowInstance::resume();

	match state.flow.complete(&mut instance, issued.as_ref(), params, &ctx).await {
		Ok(profile) => (jar, view::render_index(Some(&profile))).into_response(),
		Err(e) => (jar, e).into_response(),
	}
}

async fn healthz() -> &'static str {
	"ok"
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "Unable to listen for Ctrl-C; serving until killed.");

		std::future::pending::<()>().await;
	}

	tracing::info!("Shutdown signal received.");
}
