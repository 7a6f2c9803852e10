//! Login redirect: state issuance and authorization URL construction.

// self
use crate::{
	_prelude::*,
	auth::StateToken,
	config::ClientConfig,
	flows::{FlowInstance, FlowStage, LoginFlow},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Redirect target and the state value issued for it.
#[derive(Clone, Debug)]
pub struct LoginRedirect {
	/// State value the callback must echo back.
	pub state: StateToken,
	/// Fully-formed authorization URL the browser is sent to.
	pub authorize_url: Url,
}

/// Query parameters carried by an authorization request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest<'a> {
	/// Client identifier.
	pub client_id: &'a str,
	/// Delimited scope string, omitted when no scopes are configured.
	pub scope: Option<String>,
	/// Redirect URI the provider calls back.
	pub redirect_uri: &'a Url,
	/// Anti-CSRF state.
	pub state: &'a StateToken,
}
impl<'a> AuthorizationRequest<'a> {
	/// Fixed `response_type` for the authorization code grant.
	pub const RESPONSE_TYPE: &'static str = "code";

	/// Derives the request from the client configuration and an issued state.
	pub fn new(config: &'a ClientConfig, state: &'a StateToken) -> Self {
		Self {
			client_id: &config.client_id,
			scope: config.scopes.joined(config.scope_delimiter),
			redirect_uri: &config.redirect_uri,
			state,
		}
	}

	/// Appends the request parameters to `endpoint`, keeping any existing query pairs.
	pub fn into_url(self, endpoint: &Url) -> Url {
		let mut url = endpoint.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", Self::RESPONSE_TYPE);
		pairs.append_pair("client_id", self.client_id);
		pairs.append_pair("redirect_uri", self.redirect_uri.as_str());

		if let Some(scope) = &self.scope {
			pairs.append_pair("scope", scope);
		}

		pairs.append_pair("state", self.state.as_str());

		drop(pairs);

		url
	}
}

/// Builds the provider authorization URL; pure and deterministic.
pub fn build_authorize_url(config: &ClientConfig, state: &StateToken) -> Url {
	AuthorizationRequest::new(config, state).into_url(&config.endpoints.authorization)
}

impl LoginFlow {
	/// Issues a fresh state and computes the redirect (`Idle → AwaitingCallback`).
	pub fn begin(&self, instance: &mut FlowInstance) -> LoginRedirect {
		const KIND: FlowKind = FlowKind::Login;

		let _guard = FlowSpan::new(KIND, "begin").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let state = StateToken::issue();
		let authorize_url = build_authorize_url(&self.config, &state);

		instance.advance(FlowStage::AwaitingCallback);
		obs::record_flow_outcome(KIND, FlowOutcome::Success);
		tracing::info!(client_id = %self.config.client_id, "Issued authorization redirect.");

		LoginRedirect { state, authorize_url }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{auth::ScopeSet, provider::GOOGLE_AUTH_URL};

	fn config() -> ClientConfig {
		ClientConfig::builder("client id/1")
			.client_secret("secret")
			.redirect_uri(
				Url::parse("http://localhost:8080/callback").expect("Redirect should parse."),
			)
			.scopes(ScopeSet::new(["profile", "email"]).expect("Scopes should be valid."))
			.authorization_endpoint(Url::parse(GOOGLE_AUTH_URL).expect("Auth URL should parse."))
			.token_endpoint(Url::parse("https://example.com/token").expect("URL should parse."))
			.userinfo_endpoint(Url::parse("https://example.com/me").expect("URL should parse."))
			.build()
			.expect("Fixture config should build.")
	}

	#[test]
	fn authorize_url_is_deterministic() {
		let config = config();
		let state = StateToken::from_issued("fixed-state");

		assert_eq!(
			build_authorize_url(&config, &state).as_str(),
			build_authorize_url(&config, &state).as_str()
		);
	}

	#[test]
	fn authorize_url_encodes_every_parameter() {
		let config = config();
		let state = StateToken::from_issued("a b&c");
		let url = build_authorize_url(&config, &state);

		assert_eq!(
			url.as_str(),
			"https://accounts.google.com/o/oauth2/auth?response_type=code&client_id=client+id%2F1&redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback&scope=email+profile&state=a+b%26c"
		);

		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(pairs.get("client_id"), Some(&"client id/1".into()));
		assert_eq!(pairs.get("scope"), Some(&"email profile".into()));
		assert_eq!(pairs.get("state"), Some(&"a b&c".into()));
	}

	#[test]
	fn authorize_url_keeps_existing_query_and_custom_delimiter() {
		let mut config = config();

		config.endpoints.authorization =
			Url::parse("https://example.com/auth?prompt=consent").expect("URL should parse.");
		config.scope_delimiter = ',';

		let url = build_authorize_url(&config, &StateToken::from_issued("s"));
		let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

		assert_eq!(pairs[0], ("prompt".into(), "consent".into()));
		assert!(pairs.contains(&("scope".into(), "email,profile".into())));
	}

	#[test]
	fn empty_scopes_omit_the_scope_parameter() {
		let mut config = config();

		config.scopes = ScopeSet::default();

		let url = build_authorize_url(&config, &StateToken::from_issued("s"));

		assert!(url.query_pairs().all(|(key, _)| key != "scope"));
	}
}
