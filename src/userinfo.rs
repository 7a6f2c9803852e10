//! Userinfo resource client and the profile it returns.

// crates.io
use reqwest::{StatusCode, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	auth::TokenExchangeResult,
	error::{FetchError, TransportError},
	flows::{CallContext, FlowFuture, ProfileFetcher},
	http::ReqwestHttpClient,
};

/// Profile returned by the userinfo endpoint.
///
/// Every field is optional: providers differ in what they return, and a profile with
/// only an email address is still renderable. Unknown fields are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UserProfile {
	/// Provider-scoped subject identifier.
	#[serde(default, alias = "sub")]
	pub id: Option<String>,
	/// Primary email address.
	#[serde(default)]
	pub email: Option<String>,
	/// Whether the provider verified the email address.
	#[serde(default, alias = "email_verified")]
	pub verified_email: Option<bool>,
	/// Full display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Given name.
	#[serde(default)]
	pub given_name: Option<String>,
	/// Family name.
	#[serde(default)]
	pub family_name: Option<String>,
	/// Avatar URL.
	#[serde(default)]
	pub picture: Option<String>,
	/// Preferred locale.
	#[serde(default)]
	pub locale: Option<String>,
	/// Fields the profile type does not model explicitly.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl UserProfile {
	/// Best available human-readable label: name, then email, then subject id.
	pub fn display_name(&self) -> &str {
		self.name
			.as_deref()
			.or(self.email.as_deref())
			.or(self.id.as_deref())
			.unwrap_or("Unknown user")
	}

	/// Decodes a userinfo body, reporting the failing JSON path on error.
	pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
		let de = &mut serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(de)
			.map_err(|err| FetchError::Malformed { message: err.to_string() })
	}
}

/// Fetches profiles from a userinfo endpoint with bearer authentication.
#[derive(Clone, Debug)]
pub struct UserInfoClient {
	http_client: Arc<ReqwestHttpClient>,
	endpoint: Url,
}
impl UserInfoClient {
	/// Creates a client for `endpoint`.
	pub fn new(endpoint: Url, http_client: impl Into<Arc<ReqwestHttpClient>>) -> Self {
		Self { http_client: http_client.into(), endpoint }
	}

	async fn fetch(&self, token: &TokenExchangeResult) -> Result<UserProfile, FetchError> {
		let response = self
			.http_client
			.get(self.endpoint.clone())
			.bearer_auth(token.access_token.expose())
			.header(ACCEPT, "application/json")
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();

		if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
			return Err(FetchError::Unauthorized { status: status.as_u16() });
		}
		if !status.is_success() {
			return Err(FetchError::ProviderRejected { status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(TransportError::from)?;

		UserProfile::from_json(&body)
	}
}
impl ProfileFetcher for UserInfoClient {
	fn fetch_profile<'a>(
		&'a self,
		token: &'a TokenExchangeResult,
		ctx: &'a CallContext,
	) -> FlowFuture<'a, UserProfile, FetchError> {
		Box::pin(async move { ctx.bound(self.fetch(token)).await? })
	}
}
