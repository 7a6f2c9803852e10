//! Immutable OAuth client configuration and the credentials-file loader.
//!
//! [`ClientConfig`] is built once at startup (see [`load_credentials`] and
//! [`Settings`]) and then shared read-only behind an `Arc` by every request.

pub mod settings;

pub use settings::*;

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Secret},
	error::ConfigError,
	provider::{
		self, ClientAuthMethod, GOOGLE_USERINFO_EMAIL_SCOPE, GOOGLE_USERINFO_PROFILE_SCOPE,
		ProviderEndpoints,
	},
};

/// OAuth client identity plus the provider endpoints it talks to.
#[derive(Clone)]
pub struct ClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Confidential client secret.
	pub client_secret: Secret,
	/// Redirect URI registered with the provider; receives the callback.
	pub redirect_uri: Url,
	/// Scopes requested during authorization.
	pub scopes: ScopeSet,
	/// Provider endpoints.
	pub endpoints: ProviderEndpoints,
	/// Character used to join scopes in the authorization URL.
	pub scope_delimiter: char,
	/// Client authentication method for the token endpoint.
	pub client_auth: ClientAuthMethod,
}
impl ClientConfig {
	/// Creates a new builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(client_id)
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("scopes", &self.scopes)
			.field("endpoints", &self.endpoints)
			.field("scope_delimiter", &self.scope_delimiter)
			.field("client_auth", &self.client_auth)
			.finish()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	client_id: String,
	client_secret: Option<Secret>,
	redirect_uri: Option<Url>,
	scopes: ScopeSet,
	authorization_endpoint: Option<Url>,
	token_endpoint: Option<Url>,
	userinfo_endpoint: Option<Url>,
	scope_delimiter: char,
	client_auth: ClientAuthMethod,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			redirect_uri: None,
			scopes: ScopeSet::default(),
			authorization_endpoint: None,
			token_endpoint: None,
			userinfo_endpoint: None,
			scope_delimiter: ' ',
			client_auth: ClientAuthMethod::default(),
		}
	}

	/// Parses a Google-style credentials document (`{"web": {...}}` or
	/// `{"installed": {...}}`).
	///
	/// The first redirect URI is used. The builder is seeded with the Google userinfo
	/// endpoint plus the `userinfo.email` and `userinfo.profile` scopes; override them
	/// before calling [`build`](Self::build) when targeting another provider.
	pub fn from_credentials_json(json: &[u8]) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_slice(json);
		let file: CredentialsFile =
			serde_path_to_error::deserialize(de).map_err(ConfigError::ParseCredentials)?;
		let section = file.web.or(file.installed).ok_or(ConfigError::MissingClientSection)?;
		let redirect = section.redirect_uris.first().ok_or(ConfigError::MissingRedirectUri)?;

		Ok(Self::new(section.client_id)
			.client_secret(section.client_secret)
			.redirect_uri(parse_url("redirect", redirect)?)
			.authorization_endpoint(parse_url("authorization", &section.auth_uri)?)
			.token_endpoint(parse_url("token", &section.token_uri)?)
			.userinfo_endpoint(parse_url("userinfo", provider::GOOGLE_USERINFO_URL)?)
			.scopes(ScopeSet::new([GOOGLE_USERINFO_EMAIL_SCOPE, GOOGLE_USERINFO_PROFILE_SCOPE])?))
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(secret));

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes(mut self, scopes: ScopeSet) -> Self {
		self.scopes = scopes;

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the userinfo endpoint.
	pub fn userinfo_endpoint(mut self, url: Url) -> Self {
		self.userinfo_endpoint = Some(url);

		self
	}

	/// Overrides the scope delimiter (defaults to a space).
	pub fn scope_delimiter(mut self, delimiter: char) -> Self {
		self.scope_delimiter = delimiter;

		self
	}

	/// Overrides the token endpoint client authentication method.
	pub fn client_auth(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth = method;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingField { field: "client_id" });
		}
		if self.scope_delimiter.is_control() {
			return Err(ConfigError::InvalidScopeDelimiter { delimiter: self.scope_delimiter });
		}

		let client_secret =
			self.client_secret.ok_or(ConfigError::MissingField { field: "client_secret" })?;
		let redirect_uri =
			self.redirect_uri.ok_or(ConfigError::MissingField { field: "redirect_uri" })?;
		let endpoints = ProviderEndpoints {
			authorization: self
				.authorization_endpoint
				.ok_or(ConfigError::MissingField { field: "authorization endpoint" })?,
			token: self.token_endpoint.ok_or(ConfigError::MissingField { field: "token endpoint" })?,
			userinfo: self
				.userinfo_endpoint
				.ok_or(ConfigError::MissingField { field: "userinfo endpoint" })?,
		};

		endpoints.validate()?;

		Ok(ClientConfig {
			client_id: self.client_id,
			client_secret,
			redirect_uri,
			scopes: self.scopes,
			endpoints,
			scope_delimiter: self.scope_delimiter,
			client_auth: self.client_auth,
		})
	}
}

/// Reads a credentials file into a seeded [`ClientConfigBuilder`].
pub fn load_credentials(path: impl AsRef<Path>) -> Result<ClientConfigBuilder, ConfigError> {
	let path = path.as_ref();
	let raw = std::fs::read(path).map_err(|source| ConfigError::ReadCredentials {
		path: path.display().to_string(),
		source,
	})?;

	ClientConfigBuilder::from_credentials_json(&raw)
}

#[derive(Deserialize)]
struct CredentialsFile {
	web: Option<CredentialsSection>,
	installed: Option<CredentialsSection>,
}

#[derive(Deserialize)]
struct CredentialsSection {
	client_id: String,
	client_secret: String,
	#[serde(default)]
	redirect_uris: Vec<String>,
	auth_uri: String,
	token_uri: String,
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { name, source })
}
