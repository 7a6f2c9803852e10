//! Minimal OAuth 2.0 authorization-code login server: per-flow CSRF state, typed token
//! exchange errors, and a userinfo-backed profile page.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod server;
pub mod userinfo;
pub mod view;

#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ScopeSet,
		config::{ClientConfig, ClientConfigBuilder},
		http::ReqwestHttpClient,
	};

	/// Client identifier shared by test fixtures.
	pub const TEST_CLIENT_ID: &str = "client-it";
	/// Client secret shared by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "secret-it";
	/// Redirect URI shared by test fixtures.
	pub const TEST_REDIRECT_URI: &str = "http://localhost:8080/callback";

	/// Builds a reqwest HTTP client for the plain-HTTP `httpmock` endpoints used in tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns a builder pointing every provider endpoint at `base` (e.g. a mock server URL).
	pub fn test_client_config_builder(base: &str) -> ClientConfigBuilder {
		let endpoint = |path: &str| {
			Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
				.expect("Mock endpoint URL should parse successfully.")
		};

		ClientConfig::builder(TEST_CLIENT_ID)
			.client_secret(TEST_CLIENT_SECRET)
			.redirect_uri(
				Url::parse(TEST_REDIRECT_URI).expect("Redirect URI fixture should parse."),
			)
			.scopes(ScopeSet::new(["email", "profile"]).expect("Scope fixture should be valid."))
			.authorization_endpoint(endpoint("/authorize"))
			.token_endpoint(endpoint("/token"))
			.userinfo_endpoint(endpoint("/userinfo"))
	}

	/// Builds a validated [`ClientConfig`] for the provided mock base URL.
	pub fn test_client_config(base: &str) -> Arc<ClientConfig> {
		Arc::new(
			test_client_config_builder(base)
				.build()
				.expect("Test client configuration should build successfully."),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};
