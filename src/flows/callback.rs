//! Callback handling: state validation, code exchange, and profile fetch.

// self
use crate::{
	_prelude::*,
	auth::{StateToken, state},
	error::FlowError,
	flows::{CallContext, FlowInstance, FlowStage, LoginFlow},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	userinfo::UserProfile,
};

/// Query parameters the provider appends to the redirect URI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
	/// Authorization code, present on success.
	#[serde(default)]
	pub code: Option<String>,
	/// State echoed back by the provider.
	#[serde(default)]
	pub state: Option<String>,
	/// OAuth error code, present when authorization failed or was denied.
	#[serde(default)]
	pub error: Option<String>,
	/// Human-readable companion to `error`.
	#[serde(default)]
	pub error_description: Option<String>,
}

impl LoginFlow {
	/// Handles the provider callback for an instance awaiting it.
	///
	/// Checks run in a fixed order: the echoed state must equal `issued` before anything
	/// else is inspected, so a forged callback never reaches the token endpoint. The
	/// instance ends in [`FlowStage::Rendered`] on success and
	/// [`FlowStage::Errored`] otherwise.
	pub async fn complete(
		&self,
		instance: &mut FlowInstance,
		issued: Option<&StateToken>,
		params: CallbackParams,
		ctx: &CallContext,
	) -> Result<UserProfile, FlowError> {
		const KIND: FlowKind = FlowKind::Callback;

		let span = FlowSpan::new(KIND, "complete");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.run_callback(instance, issued, params, ctx)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				tracing::warn!(kind = %e.kind(), error = %e, "Login callback failed.");
			},
		}

		result
	}

	async fn run_callback(
		&self,
		instance: &mut FlowInstance,
		issued: Option<&StateToken>,
		params: CallbackParams,
		ctx: &CallContext,
	) -> Result<UserProfile, FlowError> {
		let state_matches = match (issued, params.state.as_deref()) {
			(Some(issued), Some(received)) => state::validate(received, issued),
			_ => false,
		};

		if !state_matches {
			return Err(instance.fail(FlowError::InvalidState));
		}
		if let Some(error) = params.error {
			return Err(instance.fail(FlowError::AuthorizationDenied {
				error,
				description: params.error_description,
			}));
		}

		let Some(code) = params.code.filter(|code| !code.is_empty()) else {
			return Err(instance.fail(FlowError::MissingCode));
		};

		instance.advance(FlowStage::Exchanging);

		let token = match self.exchanger.exchange(&code, ctx).await {
			Ok(token) => token,
			Err(e) => return Err(instance.fail(e.into())),
		};

		instance.advance(FlowStage::FetchingProfile);

		let profile = match self.fetcher.fetch_profile(&token, ctx).await {
			Ok(profile) => profile,
			Err(e) => return Err(instance.fail(e.into())),
		};

		instance.advance(FlowStage::Rendered);
		tracing::info!(user = profile.display_name(), "Login completed.");

		Ok(profile)
	}
}
