//! Observability helpers for login flows.
//!
//! - Spans named `oauth2_login.flow` carry the `flow` (login or callback) and `stage`
//!   (call site) fields.
//! - With the `metrics` feature, the `oauth2_login_flow_total` counter is incremented
//!   for every attempt/success/failure, labeled by `flow` + `outcome`.
//! - [`init_logging`] installs the process-wide `tracing` subscriber.

mod logging;
mod metrics;
mod tracing;

pub use logging::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Login flow phases observed by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// `/login`: state issuance and redirect.
	Login,
	/// `/callback`: state check, code exchange, and profile fetch.
	Callback,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Callback => "callback",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow phase.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure returned to the browser.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
