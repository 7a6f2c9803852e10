//! Anti-CSRF state tokens correlating a login redirect with its callback.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

const STATE_LEN: usize = 32;

/// Opaque per-flow correlation value echoed back by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct StateToken(String);
impl StateToken {
	/// Issues a fresh token from the thread-local CSPRNG.
	pub fn issue() -> Self {
		Self(rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect())
	}

	/// Wraps a previously issued value (e.g. read back from the state cookie).
	pub fn from_issued(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token value.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns `true` iff `received` is byte-for-byte equal to this token.
	pub fn validate(&self, received: &str) -> bool {
		validate(received, self)
	}
}
impl Debug for StateToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("StateToken").field(&self.0).finish()
	}
}
impl Display for StateToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Case-sensitive exact comparison; no trimming or normalization.
pub fn validate(received: &str, issued: &StateToken) -> bool {
	received == issued.0
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn issued_tokens_are_long_and_distinct() {
		let first = StateToken::issue();
		let second = StateToken::issue();

		assert_eq!(first.as_str().len(), STATE_LEN);
		assert!(first.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first, second);
	}

	#[test]
	fn validation_is_exact_match_only() {
		let issued = StateToken::from_issued("good");

		assert!(validate("good", &issued));
		assert!(issued.validate("good"));
		assert!(!validate("bad", &issued));
		assert!(!validate("GOOD", &issued));
		assert!(!validate(" good", &issued));
		assert!(!validate("good ", &issued));
		assert!(!validate("", &issued));
	}

	#[test]
	fn validation_matches_string_equality_for_arbitrary_pairs() {
		let samples = ["", "a", "A", "abc", "abc\n", "ümlaut", "Ümlaut", "state-123"];

		for received in samples {
			for issued in samples {
				assert_eq!(
					validate(received, &StateToken::from_issued(issued)),
					received == issued,
					"validate({received:?}, {issued:?}) disagreed with string equality."
				);
			}
		}
	}
}
