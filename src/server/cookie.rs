//! Browser cookie carrying the state issued by `/login`.

// crates.io
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
// self
use crate::{_prelude::*, auth::StateToken};

/// Name of the state cookie.
pub const STATE_COOKIE_NAME: &str = "oauth2_login_state";

/// Attributes of the state cookie.
///
/// The cookie is `HttpOnly`, `SameSite=Lax` (the provider's redirect back is a top-level
/// navigation, so the browser still sends it), scoped to `/`, and short-lived.
#[derive(Clone, Debug)]
pub struct StateCookie {
	ttl: Duration,
	secure: bool,
}
impl StateCookie {
	/// Creates cookie settings with the given lifetime and `Secure` flag.
	pub fn new(ttl: Duration, secure: bool) -> Self {
		Self { ttl, secure }
	}

	/// Builds the `Set-Cookie` value binding `state` to this browser.
	pub fn issue(&self, state: &StateToken) -> Cookie<'static> {
		Cookie::build((STATE_COOKIE_NAME, state.as_str().to_owned()))
			.path("/")
			.http_only(true)
			.same_site(SameSite::Lax)
			.secure(self.secure)
			.max_age(self.ttl)
			.build()
	}

	/// Reads the issued state back from the request cookies.
	pub fn read(&self, jar: &CookieJar) -> Option<StateToken> {
		jar.get(STATE_COOKIE_NAME)
			.map(|cookie| cookie.value())
			.filter(|value| !value.is_empty())
			.map(StateToken::from_issued)
	}

	/// Builds the removal cookie; a state is accepted at most once per browser.
	pub fn removal(&self) -> Cookie<'static> {
		Cookie::build(STATE_COOKIE_NAME).path("/").build()
	}
}
impl Default for StateCookie {
	fn default() -> Self {
		Self::new(Duration::minutes(10), true)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn issued_cookie_is_locked_down() {
		let cookie = StateCookie::default().issue(&StateToken::from_issued("abc"));

		assert_eq!(cookie.name(), STATE_COOKIE_NAME);
		assert_eq!(cookie.value(), "abc");
		assert_eq!(cookie.http_only(), Some(true));
		assert_eq!(cookie.secure(), Some(true));
		assert_eq!(cookie.same_site(), Some(SameSite::Lax));
		assert_eq!(cookie.path(), Some("/"));
		assert_eq!(cookie.max_age(), Some(Duration::minutes(10)));
	}

	#[test]
	fn insecure_mode_drops_the_secure_flag() {
		let cookie =
			StateCookie::new(Duration::seconds(30), false).issue(&StateToken::from_issued("abc"));

		assert_eq!(cookie.secure(), Some(false));
	}

	#[test]
	fn read_ignores_missing_and_empty_values() {
		let settings = StateCookie::default();

		assert!(settings.read(&CookieJar::new()).is_none());

		let jar = CookieJar::new().add(Cookie::new(STATE_COOKIE_NAME, ""));

		assert!(settings.read(&jar).is_none());

		let jar = CookieJar::new().add(Cookie::new(STATE_COOKIE_NAME, "good"));

		assert_eq!(settings.read(&jar), Some(StateToken::from_issued("good")));
	}
}
