// crates.io
use httpmock::prelude::*;
// self
use oauth2_login::{
	_preludet::*,
	auth::TokenExchangeResult,
	error::{FetchError, TransportError},
	flows::{CallContext, ProfileFetcher},
	userinfo::UserInfoClient,
};

fn fetcher(server: &MockServer) -> UserInfoClient {
	let endpoint = Url::parse(&server.url("/userinfo")).expect("Mock userinfo URL should parse.");

	UserInfoClient::new(endpoint, test_reqwest_http_client())
}

fn ctx() -> CallContext {
	CallContext::with_timeout(StdDuration::from_secs(5))
}

#[tokio::test]
async fn profile_is_fetched_with_bearer_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo").header("authorization", "Bearer tok1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"42\",\"email\":\"a@b.com\",\"verified_email\":true,\"name\":\"Ada\"}");
		})
		.await;
	let profile = fetcher(&server)
		.fetch_profile(&TokenExchangeResult::bearer("tok1"), &ctx())
		.await
		.expect("Profile fetch should succeed against the mock.");

	mock.assert_async().await;

	assert_eq!(profile.email.as_deref(), Some("a@b.com"));
	assert_eq!(profile.verified_email, Some(true));
	assert_eq!(profile.display_name(), "Ada");
}

#[tokio::test]
async fn rejected_tokens_are_unauthorized() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo");
			then.status(401).body("{\"error\":\"invalid_token\"}");
		})
		.await;
	let err = fetcher(&server)
		.fetch_profile(&TokenExchangeResult::bearer("expired"), &ctx())
		.await
		.expect_err("HTTP 401 must fail the fetch.");

	assert!(matches!(err, FetchError::Unauthorized { status: 401 }));
}

#[tokio::test]
async fn server_errors_are_provider_rejections() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo");
			then.status(503);
		})
		.await;
	let err = fetcher(&server)
		.fetch_profile(&TokenExchangeResult::bearer("tok1"), &ctx())
		.await
		.expect_err("HTTP 503 must fail the fetch.");

	assert!(matches!(err, FetchError::ProviderRejected { status: 503 }));
}

#[tokio::test]
async fn undecodable_profiles_are_malformed() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo");
			then.status(200).header("content-type", "application/json").body("[1, 2, 3]");
		})
		.await;
	let err = fetcher(&server)
		.fetch_profile(&TokenExchangeResult::bearer("tok1"), &ctx())
		.await
		.expect_err("Array bodies must fail the fetch.");

	assert!(matches!(err, FetchError::Malformed { .. }));
}

#[tokio::test]
async fn stalled_userinfo_hits_the_deadline() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo");
			then.status(200).delay(StdDuration::from_secs(2)).body("{}");
		})
		.await;
	let ctx = CallContext::with_timeout(StdDuration::from_millis(100));
	let err = fetcher(&server)
		.fetch_profile(&TokenExchangeResult::bearer("tok1"), &ctx)
		.await
		.expect_err("Stalled userinfo must time out.");

	assert!(matches!(err, FetchError::Network(TransportError::Timeout)));
}
