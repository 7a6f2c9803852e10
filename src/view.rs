//! HTML views for the index, profile, and error pages.
//!
//! Views are pure: they take plain values and return markup. Every provider-supplied
//! string is escaped before it is interpolated.

// std
use std::fmt::Write;
// crates.io
use axum::response::Html;
// self
use crate::{_prelude::*, userinfo::UserProfile};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>OAuth2 Login</title></head>
<body style="font-family: system-ui; margin: 48px;">
"#;
const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Renders the index: a login link when `user` is absent, the profile otherwise.
pub fn render_index(user: Option<&UserProfile>) -> Html<String> {
	let mut body = String::from(PAGE_HEAD);

	match user {
		None => body.push_str(
			"<h1>Not signed in</h1>\n<p><a href=\"/login\">Sign in with your provider</a></p>\n",
		),
		Some(profile) => push_profile(&mut body, profile),
	}

	body.push_str(PAGE_TAIL);

	Html(body)
}

/// Renders an error page for a failed login.
pub fn render_error(title: &str, message: &str) -> Html<String> {
	let mut body = String::from(PAGE_HEAD);
	let _ = write!(
		body,
		"<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/login\">Try again</a></p>\n",
		escape(title),
		escape(message)
	);

	body.push_str(PAGE_TAIL);

	Html(body)
}

fn push_profile(body: &mut String, profile: &UserProfile) {
	let _ = writeln!(body, "<h1>Signed in as {}</h1>", escape(profile.display_name()));

	if let Some(picture) = profile.picture.as_deref().filter(|url| is_http_url(url)) {
		let _ = writeln!(body, "<img src=\"{}\" alt=\"avatar\" width=\"96\" height=\"96\">", escape(picture));
	}

	body.push_str("<dl>\n");

	let fields = [
		("ID", profile.id.as_deref()),
		("Email", profile.email.as_deref()),
		("Verified email", profile.verified_email.map(|verified| if verified { "yes" } else { "no" })),
		("Given name", profile.given_name.as_deref()),
		("Family name", profile.family_name.as_deref()),
		("Locale", profile.locale.as_deref()),
	];

	for (label, value) in fields {
		if let Some(value) = value {
			let _ = writeln!(body, "<dt>{label}</dt><dd>{}</dd>", escape(value));
		}
	}
	for (key, value) in &profile.extra {
		let value = match value {
			serde_json::Value::String(s) => s.clone(),
			other => other.to_string(),
		};
		let _ = writeln!(body, "<dt>{}</dt><dd>{}</dd>", escape(key), escape(&value));
	}

	body.push_str("</dl>\n<p><a href=\"/\">Home</a></p>\n");
}

fn is_http_url(raw: &str) -> bool {
	Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn escape(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for c in raw.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			c => out.push(c),
		}
	}

	out
}
