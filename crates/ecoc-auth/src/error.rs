// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for assertion signing and token exchange.

use thiserror::Error;

/// Errors that can occur while obtaining a bearer token.
#[derive(Debug, Error)]
pub enum TokenError {
	/// Missing or invalid credential profile field.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// Private key or certificate could not be loaded, or signing failed.
	#[error("Signing error: {0}")]
	Signing(String),

	/// Network-level failure talking to the token endpoint (connect, DNS,
	/// TLS, timeout).
	#[error("Transport error: {0}")]
	Transport(#[source] reqwest::Error),

	/// The token endpoint answered with something other than a usable 200.
	/// `body` is the response body exactly as received.
	#[error("Token endpoint returned HTTP {status}: {body}")]
	Auth { status: u16, body: String },
}

impl TokenError {
	/// Create an auth error from status code and raw body.
	pub fn auth(status: u16, body: impl Into<String>) -> Self {
		Self::Auth {
			status,
			body: body.into(),
		}
	}

	/// True when the failure was a request or connect timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, TokenError::Transport(e) if e.is_timeout())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_auth_error_keeps_body_verbatim() {
		let body = r#"{"error":"invalid_grant","error_description":"Invalid assertion. Client authentication failed."}"#;
		let err = TokenError::auth(400, body);
		assert_eq!(err.to_string(), format!("Token endpoint returned HTTP 400: {body}"));
		match err {
			TokenError::Auth { status, body: b } => {
				assert_eq!(status, 400);
				assert_eq!(b, body);
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn test_non_transport_is_not_timeout() {
		assert!(!TokenError::Configuration("issuer".to_string()).is_timeout());
		assert!(!TokenError::auth(500, "").is_timeout());
	}
}
