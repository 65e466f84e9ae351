// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Exchange of a signed assertion for a bearer token.

use ecoc_common_secret::SecretString;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::assertion::build_assertion;
use crate::error::TokenError;
use crate::material::SigningMaterial;
use crate::profile::CredentialProfile;

/// Grant type of the RFC 7523 JWT-bearer flow.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Bearer token returned by the authorization server. Memory only.
#[derive(Debug, Clone)]
pub struct AccessToken {
	token: SecretString,
	pub token_type: Option<String>,
	pub expires_in: Option<u64>,
	pub scope: Option<String>,
}

impl AccessToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self {
			token: SecretString::new(token.into()),
			token_type: None,
			expires_in: None,
			scope: None,
		}
	}

	/// The raw token for the `Authorization: Bearer` header.
	pub fn expose(&self) -> &str {
		self.token.expose()
	}

	/// First ten characters, for operator diagnostics.
	pub fn preview(&self) -> String {
		let prefix: String = self.token.expose().chars().take(10).collect();
		format!("{prefix}...")
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	token_type: Option<String>,
	expires_in: Option<u64>,
	scope: Option<String>,
}

/// Client for the authorization server's token endpoint.
///
/// Holds no state besides the HTTP client: the caller passes the credential
/// profile and signing material in on every call, and a fresh assertion is
/// built each time. No retries happen here.
#[derive(Debug, Clone)]
pub struct TokenExchanger {
	http: reqwest::Client,
}

impl TokenExchanger {
	pub fn new(http: reqwest::Client) -> Self {
		Self { http }
	}

	/// Obtain a bearer token for `profile`.
	///
	/// # Errors
	///
	/// - [`TokenError::Configuration`]: issuer missing or a URL is invalid.
	/// - [`TokenError::Signing`]: key or certificate unusable.
	/// - [`TokenError::Transport`]: network failure or timeout.
	/// - [`TokenError::Auth`]: any non-200, or a 200 without `access_token`,
	///   with the body verbatim.
	#[instrument(skip_all, fields(issuer = %profile.issuer, audience = %profile.audience))]
	pub async fn acquire_token(
		&self,
		profile: &CredentialProfile,
		material: &SigningMaterial,
	) -> Result<AccessToken, TokenError> {
		let profile = profile.clone().with_defaults();
		let endpoint = profile.token_endpoint()?;
		let (claims, assertion) = build_assertion(&profile, material)?;

		debug!(endpoint = %endpoint, jti = %claims.jti, "requesting access token");

		let response = self
			.http
			.post(endpoint.clone())
			.form(&[
				("grant_type", JWT_BEARER_GRANT_TYPE),
				("assertion", assertion.as_str()),
			])
			.send()
			.await
			.map_err(TokenError::Transport)?;

		let status = response.status();
		let body = response.text().await.map_err(TokenError::Transport)?;

		if status != StatusCode::OK {
			warn!(status = status.as_u16(), endpoint = %endpoint, "token request rejected");
			return Err(TokenError::auth(status.as_u16(), body));
		}

		let parsed: TokenResponse = match serde_json::from_str(&body) {
			Ok(parsed) => parsed,
			Err(e) => {
				warn!(error = %e, "token response has no usable access_token");
				return Err(TokenError::auth(status.as_u16(), body));
			}
		};

		let token = AccessToken {
			token: SecretString::new(parsed.access_token),
			token_type: parsed.token_type,
			expires_in: parsed.expires_in,
			scope: parsed.scope,
		};
		info!(expires_in = ?token.expires_in, "access token granted");
		debug!(token = %token.preview(), "access token prefix");
		Ok(token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing;
	use ecoc_common_http::HttpTimeouts;
	use std::time::Duration;
	use wiremock::matchers::{body_string_contains, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn exchanger() -> TokenExchanger {
		TokenExchanger::new(ecoc_common_http::new_client(HttpTimeouts::default()).unwrap())
	}

	fn profile_for(server: &MockServer) -> CredentialProfile {
		testing::profile(&format!("{}/", server.uri()), "https://reg.example")
	}

	#[tokio::test]
	async fn test_success_returns_token() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/token"))
			.and(header("content-type", "application/x-www-form-urlencoded"))
			.and(body_string_contains(
				"grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
			))
			.and(body_string_contains("assertion=ey"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"access_token": "tok",
				"token_type": "Bearer",
				"expires_in": 119,
				"scope": "s"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let token = exchanger()
			.acquire_token(&profile_for(&server), &testing::signing_material())
			.await
			.unwrap();

		assert_eq!(token.expose(), "tok");
		assert_eq!(token.expires_in, Some(119));
		assert_eq!(token.token_type.as_deref(), Some("Bearer"));
	}

	#[tokio::test]
	async fn test_non_200_surfaces_body_verbatim() {
		let server = MockServer::start().await;
		let body = r#"{"error":"invalid_client","error_description":"Certificate chain invalid"}"#;
		Mock::given(method("POST"))
			.and(path("/token"))
			.respond_with(ResponseTemplate::new(400).set_body_string(body))
			.mount(&server)
			.await;

		let err = exchanger()
			.acquire_token(&profile_for(&server), &testing::signing_material())
			.await
			.unwrap_err();

		match err {
			TokenError::Auth { status, body: b } => {
				assert_eq!(status, 400);
				assert_eq!(b, body);
			}
			other => panic!("expected Auth error, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_200_without_token_is_auth_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/token"))
			.respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
			.mount(&server)
			.await;

		let err = exchanger()
			.acquire_token(&profile_for(&server), &testing::signing_material())
			.await
			.unwrap_err();
		assert!(matches!(err, TokenError::Auth { status: 200, ref body } if body == "<html>maintenance</html>"));
	}

	#[tokio::test]
	async fn test_timeout_is_transport_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/token"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(serde_json::json!({"access_token": "late"}))
					.set_delay(Duration::from_secs(2)),
			)
			.mount(&server)
			.await;

		let client = ecoc_common_http::new_client(HttpTimeouts {
			connect: Duration::from_millis(200),
			request: Duration::from_millis(200),
		})
		.unwrap();

		let err = TokenExchanger::new(client)
			.acquire_token(&profile_for(&server), &testing::signing_material())
			.await
			.unwrap_err();
		assert!(err.is_timeout(), "expected timeout, got {err:?}");
	}

	#[tokio::test]
	async fn test_unreachable_server_is_transport_error() {
		let profile = testing::profile("http://127.0.0.1:1/", "https://reg.example");

		let err = exchanger()
			.acquire_token(&profile, &testing::signing_material())
			.await
			.unwrap_err();
		assert!(matches!(err, TokenError::Transport(_)));
	}

	#[tokio::test]
	async fn test_configuration_error_makes_no_request() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200))
			.expect(0)
			.mount(&server)
			.await;

		let mut profile = profile_for(&server);
		profile.issuer = String::new();
		let err = exchanger()
			.acquire_token(&profile, &testing::signing_material())
			.await
			.unwrap_err();
		assert!(matches!(err, TokenError::Configuration(_)));
	}

	#[test]
	fn test_preview_truncates() {
		let token = AccessToken::new("abcdefghijklmnop");
		assert_eq!(token.preview(), "abcdefghij...");
		assert!(!format!("{token:?}").contains("abcdefghijklmnop"));
	}
}
