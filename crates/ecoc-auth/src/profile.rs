// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The credential profile used to build assertions.

use ecoc_common_secret::SecretString;
use url::Url;

use crate::error::TokenError;

/// Production Maskinporten.
pub const DEFAULT_AUDIENCE: &str = "https://maskinporten.no/";
pub const DEFAULT_SCOPE: &str = "svv:kjoretoy/ecoc";
/// Production registry host.
pub const DEFAULT_RESOURCE: &str = "https://www.vegvesen.no";
pub const DEFAULT_KEYSTORE_PASSWORD: &str = "Keystore Password";
pub const DEFAULT_KEYSTORE_ALIAS: &str = "Keystore Alias";
pub const DEFAULT_KEYSTORE_ALIAS_PASSWORD: &str = "Keystore Alias Password";

/// The operator's authorization settings.
///
/// Exactly one profile is active at a time. The keystore fields are stored
/// for future use and are never sent to any server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialProfile {
	/// Client id registered with the authorization server (`iss`).
	pub issuer: String,
	/// Authorization server base URL (`aud`); the token endpoint hangs off it.
	pub audience: String,
	/// Registry base URL, also sent as the `resource` claim.
	pub resource: String,
	/// Space separated scopes requested in the assertion.
	pub scope: String,
	pub keystore_password: SecretString,
	pub keystore_alias: String,
	pub keystore_alias_password: SecretString,
}

impl CredentialProfile {
	/// A profile for `issuer` with every other field at its default.
	pub fn new(issuer: impl Into<String>) -> Self {
		Self {
			issuer: issuer.into(),
			audience: String::new(),
			resource: String::new(),
			scope: String::new(),
			keystore_password: SecretString::from(""),
			keystore_alias: String::new(),
			keystore_alias_password: SecretString::from(""),
		}
		.with_defaults()
	}

	/// Substitute defaults for blank fields. `issuer` has no default.
	pub fn with_defaults(mut self) -> Self {
		fn fill(value: &mut String, default: &str) {
			if value.trim().is_empty() {
				*value = default.to_string();
			} else {
				let trimmed = value.trim();
				if trimmed.len() != value.len() {
					*value = trimmed.to_string();
				}
			}
		}
		fn fill_secret(value: &mut SecretString, default: &str) {
			if value.expose().trim().is_empty() {
				*value = SecretString::from(default);
			}
		}

		self.issuer = self.issuer.trim().to_string();
		fill(&mut self.audience, DEFAULT_AUDIENCE);
		fill(&mut self.resource, DEFAULT_RESOURCE);
		fill(&mut self.scope, DEFAULT_SCOPE);
		fill(&mut self.keystore_alias, DEFAULT_KEYSTORE_ALIAS);
		fill_secret(&mut self.keystore_password, DEFAULT_KEYSTORE_PASSWORD);
		fill_secret(&mut self.keystore_alias_password, DEFAULT_KEYSTORE_ALIAS_PASSWORD);
		self
	}

	/// Check that the fields an assertion needs are present and well formed.
	///
	/// Call on a profile that has already had defaults applied.
	pub fn validate_for_exchange(&self) -> Result<(), TokenError> {
		if self.issuer.trim().is_empty() {
			return Err(TokenError::Configuration(
				"issuer is not set in the credential profile".to_string(),
			));
		}
		for (name, value) in [
			("audience", &self.audience),
			("scope", &self.scope),
			("resource", &self.resource),
		] {
			if value.trim().is_empty() {
				return Err(TokenError::Configuration(format!("{name} is empty")));
			}
		}
		parse_http_url("audience", &self.audience)?;
		parse_http_url("resource", &self.resource)?;
		Ok(())
	}

	/// The token endpoint: `{audience}/token` with exactly one slash.
	pub fn token_endpoint(&self) -> Result<Url, TokenError> {
		let base = self.audience.trim().trim_end_matches('/');
		parse_http_url("audience", &format!("{base}/token"))
	}
}

fn parse_http_url(field: &str, raw: &str) -> Result<Url, TokenError> {
	let url = Url::parse(raw.trim())
		.map_err(|e| TokenError::Configuration(format!("{field} '{raw}' is not a valid URL: {e}")))?;
	match url.scheme() {
		"https" | "http" => Ok(url),
		other => Err(TokenError::Configuration(format!(
			"{field} must be an http(s) URL, got scheme '{other}'"
		))),
	}
}
