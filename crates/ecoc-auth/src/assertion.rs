// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! JWT-bearer assertion construction and signing.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::TokenError;
use crate::material::SigningMaterial;
use crate::profile::CredentialProfile;

/// Lifetime of every assertion. Fixed; the authorization server rejects
/// long-lived assertions and a short window limits replay.
pub const ASSERTION_LIFETIME_SECS: i64 = 60;

/// Claims of a client assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Authorization server (audience from the profile).
	pub aud: String,
	pub scope: String,
	/// Client id.
	pub iss: String,
	/// Registry the token is requested for.
	pub resource: String,
	/// Expiry (seconds since epoch), always `iat + 60`.
	pub exp: i64,
	/// Issued at (seconds since epoch).
	pub iat: i64,
	/// Unique per assertion.
	pub jti: String,
}

impl AssertionClaims {
	/// Build claims for `profile` issued at `issued_at`.
	///
	/// Defaults are applied to blank fields first; a missing issuer or an
	/// unparseable audience/resource is a configuration error.
	pub fn new(profile: &CredentialProfile, issued_at: DateTime<Utc>) -> Result<Self, TokenError> {
		let profile = profile.clone().with_defaults();
		profile.validate_for_exchange()?;

		let iat = issued_at.timestamp();
		Ok(Self {
			aud: profile.audience,
			scope: profile.scope,
			iss: profile.issuer,
			resource: profile.resource,
			exp: iat + ASSERTION_LIFETIME_SECS,
			iat,
			jti: Uuid::new_v4().to_string(),
		})
	}
}

/// Sign `claims` with RS256, carrying the certificate chain in `x5c`.
///
/// No `kid` is set; the authorization server validates against the chain.
#[instrument(skip_all, fields(iss = %claims.iss, jti = %claims.jti))]
pub fn sign_assertion(claims: &AssertionClaims, material: &SigningMaterial) -> Result<String, TokenError> {
	if material.certificate_chain().is_empty() {
		return Err(TokenError::Signing(
			"certificate chain is empty; x5c header cannot be built".to_string(),
		));
	}

	let encoding_key = EncodingKey::from_rsa_pem(material.private_key_pem().as_bytes())
		.map_err(|e| TokenError::Signing(format!("Invalid RSA private key: {e}")))?;

	let mut header = Header::new(Algorithm::RS256);
	header.x5c = Some(material.certificate_chain().to_vec());

	let token = encode(&header, claims, &encoding_key)
		.map_err(|e| TokenError::Signing(format!("Failed to encode JWT: {e}")))?;

	debug!(exp = claims.exp, "signed assertion");
	Ok(token)
}

/// Build and sign an assertion for `profile` issued now.
pub fn build_assertion(
	profile: &CredentialProfile,
	material: &SigningMaterial,
) -> Result<(AssertionClaims, String), TokenError> {
	let claims = AssertionClaims::new(profile, Utc::now())?;
	let token = sign_assertion(&claims, material)?;
	Ok((claims, token))
}
