// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! JWT-bearer authorization for ecoc.
//!
//! The registry only accepts bearer tokens issued by the authorization
//! server (Maskinporten). A token is obtained by signing a short-lived
//! assertion with the operator's RSA key and posting it to the token
//! endpoint:
//!
//! 1. [`CredentialProfile`] supplies issuer, audience, scope and resource.
//! 2. [`SigningMaterial`] supplies the private key and the `x5c` chain.
//! 3. [`AssertionClaims`] / [`sign_assertion`] build the RS256 assertion
//!    (60 second lifetime, fresh `jti`).
//! 4. [`TokenExchanger::acquire_token`] performs the exchange.
//!
//! Nothing is cached: every call rebuilds the assertion, so a retry after a
//! failure never reuses an expired one.

pub mod assertion;
pub mod error;
pub mod exchange;
pub mod material;
pub mod profile;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use assertion::{build_assertion, sign_assertion, AssertionClaims, ASSERTION_LIFETIME_SECS};
pub use error::TokenError;
pub use exchange::{AccessToken, TokenExchanger, JWT_BEARER_GRANT_TYPE};
pub use material::{parse_certificate_chain, SigningMaterial};
pub use profile::CredentialProfile;
