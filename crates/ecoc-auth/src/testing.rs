// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Fixed key material and profiles for tests.

use std::path::{Path, PathBuf};

use crate::{CredentialProfile, SigningMaterial};

/// 2048-bit RSA key (PKCS#1 PEM).
pub const PRIVATE_KEY_PEM: &str = include_str!("../testdata/private_key.pem");
/// SPKI public half of [`PRIVATE_KEY_PEM`].
pub const PUBLIC_KEY_PEM: &str = include_str!("../testdata/public_key.pem");
/// Self-signed certificate for [`PRIVATE_KEY_PEM`].
pub const CERTIFICATE_PEM: &str = include_str!("../testdata/virksomhet.cer");
/// P-256 key, wrong type for RS256.
pub const EC_PRIVATE_KEY_PEM: &str = include_str!("../testdata/ec_key.pem");

pub fn signing_material() -> SigningMaterial {
	SigningMaterial::from_parts(PRIVATE_KEY_PEM, CERTIFICATE_PEM.as_bytes()).unwrap()
}

/// Write the key and certificate into `dir`, returning their paths.
pub fn write_signing_files(dir: &Path) -> (PathBuf, PathBuf) {
	let key = dir.join("private_key.pem");
	let cert = dir.join("virksomhet.cer");
	std::fs::write(&key, PRIVATE_KEY_PEM).unwrap();
	std::fs::write(&cert, CERTIFICATE_PEM).unwrap();
	(key, cert)
}

/// A profile pointing both endpoints at test servers.
pub fn profile(audience: &str, resource: &str) -> CredentialProfile {
	let mut profile = CredentialProfile::new("i");
	profile.audience = audience.to_string();
	profile.resource = resource.to_string();
	profile.scope = "s".to_string();
	profile
}
