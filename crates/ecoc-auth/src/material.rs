// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Signing material: the operator's private key and certificate chain.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ecoc_common_secret::SecretString;
use tracing::{debug, instrument};

use crate::error::TokenError;

const PEM_CERT_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_CERT_END: &str = "-----END CERTIFICATE-----";

/// Private key plus the certificate chain placed in the `x5c` header.
///
/// Loaded fresh for every token acquisition so a rotated key or
/// certificate is picked up without restarting.
#[derive(Debug, Clone)]
pub struct SigningMaterial {
	private_key_pem: SecretString,
	certificate_chain: Vec<String>,
}

impl SigningMaterial {
	/// Build from in-memory contents.
	///
	/// `certificate` may be PEM (one or more `CERTIFICATE` blocks), a bare
	/// base64 DER string, or raw DER bytes.
	pub fn from_parts(private_key_pem: impl Into<String>, certificate: &[u8]) -> Result<Self, TokenError> {
		let private_key_pem = private_key_pem.into();
		if private_key_pem.trim().is_empty() {
			return Err(TokenError::Signing("private key is empty".to_string()));
		}
		let certificate_chain = parse_certificate_chain(certificate)?;
		Ok(Self {
			private_key_pem: SecretString::new(private_key_pem),
			certificate_chain,
		})
	}

	/// Read the key and certificate files.
	#[instrument(skip_all, fields(key = %private_key_path.display(), certificate = %certificate_path.display()))]
	pub fn load(private_key_path: &Path, certificate_path: &Path) -> Result<Self, TokenError> {
		let key = std::fs::read_to_string(private_key_path).map_err(|e| {
			TokenError::Signing(format!(
				"failed to read private key {}: {e}",
				private_key_path.display()
			))
		})?;
		let certificate = std::fs::read(certificate_path).map_err(|e| {
			TokenError::Signing(format!(
				"failed to read certificate {}: {e}",
				certificate_path.display()
			))
		})?;

		let material = Self::from_parts(key, &certificate)?;
		debug!(
			chain_len = material.certificate_chain.len(),
			"signing material loaded"
		);
		Ok(material)
	}

	pub(crate) fn private_key_pem(&self) -> &str {
		self.private_key_pem.expose()
	}

	/// Base64 DER certificates, leaf first, in file order.
	pub fn certificate_chain(&self) -> &[String] {
		&self.certificate_chain
	}
}

/// Extract the `x5c` chain from a certificate file's contents.
pub fn parse_certificate_chain(contents: &[u8]) -> Result<Vec<String>, TokenError> {
	let text = match std::str::from_utf8(contents) {
		Ok(text) => text,
		Err(_) => return der_chain(contents),
	};

	if text.contains(PEM_CERT_BEGIN) {
		return pem_chain(text);
	}

	let compact: String = text.split_whitespace().collect();
	if compact.is_empty() {
		return Err(TokenError::Signing("certificate file is empty".to_string()));
	}
	STANDARD
		.decode(compact.as_bytes())
		.map_err(|e| TokenError::Signing(format!("certificate is neither PEM nor base64 DER: {e}")))?;
	Ok(vec![compact])
}

fn der_chain(der: &[u8]) -> Result<Vec<String>, TokenError> {
	if der.is_empty() {
		return Err(TokenError::Signing("certificate file is empty".to_string()));
	}
	Ok(vec![STANDARD.encode(der)])
}

fn pem_chain(text: &str) -> Result<Vec<String>, TokenError> {
	let mut chain = Vec::new();
	let mut current: Option<String> = None;

	for line in text.lines().map(str::trim) {
		if line == PEM_CERT_BEGIN {
			current = Some(String::new());
		} else if line == PEM_CERT_END {
			let body = current.take().ok_or_else(|| {
				TokenError::Signing("certificate END marker without BEGIN".to_string())
			})?;
			STANDARD
				.decode(body.as_bytes())
				.map_err(|e| TokenError::Signing(format!("certificate {} is not valid base64: {e}", chain.len() + 1)))?;
			chain.push(body);
		} else if let Some(body) = current.as_mut() {
			body.push_str(line);
		}
	}

	if current.is_some() {
		return Err(TokenError::Signing("unterminated certificate block".to_string()));
	}
	if chain.is_empty() {
		return Err(TokenError::Signing("no certificate found".to_string()));
	}
	Ok(chain)
}
