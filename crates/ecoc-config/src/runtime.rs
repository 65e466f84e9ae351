// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fully resolved runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use ecoc_common_http::HttpTimeouts;

use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;
use crate::ConfigError;

const DEFAULT_DATABASE_FILE: &str = "vegvesen_data.db";
const DEFAULT_PRIVATE_KEY_FILE: &str = "private_key.pem";
const DEFAULT_CERTIFICATE_FILE: &str = "virksomhet.cer";
const DEFAULT_LOG_LEVEL: &str = "info";
const MAX_TIMEOUT_SECS: u64 = 600;

/// Runtime configuration with every field resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EcocConfig {
	/// SQLite file holding the credential profile and the submission ledger.
	pub database_path: PathBuf,
	/// PEM-encoded RSA private key used to sign assertions.
	pub private_key_path: PathBuf,
	/// Certificate file supplying the `x5c` chain.
	pub certificate_path: PathBuf,
	pub http: HttpTimeouts,
	pub log_level: String,
}

impl EcocConfig {
	/// Resolve a merged layer against the XDG paths.
	pub fn finalize(layer: ConfigLayer, paths: &PathsConfig) -> Result<EcocConfig, ConfigError> {
		let defaults = HttpTimeouts::default();
		let connect = timeout_secs(
			"http.connect_timeout_secs",
			layer.http.connect_timeout_secs,
			defaults.connect,
		)?;
		let request = timeout_secs(
			"http.request_timeout_secs",
			layer.http.request_timeout_secs,
			defaults.request,
		)?;

		Ok(EcocConfig {
			database_path: layer
				.database
				.path
				.unwrap_or_else(|| paths.data_dir.join(DEFAULT_DATABASE_FILE)),
			private_key_path: layer
				.signing
				.private_key_path
				.unwrap_or_else(|| paths.config_dir().join(DEFAULT_PRIVATE_KEY_FILE)),
			certificate_path: layer
				.signing
				.certificate_path
				.unwrap_or_else(|| paths.config_dir().join(DEFAULT_CERTIFICATE_FILE)),
			http: HttpTimeouts { connect, request },
			log_level: layer
				.logging
				.level
				.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
		})
	}

	/// SQLite connection string for [`Self::database_path`].
	pub fn database_url(&self) -> String {
		format!("sqlite:{}", self.database_path.display())
	}
}

fn timeout_secs(field: &str, value: Option<u64>, default: Duration) -> Result<Duration, ConfigError> {
	match value {
		None => Ok(default),
		Some(0) => Err(ConfigError::invalid_value(field, "must be greater than zero")),
		Some(secs) if secs > MAX_TIMEOUT_SECS => Err(ConfigError::invalid_value(
			field,
			format!("must be at most {MAX_TIMEOUT_SECS} seconds"),
		)),
		Some(secs) => Ok(Duration::from_secs(secs)),
	}
}
