// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layers and their sources.
//!
//! Each source (file, environment, command line) produces a [`ConfigLayer`]
//! where every field is optional. Layers are merged in precedence order and
//! finalized into a [`crate::EcocConfig`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;

/// A partial configuration. `None` means "not set by this source".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
	pub database: DatabaseLayer,
	pub signing: SigningLayer,
	pub http: HttpLayer,
	pub logging: LoggingLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseLayer {
	pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigningLayer {
	pub private_key_path: Option<PathBuf>,
	pub certificate_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpLayer {
	pub connect_timeout_secs: Option<u64>,
	pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingLayer {
	pub level: Option<String>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub config_file: Option<PathBuf>,
	pub database_path: Option<PathBuf>,
	pub private_key_path: Option<PathBuf>,
	pub certificate_path: Option<PathBuf>,
	pub log_level: Option<String>,
}

impl ConfigLayer {
	/// Overlay `other` on top of `self`; fields set in `other` win.
	pub fn merge(mut self, other: ConfigLayer) -> ConfigLayer {
		fn pick<T>(base: &mut Option<T>, over: Option<T>) {
			if over.is_some() {
				*base = over;
			}
		}

		pick(&mut self.database.path, other.database.path);
		pick(&mut self.signing.private_key_path, other.signing.private_key_path);
		pick(&mut self.signing.certificate_path, other.signing.certificate_path);
		pick(
			&mut self.http.connect_timeout_secs,
			other.http.connect_timeout_secs,
		);
		pick(
			&mut self.http.request_timeout_secs,
			other.http.request_timeout_secs,
		);
		pick(&mut self.logging.level, other.logging.level);
		self
	}

	/// Parse a TOML document.
	pub fn from_toml(path: &Path, contents: &str) -> Result<ConfigLayer, ConfigError> {
		toml::from_str(contents).map_err(|source| ConfigError::TomlParse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Read a TOML file. A missing file yields an empty layer unless
	/// `required` is set.
	pub fn from_file(path: &Path, required: bool) -> Result<ConfigLayer, ConfigError> {
		match std::fs::read_to_string(path) {
			Ok(contents) => {
				tracing::debug!(path = %path.display(), "loaded config file");
				Self::from_toml(path, &contents)
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
				tracing::debug!(path = %path.display(), "no config file, using defaults");
				Ok(ConfigLayer::default())
			}
			Err(source) => Err(ConfigError::Io {
				path: path.to_path_buf(),
				source,
			}),
		}
	}

	/// Build a layer from `ECOC_*` variables using the given lookup.
	///
	/// The lookup is injected so tests do not have to mutate the process
	/// environment.
	pub fn from_env_with<F>(lookup: F) -> Result<ConfigLayer, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

		let parse_secs = |key: &str| -> Result<Option<u64>, ConfigError> {
			non_empty(key)
				.map(|raw| {
					raw.trim()
						.parse::<u64>()
						.map_err(|_| ConfigError::invalid_value(key, format!("not a number: {raw}")))
				})
				.transpose()
		};

		Ok(ConfigLayer {
			database: DatabaseLayer {
				path: non_empty("ECOC_DATABASE_PATH").map(PathBuf::from),
			},
			signing: SigningLayer {
				private_key_path: non_empty("ECOC_PRIVATE_KEY_PATH").map(PathBuf::from),
				certificate_path: non_empty("ECOC_CERTIFICATE_PATH").map(PathBuf::from),
			},
			http: HttpLayer {
				connect_timeout_secs: parse_secs("ECOC_HTTP_CONNECT_TIMEOUT_SECS")?,
				request_timeout_secs: parse_secs("ECOC_HTTP_REQUEST_TIMEOUT_SECS")?,
			},
			logging: LoggingLayer {
				level: non_empty("ECOC_LOG_LEVEL"),
			},
		})
	}

	/// Build a layer from the process environment.
	pub fn from_env() -> Result<ConfigLayer, ConfigError> {
		Self::from_env_with(|key| std::env::var(key).ok())
	}

	/// Build a layer from command line overrides.
	pub fn from_cli(cli: &CliOverrides) -> ConfigLayer {
		ConfigLayer {
			database: DatabaseLayer {
				path: cli.database_path.clone(),
			},
			signing: SigningLayer {
				private_key_path: cli.private_key_path.clone(),
				certificate_path: cli.certificate_path.clone(),
			},
			http: HttpLayer::default(),
			logging: LoggingLayer {
				level: cli.log_level.clone(),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_parse_full_toml() {
		let layer = ConfigLayer::from_toml(
			Path::new("config.toml"),
			r#"
			[database]
			path = "/var/lib/ecoc/ledger.db"

			[signing]
			private_key_path = "/etc/ecoc/private_key.pem"
			certificate_path = "/etc/ecoc/virksomhet.cer"

			[http]
			connect_timeout_secs = 5
			request_timeout_secs = 20

			[logging]
			level = "debug"
			"#,
		)
		.unwrap();

		assert_eq!(
			layer.database.path,
			Some(PathBuf::from("/var/lib/ecoc/ledger.db"))
		);
		assert_eq!(layer.http.connect_timeout_secs, Some(5));
		assert_eq!(layer.http.request_timeout_secs, Some(20));
		assert_eq!(layer.logging.level.as_deref(), Some("debug"));
	}

	#[test]
	fn test_unknown_key_is_rejected() {
		let result = ConfigLayer::from_toml(Path::new("config.toml"), "[database]\nurl = \"x\"\n");
		assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
	}

	#[test]
	fn test_merge_prefers_overlay() {
		let base = ConfigLayer {
			logging: LoggingLayer {
				level: Some("info".to_string()),
			},
			http: HttpLayer {
				connect_timeout_secs: Some(10),
				request_timeout_secs: Some(30),
			},
			..Default::default()
		};
		let over = ConfigLayer {
			logging: LoggingLayer {
				level: Some("trace".to_string()),
			},
			..Default::default()
		};

		let merged = base.merge(over);
		assert_eq!(merged.logging.level.as_deref(), Some("trace"));
		assert_eq!(merged.http.connect_timeout_secs, Some(10));
	}

	#[test]
	fn test_env_layer_reads_known_keys() {
		let vars: HashMap<&str, &str> = [
			("ECOC_DATABASE_PATH", "/tmp/ledger.db"),
			("ECOC_HTTP_REQUEST_TIMEOUT_SECS", "45"),
			("ECOC_LOG_LEVEL", " "),
		]
		.into_iter()
		.collect();

		let layer = ConfigLayer::from_env_with(|k| vars.get(k).map(|v| v.to_string())).unwrap();
		assert_eq!(layer.database.path, Some(PathBuf::from("/tmp/ledger.db")));
		assert_eq!(layer.http.request_timeout_secs, Some(45));
		assert_eq!(layer.logging.level, None);
	}

	#[test]
	fn test_env_layer_rejects_bad_timeout() {
		let result = ConfigLayer::from_env_with(|k| {
			(k == "ECOC_HTTP_CONNECT_TIMEOUT_SECS").then(|| "soon".to_string())
		});
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_missing_optional_file_is_empty_layer() {
		let dir = tempfile::tempdir().unwrap();
		let layer = ConfigLayer::from_file(&dir.path().join("absent.toml"), false).unwrap();
		assert_eq!(layer, ConfigLayer::default());
	}

	#[test]
	fn test_missing_required_file_is_error() {
		let dir = tempfile::tempdir().unwrap();
		let result = ConfigLayer::from_file(&dir.path().join("absent.toml"), true);
		assert!(matches!(result, Err(ConfigError::Io { .. })));
	}
}
