// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant path resolution.

use std::path::PathBuf;

use crate::ConfigError;

/// Resolved XDG paths for ecoc.
#[derive(Debug, Clone)]
pub struct PathsConfig {
	/// User config file: ~/.config/ecoc/config.toml
	pub user_config_file: PathBuf,
	/// Data directory: ~/.local/share/ecoc/
	pub data_dir: PathBuf,
}

impl PathsConfig {
	/// Directory holding the config file and, by default, the signing files.
	pub fn config_dir(&self) -> PathBuf {
		self
			.user_config_file
			.parent()
			.map(|p| p.to_path_buf())
			.unwrap_or_else(|| self.user_config_file.clone())
	}
}

/// Resolve XDG paths.
///
/// Uses `XDG_CONFIG_HOME` / `XDG_DATA_HOME` when set, otherwise `~/.config`
/// and `~/.local/share`.
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;

	let config_home = std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.unwrap_or_else(|| home.join(".config"));

	let data_home = std::env::var_os("XDG_DATA_HOME")
		.map(PathBuf::from)
		.unwrap_or_else(|| home.join(".local/share"));

	tracing::debug!(
		config_home = %config_home.display(),
		data_home = %data_home.display(),
		"resolved XDG paths"
	);

	Ok(PathsConfig {
		user_config_file: config_home.join("ecoc/config.toml"),
		data_dir: data_home.join("ecoc"),
	})
}
