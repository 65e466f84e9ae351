// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the ecoc submission client.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration: defaults, TOML file, `ECOC_*` environment
//!   variables, command line overrides (later sources win)
//! - Validation of timeouts and paths
//!
//! The credential profile (issuer, audience, scope, ...) is not part of this
//! file-based configuration; it lives in the database so the operator can
//! edit it and retry immediately.

pub mod error;
pub mod layer;
pub mod paths;
pub mod runtime;

pub use error::ConfigError;
pub use layer::{CliOverrides, ConfigLayer};
pub use paths::PathsConfig;
pub use runtime::EcocConfig;

/// Load configuration from all sources.
///
/// Precedence, lowest to highest: built-in defaults, the config file
/// (`--config` or `~/.config/ecoc/config.toml`), environment, command line.
pub fn load_config(cli: &CliOverrides) -> Result<EcocConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;
	load_config_with_paths(cli, &paths, ConfigLayer::from_env()?)
}

/// Same as [`load_config`] with explicit paths and environment layer.
pub fn load_config_with_paths(
	cli: &CliOverrides,
	paths: &PathsConfig,
	env: ConfigLayer,
) -> Result<EcocConfig, ConfigError> {
	let file_layer = match &cli.config_file {
		Some(path) => ConfigLayer::from_file(path, true)?,
		None => ConfigLayer::from_file(&paths.user_config_file, false)?,
	};

	let merged = file_layer.merge(env).merge(ConfigLayer::from_cli(cli));
	EcocConfig::finalize(merged, paths)
}
