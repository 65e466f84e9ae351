// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	#[error("registry request failed: {0}")]
	Transport(#[source] reqwest::Error),

	#[error("invalid registry URL {url}: {message}")]
	InvalidUrl { url: String, message: String },
}

impl RegistryError {
	pub fn is_timeout(&self) -> bool {
		matches!(self, RegistryError::Transport(e) if e.is_timeout())
	}
}
