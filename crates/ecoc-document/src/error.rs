// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
	#[error("failed to access {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("document is not valid {0}")]
	Encoding(&'static str),

	#[error("malformed XML: {0}")]
	Format(String),

	#[error("element <{0}> not found in document")]
	MissingElement(&'static str),
}

pub type Result<T> = std::result::Result<T, DocumentError>;
