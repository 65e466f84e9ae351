// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use ecoc_auth::TokenError;
use ecoc_db::DbError;
use ecoc_document::DocumentError;
use ecoc_registry::RegistryError;

/// The ledger column a duplicate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKey {
	IviReference,
	VehicleIdentificationNumber,
}

impl fmt::Display for DuplicateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DuplicateKey::IviReference => f.write_str("IVI reference"),
			DuplicateKey::VehicleIdentificationNumber => f.write_str("VIN"),
		}
	}
}

/// Every way a workflow run can fail.
///
/// Only [`WorkflowError::Registry`] and [`WorkflowError::LedgerWrite`] can
/// happen after the registry has been contacted with a mutating request.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
	#[error("configuration error: {0}")]
	Configuration(String),

	#[error("signing error: {0}")]
	Signing(String),

	#[error("network error: {0}")]
	Transport(#[source] reqwest::Error),

	#[error("authorization failed (HTTP {status}): {body}")]
	Auth { status: u16, body: String },

	#[error("registry rejected the request (HTTP {status}): {body}")]
	Registry { status: u16, body: String },

	#[error("{key} {value} has already been submitted")]
	Duplicate { key: DuplicateKey, value: String },

	#[error("document error: {0}")]
	DocumentFormat(#[from] DocumentError),

	#[error("failed to read local database: {0}")]
	Ledger(#[source] DbError),

	#[error("registry succeeded but the local ledger was not updated: {0}")]
	LedgerWrite(#[source] DbError),

	#[error("cancelled by operator")]
	Cancelled,
}

impl From<TokenError> for WorkflowError {
	fn from(err: TokenError) -> Self {
		match err {
			TokenError::Configuration(msg) => WorkflowError::Configuration(msg),
			TokenError::Signing(msg) => WorkflowError::Signing(msg),
			TokenError::Transport(e) => WorkflowError::Transport(e),
			TokenError::Auth { status, body } => WorkflowError::Auth { status, body },
		}
	}
}

impl From<RegistryError> for WorkflowError {
	fn from(err: RegistryError) -> Self {
		match err {
			RegistryError::Transport(e) => WorkflowError::Transport(e),
			e @ RegistryError::InvalidUrl { .. } => WorkflowError::Configuration(e.to_string()),
		}
	}
}

impl From<DbError> for WorkflowError {
	fn from(err: DbError) -> Self {
		WorkflowError::Ledger(err)
	}
}
