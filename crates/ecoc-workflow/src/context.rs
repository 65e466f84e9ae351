// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::sync::Arc;

use ecoc_auth::{AccessToken, CredentialProfile, SigningMaterial, TokenExchanger};
use ecoc_db::{CredentialProfileStore, SubmissionStore};
use tracing::instrument;

use crate::error::WorkflowError;

/// Where the signing key and certificate live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPaths {
	pub private_key_path: PathBuf,
	pub certificate_path: PathBuf,
}

/// Collaborators shared by the workflows.
#[derive(Clone)]
pub struct WorkflowContext {
	pub profiles: Arc<dyn CredentialProfileStore>,
	pub ledger: Arc<dyn SubmissionStore>,
	pub http: reqwest::Client,
	pub signing: SigningPaths,
}

impl WorkflowContext {
	/// Read the current profile and signing files, then exchange for a token.
	///
	/// Nothing is cached between calls.
	#[instrument(skip(self))]
	pub(crate) async fn authenticate(&self) -> Result<(CredentialProfile, AccessToken), WorkflowError> {
		let profile = self
			.profiles
			.get_profile()
			.await?
			.ok_or_else(|| {
				WorkflowError::Configuration("no credential profile has been saved".to_string())
			})?
			.with_defaults();

		let material =
			SigningMaterial::load(&self.signing.private_key_path, &self.signing.certificate_path)?;

		let token = TokenExchanger::new(self.http.clone())
			.acquire_token(&profile, &material)
			.await?;
		Ok((profile, token))
	}
}
