// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Withdrawal of a submission from the registry.
//!
//! The ledger record is removed only after the registry answers HTTP 200.

use std::fmt;

use ecoc_registry::RegistryClient;
use tracing::{error, info, instrument, warn};

use crate::confirm::{Confirmation, ConfirmationPrompt};
use crate::context::WorkflowContext;
use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
	Idle,
	Authenticating,
	Deleting,
	Removing,
	Done,
	Aborted,
}

impl fmt::Display for DeletionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			DeletionState::Idle => "idle",
			DeletionState::Authenticating => "authenticating",
			DeletionState::Deleting => "deleting",
			DeletionState::Removing => "removing",
			DeletionState::Done => "done",
			DeletionState::Aborted => "aborted",
		};
		f.write_str(name)
	}
}

#[derive(Debug)]
pub struct DeletionOutcome {
	pub vin: String,
	pub status_line: String,
	pub pretty_body: String,
	/// Whether a ledger record was removed. `false` when the VIN was not in
	/// the ledger.
	pub removed: bool,
	/// Set when the registry deleted the submission but the ledger could not
	/// be updated. Always [`WorkflowError::LedgerWrite`].
	pub ledger_error: Option<WorkflowError>,
}

pub struct DeletionWorkflow {
	ctx: WorkflowContext,
	state: DeletionState,
}

impl DeletionWorkflow {
	pub fn new(ctx: WorkflowContext) -> Self {
		Self {
			ctx,
			state: DeletionState::Idle,
		}
	}

	pub fn state(&self) -> DeletionState {
		self.state
	}

	fn enter(&mut self, state: DeletionState) {
		info!(from = %self.state, to = %state, "deletion state");
		self.state = state;
	}

	#[instrument(skip(self, confirmation))]
	pub async fn run(
		&mut self,
		vin: &str,
		confirmation: &dyn Confirmation,
	) -> Result<DeletionOutcome, WorkflowError> {
		match self.execute(vin.trim(), confirmation).await {
			Ok(outcome) => {
				self.enter(DeletionState::Done);
				Ok(outcome)
			}
			Err(err) => {
				warn!(state = %self.state, error = %err, "deletion aborted");
				self.enter(DeletionState::Aborted);
				Err(err)
			}
		}
	}

	async fn execute(
		&mut self,
		vin: &str,
		confirmation: &dyn Confirmation,
	) -> Result<DeletionOutcome, WorkflowError> {
		if vin.is_empty() {
			return Err(WorkflowError::Configuration("VIN is empty".to_string()));
		}
		let prompt = ConfirmationPrompt::Delete {
			vin: vin.to_string(),
		};
		if !confirmation.confirm(&prompt) {
			return Err(WorkflowError::Cancelled);
		}

		self.enter(DeletionState::Authenticating);
		let (profile, token) = self.ctx.authenticate().await?;
		let registry = RegistryClient::new(self.ctx.http.clone(), &profile.resource)?;

		self.enter(DeletionState::Deleting);
		let raw = registry.delete(&token, vin).await?;
		if !raw.is_success() {
			return Err(WorkflowError::Registry {
				status: raw.status,
				body: raw.body,
			});
		}

		self.enter(DeletionState::Removing);
		let (removed, ledger_error) = match self.ctx.ledger.delete_submission_by_vin(vin).await {
			Ok(removed) => (removed, None),
			Err(e) => {
				error!(error = %e, vin = %vin, "registry deleted the submission but the ledger still holds it");
				(false, Some(WorkflowError::LedgerWrite(e)))
			}
		};

		Ok(DeletionOutcome {
			vin: vin.to_string(),
			status_line: raw.status_line(),
			pretty_body: raw.pretty_body(),
			removed,
			ledger_error,
		})
	}
}
