// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Submission of an IVI document to the registry.
//!
//! ```text
//! Idle -> CheckingDuplicate -> PreparingDocument -> Authenticating
//!      -> Submitting -> Persisting -> Done
//! ```
//!
//! Any failure moves the workflow to `Aborted`, except a failing ledger
//! write after the registry accepted the document: that run still ends in
//! `Done` and the outcome reports the ledger as out of sync.

use std::fmt;
use std::path::PathBuf;

use ecoc_db::{NewSubmission, SubmissionRecord};
use ecoc_document::IviDocument;
use ecoc_registry::{
	Acknowledgment, FeeClassification, RegistryClient, RegistryError, SubmissionRequest,
	SubmissionResponse,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::confirm::{Confirmation, ConfirmationPrompt};
use crate::context::WorkflowContext;
use crate::error::{DuplicateKey, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
	Idle,
	CheckingDuplicate,
	PreparingDocument,
	Authenticating,
	Submitting,
	Persisting,
	Done,
	Aborted,
}

impl fmt::Display for SubmissionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SubmissionState::Idle => "idle",
			SubmissionState::CheckingDuplicate => "checking_duplicate",
			SubmissionState::PreparingDocument => "preparing_document",
			SubmissionState::Authenticating => "authenticating",
			SubmissionState::Submitting => "submitting",
			SubmissionState::Persisting => "persisting",
			SubmissionState::Done => "done",
			SubmissionState::Aborted => "aborted",
		};
		f.write_str(name)
	}
}

/// What the operator asked to submit.
#[derive(Debug, Clone)]
pub struct SubmissionInput {
	pub document_path: PathBuf,
	/// A fresh UUIDv4 is used when absent.
	pub ivi_reference: Option<String>,
	/// Read from the document when absent.
	pub vin: Option<String>,
	pub fees: FeeClassification,
}

/// State of the local ledger after the registry accepted a submission.
#[derive(Debug)]
pub enum LedgerState {
	Recorded(SubmissionRecord),
	/// The registry holds a submission the ledger does not. Always
	/// [`WorkflowError::LedgerWrite`].
	OutOfSync(WorkflowError),
}

/// Result of a run that reached the registry and got HTTP 200.
#[derive(Debug)]
pub struct SubmissionOutcome {
	pub ivi_reference: String,
	pub vin: String,
	pub status_line: String,
	pub pretty_body: String,
	pub acknowledgment: Acknowledgment,
	pub ledger: LedgerState,
}

impl SubmissionOutcome {
	pub fn is_in_sync(&self) -> bool {
		matches!(self.ledger, LedgerState::Recorded(_))
	}
}

pub struct SubmissionWorkflow {
	ctx: WorkflowContext,
	state: SubmissionState,
	remote_outcome_unknown: bool,
}

impl SubmissionWorkflow {
	pub fn new(ctx: WorkflowContext) -> Self {
		Self {
			ctx,
			state: SubmissionState::Idle,
			remote_outcome_unknown: false,
		}
	}

	pub fn state(&self) -> SubmissionState {
		self.state
	}

	/// True when the submit request failed in transport, so the registry
	/// may or may not have accepted the document.
	pub fn remote_outcome_unknown(&self) -> bool {
		self.remote_outcome_unknown
	}

	fn enter(&mut self, state: SubmissionState) {
		info!(from = %self.state, to = %state, "submission state");
		self.state = state;
	}

	/// Run the workflow to completion.
	///
	/// # Errors
	/// Every error leaves the workflow in [`SubmissionState::Aborted`] with
	/// nothing written to the ledger.
	#[instrument(skip_all, fields(document = %input.document_path.display()))]
	pub async fn run(
		&mut self,
		input: SubmissionInput,
		confirmation: &dyn Confirmation,
	) -> Result<SubmissionOutcome, WorkflowError> {
		match self.execute(input, confirmation).await {
			Ok(outcome) => {
				self.enter(SubmissionState::Done);
				Ok(outcome)
			}
			Err(err) => {
				warn!(state = %self.state, error = %err, "submission aborted");
				self.enter(SubmissionState::Aborted);
				Err(err)
			}
		}
	}

	async fn execute(
		&mut self,
		input: SubmissionInput,
		confirmation: &dyn Confirmation,
	) -> Result<SubmissionOutcome, WorkflowError> {
		self.remote_outcome_unknown = false;
		self.enter(SubmissionState::CheckingDuplicate);
		let mut document = IviDocument::load(&input.document_path)?;

		let ivi_reference = input
			.ivi_reference
			.map(|r| r.trim().to_string())
			.filter(|r| !r.is_empty())
			.unwrap_or_else(|| Uuid::new_v4().to_string());
		let vin = match input.vin.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
			Some(vin) => vin,
			None => document.vehicle_identification_number()?,
		};

		if self.ctx.ledger.reference_exists(&ivi_reference).await? {
			return Err(WorkflowError::Duplicate {
				key: DuplicateKey::IviReference,
				value: ivi_reference,
			});
		}
		if self.ctx.ledger.vin_exists(&vin).await? {
			return Err(WorkflowError::Duplicate {
				key: DuplicateKey::VehicleIdentificationNumber,
				value: vin,
			});
		}

		let prompt = ConfirmationPrompt::Submit {
			ivi_reference: ivi_reference.clone(),
			vin: vin.clone(),
		};
		if !confirmation.confirm(&prompt) {
			return Err(WorkflowError::Cancelled);
		}

		self.enter(SubmissionState::PreparingDocument);
		document.prepare(&ivi_reference, &vin)?;

		self.enter(SubmissionState::Authenticating);
		let (profile, token) = self.ctx.authenticate().await?;
		let registry = RegistryClient::new(self.ctx.http.clone(), &profile.resource)?;

		self.enter(SubmissionState::Submitting);
		let request = SubmissionRequest::new(document.text(), &ivi_reference, input.fees);
		let response = match registry.submit(&token, &request).await {
			Ok(response) => response,
			Err(e @ RegistryError::Transport(_)) => {
				self.remote_outcome_unknown = true;
				warn!(
					error = %e,
					ivi_reference = %ivi_reference,
					vin = %vin,
					"registry outcome unknown; check the registry before resubmitting"
				);
				return Err(e.into());
			}
			Err(e) => return Err(e.into()),
		};
		let (acknowledgment, raw) = match response {
			SubmissionResponse::Accepted { acknowledgment, raw } => (acknowledgment, raw),
			SubmissionResponse::Rejected(raw) => {
				return Err(WorkflowError::Registry {
					status: raw.status,
					body: raw.body,
				});
			}
		};

		self.enter(SubmissionState::Persisting);
		let record = NewSubmission {
			ivi_reference: acknowledgment.ivi_reference.clone(),
			vehicle_identification_number: acknowledgment.vehicle_identification_number.clone(),
			response_timestamp: acknowledgment.timestamp.clone(),
			message_text: acknowledgment.message_text.clone(),
			raw_document: document.text().to_string(),
		};
		let ledger = match self.ctx.ledger.create_submission(&record).await {
			Ok(stored) => LedgerState::Recorded(stored),
			Err(e) => {
				error!(
					error = %e,
					ivi_reference = %acknowledgment.ivi_reference,
					vin = %acknowledgment.vehicle_identification_number,
					dato_tid = %acknowledgment.timestamp,
					meldingstekst = %acknowledgment.message_text,
					body = %raw.body,
					"registry accepted the submission but the ledger write failed; reconcile manually"
				);
				LedgerState::OutOfSync(WorkflowError::LedgerWrite(e))
			}
		};

		Ok(SubmissionOutcome {
			ivi_reference,
			vin,
			status_line: raw.status_line(),
			pretty_body: raw.pretty_body(),
			acknowledgment,
			ledger,
		})
	}
}
