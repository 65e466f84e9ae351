// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator workflows: submitting an IVI document and withdrawing one.
//!
//! Both workflows re-read the credential profile and signing files and
//! acquire a fresh token on every run. Neither retries anything.

pub mod confirm;
pub mod context;
pub mod deletion;
pub mod error;
pub mod submission;

pub use confirm::{AssumeYes, Confirmation, ConfirmationPrompt};
pub use context::{SigningPaths, WorkflowContext};
pub use deletion::{DeletionOutcome, DeletionState, DeletionWorkflow};
pub use error::{DuplicateKey, WorkflowError};
pub use submission::{
	LedgerState, SubmissionInput, SubmissionOutcome, SubmissionState, SubmissionWorkflow,
};
