// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

/// What the operator is asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationPrompt {
	Submit { ivi_reference: String, vin: String },
	Delete { vin: String },
}

impl fmt::Display for ConfirmationPrompt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfirmationPrompt::Submit { ivi_reference, vin } => {
				write!(f, "Submit VIN {vin} with IVI reference {ivi_reference}?")
			}
			ConfirmationPrompt::Delete { vin } => write!(f, "Delete VIN {vin} from the registry?"),
		}
	}
}

/// Asks the operator before an irreversible step.
pub trait Confirmation: Send + Sync {
	fn confirm(&self, prompt: &ConfirmationPrompt) -> bool;
}

impl<F> Confirmation for F
where
	F: Fn(&ConfirmationPrompt) -> bool + Send + Sync,
{
	fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
		self(prompt)
	}
}

/// Approves everything, for non-interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
	fn confirm(&self, _prompt: &ConfirmationPrompt) -> bool {
		true
	}
}
