// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::{self, BufRead, Write};

use ecoc_workflow::{Confirmation, ConfirmationPrompt};

/// Asks on stderr and reads the answer from stdin.
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
	fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
		let mut stderr = io::stderr();
		if write!(stderr, "{prompt} [y/N] ").and_then(|_| stderr.flush()).is_err() {
			return false;
		}
		let mut answer = String::new();
		if io::stdin().lock().read_line(&mut answer).is_err() {
			return false;
		}
		is_yes(&answer)
	}
}

fn is_yes(answer: &str) -> bool {
	matches!(
		answer.trim().to_ascii_lowercase().as_str(),
		"y" | "yes" | "j" | "ja"
	)
}
