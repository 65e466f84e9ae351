// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for ecoc: the credential profile and the submission
//! ledger.

pub mod error;
pub mod pool;
pub mod profile;
pub mod submission;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use profile::{CredentialProfileRepository, CredentialProfileStore};
pub use submission::{NewSubmission, SubmissionRecord, SubmissionRepository, SubmissionStore};
pub use sqlx::sqlite::SqlitePool;
