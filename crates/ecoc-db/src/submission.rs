// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Submission ledger repository.
//!
//! One row per submission the registry acknowledged. `ivi_reference` and
//! `vehicle_identification_number` are each unique; the indexes back the
//! duplicate pre-check performed by the submission workflow.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

/// A recorded submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
	pub ivi_reference: String,
	pub vehicle_identification_number: String,
	/// `datoTid` from the acknowledgment, verbatim.
	pub response_timestamp: String,
	pub message_text: String,
	/// The document as submitted (after reference/VIN rewriting).
	pub raw_document: String,
	pub recorded_at: DateTime<Utc>,
}

/// Fields supplied when recording a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
	pub ivi_reference: String,
	pub vehicle_identification_number: String,
	pub response_timestamp: String,
	pub message_text: String,
	pub raw_document: String,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
	async fn create_submission(&self, submission: &NewSubmission) -> Result<SubmissionRecord, DbError>;
	async fn reference_exists(&self, ivi_reference: &str) -> Result<bool, DbError>;
	async fn vin_exists(&self, vin: &str) -> Result<bool, DbError>;
	async fn get_submission_by_vin(&self, vin: &str) -> Result<Option<SubmissionRecord>, DbError>;
	async fn get_submission_by_reference(
		&self,
		ivi_reference: &str,
	) -> Result<Option<SubmissionRecord>, DbError>;
	async fn get_document_by_vin(&self, vin: &str) -> Result<Option<String>, DbError>;
	async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, DbError>;
	async fn search_submissions(&self, term: &str) -> Result<Vec<SubmissionRecord>, DbError>;
	async fn delete_submission_by_vin(&self, vin: &str) -> Result<bool, DbError>;
}

#[async_trait]
impl SubmissionStore for SubmissionRepository {
	async fn create_submission(&self, submission: &NewSubmission) -> Result<SubmissionRecord, DbError> {
		self.create_submission(submission).await
	}

	async fn reference_exists(&self, ivi_reference: &str) -> Result<bool, DbError> {
		self.reference_exists(ivi_reference).await
	}

	async fn vin_exists(&self, vin: &str) -> Result<bool, DbError> {
		self.vin_exists(vin).await
	}

	async fn get_submission_by_vin(&self, vin: &str) -> Result<Option<SubmissionRecord>, DbError> {
		self.get_submission_by_vin(vin).await
	}

	async fn get_submission_by_reference(
		&self,
		ivi_reference: &str,
	) -> Result<Option<SubmissionRecord>, DbError> {
		self.get_submission_by_reference(ivi_reference).await
	}

	async fn get_document_by_vin(&self, vin: &str) -> Result<Option<String>, DbError> {
		self.get_document_by_vin(vin).await
	}

	async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, DbError> {
		self.list_submissions().await
	}

	async fn search_submissions(&self, term: &str) -> Result<Vec<SubmissionRecord>, DbError> {
		self.search_submissions(term).await
	}

	async fn delete_submission_by_vin(&self, vin: &str) -> Result<bool, DbError> {
		self.delete_submission_by_vin(vin).await
	}
}

/// Repository for the submission ledger.
#[derive(Clone)]
pub struct SubmissionRepository {
	pool: SqlitePool,
}

const SELECT_COLUMNS: &str = r#"
	SELECT ivi_reference, vehicle_identification_number, response_timestamp,
	       message_text, raw_document, recorded_at
	FROM submissions
"#;

impl SubmissionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Record an acknowledged submission.
	///
	/// # Database Constraints
	/// - `ivi_reference` must be unique
	/// - `vehicle_identification_number` must be unique
	///
	/// A violation of either is returned as [`DbError::Conflict`].
	#[tracing::instrument(skip(self, submission), fields(ivi_reference = %submission.ivi_reference, vin = %submission.vehicle_identification_number))]
	pub async fn create_submission(&self, submission: &NewSubmission) -> Result<SubmissionRecord, DbError> {
		let recorded_at = Utc::now().trunc_subsecs(6);

		sqlx::query(
			r#"
			INSERT INTO submissions (
				ivi_reference, vehicle_identification_number, response_timestamp,
				message_text, raw_document, recorded_at
			) VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&submission.ivi_reference)
		.bind(&submission.vehicle_identification_number)
		.bind(&submission.response_timestamp)
		.bind(&submission.message_text)
		.bind(&submission.raw_document)
		.bind(recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "submission"))?;

		tracing::debug!("submission recorded");
		Ok(SubmissionRecord {
			ivi_reference: submission.ivi_reference.clone(),
			vehicle_identification_number: submission.vehicle_identification_number.clone(),
			response_timestamp: submission.response_timestamp.clone(),
			message_text: submission.message_text.clone(),
			raw_document: submission.raw_document.clone(),
			recorded_at,
		})
	}

	#[tracing::instrument(skip(self))]
	pub async fn reference_exists(&self, ivi_reference: &str) -> Result<bool, DbError> {
		let (count,): (i64,) =
			sqlx::query_as("SELECT COUNT(*) FROM submissions WHERE ivi_reference = ?")
				.bind(ivi_reference)
				.fetch_one(&self.pool)
				.await?;
		Ok(count > 0)
	}

	#[tracing::instrument(skip(self))]
	pub async fn vin_exists(&self, vin: &str) -> Result<bool, DbError> {
		let (count,): (i64,) = sqlx::query_as(
			"SELECT COUNT(*) FROM submissions WHERE vehicle_identification_number = ?",
		)
		.bind(vin)
		.fetch_one(&self.pool)
		.await?;
		Ok(count > 0)
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_submission_by_vin(&self, vin: &str) -> Result<Option<SubmissionRecord>, DbError> {
		let row = sqlx::query(&format!(
			"{SELECT_COLUMNS} WHERE vehicle_identification_number = ?"
		))
		.bind(vin)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_submission_row).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_submission_by_reference(
		&self,
		ivi_reference: &str,
	) -> Result<Option<SubmissionRecord>, DbError> {
		let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE ivi_reference = ?"))
			.bind(ivi_reference)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_submission_row).transpose()
	}

	/// The stored document text for `vin`.
	#[tracing::instrument(skip(self))]
	pub async fn get_document_by_vin(&self, vin: &str) -> Result<Option<String>, DbError> {
		let row: Option<(String,)> = sqlx::query_as(
			"SELECT raw_document FROM submissions WHERE vehicle_identification_number = ?",
		)
		.bind(vin)
		.fetch_optional(&self.pool)
		.await?;
		Ok(row.map(|(doc,)| doc))
	}

	/// All submissions, newest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, DbError> {
		let rows = sqlx::query(&format!(
			"{SELECT_COLUMNS} ORDER BY recorded_at DESC, rowid DESC"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_submission_row).collect()
	}

	/// Submissions whose reference or VIN contains `term`, newest first.
	///
	/// `%` and `_` in `term` match literally.
	#[tracing::instrument(skip(self))]
	pub async fn search_submissions(&self, term: &str) -> Result<Vec<SubmissionRecord>, DbError> {
		let pattern = format!("%{}%", escape_like(term));
		let rows = sqlx::query(&format!(
			r#"{SELECT_COLUMNS}
			WHERE ivi_reference LIKE ?1 ESCAPE '\'
			   OR vehicle_identification_number LIKE ?1 ESCAPE '\'
			ORDER BY recorded_at DESC, rowid DESC"#
		))
		.bind(&pattern)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_submission_row).collect()
	}

	/// Remove the submission for `vin`.
	///
	/// # Returns
	/// `true` if a row was deleted.
	#[tracing::instrument(skip(self))]
	pub async fn delete_submission_by_vin(&self, vin: &str) -> Result<bool, DbError> {
		let result =
			sqlx::query("DELETE FROM submissions WHERE vehicle_identification_number = ?")
				.bind(vin)
				.execute(&self.pool)
				.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::info!(vin = %vin, "submission removed from ledger");
		}
		Ok(deleted)
	}
}

fn escape_like(term: &str) -> String {
	let mut escaped = String::with_capacity(term.len());
	for c in term.chars() {
		if matches!(c, '\\' | '%' | '_') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped
}

fn parse_submission_row(row: &sqlx::sqlite::SqliteRow) -> Result<SubmissionRecord, DbError> {
	let recorded_at: String = row.get("recorded_at");
	let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
		.map_err(|e| DbError::Internal(format!("Invalid recorded_at: {e}")))?
		.with_timezone(&Utc);

	Ok(SubmissionRecord {
		ivi_reference: row.get("ivi_reference"),
		vehicle_identification_number: row.get("vehicle_identification_number"),
		response_timestamp: row.get("response_timestamp"),
		message_text: row.get("message_text"),
		raw_document: row.get("raw_document"),
		recorded_at,
	})
}
