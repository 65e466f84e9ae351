// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Credential profile repository.
//!
//! The table holds at most one row. Saving replaces it wholesale inside a
//! transaction, so readers see either the old profile or the new one.

use async_trait::async_trait;
use chrono::Utc;
use ecoc_auth::CredentialProfile;
use ecoc_common_secret::SecretString;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

#[async_trait]
pub trait CredentialProfileStore: Send + Sync {
	async fn get_profile(&self) -> Result<Option<CredentialProfile>, DbError>;
	async fn replace_profile(&self, profile: &CredentialProfile) -> Result<(), DbError>;
}

#[async_trait]
impl CredentialProfileStore for CredentialProfileRepository {
	async fn get_profile(&self) -> Result<Option<CredentialProfile>, DbError> {
		self.get_profile().await
	}

	async fn replace_profile(&self, profile: &CredentialProfile) -> Result<(), DbError> {
		self.replace_profile(profile).await
	}
}

/// Repository for the singleton credential profile.
#[derive(Clone)]
pub struct CredentialProfileRepository {
	pool: SqlitePool,
}

impl CredentialProfileRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Load the active profile.
	///
	/// # Returns
	/// `None` when no profile has been saved yet.
	#[tracing::instrument(skip(self))]
	pub async fn get_profile(&self) -> Result<Option<CredentialProfile>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT issuer, audience, resource, scope,
			       keystore_password, keystore_alias, keystore_alias_password
			FROM credential_profile
			WHERE id = 1
			"#,
		)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(|row| CredentialProfile {
			issuer: row.get("issuer"),
			audience: row.get("audience"),
			resource: row.get("resource"),
			scope: row.get("scope"),
			keystore_password: SecretString::new(row.get("keystore_password")),
			keystore_alias: row.get("keystore_alias"),
			keystore_alias_password: SecretString::new(row.get("keystore_alias_password")),
		}))
	}

	/// Replace the active profile. Blank fields are stored as their defaults.
	#[tracing::instrument(skip(self, profile), fields(issuer = %profile.issuer))]
	pub async fn replace_profile(&self, profile: &CredentialProfile) -> Result<(), DbError> {
		let profile = profile.clone().with_defaults();
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM credential_profile")
			.execute(&mut *tx)
			.await?;

		sqlx::query(
			r#"
			INSERT INTO credential_profile (
				id, issuer, audience, resource, scope,
				keystore_password, keystore_alias, keystore_alias_password, updated_at
			) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&profile.issuer)
		.bind(&profile.audience)
		.bind(&profile.resource)
		.bind(&profile.scope)
		.bind(profile.keystore_password.expose())
		.bind(&profile.keystore_alias)
		.bind(profile.keystore_alias_password.expose())
		.bind(Utc::now().to_rfc3339())
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;
		tracing::info!(issuer = %profile.issuer, "credential profile saved");
		Ok(())
	}
}
