// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ecoc_auth::CredentialProfile;
use ecoc_common_secret::SecretString;
use ecoc_config::EcocConfig;
use ecoc_db::{
	CredentialProfileRepository, SqlitePool, SubmissionRecord, SubmissionRepository,
};
use ecoc_registry::{pretty_body, FeeClassification};
use ecoc_workflow::{
	AssumeYes, Confirmation, DeletionWorkflow, LedgerState, SigningPaths, SubmissionInput,
	SubmissionWorkflow, WorkflowContext, WorkflowError,
};
use tracing::info;

use crate::args::{SettingsArgs, SubmitArgs};
use crate::prompt::TerminalConfirmation;

/// Open (creating if needed) the database and apply the schema.
pub async fn open_database(config: &EcocConfig) -> Result<SqlitePool> {
	if let Some(parent) = config.database_path.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent)
				.with_context(|| format!("failed to create {}", parent.display()))?;
		}
	}
	let pool = ecoc_db::create_pool(&config.database_url())
		.await
		.with_context(|| format!("failed to open {}", config.database_path.display()))?;
	ecoc_db::run_migrations(&pool)
		.await
		.context("failed to prepare database schema")?;
	Ok(pool)
}

fn context(config: &EcocConfig, pool: &SqlitePool) -> Result<WorkflowContext> {
	let http = ecoc_common_http::new_client(config.http).context("failed to build HTTP client")?;
	Ok(WorkflowContext {
		profiles: Arc::new(CredentialProfileRepository::new(pool.clone())),
		ledger: Arc::new(SubmissionRepository::new(pool.clone())),
		http,
		signing: SigningPaths {
			private_key_path: config.private_key_path.clone(),
			certificate_path: config.certificate_path.clone(),
		},
	})
}

fn confirmation(yes: bool) -> Box<dyn Confirmation> {
	if yes {
		Box::new(AssumeYes)
	} else {
		Box::new(TerminalConfirmation)
	}
}

pub async fn settings_show(pool: &SqlitePool) -> Result<()> {
	let repo = CredentialProfileRepository::new(pool.clone());
	match repo.get_profile().await? {
		Some(profile) => {
			println!("issuer:                  {}", profile.issuer);
			println!("audience:                {}", profile.audience);
			println!("resource:                {}", profile.resource);
			println!("scope:                   {}", profile.scope);
			println!("keystore_password:       {}", profile.keystore_password);
			println!("keystore_alias:          {}", profile.keystore_alias);
			println!("keystore_alias_password: {}", profile.keystore_alias_password);
		}
		None => println!("No credential profile saved. Use `ecoc settings set --issuer <id>`."),
	}
	Ok(())
}

pub async fn settings_set(pool: &SqlitePool, args: SettingsArgs) -> Result<()> {
	let profile = CredentialProfile {
		issuer: args.issuer,
		audience: args.audience.unwrap_or_default(),
		resource: args.resource.unwrap_or_default(),
		scope: args.scope.unwrap_or_default(),
		keystore_password: SecretString::new(args.keystore_password.unwrap_or_default()),
		keystore_alias: args.keystore_alias.unwrap_or_default(),
		keystore_alias_password: SecretString::new(args.keystore_alias_password.unwrap_or_default()),
	};
	if profile.issuer.trim().is_empty() {
		bail!("issuer must not be empty");
	}

	CredentialProfileRepository::new(pool.clone())
		.replace_profile(&profile)
		.await?;
	println!("Settings saved.");
	Ok(())
}

pub async fn submit(config: &EcocConfig, pool: &SqlitePool, args: SubmitArgs) -> Result<()> {
	let input = SubmissionInput {
		document_path: args.document,
		ivi_reference: args.reference,
		vin: args.vin,
		fees: FeeClassification {
			avgifts_kode: args.fee_code,
			sitteplasser_norsk_godkjenning: args.seats,
			sengeplasser_campingbil: args.berths,
		},
	};

	let mut workflow = SubmissionWorkflow::new(context(config, pool)?);
	let confirm = confirmation(args.yes);
	let outcome = match workflow.run(input, confirm.as_ref()).await {
		Ok(outcome) => outcome,
		Err(err) => {
			if workflow.remote_outcome_unknown() {
				eprintln!(
					"WARNING: the submission request failed in transit and may have reached the registry.\n\
					 Check the registry before resubmitting."
				);
			}
			return Err(report_rejection(err));
		}
	};

	println!("IVI reference: {}", outcome.ivi_reference);
	println!("VIN:           {}", outcome.vin);
	println!("{}", outcome.status_line);
	println!("Vegvesen Response:\n{}", outcome.pretty_body);

	match outcome.ledger {
		LedgerState::Recorded(record) => {
			info!(ivi_reference = %record.ivi_reference, "submission recorded");
			Ok(())
		}
		LedgerState::OutOfSync(err) => {
			eprintln!(
				"WARNING: the registry accepted the submission but the local ledger is out of sync.\n\
				 Record it manually: iviReferanse={} understellsnummer={} datoTid={} meldingstekst={}",
				outcome.acknowledgment.ivi_reference,
				outcome.acknowledgment.vehicle_identification_number,
				outcome.acknowledgment.timestamp,
				outcome.acknowledgment.message_text,
			);
			Err(err.into())
		}
	}
}

pub async fn delete(config: &EcocConfig, pool: &SqlitePool, vin: &str, yes: bool) -> Result<()> {
	let mut workflow = DeletionWorkflow::new(context(config, pool)?);
	let confirm = confirmation(yes);
	let outcome = match workflow.run(vin, confirm.as_ref()).await {
		Ok(outcome) => outcome,
		Err(err) => return Err(report_rejection(err)),
	};

	println!("{}", outcome.status_line);
	println!("Vegvesen Response:\n{}", outcome.pretty_body);

	if let Some(err) = outcome.ledger_error {
		eprintln!(
			"WARNING: the registry deleted VIN {} but the local ledger still holds it.",
			outcome.vin
		);
		return Err(err.into());
	}
	if outcome.removed {
		println!("Deleted entry with VIN: {}", outcome.vin);
	} else {
		println!("VIN {} was not in the local ledger.", outcome.vin);
	}
	Ok(())
}

/// Print the remote status and body of a rejection before it becomes the
/// process error.
fn report_rejection(err: WorkflowError) -> anyhow::Error {
	match &err {
		WorkflowError::Registry { status, body } | WorkflowError::Auth { status, body } => {
			println!("HTTP Status Code: {status}");
			println!("Vegvesen Response:\n{}", pretty_body(body));
		}
		_ => {}
	}
	err.into()
}

pub async fn list(pool: &SqlitePool) -> Result<()> {
	let records = SubmissionRepository::new(pool.clone()).list_submissions().await?;
	print_records(&records);
	Ok(())
}

pub async fn search(pool: &SqlitePool, term: &str) -> Result<()> {
	let records = SubmissionRepository::new(pool.clone())
		.search_submissions(term)
		.await?;
	print_records(&records);
	Ok(())
}

pub async fn show(pool: &SqlitePool, vin: &str) -> Result<()> {
	match SubmissionRepository::new(pool.clone())
		.get_document_by_vin(vin)
		.await?
	{
		Some(document) => {
			println!("{document}");
			Ok(())
		}
		None => bail!("no submission recorded for VIN {vin}"),
	}
}

fn print_records(records: &[SubmissionRecord]) {
	if records.is_empty() {
		println!("No submissions.");
		return;
	}
	println!(
		"{:<38} {:<20} {:<32} {}",
		"IVI REFERENCE", "VIN", "DATO/TID", "MELDING"
	);
	for r in records {
		println!(
			"{:<38} {:<20} {:<32} {}",
			r.ivi_reference, r.vehicle_identification_number, r.response_timestamp, r.message_text
		);
	}
}
