// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ecoc_common_http::HttpTimeouts;
use ecoc_db::{
	CredentialProfileRepository, DbError, NewSubmission, SubmissionRecord, SubmissionRepository,
	SubmissionStore,
};
use ecoc_document::DocumentEncoding;
use ecoc_registry::FeeClassification;
use ecoc_workflow::{SigningPaths, SubmissionInput, WorkflowContext};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VIN: &str = "ABC123";
pub const REFERENCE: &str = "11111111-1111-1111-1111-111111111111";
pub const SUBMIT_PATH: &str =
	"/ws/no/vegvesen/kjoretoy/felles/innmelding/meldingompreregistrering/v1/opprette";
pub const DELETE_PREFIX: &str =
	"/ws/no/vegvesen/kjoretoy/felles/innmelding/meldingompreregistrering/v1/slette/understellsnummer/";

pub const DOCUMENT: &str = "<?xml version=\"1.0\" encoding=\"utf-16\"?>\n<IVI>\n  <IVIReferenceId>placeholder</IVIReferenceId>\n  <VehicleIdentificationNumber>ABC123</VehicleIdentificationNumber>\n</IVI>\n";

pub struct Harness {
	pub server: MockServer,
	pub dir: TempDir,
	pub ledger: SubmissionRepository,
	pub signing: SigningPaths,
	pub http: reqwest::Client,
	pub document_path: PathBuf,
	profiles: CredentialProfileRepository,
}

impl Harness {
	pub async fn new() -> Self {
		let server = MockServer::start().await;
		let dir = tempfile::tempdir().unwrap();
		let pool = ecoc_db::testing::create_test_pool().await;

		let profiles = CredentialProfileRepository::new(pool.clone());
		let profile = ecoc_auth::testing::profile(&format!("{}/", server.uri()), &server.uri());
		profiles.replace_profile(&profile).await.unwrap();

		let (private_key_path, certificate_path) =
			ecoc_auth::testing::write_signing_files(dir.path());

		let document_path = dir.path().join("ivi.xml");
		std::fs::write(&document_path, DocumentEncoding::UTF16LE_BOM.encode(DOCUMENT)).unwrap();

		Self {
			server,
			dir,
			ledger: SubmissionRepository::new(pool),
			signing: SigningPaths {
				private_key_path,
				certificate_path,
			},
			http: ecoc_common_http::new_client(HttpTimeouts::default()).unwrap(),
			document_path,
			profiles,
		}
	}

	pub fn context(&self) -> WorkflowContext {
		self.context_with_ledger(Arc::new(self.ledger.clone()))
	}

	pub fn context_with_ledger(&self, ledger: Arc<dyn SubmissionStore>) -> WorkflowContext {
		WorkflowContext {
			profiles: Arc::new(self.profiles.clone()),
			ledger,
			http: self.http.clone(),
			signing: self.signing.clone(),
		}
	}

	pub fn input(&self) -> SubmissionInput {
		SubmissionInput {
			document_path: self.document_path.clone(),
			ivi_reference: Some(REFERENCE.to_string()),
			vin: Some(VIN.to_string()),
			fees: fees(),
		}
	}

	pub async fn mount_token(&self, expected_calls: u64) {
		Mock::given(method("POST"))
			.and(path("/token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
			.expect(expected_calls)
			.mount(&self.server)
			.await;
	}

	pub async fn mount_submit(&self, response: ResponseTemplate, expected_calls: u64) {
		Mock::given(method("POST"))
			.and(path(SUBMIT_PATH))
			.respond_with(response)
			.expect(expected_calls)
			.mount(&self.server)
			.await;
	}

	pub async fn mount_delete(&self, response: ResponseTemplate, expected_calls: u64) {
		Mock::given(method("DELETE"))
			.and(path_regex(format!("^{DELETE_PREFIX}.+$")))
			.respond_with(response)
			.expect(expected_calls)
			.mount(&self.server)
			.await;
	}

	/// Number of requests the mock server saw.
	pub async fn request_count(&self) -> usize {
		self.server.received_requests().await.map(|r| r.len()).unwrap_or(0)
	}
}

pub fn fees() -> FeeClassification {
	FeeClassification {
		avgifts_kode: "1".to_string(),
		sitteplasser_norsk_godkjenning: "5".to_string(),
		sengeplasser_campingbil: "0".to_string(),
	}
}

pub fn acknowledgment(reference: &str, vin: &str) -> serde_json::Value {
	json!({
		"iviIdentifikator": {
			"iviReferanse": reference,
			"understellsnummerMerke": {"understellsnummer": vin}
		},
		"datoTid": "2024-05-01T10:00:00.000+02:00",
		"melding": {"meldingstekst": "Kjøretøy mottatt"}
	})
}

pub fn accepted() -> ResponseTemplate {
	ResponseTemplate::new(200).set_body_json(acknowledgment(REFERENCE, VIN))
}

/// Reports no duplicates and fails every write.
pub struct FailingLedger;

#[async_trait]
impl SubmissionStore for FailingLedger {
	async fn create_submission(&self, _: &NewSubmission) -> Result<SubmissionRecord, DbError> {
		Err(DbError::Internal("disk I/O error".to_string()))
	}
	async fn reference_exists(&self, _: &str) -> Result<bool, DbError> {
		Ok(false)
	}
	async fn vin_exists(&self, _: &str) -> Result<bool, DbError> {
		Ok(false)
	}
	async fn get_submission_by_vin(&self, _: &str) -> Result<Option<SubmissionRecord>, DbError> {
		Ok(None)
	}
	async fn get_submission_by_reference(
		&self,
		_: &str,
	) -> Result<Option<SubmissionRecord>, DbError> {
		Ok(None)
	}
	async fn get_document_by_vin(&self, _: &str) -> Result<Option<String>, DbError> {
		Ok(None)
	}
	async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, DbError> {
		Ok(Vec::new())
	}
	async fn search_submissions(&self, _: &str) -> Result<Vec<SubmissionRecord>, DbError> {
		Ok(Vec::new())
	}
	async fn delete_submission_by_vin(&self, _: &str) -> Result<bool, DbError> {
		Err(DbError::Internal("disk I/O error".to_string()))
	}
}
