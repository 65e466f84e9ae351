// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod common;

use std::sync::Arc;

use common::{FailingLedger, Harness, VIN};
use ecoc_db::NewSubmission;
use ecoc_workflow::{AssumeYes, ConfirmationPrompt, DeletionState, DeletionWorkflow, WorkflowError};
use wiremock::ResponseTemplate;

async fn seed(h: &Harness) {
	for (reference, vin) in [("ref-1", VIN), ("ref-2", "OTHERVIN")] {
		h.ledger
			.create_submission(&NewSubmission {
				ivi_reference: reference.to_string(),
				vehicle_identification_number: vin.to_string(),
				response_timestamp: "t".to_string(),
				message_text: "m".to_string(),
				raw_document: "<IVI/>".to_string(),
			})
			.await
			.unwrap();
	}
}

#[tokio::test]
async fn delete_200_removes_only_matching_vin() {
	let h = Harness::new().await;
	seed(&h).await;
	h.mount_token(1).await;
	h.mount_delete(
		ResponseTemplate::new(200).set_body_string(r#"{"melding":"Slettet"}"#),
		1,
	)
	.await;

	let mut workflow = DeletionWorkflow::new(h.context());
	let outcome = workflow.run(VIN, &AssumeYes).await.unwrap();

	assert_eq!(workflow.state(), DeletionState::Done);
	assert!(outcome.removed);
	assert!(outcome.ledger_error.is_none());
	assert_eq!(outcome.status_line, "HTTP Status Code: 200");
	assert_eq!(outcome.pretty_body, "{\n    \"melding\": \"Slettet\"\n}");
	assert!(!h.ledger.vin_exists(VIN).await.unwrap());
	assert!(h.ledger.vin_exists("OTHERVIN").await.unwrap());

	let requests = h.server.received_requests().await.unwrap();
	let delete = requests.iter().find(|r| r.method.as_str() == "DELETE").unwrap();
	assert!(delete.url.path().ends_with("/slette/understellsnummer/ABC123"));
}

#[tokio::test]
async fn delete_non_200_leaves_ledger_untouched() {
	let h = Harness::new().await;
	seed(&h).await;
	h.mount_token(1).await;
	h.mount_delete(ResponseTemplate::new(404).set_body_string("ikke funnet"), 1)
		.await;
	let before = h.ledger.list_submissions().await.unwrap();

	let mut workflow = DeletionWorkflow::new(h.context());
	let err = workflow.run(VIN, &AssumeYes).await.unwrap_err();

	assert!(matches!(err, WorkflowError::Registry { status: 404, ref body } if body == "ikke funnet"));
	assert_eq!(workflow.state(), DeletionState::Aborted);
	assert_eq!(h.ledger.list_submissions().await.unwrap(), before);
}

#[tokio::test]
async fn declined_deletion_makes_no_request() {
	let h = Harness::new().await;
	seed(&h).await;
	let decline = |prompt: &ConfirmationPrompt| {
		assert_eq!(prompt, &ConfirmationPrompt::Delete { vin: VIN.to_string() });
		false
	};

	let err = DeletionWorkflow::new(h.context())
		.run(VIN, &decline)
		.await
		.unwrap_err();
	assert!(matches!(err, WorkflowError::Cancelled));
	assert_eq!(h.request_count().await, 0);
	assert!(h.ledger.vin_exists(VIN).await.unwrap());
}

#[tokio::test]
async fn delete_of_unrecorded_vin_reports_nothing_removed() {
	let h = Harness::new().await;
	h.mount_token(1).await;
	h.mount_delete(ResponseTemplate::new(200).set_body_string("{}"), 1)
		.await;

	let outcome = DeletionWorkflow::new(h.context())
		.run("NOTRECORDED", &AssumeYes)
		.await
		.unwrap();
	assert!(!outcome.removed);
	assert!(outcome.ledger_error.is_none());
}

#[tokio::test]
async fn empty_vin_is_rejected_before_confirmation() {
	let h = Harness::new().await;
	let never = |_: &ConfirmationPrompt| -> bool { panic!("must not ask") };

	let err = DeletionWorkflow::new(h.context())
		.run("  ", &never)
		.await
		.unwrap_err();
	assert!(matches!(err, WorkflowError::Configuration(_)));
}

#[tokio::test]
async fn delete_ledger_failure_is_done_with_ledger_write() {
	let h = Harness::new().await;
	h.mount_token(1).await;
	h.mount_delete(ResponseTemplate::new(200).set_body_string("{}"), 1)
		.await;

	let mut workflow = DeletionWorkflow::new(h.context_with_ledger(Arc::new(FailingLedger)));
	let outcome = workflow.run(VIN, &AssumeYes).await.unwrap();

	assert_eq!(workflow.state(), DeletionState::Done);
	assert!(!outcome.removed);
	assert!(matches!(outcome.ledger_error, Some(WorkflowError::LedgerWrite(_))));
	assert_eq!(outcome.status_line, "HTTP Status Code: 200");

	let requests = h.server.received_requests().await.unwrap();
	let deletes = requests.iter().filter(|r| r.method.as_str() == "DELETE").count();
	assert_eq!(deletes, 1);
}
