// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types of the pre-registration API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fee classification entered by the operator. All values are digit strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeClassification {
	pub avgifts_kode: String,
	pub sitteplasser_norsk_godkjenning: String,
	pub sengeplasser_campingbil: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IviPayload {
	/// Base64 of the document's UTF-8 bytes.
	pub ivi_dokument: String,
	pub ivi_referanse: String,
}

/// Body of `POST …/opprette`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
	pub ivi: IviPayload,
	pub avgiftsklassifisering: FeeClassification,
}

impl SubmissionRequest {
	pub fn new(document_text: &str, ivi_reference: &str, fees: FeeClassification) -> Self {
		Self {
			ivi: IviPayload {
				ivi_dokument: STANDARD.encode(document_text.as_bytes()),
				ivi_referanse: ivi_reference.to_string(),
			},
			avgiftsklassifisering: fees,
		}
	}
}

/// The fields of an accepted submission that go into the ledger.
///
/// Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acknowledgment {
	pub ivi_reference: String,
	pub vehicle_identification_number: String,
	/// `datoTid`, verbatim.
	pub timestamp: String,
	pub message_text: String,
}

impl Acknowledgment {
	pub fn from_json(value: &Value) -> Self {
		let text = |pointer: &str| match value.pointer(pointer) {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(s)) => s.clone(),
			Some(other) => other.to_string(),
		};
		Self {
			ivi_reference: text("/iviIdentifikator/iviReferanse"),
			vehicle_identification_number: text(
				"/iviIdentifikator/understellsnummerMerke/understellsnummer",
			),
			timestamp: text("/datoTid"),
			message_text: text("/melding/meldingstekst"),
		}
	}

	/// Parse a response body. A body that is not JSON yields all-empty fields.
	pub fn from_body(body: &str) -> Self {
		serde_json::from_str::<Value>(body)
			.map(|v| Self::from_json(&v))
			.unwrap_or_default()
	}
}

/// Status and body of a registry response, body verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
	pub status: u16,
	pub body: String,
}

impl RawResponse {
	pub fn is_success(&self) -> bool {
		self.status == 200
	}

	pub fn status_line(&self) -> String {
		format!("HTTP Status Code: {}", self.status)
	}

	pub fn pretty_body(&self) -> String {
		pretty_body(&self.body)
	}
}

/// Outcome of a submission call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResponse {
	Accepted {
		acknowledgment: Acknowledgment,
		raw: RawResponse,
	},
	Rejected(RawResponse),
}

impl SubmissionResponse {
	pub fn raw(&self) -> &RawResponse {
		match self {
			SubmissionResponse::Accepted { raw, .. } | SubmissionResponse::Rejected(raw) => raw,
		}
	}
}

/// Pretty-print a JSON body with four-space indentation, non-ASCII kept as
/// is. Anything that is not JSON is returned unchanged.
pub fn pretty_body(body: &str) -> String {
	let Ok(value) = serde_json::from_str::<Value>(body) else {
		return body.to_string();
	};

	let mut buf = Vec::with_capacity(body.len() * 2);
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
	if value.serialize(&mut ser).is_err() {
		return body.to_string();
	}
	String::from_utf8(buf).unwrap_or_else(|_| body.to_string())
}
