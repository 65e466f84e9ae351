// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use ecoc_auth::AccessToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::RegistryError;
use crate::types::{Acknowledgment, RawResponse, SubmissionRequest, SubmissionResponse};

const API_BASE: [&str; 8] = [
	"ws",
	"no",
	"vegvesen",
	"kjoretoy",
	"felles",
	"innmelding",
	"meldingompreregistrering",
	"v1",
];

/// Client for the pre-registration API under `resource`.
///
/// Each call is a single request; there are no retries.
#[derive(Debug, Clone)]
pub struct RegistryClient {
	http: reqwest::Client,
	base: Url,
}

impl RegistryClient {
	/// `resource` is the registry base URL from the credential profile.
	pub fn new(http: reqwest::Client, resource: &str) -> Result<Self, RegistryError> {
		let base = Url::parse(resource).map_err(|e| RegistryError::InvalidUrl {
			url: resource.to_string(),
			message: e.to_string(),
		})?;
		if base.cannot_be_a_base() {
			return Err(RegistryError::InvalidUrl {
				url: resource.to_string(),
				message: "cannot be a base URL".to_string(),
			});
		}
		Ok(Self { http, base })
	}

	fn endpoint(&self, tail: &[&str]) -> Result<Url, RegistryError> {
		let mut url = self.base.clone();
		{
			let mut segments = url.path_segments_mut().map_err(|_| RegistryError::InvalidUrl {
				url: self.base.to_string(),
				message: "cannot be a base URL".to_string(),
			})?;
			segments.pop_if_empty();
			segments.extend(API_BASE);
			segments.extend(tail);
		}
		Ok(url)
	}

	pub fn submission_url(&self) -> Result<Url, RegistryError> {
		self.endpoint(&["opprette"])
	}

	/// The VIN is percent-encoded as a single path segment.
	pub fn deletion_url(&self, vin: &str) -> Result<Url, RegistryError> {
		self.endpoint(&["slette", "understellsnummer", vin])
	}

	/// Submit a document. Only HTTP 200 counts as accepted.
	#[instrument(skip_all, fields(ivi_reference = %request.ivi.ivi_referanse))]
	pub async fn submit(
		&self,
		token: &AccessToken,
		request: &SubmissionRequest,
	) -> Result<SubmissionResponse, RegistryError> {
		let url = self.submission_url()?;
		debug!(url = %url, "submitting document");

		let response = self
			.http
			.post(url)
			.bearer_auth(token.expose())
			.json(request)
			.send()
			.await
			.map_err(RegistryError::Transport)?;

		let raw = read_raw(response).await?;
		if raw.is_success() {
			let acknowledgment = Acknowledgment::from_body(&raw.body);
			info!(
				ivi_reference = %acknowledgment.ivi_reference,
				vin = %acknowledgment.vehicle_identification_number,
				"submission accepted"
			);
			Ok(SubmissionResponse::Accepted { acknowledgment, raw })
		} else {
			warn!(status = raw.status, "submission rejected");
			Ok(SubmissionResponse::Rejected(raw))
		}
	}

	/// Withdraw the submission for `vin`.
	#[instrument(skip(self, token))]
	pub async fn delete(&self, token: &AccessToken, vin: &str) -> Result<RawResponse, RegistryError> {
		let url = self.deletion_url(vin)?;
		debug!(url = %url, "deleting submission");

		let response = self
			.http
			.delete(url)
			.bearer_auth(token.expose())
			.send()
			.await
			.map_err(RegistryError::Transport)?;

		let raw = read_raw(response).await?;
		if raw.is_success() {
			info!("deletion accepted");
		} else {
			warn!(status = raw.status, "deletion rejected");
		}
		Ok(raw)
	}
}

async fn read_raw(response: reqwest::Response) -> Result<RawResponse, RegistryError> {
	let status = response.status().as_u16();
	let body = response.text().await.map_err(RegistryError::Transport)?;
	debug!(status, body = %body, "registry response");
	Ok(RawResponse { status, body })
}
