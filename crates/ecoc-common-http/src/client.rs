// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP client with a consistent User-Agent and explicit timeouts.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Timeouts applied to every outbound request.
///
/// A request that exceeds either bound fails with a reqwest timeout error,
/// which callers surface as a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
	pub connect: Duration,
	pub request: Duration,
}

impl Default for HttpTimeouts {
	fn default() -> Self {
		Self {
			connect: Duration::from_secs(10),
			request: Duration::from_secs(30),
		}
	}
}

/// Creates a client builder with the standard ecoc User-Agent and the given
/// timeouts.
pub fn builder(timeouts: HttpTimeouts) -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.connect_timeout(timeouts.connect)
		.timeout(timeouts.request)
}

/// Builds a ready client.
///
/// # Errors
/// Fails only when the TLS backend cannot be initialised.
pub fn new_client(timeouts: HttpTimeouts) -> Result<Client, reqwest::Error> {
	let client = builder(timeouts).build()?;
	tracing::debug!(
		connect_ms = timeouts.connect.as_millis() as u64,
		request_ms = timeouts.request.as_millis() as u64,
		"http client built"
	);
	Ok(client)
}

/// Returns the User-Agent string: `ecoc/{version} ({os}-{arch})`.
pub fn user_agent() -> String {
	format!(
		"ecoc/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}
