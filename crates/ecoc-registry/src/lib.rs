// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the vehicle registry's pre-registration API.
//!
//! Responses are typed: a submission is either
//! [`SubmissionResponse::Accepted`] with its parsed [`Acknowledgment`] or
//! [`SubmissionResponse::Rejected`] with the status and body verbatim.

pub mod client;
pub mod error;
pub mod types;

pub use client::RegistryClient;
pub use error::RegistryError;
pub use types::{
	pretty_body, Acknowledgment, FeeClassification, IviPayload, RawResponse, SubmissionRequest,
	SubmissionResponse,
};
