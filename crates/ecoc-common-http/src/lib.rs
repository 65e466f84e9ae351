// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for ecoc.
//!
//! Every outbound call (token endpoint, registry) goes through a client
//! built here so the User-Agent and the timeouts are applied uniformly.

mod client;

pub use client::{builder, new_client, user_agent, HttpTimeouts};
