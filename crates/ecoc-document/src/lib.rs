// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! IVI document handling.
//!
//! An IVI document is the XML vehicle certificate submitted to the registry.
//! Before submission its `IVIReferenceId` and `VehicleIdentificationNumber`
//! are overwritten and the file is saved in place, keeping its encoding.

pub mod document;
pub mod encoding;
pub mod error;
pub mod xml;

pub use document::{IviDocument, IVI_REFERENCE_ELEMENT, VIN_ELEMENT};
pub use encoding::{DocumentEncoding, TextEncoding};
pub use error::{DocumentError, Result};
