// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::encoding::DocumentEncoding;
use crate::error::{DocumentError, Result};
use crate::xml::{read_element_text, replace_element_text};

pub const IVI_REFERENCE_ELEMENT: &str = "IVIReferenceId";
pub const VIN_ELEMENT: &str = "VehicleIdentificationNumber";

/// An IVI document loaded from disk.
#[derive(Debug, Clone)]
pub struct IviDocument {
	path: PathBuf,
	encoding: DocumentEncoding,
	text: String,
}

impl IviDocument {
	#[instrument(skip_all, fields(path = %path.as_ref().display()))]
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let encoding = DocumentEncoding::detect(&bytes);
		let text = encoding.decode(&bytes)?;
		debug!(?encoding, chars = text.len(), "document loaded");
		Ok(Self {
			path: path.to_path_buf(),
			encoding,
			text,
		})
	}

	pub fn encoding(&self) -> DocumentEncoding {
		self.encoding
	}

	/// The decoded document text.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn ivi_reference(&self) -> Result<Option<String>> {
		read_element_text(&self.text, IVI_REFERENCE_ELEMENT)
	}

	/// The VIN carried by the document. Absent or blank is an error.
	pub fn vehicle_identification_number(&self) -> Result<String> {
		match read_element_text(&self.text, VIN_ELEMENT)? {
			Some(vin) if !vin.is_empty() => Ok(vin),
			_ => Err(DocumentError::MissingElement(VIN_ELEMENT)),
		}
	}

	/// Set the reference id and VIN in memory. On error the document is
	/// left as it was.
	pub fn rewrite(&mut self, ivi_reference: &str, vin: &str) -> Result<()> {
		self.text = replace_element_text(
			&self.text,
			&[(IVI_REFERENCE_ELEMENT, ivi_reference), (VIN_ELEMENT, vin)],
		)?;
		Ok(())
	}

	/// Write the text back to the file it came from, in its original encoding.
	#[instrument(skip_all, fields(path = %self.path.display()))]
	pub fn save(&self) -> Result<()> {
		std::fs::write(&self.path, self.encoding.encode(&self.text)).map_err(|source| {
			DocumentError::Io {
				path: self.path.clone(),
				source,
			}
		})?;
		debug!("document written back");
		Ok(())
	}

	/// Rewrite the reference id and VIN, then save.
	pub fn prepare(&mut self, ivi_reference: &str, vin: &str) -> Result<()> {
		self.rewrite(ivi_reference, vin)?;
		self.save()
	}
}
