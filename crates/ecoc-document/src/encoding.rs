// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Byte-level encoding of IVI documents.
//!
//! Documents exported by the certificate tooling are usually UTF-16LE with a
//! BOM. The encoding found on load is reused on save so the file keeps its
//! 16-bit form.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{DocumentError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
	Utf8,
	Utf16Le,
	Utf16Be,
}

/// The detected encoding plus whether the file started with a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentEncoding {
	pub encoding: TextEncoding,
	pub bom: bool,
}

impl DocumentEncoding {
	pub const UTF8: Self = Self {
		encoding: TextEncoding::Utf8,
		bom: false,
	};
	pub const UTF16LE_BOM: Self = Self {
		encoding: TextEncoding::Utf16Le,
		bom: true,
	};

	/// Sniff the encoding from a BOM, or from the zero byte pattern of a
	/// leading `<` when no BOM is present.
	pub fn detect(bytes: &[u8]) -> Self {
		if let Some((enc, _)) = Encoding::for_bom(bytes) {
			let encoding = if enc == UTF_16LE {
				TextEncoding::Utf16Le
			} else if enc == UTF_16BE {
				TextEncoding::Utf16Be
			} else {
				TextEncoding::Utf8
			};
			return Self { encoding, bom: true };
		}

		let encoding = match bytes {
			[b, 0, ..] if *b != 0 => TextEncoding::Utf16Le,
			[0, b, ..] if *b != 0 => TextEncoding::Utf16Be,
			_ => TextEncoding::Utf8,
		};
		Self {
			encoding,
			bom: false,
		}
	}

	fn codec(&self) -> &'static Encoding {
		match self.encoding {
			TextEncoding::Utf8 => UTF_8,
			TextEncoding::Utf16Le => UTF_16LE,
			TextEncoding::Utf16Be => UTF_16BE,
		}
	}

	fn label(&self) -> &'static str {
		match self.encoding {
			TextEncoding::Utf8 => "UTF-8",
			TextEncoding::Utf16Le => "UTF-16LE",
			TextEncoding::Utf16Be => "UTF-16BE",
		}
	}

	fn bom_len(&self) -> usize {
		match (self.bom, self.encoding) {
			(false, _) => 0,
			(true, TextEncoding::Utf8) => 3,
			(true, _) => 2,
		}
	}

	/// Decode `bytes`. Malformed sequences are an error, never replaced.
	pub fn decode(&self, bytes: &[u8]) -> Result<String> {
		let body = bytes.get(self.bom_len()..).unwrap_or_default();
		self
			.codec()
			.decode_without_bom_handling_and_without_replacement(body)
			.map(|text| text.into_owned())
			.ok_or(DocumentError::Encoding(self.label()))
	}

	/// Encode `text`, restoring the BOM if the source had one.
	pub fn encode(&self, text: &str) -> Vec<u8> {
		match self.encoding {
			TextEncoding::Utf8 => {
				let mut out = Vec::with_capacity(text.len() + 3);
				if self.bom {
					out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
				}
				out.extend_from_slice(text.as_bytes());
				out
			}
			TextEncoding::Utf16Le => utf16(text, self.bom, u16::to_le_bytes),
			TextEncoding::Utf16Be => utf16(text, self.bom, u16::to_be_bytes),
		}
	}
}

fn utf16(text: &str, bom: bool, to_bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
	let mut out = Vec::with_capacity(text.len() * 2 + 2);
	if bom {
		out.extend_from_slice(&to_bytes(0xFEFF));
	}
	for unit in text.encode_utf16() {
		out.extend_from_slice(&to_bytes(unit));
	}
	out
}
