// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Streaming read and rewrite of element text.
//!
//! Elements are matched by local name, so namespace prefixes do not matter.
//! Only the first occurrence of each name is considered. Everything else in
//! the document is copied through event by event.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{DocumentError, Result};

fn format_err(e: impl std::fmt::Display) -> DocumentError {
	DocumentError::Format(e.to_string())
}

/// Text of the first element named `name`, trimmed. `Ok(None)` if absent.
pub fn read_element_text(xml: &str, name: &str) -> Result<Option<String>> {
	let mut reader = Reader::from_str(xml);
	let mut depth = 0usize;
	let mut capture: Option<(usize, String)> = None;
	let mut found = None;

	loop {
		match reader.read_event().map_err(format_err)? {
			Event::Start(e) => {
				depth += 1;
				if found.is_none() && capture.is_none() && e.local_name().as_ref() == name.as_bytes() {
					capture = Some((depth, String::new()));
				}
			}
			Event::End(_) => {
				if let Some((d, _)) = &capture {
					if *d == depth {
						found = capture.take().map(|(_, text)| text.trim().to_string());
					}
				}
				depth = depth.checked_sub(1).ok_or_else(|| format_err("unbalanced end tag"))?;
			}
			Event::Empty(e) => {
				if found.is_none() && capture.is_none() && e.local_name().as_ref() == name.as_bytes() {
					found = Some(String::new());
				}
			}
			Event::Text(t) => {
				if let Some((_, text)) = capture.as_mut() {
					text.push_str(&t.unescape().map_err(format_err)?);
				}
			}
			Event::CData(c) => {
				if let Some((_, text)) = capture.as_mut() {
					text.push_str(std::str::from_utf8(&c).map_err(format_err)?);
				}
			}
			Event::Eof => break,
			_ => {}
		}
	}

	if depth != 0 {
		return Err(format_err("unexpected end of document"));
	}
	Ok(found)
}

/// Replace the text of the first element matching each `(name, value)`.
///
/// Every name must occur in the document, otherwise
/// [`DocumentError::MissingElement`] is returned and nothing is produced.
pub fn replace_element_text(xml: &str, replacements: &[(&'static str, &str)]) -> Result<String> {
	let mut reader = Reader::from_str(xml);
	let mut writer = Writer::new(Vec::with_capacity(xml.len() + 64));
	let mut done = vec![false; replacements.len()];
	// Index into `replacements` of the element currently being rewritten,
	// with the depth it was opened at.
	let mut active: Option<(usize, usize)> = None;
	let mut depth = 0usize;

	let pick = |done: &[bool], e: &BytesStart<'_>| {
		replacements
			.iter()
			.enumerate()
			.find(|(i, (name, _))| !done[*i] && e.local_name().as_ref() == name.as_bytes())
			.map(|(i, _)| i)
	};

	loop {
		let event = reader.read_event().map_err(format_err)?;
		match event {
			Event::Start(e) => {
				depth += 1;
				if active.is_none() {
					if let Some(i) = pick(&done, &e) {
						active = Some((i, depth));
						writer.write_event(Event::Start(e)).map_err(format_err)?;
						writer
							.write_event(Event::Text(BytesText::new(replacements[i].1)))
							.map_err(format_err)?;
						continue;
					}
				}
				writer.write_event(Event::Start(e)).map_err(format_err)?;
			}
			Event::End(e) => {
				if let Some((i, d)) = active {
					if d == depth {
						done[i] = true;
						active = None;
					}
				}
				depth = depth.checked_sub(1).ok_or_else(|| format_err("unbalanced end tag"))?;
				writer.write_event(Event::End(e)).map_err(format_err)?;
			}
			Event::Empty(e) => {
				if active.is_none() {
					if let Some(i) = pick(&done, &e) {
						done[i] = true;
						let end = BytesEnd::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
						writer.write_event(Event::Start(e)).map_err(format_err)?;
						writer
							.write_event(Event::Text(BytesText::new(replacements[i].1)))
							.map_err(format_err)?;
						writer.write_event(Event::End(end)).map_err(format_err)?;
						continue;
					}
				}
				writer.write_event(Event::Empty(e)).map_err(format_err)?;
			}
			// The old content of a rewritten element is dropped.
			Event::Text(_) | Event::CData(_) if active.is_some() => {}
			Event::Eof => break,
			other => writer.write_event(other).map_err(format_err)?,
		}
	}

	if depth != 0 {
		return Err(format_err("unexpected end of document"));
	}
	if let Some(i) = done.iter().position(|d| !d) {
		return Err(DocumentError::MissingElement(replacements[i].0));
	}

	String::from_utf8(writer.into_inner()).map_err(format_err)
}

#[cfg(test)]
mod tests {
	use super::*;

	const DOC: &str = r#"<?xml version="1.0" encoding="utf-16"?>
<IVI xmlns="urn:ivi">
  <Header>
    <IVIReferenceId>old-ref</IVIReferenceId>
  </Header>
  <Vehicle>
    <VehicleIdentificationNumber> WVWZZZ1KZ </VehicleIdentificationNumber>
    <Note>keep &amp; this</Note>
  </Vehicle>
</IVI>"#;

	#[test]
	fn test_read_first_occurrence_trimmed() {
		assert_eq!(
			read_element_text(DOC, "VehicleIdentificationNumber").unwrap().as_deref(),
			Some("WVWZZZ1KZ")
		);
		assert_eq!(read_element_text(DOC, "Missing").unwrap(), None);
	}

	#[test]
	fn test_read_matches_prefixed_names() {
		let doc = r#"<ns:IVI xmlns:ns="urn:ivi"><ns:IVIReferenceId>r1</ns:IVIReferenceId></ns:IVI>"#;
		assert_eq!(
			read_element_text(doc, "IVIReferenceId").unwrap().as_deref(),
			Some("r1")
		);
	}

	#[test]
	fn test_replace_rewrites_both_and_keeps_the_rest() {
		let out = replace_element_text(
			DOC,
			&[
				("IVIReferenceId", "11111111-1111-1111-1111-111111111111"),
				("VehicleIdentificationNumber", "ABC123"),
			],
		)
		.unwrap();

		assert!(out.contains("<IVIReferenceId>11111111-1111-1111-1111-111111111111</IVIReferenceId>"));
		assert!(out.contains("<VehicleIdentificationNumber>ABC123</VehicleIdentificationNumber>"));
		assert!(out.contains("<Note>keep &amp; this</Note>"));
		assert!(out.starts_with(r#"<?xml version="1.0" encoding="utf-16"?>"#));
		assert!(!out.contains("old-ref"));
	}

	#[test]
	fn test_replace_only_first_occurrence() {
		let doc = "<a><VehicleIdentificationNumber>1</VehicleIdentificationNumber><VehicleIdentificationNumber>2</VehicleIdentificationNumber></a>";
		let out = replace_element_text(doc, &[("VehicleIdentificationNumber", "X")]).unwrap();
		assert_eq!(
			out,
			"<a><VehicleIdentificationNumber>X</VehicleIdentificationNumber><VehicleIdentificationNumber>2</VehicleIdentificationNumber></a>"
		);
	}

	#[test]
	fn test_replace_fills_empty_element() {
		let out = replace_element_text("<a><IVIReferenceId/></a>", &[("IVIReferenceId", "r")]).unwrap();
		assert_eq!(out, "<a><IVIReferenceId>r</IVIReferenceId></a>");
	}

	#[test]
	fn test_replace_escapes_value() {
		let out = replace_element_text("<a><IVIReferenceId>x</IVIReferenceId></a>", &[("IVIReferenceId", "a<b")]).unwrap();
		assert_eq!(out, "<a><IVIReferenceId>a&lt;b</IVIReferenceId></a>");
	}

	#[test]
	fn test_missing_element_is_reported() {
		let result = replace_element_text(
			"<a><IVIReferenceId>x</IVIReferenceId></a>",
			&[("IVIReferenceId", "r"), ("VehicleIdentificationNumber", "v")],
		);
		assert!(matches!(
			result,
			Err(DocumentError::MissingElement("VehicleIdentificationNumber"))
		));
	}

	#[test]
	fn test_mismatched_tags_are_format_errors() {
		let result = replace_element_text("<a><b></a>", &[("b", "x")]);
		assert!(matches!(result, Err(DocumentError::Format(_))));
		assert!(matches!(
			read_element_text("<a><b>", "b"),
			Err(DocumentError::Format(_))
		));
	}
}
