// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for sensitive values.
//!
//! Keystore passwords from the credential profile and bearer tokens returned
//! by the authorization server are held in a [`Secret`]. The wrapper prints
//! `[REDACTED]` through `Debug`, `Display` and `Serialize`, zeroes its memory
//! on drop, and hands out the real value only through [`Secret::expose`].
//!
//! ```
//! use ecoc_common_secret::SecretString;
//!
//! let token = SecretString::new("eyJhbGciOi".to_string());
//! assert_eq!(format!("{token}"), "[REDACTED]");
//! assert_eq!(token.expose(), "eyJhbGciOi");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder written wherever a secret would otherwise be printed.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never reach logs, terminals or serialized output.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: a secret string.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Access the wrapped value. Every call site is an explicit opt-in.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// True when the wrapped string is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_and_display_are_redacted() {
		let secret = SecretString::from("keystore-pass");
		assert_eq!(format!("{secret}"), REDACTED);
		assert!(!format!("{secret:?}").contains("keystore-pass"));
	}

	#[test]
	fn option_debug_is_redacted() {
		let secret = Some(SecretString::from("keystore-pass"));
		assert!(format!("{secret:?}").contains(REDACTED));
	}

	#[test]
	fn expose_returns_inner_value() {
		let secret = SecretString::from("tok");
		assert_eq!(secret.expose(), "tok");
		assert!(!secret.is_empty());
		assert!(SecretString::from("").is_empty());
	}

	#[test]
	fn equality_compares_inner_values() {
		assert_eq!(SecretString::from("a"), SecretString::from("a"));
		assert_ne!(SecretString::from("a"), SecretString::from("b"));
	}

	#[test]
	fn serialize_is_redacted_and_deserialize_populates() {
		let json = serde_json::to_string(&SecretString::from("alias-pass")).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));

		let secret: SecretString = serde_json::from_str("\"alias-pass\"").unwrap();
		assert_eq!(secret.expose(), "alias-pass");
	}

	proptest! {
		#[test]
		fn display_never_contains_secret(inner in "[a-zA-Z0-9._-]{3,40}") {
			prop_assume!(!format!("Secret(\"{REDACTED}\")").contains(inner.as_str()));
			let secret = SecretString::new(inner.clone());
			let shown = format!("{secret}");
			let debugged = format!("{secret:?}");
			prop_assert!(!shown.contains(&inner));
			prop_assert!(!debugged.contains(&inner));
		}
	}
}
