// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ecoc_config::CliOverrides;

#[derive(Parser, Debug)]
#[command(name = "ecoc")]
#[command(about = "Submit and withdraw vehicle pre-registrations with the Norwegian vehicle registry")]
#[command(version)]
pub struct Cli {
	/// Configuration file (default: ~/.config/ecoc/config.toml)
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,

	/// SQLite database holding the profile and the submission ledger
	#[arg(long, global = true)]
	pub database: Option<PathBuf>,

	/// RSA private key (PEM)
	#[arg(long, global = true)]
	pub private_key: Option<PathBuf>,

	/// Certificate chain for the x5c header (PEM or DER)
	#[arg(long, global = true)]
	pub certificate: Option<PathBuf>,

	/// Log filter used when RUST_LOG is not set
	#[arg(long, global = true)]
	pub log_level: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

impl Cli {
	pub fn overrides(&self) -> CliOverrides {
		CliOverrides {
			config_file: self.config.clone(),
			database_path: self.database.clone(),
			private_key_path: self.private_key.clone(),
			certificate_path: self.certificate.clone(),
			log_level: self.log_level.clone(),
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Show or replace the credential profile
	Settings {
		#[command(subcommand)]
		action: SettingsCommand,
	},

	/// Submit an IVI document
	Submit(SubmitArgs),

	/// Withdraw a submission from the registry and the ledger
	Delete {
		/// VIN of the submission
		vin: String,

		/// Do not ask for confirmation
		#[arg(long, short)]
		yes: bool,
	},

	/// List recorded submissions, newest first
	List,

	/// Find submissions by IVI reference or VIN substring
	Search { term: String },

	/// Print the stored document for a VIN
	Show { vin: String },

	/// Print a fresh IVI reference id
	NewReference,

	/// Show version information
	Version,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
	/// Print the active profile (secrets redacted)
	Show,

	/// Replace the profile. Omitted fields take their defaults.
	Set(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
	/// Client id registered with the authorization server
	#[arg(long)]
	pub issuer: String,

	#[arg(long)]
	pub audience: Option<String>,

	#[arg(long)]
	pub resource: Option<String>,

	#[arg(long)]
	pub scope: Option<String>,

	#[arg(long, env = "ECOC_KEYSTORE_PASSWORD", hide_env_values = true)]
	pub keystore_password: Option<String>,

	#[arg(long)]
	pub keystore_alias: Option<String>,

	#[arg(long, env = "ECOC_KEYSTORE_ALIAS_PASSWORD", hide_env_values = true)]
	pub keystore_alias_password: Option<String>,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
	/// IVI XML document; rewritten in place before submission
	pub document: PathBuf,

	/// IVI reference id (default: a fresh UUID)
	#[arg(long)]
	pub reference: Option<String>,

	/// VIN (default: read from the document)
	#[arg(long)]
	pub vin: Option<String>,

	/// avgiftsKode
	#[arg(long, value_parser = digits)]
	pub fee_code: String,

	/// sitteplasserNorskGodkjenning
	#[arg(long, value_parser = digits)]
	pub seats: String,

	/// sengeplasserCampingbil
	#[arg(long, value_parser = digits)]
	pub berths: String,

	/// Do not ask for confirmation
	#[arg(long, short)]
	pub yes: bool,
}

/// Digits only. Blank is accepted and sent as an empty string.
fn digits(value: &str) -> Result<String, String> {
	if value.chars().all(|c| c.is_ascii_digit()) {
		Ok(value.to_string())
	} else {
		Err(format!("expected digits only, got {value:?}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;
	use proptest::prelude::*;

	#[test]
	fn test_cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_submit_parses_fee_fields() {
		let cli = Cli::try_parse_from([
			"ecoc", "submit", "ivi.xml", "--fee-code", "12", "--seats", "5", "--berths", "0", "-y",
		])
		.unwrap();
		match cli.command {
			Command::Submit(args) => {
				assert_eq!(args.document, PathBuf::from("ivi.xml"));
				assert_eq!(args.fee_code, "12");
				assert!(args.yes);
				assert!(args.reference.is_none());
			}
			other => panic!("expected submit, got {other:?}"),
		}
	}

	#[test]
	fn test_submit_rejects_non_digit_seats() {
		let result = Cli::try_parse_from([
			"ecoc", "submit", "ivi.xml", "--fee-code", "1", "--seats", "five", "--berths", "0",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn test_submit_accepts_blank_fee_field() {
		let cli = Cli::try_parse_from([
			"ecoc", "submit", "ivi.xml", "--fee-code", "1", "--seats", "5", "--berths", "",
		])
		.unwrap();
		match cli.command {
			Command::Submit(args) => assert_eq!(args.berths, ""),
			other => panic!("expected submit, got {other:?}"),
		}
	}

	#[test]
	fn test_global_database_flag_after_subcommand() {
		let cli = Cli::try_parse_from(["ecoc", "list", "--database", "/tmp/l.db"]).unwrap();
		assert_eq!(cli.overrides().database_path, Some(PathBuf::from("/tmp/l.db")));
	}

	#[test]
	fn test_settings_set_requires_issuer() {
		assert!(Cli::try_parse_from(["ecoc", "settings", "set"]).is_err());
		let cli = Cli::try_parse_from(["ecoc", "settings", "set", "--issuer", "client-1"]).unwrap();
		assert!(matches!(
			cli.command,
			Command::Settings {
				action: SettingsCommand::Set(SettingsArgs { ref issuer, .. })
			} if issuer == "client-1"
		));
	}

	proptest! {
		#[test]
		fn digits_accepts_only_ascii_digits(value in "\\PC{0,8}") {
			let ok = value.bytes().all(|b| b.is_ascii_digit());
			prop_assert_eq!(digits(&value).is_ok(), ok);
		}
	}
}
