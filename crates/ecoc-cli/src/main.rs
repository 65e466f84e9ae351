// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod args;
mod commands;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::{Cli, Command, SettingsCommand};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	match &cli.command {
		Command::Version => {
			println!("ecoc {}", env!("CARGO_PKG_VERSION"));
			println!("User-Agent: {}", ecoc_common_http::user_agent());
			return Ok(());
		}
		Command::NewReference => {
			println!("{}", uuid::Uuid::new_v4());
			return Ok(());
		}
		_ => {}
	}

	let config = ecoc_config::load_config(&cli.overrides()).context("failed to load configuration")?;

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
		)
		.with_writer(std::io::stderr)
		.init();

	tracing::debug!(database = %config.database_path.display(), "configuration loaded");
	let pool = commands::open_database(&config).await?;

	match cli.command {
		Command::Settings { action } => match action {
			SettingsCommand::Show => commands::settings_show(&pool).await,
			SettingsCommand::Set(args) => commands::settings_set(&pool, args).await,
		},
		Command::Submit(args) => commands::submit(&config, &pool, args).await,
		Command::Delete { vin, yes } => commands::delete(&config, &pool, &vin, yes).await,
		Command::List => commands::list(&pool).await,
		Command::Search { term } => commands::search(&pool, &term).await,
		Command::Show { vin } => commands::show(&pool, &vin).await,
		Command::Version | Command::NewReference => Ok(()),
	}
}
