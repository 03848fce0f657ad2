// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lumen learner dashboard.

mod app;
mod catalog;
mod logging;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_cli_config::{load_config_with_cli, CliOverrides};
use lumen_i18n_state::{FileStore, SystemLocale, TranslationProvider};
use tracing::info;

use app::{App, Learner};
use terminal::TerminalEvents;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Lumen - a localized learner dashboard for the terminal.
#[derive(Parser, Debug)]
#[command(name = "lumen", about = "Localized learner dashboard", version)]
struct Args {
	/// Configuration file to load instead of the user config
	#[arg(long, env = "LUMEN_CONFIG")]
	config: Option<PathBuf>,

	/// Start in this locale (e.g. `es`), overriding the saved preference
	#[arg(long)]
	locale: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long)]
	log_level: Option<String>,

	/// Directory of `<code>.json` bundles that override the built-in ones
	#[arg(long)]
	bundle_dir: Option<PathBuf>,
}

impl From<Args> for CliOverrides {
	fn from(args: Args) -> Self {
		CliOverrides {
			locale: args.locale,
			bundle_dir: args.bundle_dir,
			log_level: args.log_level,
			config_file: args.config,
		}
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	let args = Args::parse();
	let explicit_locale = args.locale.is_some();

	let config = load_config_with_cli(args.into()).context("loading configuration")?;
	logging::init(&config.logging)?;

	let (catalog, available) = catalog::load_catalog(&config.i18n).context("loading message catalog")?;
	let default_locale = config.i18n.default_locale()?;

	let system_locale = if config.i18n.detect_system_locale {
		SystemLocale::Detect
	} else {
		SystemLocale::Ignore
	};

	let preferences = FileStore::new(config.storage.preferences_file.clone());
	let mut provider = TranslationProvider::new(catalog, available)
		.default_locale(default_locale)
		.preferences(Arc::new(preferences))
		.system_locale(system_locale);
	// An explicit --locale wins over the saved preference for this run only.
	if explicit_locale {
		provider = provider.session_locale(default_locale);
	}
	let provider = provider.mount();

	info!(locale = %provider.locale(), "starting dashboard");

	let mut app = App::new(provider.handle(), Learner::demo(chrono::Local::now().naive_local()))
		.context("mounting dashboard components")?;
	let mut events = TerminalEvents::new(TICK_RATE);
	terminal::run(&mut app, &mut events).await?;

	info!("dashboard closed");
	Ok(())
}
