// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use lumen_cli_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. The terminal belongs to the UI, so logs go
/// to `config.file`. `RUST_LOG` overrides the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
	if let Some(parent) = config.file.parent() {
		std::fs::create_dir_all(parent)
			.with_context(|| format!("creating log directory {}", parent.display()))?;
	}

	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(&config.file)
		.with_context(|| format!("opening log file {}", config.file.display()))?;
	let writer = Mutex::new(file);

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
	let registry = tracing_subscriber::registry().with(filter);

	match config.format {
		LogFormat::Pretty => registry
			.with(fmt::layer().with_writer(writer).with_ansi(false))
			.try_init(),
		LogFormat::Json => registry.with(fmt::layer().json().with_writer(writer)).try_init(),
	}
	.context("installing tracing subscriber")?;

	Ok(())
}
