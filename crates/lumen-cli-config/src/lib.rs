// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for Lumen.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration from multiple sources
//! - TOML configuration file parsing
//! - Environment variable overrides
//! - Configuration validation against the supported locales

pub mod defaults;
pub mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;
pub mod validation;

pub use defaults::{ensure_default_config, DEFAULT_CONFIG_TEMPLATE};
pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{I18nConfig, LogFormat, LogLevel, LoggingConfig, LumenConfig, StorageConfig};
pub use sources::{CliOverrides, ConfigSource, Precedence};

/// Load configuration with CLI overrides.
///
/// If neither `--config` nor a user config file exists, a default one is
/// created at `~/.config/lumen/config.toml`.
pub fn load_config_with_cli(cli: sources::CliOverrides) -> Result<LumenConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;

	let mut registry = ConfigRegistry::new();

	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::system(&paths)));
	match cli.config_file.clone() {
		Some(path) => registry.register(Box::new(sources::FileSource::explicit(path))),
		None => {
			defaults::ensure_default_config(&paths.user_config_file)?;
			registry.register(Box::new(sources::FileSource::user(&paths)));
		}
	}
	registry.register(Box::new(sources::EnvSource::new()));
	registry.register(Box::new(sources::CliSource::new(cli)));

	registry.load(paths)
}
