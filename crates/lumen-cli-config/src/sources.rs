// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: files, environment, CLI, defaults.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;
use crate::ConfigError;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "LUMEN_";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	SystemFile = 20,
	UserFile = 30,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	/// Precedence level
	fn precedence(&self) -> Precedence;

	/// Load configuration layer from this source
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading defaults");
		// Defaults are applied when the runtime config is built.
		Ok(ConfigLayer::default())
	}
}

/// File-based configuration source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// System config: /etc/lumen/config.toml
	pub fn system(paths: &PathsConfig) -> Self {
		Self {
			path: paths.system_config_file.clone(),
			precedence: Precedence::SystemFile,
			name: "system-config",
			required: false,
		}
	}

	/// User config: ~/.config/lumen/config.toml
	pub fn user(paths: &PathsConfig) -> Self {
		Self {
			path: paths.user_config_file.clone(),
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// A file named on the command line. Takes the user file's place and must
	/// exist.
	pub fn explicit(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::UserFile,
			name: "explicit-config",
			required: true,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::FileNotFound(self.path.clone()));
			}
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path)?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: LUMEN_<SECTION>__<FIELD> (double underscore for nesting).
/// `LUMEN_I18N__AVAILABLE_LOCALES` takes a comma-separated list.
pub struct EnvSource {
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Read the process environment at load time.
	pub fn new() -> Self {
		Self { vars: None }
	}

	/// Use a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let vars: Vec<(String, String)> = match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		};

		let mut layer = ConfigLayer::default();

		for (key, value) in vars {
			if !key.starts_with(ENV_PREFIX) {
				continue;
			}

			let value = value.trim().to_string();
			if value.is_empty() {
				continue;
			}

			trace!(key = %key, "processing env var");

			match key.as_str() {
				"LUMEN_I18N__AVAILABLE_LOCALES" => {
					let locales = value
						.split(',')
						.map(str::trim)
						.filter(|code| !code.is_empty())
						.map(str::to_string)
						.collect();
					layer.i18n_mut().available_locales = Some(locales);
				}
				"LUMEN_I18N__DEFAULT_LOCALE" => {
					layer.i18n_mut().default_locale = Some(value);
				}
				"LUMEN_I18N__BASE_LOCALE" => {
					layer.i18n_mut().base_locale = Some(value);
				}
				"LUMEN_I18N__BUNDLE_DIR" => {
					layer.i18n_mut().bundle_dir = Some(PathBuf::from(value));
				}
				"LUMEN_I18N__DETECT_SYSTEM_LOCALE" => {
					let detect = parse_bool(&value)
						.ok_or_else(|| ConfigError::Env(format!("{key} must be true or false, got '{value}'")))?;
					layer.i18n_mut().detect_system_locale = Some(detect);
				}

				"LUMEN_STORAGE__PREFERENCES_FILE" => {
					layer.storage_mut().preferences_file = Some(PathBuf::from(value));
				}

				"LUMEN_LOGGING__LEVEL" => {
					layer.logging_mut().level = Some(value);
				}
				"LUMEN_LOGGING__FORMAT" => {
					layer.logging_mut().format = Some(value);
				}
				"LUMEN_LOGGING__FILE" => {
					layer.logging_mut().file = Some(PathBuf::from(value));
				}

				_ => {
					// Unknown LUMEN_ variable, ignore
				}
			}
		}

		Ok(layer)
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// CLI override source.
pub struct CliSource {
	overrides: CliOverrides,
}

/// CLI argument overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub locale: Option<String>,
	pub bundle_dir: Option<PathBuf>,
	pub log_level: Option<String>,
	pub config_file: Option<PathBuf>,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading CLI overrides");
		let mut layer = ConfigLayer::default();

		if let Some(ref locale) = self.overrides.locale {
			layer.i18n_mut().default_locale = Some(locale.clone());
		}

		if let Some(ref dir) = self.overrides.bundle_dir {
			layer.i18n_mut().bundle_dir = Some(dir.clone());
		}

		if let Some(ref level) = self.overrides.log_level {
			layer.logging_mut().level = Some(level.clone());
		}

		Ok(layer)
	}
}
