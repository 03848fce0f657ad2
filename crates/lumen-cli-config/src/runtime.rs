// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use std::path::PathBuf;

use lumen_common_i18n::{AvailableLocales, Locale, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layer::*;
use crate::paths::PathsConfig;
use crate::ConfigError;

/// Locales offered when no source configures any.
pub const DEFAULT_AVAILABLE_LOCALES: &[&str] = &["en", "es", "fr"];

/// The final, validated configuration for Lumen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumenConfig {
	pub i18n: I18nConfig,
	pub storage: StorageConfig,
	pub logging: LoggingConfig,

	/// Resolved XDG paths (not serialized)
	#[serde(skip)]
	pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nConfig {
	pub available_locales: Vec<String>,
	pub default_locale: String,
	pub base_locale: String,
	/// Directory of `<code>.json` / `<code>.mo` bundles. `None` uses the
	/// bundles compiled into the binary.
	pub bundle_dir: Option<PathBuf>,
	pub detect_system_locale: bool,
}

impl I18nConfig {
	pub fn available(&self) -> Result<AvailableLocales, ConfigError> {
		AvailableLocales::from_codes(&self.available_locales)
			.map_err(|e| ConfigError::invalid_value("i18n.available_locales", e.to_string()))
	}

	pub fn default_locale(&self) -> Result<Locale, ConfigError> {
		parse_locale("i18n.default_locale", &self.default_locale)
	}

	pub fn base_locale(&self) -> Result<Locale, ConfigError> {
		parse_locale("i18n.base_locale", &self.base_locale)
	}
}

fn parse_locale(field: &str, code: &str) -> Result<Locale, ConfigError> {
	Locale::parse(code).ok_or_else(|| ConfigError::invalid_value(field, format!("unknown locale '{code}'")))
}

impl Default for I18nConfig {
	fn default() -> Self {
		Self {
			available_locales: DEFAULT_AVAILABLE_LOCALES.iter().map(|c| c.to_string()).collect(),
			default_locale: DEFAULT_LOCALE.to_string(),
			base_locale: DEFAULT_LOCALE.to_string(),
			bundle_dir: None,
			detect_system_locale: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
	pub preferences_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
	pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	Warn,
	#[default]
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

impl LumenConfig {
	/// Resolve a merged layer into a complete config, filling defaults.
	pub fn from_layer(layer: ConfigLayer, paths: PathsConfig) -> Result<Self, ConfigError> {
		Ok(Self {
			i18n: build_i18n_config(layer.i18n),
			storage: build_storage_config(layer.storage, &paths),
			logging: build_logging_config(layer.logging, &paths),
			paths,
		})
	}
}

fn build_i18n_config(layer: Option<I18nLayer>) -> I18nConfig {
	let layer = layer.unwrap_or_default();
	let defaults = I18nConfig::default();
	I18nConfig {
		available_locales: layer.available_locales.unwrap_or(defaults.available_locales),
		default_locale: layer.default_locale.unwrap_or(defaults.default_locale),
		base_locale: layer.base_locale.unwrap_or(defaults.base_locale),
		bundle_dir: layer.bundle_dir,
		detect_system_locale: layer.detect_system_locale.unwrap_or(defaults.detect_system_locale),
	}
}

fn build_storage_config(layer: Option<StorageLayer>, paths: &PathsConfig) -> StorageConfig {
	let layer = layer.unwrap_or_default();
	StorageConfig {
		preferences_file: layer
			.preferences_file
			.unwrap_or_else(|| paths.state_dir.join("preferences.json")),
	}
}

fn build_logging_config(layer: Option<LoggingLayer>, paths: &PathsConfig) -> LoggingConfig {
	let layer = layer.unwrap_or_default();
	LoggingConfig {
		level: parse_log_level(layer.level.as_deref()),
		format: parse_log_format(layer.format.as_deref()),
		file: layer.file.unwrap_or_else(|| paths.state_dir.join("lumen.log")),
	}
}

fn parse_log_level(s: Option<&str>) -> LogLevel {
	match s.map(str::to_ascii_lowercase).as_deref() {
		None | Some("info") => LogLevel::Info,
		Some("error") => LogLevel::Error,
		Some("warn") => LogLevel::Warn,
		Some("debug") => LogLevel::Debug,
		Some("trace") => LogLevel::Trace,
		Some(other) => {
			warn!(level = other, "unknown log level, using info");
			LogLevel::Info
		}
	}
}

fn parse_log_format(s: Option<&str>) -> LogFormat {
	match s {
		Some("json") => LogFormat::Json,
		None | Some("pretty") => LogFormat::Pretty,
		Some(other) => {
			warn!(format = other, "unknown log format, using pretty");
			LogFormat::Pretty
		}
	}
}
