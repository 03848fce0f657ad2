// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration validation rules.

use tracing::warn;

use crate::runtime::LumenConfig;
use crate::ConfigError;

/// Validate the configuration.
///
/// Returns Ok(()) if valid, or a ConfigError describing the first problem.
pub fn validate_config(config: &LumenConfig) -> Result<(), ConfigError> {
	validate_i18n(config)?;
	validate_storage(config)?;

	Ok(())
}

fn validate_i18n(config: &LumenConfig) -> Result<(), ConfigError> {
	let i18n = &config.i18n;

	if i18n.available_locales.is_empty() {
		return Err(ConfigError::invalid_value(
			"i18n.available_locales",
			"at least one locale is required",
		));
	}

	let available = i18n.available()?;
	let default_locale = i18n.default_locale()?;
	let base_locale = i18n.base_locale()?;

	if !available.contains(default_locale) {
		return Err(ConfigError::invalid_value(
			"i18n.default_locale",
			format!(
				"'{default_locale}' is not one of the available locales ({})",
				i18n.available_locales.join(", ")
			),
		));
	}

	if !available.contains(base_locale) {
		return Err(ConfigError::invalid_value(
			"i18n.base_locale",
			format!(
				"'{base_locale}' is not one of the available locales ({})",
				i18n.available_locales.join(", ")
			),
		));
	}

	if let Some(dir) = &i18n.bundle_dir {
		if !dir.is_dir() {
			return Err(ConfigError::invalid_value(
				"i18n.bundle_dir",
				format!("{} is not a directory", dir.display()),
			));
		}
	}

	Ok(())
}

fn validate_storage(config: &LumenConfig) -> Result<(), ConfigError> {
	let file = &config.storage.preferences_file;
	if file.file_name().is_none() {
		return Err(ConfigError::invalid_value(
			"storage.preferences_file",
			"must name a file",
		));
	}
	if file.is_relative() {
		warn!(path = %file.display(), "preferences file is relative to the working directory");
	}
	Ok(())
}
