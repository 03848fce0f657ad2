// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for locale parsing, catalog loading and formatting.

use std::path::PathBuf;

/// Errors raised while building locale sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
	#[error("unknown locale '{0}'")]
	UnknownLocale(String),

	#[error("locale '{0}' listed more than once")]
	DuplicateLocale(String),

	#[error("at least one locale must be available")]
	Empty,
}

/// Errors raised while loading message bundles.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("base locale '{0}' has no bundle")]
	MissingBaseBundle(String),

	#[error("invalid JSON bundle: {0}")]
	Json(#[from] serde_json::Error),

	#[error("invalid value for key '{key}': {reason}")]
	InvalidBundle { key: String, reason: String },

	#[error("invalid gettext catalog: {0}")]
	Gettext(#[from] gettext::Error),

	#[error("failed to read bundle {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl CatalogError {
	pub fn invalid_bundle(key: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidBundle {
			key: key.into(),
			reason: reason.into(),
		}
	}
}

/// Errors raised when a formatter is constructed with options it cannot honour.
///
/// These indicate a static configuration bug at the call site, so formatters
/// fail at construction rather than producing degraded output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
	#[error("invalid formatting option {option}: {reason}")]
	InvalidOption { option: &'static str, reason: String },

	#[error("invalid currency code '{0}': expected three ASCII letters")]
	InvalidCurrency(String),

	#[error("no {what} data for locale '{locale}': {reason}")]
	MissingData {
		locale: &'static str,
		what: &'static str,
		reason: String,
	},
}

impl FormatError {
	pub fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidOption {
			option,
			reason: reason.into(),
		}
	}

	pub(crate) fn missing_data(locale: &'static str, what: &'static str, err: impl std::fmt::Display) -> Self {
		Self::MissingData {
			locale,
			what,
			reason: err.to_string(),
		}
	}
}
