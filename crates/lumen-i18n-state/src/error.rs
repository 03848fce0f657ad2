// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
	#[error("unsupported locale '{requested}' (available: {})", available.join(", "))]
	UnsupportedLocale {
		requested: String,
		available: Vec<String>,
	},
}

/// Failure reading or writing the preference file. Never fatal: the
/// in-memory locale stays authoritative.
#[derive(Debug, Error)]
pub enum PersistError {
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid preference file {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("preference file {0} is not a JSON object")]
	NotAnObject(PathBuf),
}

impl PersistError {
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
		Self::Json {
			path: path.into(),
			source,
		}
	}
}
