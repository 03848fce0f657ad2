// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Preference persistence.
//!
//! Preferences are a flat string key/value map. The locale store only ever
//! touches [`LOCALE_PREFERENCE_KEY`]; other keys in the same file are kept.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::PersistError;

/// Key under which the active locale code is stored.
pub const LOCALE_PREFERENCE_KEY: &str = "lumen.locale";

pub trait PreferenceStore: Send + Sync {
	fn load(&self, key: &str) -> Result<Option<String>, PersistError>;
	fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// JSON object on disk, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStore {
	path: PathBuf,
}

impl FileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read_all(&self) -> Result<Map<String, Value>, PersistError> {
		let contents = match std::fs::read_to_string(&self.path) {
			Ok(contents) => contents,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				debug!(path = %self.path.display(), "preference file not found");
				return Ok(Map::new());
			}
			Err(e) => return Err(PersistError::io(&self.path, e)),
		};

		match serde_json::from_str(&contents).map_err(|e| PersistError::json(&self.path, e))? {
			Value::Object(map) => Ok(map),
			_ => Err(PersistError::NotAnObject(self.path.clone())),
		}
	}

	fn tmp_path(&self) -> PathBuf {
		let mut name = self
			.path
			.file_name()
			.map(|n| n.to_os_string())
			.unwrap_or_else(|| "preferences.json".into());
		name.push(".tmp");
		self.path.with_file_name(name)
	}
}

impl PreferenceStore for FileStore {
	fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
		let map = self.read_all()?;
		Ok(map.get(key).and_then(Value::as_str).map(str::to_string))
	}

	fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
		// A file that parses but is not a preference object is replaced. One that
		// cannot be read is left alone so other keys in it survive.
		let mut map = match self.read_all() {
			Ok(map) => map,
			Err(e @ (PersistError::Json { .. } | PersistError::NotAnObject(_))) => {
				warn!(error = %e, "replacing malformed preference file");
				Map::new()
			}
			Err(e) => return Err(e),
		};
		map.insert(key.to_string(), Value::String(value.to_string()));

		if let Some(parent) = self.path.parent() {
			std::fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
		}

		let json = serde_json::to_string_pretty(&Value::Object(map))
			.map_err(|e| PersistError::json(&self.path, e))?;
		let tmp_path = self.tmp_path();

		std::fs::write(&tmp_path, json).map_err(|e| PersistError::io(&tmp_path, e))?;
		std::fs::rename(&tmp_path, &self.path).map_err(|e| PersistError::io(&self.path, e))?;

		debug!(key, path = %self.path.display(), "saved preference");

		Ok(())
	}
}

/// In-process preferences, for tests and for running without a state dir.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.values.lock().insert(key.into(), value.into());
		self
	}

	pub fn get(&self, key: &str) -> Option<String> {
		self.values.lock().get(key).cloned()
	}
}

impl PreferenceStore for MemoryStore {
	fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
		Ok(self.get(key))
	}

	fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
		self.values.lock().insert(key.to_string(), value.to_string());
		Ok(())
	}
}
