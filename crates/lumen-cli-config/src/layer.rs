// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use std::path::PathBuf;

use serde::Deserialize;

/// Partial configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
	#[serde(default)]
	pub i18n: Option<I18nLayer>,
	#[serde(default)]
	pub storage: Option<StorageLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct I18nLayer {
	/// Display order is the order given here.
	#[serde(default)]
	pub available_locales: Option<Vec<String>>,
	#[serde(default)]
	pub default_locale: Option<String>,
	#[serde(default)]
	pub base_locale: Option<String>,
	#[serde(default)]
	pub bundle_dir: Option<PathBuf>,
	#[serde(default)]
	pub detect_system_locale: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageLayer {
	#[serde(default)]
	pub preferences_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
	#[serde(default)]
	pub file: Option<PathBuf>,
}

impl ConfigLayer {
	/// Merge another layer on top of this one (other takes precedence).
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.i18n, other.i18n, I18nLayer::merge);
		merge_option(&mut self.storage, other.storage, StorageLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
	}

	pub fn i18n_mut(&mut self) -> &mut I18nLayer {
		self.i18n.get_or_insert_with(I18nLayer::default)
	}

	pub fn storage_mut(&mut self) -> &mut StorageLayer {
		self.storage.get_or_insert_with(StorageLayer::default)
	}

	pub fn logging_mut(&mut self) -> &mut LoggingLayer {
		self.logging.get_or_insert_with(LoggingLayer::default)
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

fn replace_if_some<T>(target: &mut Option<T>, source: Option<T>) {
	if source.is_some() {
		*target = source;
	}
}

impl I18nLayer {
	fn merge(&mut self, other: I18nLayer) {
		// The locale list is replaced wholesale, never concatenated.
		replace_if_some(&mut self.available_locales, other.available_locales);
		replace_if_some(&mut self.default_locale, other.default_locale);
		replace_if_some(&mut self.base_locale, other.base_locale);
		replace_if_some(&mut self.bundle_dir, other.bundle_dir);
		replace_if_some(&mut self.detect_system_locale, other.detect_system_locale);
	}
}

impl StorageLayer {
	fn merge(&mut self, other: StorageLayer) {
		replace_if_some(&mut self.preferences_file, other.preferences_file);
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		replace_if_some(&mut self.level, other.level);
		replace_if_some(&mut self.format, other.format);
		replace_if_some(&mut self.file, other.file);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_parse_full_layer() {
		let layer: ConfigLayer = toml::from_str(
			r#"
			[i18n]
			available_locales = ["en", "es", "fr"]
			default_locale = "es"
			bundle_dir = "/usr/share/lumen/locales"

			[storage]
			preferences_file = "/tmp/prefs.json"

			[logging]
			level = "debug"
			format = "json"
			"#,
		)
		.unwrap();

		let i18n = layer.i18n.unwrap();
		assert_eq!(
			i18n.available_locales,
			Some(vec!["en".to_string(), "es".to_string(), "fr".to_string()])
		);
		assert_eq!(i18n.default_locale.as_deref(), Some("es"));
		assert_eq!(i18n.base_locale, None);
		assert_eq!(layer.logging.unwrap().format.as_deref(), Some("json"));
	}

	#[test]
	fn test_unknown_fields_are_rejected() {
		assert!(toml::from_str::<ConfigLayer>("[i18n]\nlocales = [\"en\"]\n").is_err());
	}

	#[test]
	fn test_merge_overrides_only_set_fields() {
		let mut base = ConfigLayer::default();
		base.i18n_mut().default_locale = Some("en".to_string());
		base.i18n_mut().available_locales = Some(vec!["en".to_string(), "es".to_string()]);

		let mut top = ConfigLayer::default();
		top.i18n_mut().default_locale = Some("es".to_string());

		base.merge(top);
		let i18n = base.i18n.unwrap();
		assert_eq!(i18n.default_locale.as_deref(), Some("es"));
		assert_eq!(i18n.available_locales.map(|l| l.len()), Some(2));
	}

	proptest! {
		#[test]
		fn merging_empty_layer_is_identity(level in proptest::option::of("[a-z]{1,8}")) {
			let mut layer = ConfigLayer::default();
			layer.logging_mut().level = level;
			let expected = layer.clone();
			layer.merge(ConfigLayer::default());
			prop_assert_eq!(layer, expected);
		}

		#[test]
		fn later_value_wins(first in "[a-z]{2}", second in "[a-z]{2}") {
			let mut layer = ConfigLayer::default();
			layer.i18n_mut().default_locale = Some(first);
			let mut top = ConfigLayer::default();
			top.i18n_mut().default_locale = Some(second.clone());
			layer.merge(top);
			prop_assert_eq!(layer.i18n.and_then(|i| i.default_locale), Some(second));
		}
	}
}
