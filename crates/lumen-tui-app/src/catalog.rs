// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_cli_config::I18nConfig;
use lumen_common_i18n::{AvailableLocales, MessageCatalog};
use tracing::{debug, info};

/// Bundles compiled into the binary. A configured bundle directory replaces
/// them per locale.
const EMBEDDED_BUNDLES: &[(&str, &str)] = &[
	("en", include_str!("../locales/en.json")),
	("es", include_str!("../locales/es.json")),
	("fr", include_str!("../locales/fr.json")),
];

pub fn load_catalog(config: &I18nConfig) -> Result<(Arc<MessageCatalog>, AvailableLocales)> {
	let available = config.available()?;
	let base = config.base_locale()?;

	let mut builder = MessageCatalog::builder(base);
	for (code, json) in EMBEDDED_BUNDLES {
		if let Some(locale) = available.find(code) {
			builder = builder
				.json(locale, json)
				.with_context(|| format!("parsing embedded bundle for '{code}'"))?;
		}
	}

	if let Some(dir) = &config.bundle_dir {
		builder = builder
			.load_dir(dir, &available)
			.with_context(|| format!("loading bundles from {}", dir.display()))?;
	}

	let catalog = builder.build(&available).context("building message catalog")?;

	for locale in available.iter() {
		let missing = catalog.missing_keys(locale);
		if !missing.is_empty() {
			debug!(%locale, missing = ?missing, "locale falls back to base for some keys");
		}
	}
	info!(base = %base, locales = available.len(), "message catalog ready");

	Ok((Arc::new(catalog), available))
}

#[cfg(test)]
mod tests {
	use super::*;
	use lumen_common_i18n::Locale;

	fn locale(code: &str) -> Locale {
		Locale::parse(code).unwrap()
	}

	#[test]
	fn test_embedded_bundles_load() {
		let (catalog, available) = load_catalog(&I18nConfig::default()).unwrap();
		assert_eq!(available.len(), 3);
		assert_eq!(catalog.t(locale("es"), "dashboard.title"), "Panel");
		assert_eq!(catalog.t(locale("fr"), "dashboard.title"), "Tableau de bord");
	}

	#[test]
	fn test_spanish_falls_back_for_price() {
		let (catalog, _) = load_catalog(&I18nConfig::default()).unwrap();
		assert_eq!(catalog.missing_keys(locale("es")), vec!["dashboard.price".to_string()]);
		assert!(catalog.missing_keys(locale("fr")).is_empty());
	}

	#[test]
	fn test_bundle_dir_overrides_embedded() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("es.json"), r#"{"dashboard": {"title": "Tablero"}}"#).unwrap();

		let config = I18nConfig {
			bundle_dir: Some(dir.path().to_path_buf()),
			..I18nConfig::default()
		};
		let (catalog, _) = load_catalog(&config).unwrap();
		assert_eq!(catalog.t(locale("es"), "dashboard.title"), "Tablero");
		assert_eq!(catalog.t(locale("en"), "dashboard.title"), "Dashboard");
	}

	#[test]
	fn test_base_without_bundle_is_an_error() {
		let config = I18nConfig {
			available_locales: vec!["en".to_string(), "de".to_string()],
			base_locale: "de".to_string(),
			..I18nConfig::default()
		};
		assert!(load_catalog(&config).is_err());
	}
}
