// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message bundles and the immutable per-locale catalog.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::CatalogError;
use crate::locale::{AvailableLocales, Locale};

/// Key → template mapping for a single locale.
pub enum Bundle {
	/// Templates held in memory, usually loaded from JSON.
	Map(HashMap<String, String>),
	/// A compiled GNU gettext catalog. Keys are msgids.
	Gettext(gettext::Catalog),
}

impl Bundle {
	pub fn new() -> Self {
		Bundle::Map(HashMap::new())
	}

	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Bundle::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}

	/// Parse a JSON bundle. Nested objects are flattened into dot-separated
	/// keys, so `{"nav": {"home": "Home"}}` yields `nav.home`.
	pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
		let value: Value = serde_json::from_str(json)?;
		Self::from_json_value(value)
	}

	pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
		let value: Value = serde_json::from_reader(reader)?;
		Self::from_json_value(value)
	}

	fn from_json_value(value: Value) -> Result<Self, CatalogError> {
		let Value::Object(root) = value else {
			return Err(CatalogError::invalid_bundle("", "bundle root must be an object"));
		};
		let mut map = HashMap::new();
		flatten_into(&mut map, String::new(), root)?;
		Ok(Bundle::Map(map))
	}

	/// Parse a compiled `.mo` file.
	pub fn from_mo_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
		Ok(Bundle::Gettext(gettext::Catalog::parse(reader)?))
	}

	pub fn get<'a>(&'a self, key: &'a str) -> Option<&'a str> {
		match self {
			Bundle::Map(map) => map.get(key).map(String::as_str),
			Bundle::Gettext(catalog) => {
				let translated = catalog.gettext(key);
				(translated != key).then_some(translated)
			}
		}
	}

	/// Keys held by the bundle, or `None` for gettext catalogs, which cannot
	/// be enumerated.
	pub fn keys(&self) -> Option<impl Iterator<Item = &str>> {
		match self {
			Bundle::Map(map) => Some(map.keys().map(String::as_str)),
			Bundle::Gettext(_) => None,
		}
	}
}

impl Default for Bundle {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Bundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Bundle::Map(map) => f.debug_struct("Bundle::Map").field("len", &map.len()).finish(),
			Bundle::Gettext(_) => f.write_str("Bundle::Gettext"),
		}
	}
}

fn flatten_into(
	out: &mut HashMap<String, String>,
	prefix: String,
	object: serde_json::Map<String, Value>,
) -> Result<(), CatalogError> {
	for (name, value) in object {
		let key = if prefix.is_empty() {
			name
		} else {
			format!("{prefix}.{name}")
		};
		match value {
			Value::String(template) => {
				out.insert(key, template);
			}
			Value::Object(nested) => flatten_into(out, key, nested)?,
			other => {
				return Err(CatalogError::invalid_bundle(
					key,
					format!("expected string or object, found {}", json_kind(&other)),
				));
			}
		}
	}
	Ok(())
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Outcome of resolving a key with base-locale fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
	/// Found in the requested locale.
	Active(&'a str),
	/// Missing in the requested locale, found in the base locale.
	Base(&'a str),
	/// Missing everywhere. Callers render a visible fallback.
	Missing,
}

impl<'a> Resolved<'a> {
	pub fn template(&self) -> Option<&'a str> {
		match self {
			Resolved::Active(t) | Resolved::Base(t) => Some(t),
			Resolved::Missing => None,
		}
	}

	pub fn is_missing(&self) -> bool {
		matches!(self, Resolved::Missing)
	}
}

/// Immutable mapping from locale to bundle, with one designated base locale
/// used as the fallback for missing keys.
#[derive(Debug)]
pub struct MessageCatalog {
	base: Locale,
	bundles: HashMap<Locale, Bundle>,
}

impl MessageCatalog {
	pub fn builder(base: Locale) -> CatalogBuilder {
		CatalogBuilder::new(base)
	}

	pub fn base_locale(&self) -> Locale {
		self.base
	}

	pub fn has_bundle(&self, locale: Locale) -> bool {
		self.bundles.contains_key(&locale)
	}

	/// Exact lookup without fallback.
	pub fn lookup<'a>(&'a self, locale: Locale, key: &'a str) -> Option<&'a str> {
		self.bundles.get(&locale).and_then(|bundle| bundle.get(key))
	}

	/// Lookup with fallback to the base locale.
	pub fn resolve<'a>(&'a self, locale: Locale, key: &'a str) -> Resolved<'a> {
		if let Some(template) = self.lookup(locale, key) {
			return Resolved::Active(template);
		}

		if locale != self.base {
			if let Some(template) = self.lookup(self.base, key) {
				tracing::trace!(%locale, key, base = %self.base, "using base locale translation");
				return Resolved::Base(template);
			}
		}

		tracing::debug!(%locale, key, "missing translation");
		Resolved::Missing
	}

	/// Translate a key for the given locale.
	///
	/// Falls back to the base locale if the translation is not found, then to
	/// the key itself.
	pub fn t(&self, locale: Locale, key: &str) -> String {
		self.resolve(locale, key).template().unwrap_or(key).to_string()
	}

	/// Keys present in the base bundle but absent for `locale`, sorted.
	///
	/// Gettext bundles cannot be enumerated; when the base bundle is one, the
	/// report is empty.
	pub fn missing_keys(&self, locale: Locale) -> Vec<String> {
		let Some(base_keys) = self.bundles.get(&self.base).and_then(|b| b.keys()) else {
			return Vec::new();
		};
		let keys: BTreeSet<&str> = base_keys.collect();
		keys.into_iter()
			.filter(|key| self.lookup(locale, key).is_none())
			.map(str::to_string)
			.collect()
	}
}

/// Collects bundles and validates them into a [`MessageCatalog`].
#[derive(Debug)]
pub struct CatalogBuilder {
	base: Locale,
	bundles: HashMap<Locale, Bundle>,
}

impl CatalogBuilder {
	pub fn new(base: Locale) -> Self {
		Self {
			base,
			bundles: HashMap::new(),
		}
	}

	/// Add or replace the bundle for `locale`.
	pub fn bundle(mut self, locale: Locale, bundle: Bundle) -> Self {
		self.bundles.insert(locale, bundle);
		self
	}

	pub fn json(self, locale: Locale, json: &str) -> Result<Self, CatalogError> {
		Ok(self.bundle(locale, Bundle::from_json_str(json)?))
	}

	/// Load `<code>.json` (preferred) or `<code>.mo` from `dir` for each
	/// available locale. Locales without a file are left to [`build`].
	///
	/// [`build`]: CatalogBuilder::build
	pub fn load_dir(mut self, dir: &Path, available: &AvailableLocales) -> Result<Self, CatalogError> {
		for locale in available.iter() {
			let json_path = dir.join(format!("{}.json", locale.code()));
			let mo_path = dir.join(format!("{}.mo", locale.code()));

			let bundle = if json_path.exists() {
				tracing::debug!(path = %json_path.display(), %locale, "loading JSON bundle");
				let file = open(&json_path)?;
				Bundle::from_json_reader(std::io::BufReader::new(file))?
			} else if mo_path.exists() {
				tracing::debug!(path = %mo_path.display(), %locale, "loading gettext bundle");
				Bundle::from_mo_reader(open(&mo_path)?)?
			} else {
				tracing::debug!(dir = %dir.display(), %locale, "no bundle file found");
				continue;
			};

			self.bundles.insert(locale, bundle);
		}
		Ok(self)
	}

	/// Finish the catalog.
	///
	/// The base locale must have a bundle. Available locales without one get
	/// an empty bundle so every lookup falls through to the base.
	pub fn build(mut self, available: &AvailableLocales) -> Result<MessageCatalog, CatalogError> {
		if !self.bundles.contains_key(&self.base) {
			return Err(CatalogError::MissingBaseBundle(self.base.code().to_string()));
		}

		for locale in available.iter() {
			if !self.bundles.contains_key(&locale) {
				tracing::warn!(%locale, "no bundle for available locale, all keys fall back to base");
				self.bundles.insert(locale, Bundle::new());
			}
		}

		Ok(MessageCatalog {
			base: self.base,
			bundles: self.bundles,
		})
	}
}

fn open(path: &Path) -> Result<std::fs::File, CatalogError> {
	std::fs::File::open(path).map_err(|source| CatalogError::Io {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn locale(code: &str) -> Locale {
		Locale::parse(code).unwrap()
	}

	fn catalog() -> MessageCatalog {
		let available = AvailableLocales::from_codes(["en", "es", "fr"]).unwrap();
		MessageCatalog::builder(locale("en"))
			.bundle(
				locale("en"),
				Bundle::from_pairs([("greeting", "Hello, {name}!"), ("nav.home", "Home")]),
			)
			.bundle(locale("es"), Bundle::from_pairs([("nav.home", "Inicio")]))
			.build(&available)
			.unwrap()
	}

	#[test]
	fn test_translate_active_locale() {
		assert_eq!(catalog().t(locale("es"), "nav.home"), "Inicio");
	}

	#[test]
	fn test_fallback_to_base() {
		let catalog = catalog();
		assert_eq!(
			catalog.resolve(locale("es"), "greeting"),
			Resolved::Base("Hello, {name}!")
		);
		assert_eq!(catalog.t(locale("fr"), "nav.home"), "Home");
	}

	#[test]
	fn test_fallback_to_key() {
		let catalog = catalog();
		assert!(catalog.resolve(locale("en"), "completely.unknown.key").is_missing());
		assert_eq!(catalog.t(locale("es"), "completely.unknown.key"), "completely.unknown.key");
	}

	#[test]
	fn test_lookup_does_not_fall_back() {
		assert_eq!(catalog().lookup(locale("es"), "greeting"), None);
	}

	#[test]
	fn test_build_requires_base_bundle() {
		let available = AvailableLocales::from_codes(["en", "es"]).unwrap();
		let err = MessageCatalog::builder(locale("en"))
			.bundle(locale("es"), Bundle::new())
			.build(&available)
			.unwrap_err();
		assert!(matches!(err, CatalogError::MissingBaseBundle(code) if code == "en"));
	}

	#[test]
	fn test_build_fills_missing_available_bundles() {
		let catalog = catalog();
		assert!(catalog.has_bundle(locale("fr")));
		assert!(!catalog.has_bundle(locale("de")));
	}

	#[test]
	fn test_json_bundle_flattens_nested_objects() {
		let bundle = Bundle::from_json_str(
			r#"{"nav": {"home": "Home", "lessons": {"title": "Lessons"}}, "ok": "OK"}"#,
		)
		.unwrap();
		assert_eq!(bundle.get("nav.home"), Some("Home"));
		assert_eq!(bundle.get("nav.lessons.title"), Some("Lessons"));
		assert_eq!(bundle.get("ok"), Some("OK"));
		assert_eq!(bundle.get("nav"), None);
	}

	#[test]
	fn test_json_bundle_rejects_non_string_leaves() {
		let err = Bundle::from_json_str(r#"{"count": 3}"#).unwrap_err();
		assert!(matches!(err, CatalogError::InvalidBundle { key, .. } if key == "count"));

		let err = Bundle::from_json_str(r#"["a"]"#).unwrap_err();
		assert!(matches!(err, CatalogError::InvalidBundle { .. }));
	}

	#[test]
	fn test_missing_keys_report() {
		let catalog = catalog();
		assert_eq!(catalog.missing_keys(locale("es")), vec!["greeting".to_string()]);
		assert_eq!(
			catalog.missing_keys(locale("fr")),
			vec!["greeting".to_string(), "nav.home".to_string()]
		);
		assert!(catalog.missing_keys(locale("en")).is_empty());
	}

	#[test]
	fn test_load_dir_reads_json_files() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("en.json"), r#"{"title": "Lessons"}"#).unwrap();
		std::fs::write(dir.path().join("es.json"), r#"{"title": "Lecciones"}"#).unwrap();

		let available = AvailableLocales::from_codes(["en", "es", "fr"]).unwrap();
		let catalog = MessageCatalog::builder(locale("en"))
			.load_dir(dir.path(), &available)
			.unwrap()
			.build(&available)
			.unwrap();

		assert_eq!(catalog.t(locale("es"), "title"), "Lecciones");
		assert_eq!(catalog.t(locale("fr"), "title"), "Lessons");
	}

	#[test]
	fn test_load_dir_surfaces_malformed_files() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("en.json"), "{not json").unwrap();

		let available = AvailableLocales::from_codes(["en"]).unwrap();
		let result = MessageCatalog::builder(locale("en")).load_dir(dir.path(), &available);
		assert!(matches!(result, Err(CatalogError::Json(_))));
	}
}
