// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation provider lifecycle.
//!
//! A provider starts `Uninitialized` holding only configuration. `mount`
//! resolves the initial locale, creates the store and returns a `Ready`
//! provider. There is no transition back: tearing down means dropping it.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lumen_common_i18n::{
	format_currency, format_date, format_date_time, format_message, format_number, format_relative_time,
	format_time, negotiate_locale, try_format_message, AvailableLocales, DateStyle, DateTimeOptions, Direction,
	FormatError, Locale, MessageCatalog, MessageValues, RelativeTimeUnit, TimeStyle,
};
use tracing::{debug, info, warn};

use crate::error::StateError;
use crate::storage::{MemoryStore, PreferenceStore, LOCALE_PREFERENCE_KEY};
use crate::store::{LocaleChange, LocaleStore, SetLocaleOutcome, Subscription};

/// Where the system locale comes from during [`TranslationProvider::mount`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SystemLocale {
	#[default]
	Ignore,
	/// Ask the operating system.
	Detect,
	/// Use this tag as if the OS had reported it.
	Fixed(String),
}

impl SystemLocale {
	fn tag(&self) -> Option<String> {
		match self {
			SystemLocale::Ignore => None,
			SystemLocale::Detect => {
				let tag = sys_locale::get_locale();
				debug!(tag = ?tag, "detected system locale");
				tag
			}
			SystemLocale::Fixed(tag) => Some(tag.clone()),
		}
	}
}

/// Pick the locale to start in.
///
/// Resolution order (highest to lowest priority):
/// 1. Persisted preference (if available)
/// 2. System locale, matched by language subtag (if available)
/// 3. Configured default (if available)
/// 4. First available locale
pub fn resolve_initial_locale(
	available: &AvailableLocales,
	persisted: Option<&str>,
	system: Option<&str>,
	default: Locale,
) -> Locale {
	if let Some(code) = persisted {
		if let Some(locale) = available.find(code) {
			return locale;
		}
		warn!(persisted = code, "ignoring persisted locale that is not available");
	}

	if let Some(locale) = system.and_then(|tag| negotiate_locale(available, tag)) {
		return locale;
	}

	if available.contains(default) {
		default
	} else {
		available.first()
	}
}

pub struct Uninitialized {
	catalog: Arc<MessageCatalog>,
	available: AvailableLocales,
	default_locale: Locale,
	preferences: Arc<dyn PreferenceStore>,
	system_locale: SystemLocale,
	session_locale: Option<Locale>,
}

pub struct Ready {
	handle: LocaleHandle,
}

pub struct TranslationProvider<S> {
	state: S,
}

impl TranslationProvider<Uninitialized> {
	/// Defaults: base locale of the catalog as default, in-memory preferences,
	/// system locale ignored.
	pub fn new(catalog: Arc<MessageCatalog>, available: AvailableLocales) -> Self {
		let default_locale = catalog.base_locale();
		Self {
			state: Uninitialized {
				catalog,
				available,
				default_locale,
				preferences: Arc::new(MemoryStore::new()),
				system_locale: SystemLocale::Ignore,
				session_locale: None,
			},
		}
	}

	pub fn default_locale(mut self, locale: Locale) -> Self {
		self.state.default_locale = locale;
		self
	}

	pub fn preferences(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
		self.state.preferences = preferences;
		self
	}

	pub fn system_locale(mut self, system_locale: SystemLocale) -> Self {
		self.state.system_locale = system_locale;
		self
	}

	/// Start in `locale` whatever the saved preference says, without writing
	/// it back. Later `set_locale` calls persist as usual.
	pub fn session_locale(mut self, locale: Locale) -> Self {
		self.state.session_locale = Some(locale);
		self
	}

	/// Resolve the initial locale and create the store.
	pub fn mount(self) -> TranslationProvider<Ready> {
		let Uninitialized {
			catalog,
			available,
			default_locale,
			preferences,
			system_locale,
			session_locale,
		} = self.state;

		let persisted = match preferences.load(LOCALE_PREFERENCE_KEY) {
			Ok(value) => value,
			Err(e) => {
				warn!(error = %e, "failed to read locale preference");
				None
			}
		};
		let system = system_locale.tag();
		let initial = match session_locale {
			Some(locale) if available.contains(locale) => locale,
			session => {
				if let Some(locale) = session {
					warn!(locale = %locale, "ignoring session locale that is not available");
				}
				resolve_initial_locale(&available, persisted.as_deref(), system.as_deref(), default_locale)
			}
		};

		info!(
			locale = %initial,
			persisted = ?persisted,
			system = ?system,
			available = available.len(),
			"translation provider mounted"
		);

		let store = LocaleStore::new(available, initial, preferences);
		TranslationProvider {
			state: Ready {
				handle: LocaleHandle { store, catalog },
			},
		}
	}
}

impl TranslationProvider<Ready> {
	pub fn locale(&self) -> Locale {
		self.state.handle.locale()
	}

	pub fn set_locale(&self, requested: &str) -> Result<SetLocaleOutcome, StateError> {
		self.state.handle.set_locale(requested)
	}

	pub fn available_locales(&self) -> &AvailableLocales {
		self.state.handle.available_locales()
	}

	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&LocaleChange) + Send + Sync + 'static,
	{
		self.state.handle.subscribe(listener)
	}

	pub fn catalog(&self) -> &Arc<MessageCatalog> {
		&self.state.handle.catalog
	}

	/// A handle for descendants. Every clone observes the same store.
	pub fn handle(&self) -> LocaleHandle {
		self.state.handle.clone()
	}

	pub fn snapshot(&self) -> LocaleSnapshot {
		self.state.handle.snapshot()
	}
}

/// Shared access to the locale store and catalog.
#[derive(Clone, Debug)]
pub struct LocaleHandle {
	store: LocaleStore,
	catalog: Arc<MessageCatalog>,
}

impl LocaleHandle {
	pub fn new(store: LocaleStore, catalog: Arc<MessageCatalog>) -> Self {
		Self { store, catalog }
	}

	pub fn locale(&self) -> Locale {
		self.store.locale()
	}

	pub fn set_locale(&self, requested: &str) -> Result<SetLocaleOutcome, StateError> {
		self.store.set_locale(requested)
	}

	pub fn set(&self, locale: Locale) -> Result<SetLocaleOutcome, StateError> {
		self.store.set(locale)
	}

	pub fn available_locales(&self) -> &AvailableLocales {
		self.store.available_locales()
	}

	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&LocaleChange) + Send + Sync + 'static,
	{
		self.store.subscribe(listener)
	}

	pub fn store(&self) -> &LocaleStore {
		&self.store
	}

	pub fn catalog(&self) -> &Arc<MessageCatalog> {
		&self.catalog
	}

	/// Read locale and generation in one step. Take one snapshot per render
	/// pass and pass it to every binding.
	pub fn snapshot(&self) -> LocaleSnapshot {
		let cell = self.store.cell();
		LocaleSnapshot {
			locale: cell.locale,
			generation: cell.generation,
			catalog: Arc::clone(&self.catalog),
		}
	}
}

/// A consistent view of the active locale and catalog.
#[derive(Clone, Debug)]
pub struct LocaleSnapshot {
	locale: Locale,
	generation: u64,
	catalog: Arc<MessageCatalog>,
}

impl LocaleSnapshot {
	pub fn new(locale: Locale, generation: u64, catalog: Arc<MessageCatalog>) -> Self {
		Self {
			locale,
			generation,
			catalog,
		}
	}

	pub fn locale(&self) -> Locale {
		self.locale
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn catalog(&self) -> &MessageCatalog {
		&self.catalog
	}

	pub fn direction(&self) -> Direction {
		self.locale.direction()
	}

	/// Whether `store` has moved on since this snapshot was taken.
	pub fn is_stale(&self, store: &LocaleStore) -> bool {
		store.generation() != self.generation
	}

	pub fn t(&self, key: &str) -> String {
		self.catalog.t(self.locale, key)
	}

	pub fn t_with(&self, key: &str, values: &MessageValues) -> String {
		format_message(&self.catalog, self.locale, key, values)
	}

	pub fn try_t_with(&self, key: &str, values: &MessageValues) -> Option<String> {
		try_format_message(&self.catalog, self.locale, key, values)
	}

	pub fn format_number(&self, value: f64) -> String {
		format_number(self.locale, value)
	}

	pub fn format_currency(&self, value: f64, currency_code: &str) -> Result<String, FormatError> {
		format_currency(self.locale, value, currency_code)
	}

	pub fn format_date(&self, date: NaiveDate, style: DateStyle) -> String {
		format_date(self.locale, date, style)
	}

	pub fn format_time(&self, time: NaiveTime, style: TimeStyle) -> String {
		format_time(self.locale, time, style)
	}

	pub fn format_date_time(&self, value: &NaiveDateTime, options: DateTimeOptions) -> Result<String, FormatError> {
		format_date_time(self.locale, value, options)
	}

	pub fn format_relative_time(&self, value: f64, unit: RelativeTimeUnit) -> String {
		format_relative_time(self.locale, value, unit)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use lumen_common_i18n::Bundle;

	fn locale(code: &str) -> Locale {
		Locale::parse(code).unwrap()
	}

	fn available() -> AvailableLocales {
		AvailableLocales::from_codes(["en", "es", "fr"]).unwrap()
	}

	fn catalog() -> Arc<MessageCatalog> {
		let catalog = MessageCatalog::builder(locale("en"))
			.bundle(
				locale("en"),
				Bundle::from_pairs([("greeting", "Hello, {name}!"), ("nav.home", "Home")]),
			)
			.bundle(locale("es"), Bundle::from_pairs([("nav.home", "Inicio")]))
			.build(&available())
			.unwrap();
		Arc::new(catalog)
	}

	#[test]
	fn test_resolution_order() {
		let available = available();
		let en = locale("en");
		assert_eq!(resolve_initial_locale(&available, Some("fr"), Some("es_ES"), en), locale("fr"));
		assert_eq!(resolve_initial_locale(&available, Some("de"), Some("es_ES"), en), locale("es"));
		assert_eq!(resolve_initial_locale(&available, None, Some("ja_JP"), locale("fr")), locale("fr"));
		assert_eq!(resolve_initial_locale(&available, None, None, locale("ar")), locale("en"));
	}

	#[test]
	fn test_mount_uses_persisted_preference() {
		let preferences = Arc::new(MemoryStore::new().with(LOCALE_PREFERENCE_KEY, "es"));
		let provider = TranslationProvider::new(catalog(), available())
			.preferences(preferences)
			.mount();
		assert_eq!(provider.locale(), locale("es"));
		assert_eq!(provider.snapshot().t("nav.home"), "Inicio");
	}

	#[test]
	fn test_session_locale_wins_without_being_saved() {
		let preferences = Arc::new(MemoryStore::new().with(LOCALE_PREFERENCE_KEY, "es"));
		let provider = TranslationProvider::new(catalog(), available())
			.preferences(preferences.clone())
			.session_locale(locale("fr"))
			.mount();

		assert_eq!(provider.locale(), locale("fr"));
		assert_eq!(provider.snapshot().generation(), 0);
		assert_eq!(preferences.get(LOCALE_PREFERENCE_KEY).as_deref(), Some("es"));

		provider.set_locale("en").unwrap();
		assert_eq!(preferences.get(LOCALE_PREFERENCE_KEY).as_deref(), Some("en"));
	}

	#[test]
	fn test_unavailable_session_locale_is_ignored() {
		let preferences = Arc::new(MemoryStore::new().with(LOCALE_PREFERENCE_KEY, "es"));
		let provider = TranslationProvider::new(catalog(), available())
			.preferences(preferences)
			.session_locale(locale("de"))
			.mount();
		assert_eq!(provider.locale(), locale("es"));
	}

	#[test]
	fn test_mount_uses_system_locale_when_nothing_persisted() {
		let provider = TranslationProvider::new(catalog(), available())
			.system_locale(SystemLocale::Fixed("fr_CA.UTF-8".to_string()))
			.mount();
		assert_eq!(provider.locale(), locale("fr"));
	}

	#[test]
	fn test_mount_uses_default_locale() {
		let provider = TranslationProvider::new(catalog(), available())
			.default_locale(locale("es"))
			.mount();
		assert_eq!(provider.locale(), locale("es"));
	}

	#[test]
	fn test_snapshot_reflects_changes() {
		let provider = TranslationProvider::new(catalog(), available()).mount();
		let before = provider.snapshot();
		provider.set_locale("es").unwrap();
		let after = provider.snapshot();

		assert_eq!(before.locale(), locale("en"));
		assert_eq!(before.t("nav.home"), "Home");
		assert!(before.is_stale(provider.handle().store()));

		assert_eq!(after.locale(), locale("es"));
		assert_eq!(after.generation(), 1);
		assert_eq!(after.t("nav.home"), "Inicio");
		assert!(!after.is_stale(provider.handle().store()));
	}

	#[test]
	fn test_snapshot_formatting_helpers() {
		let provider = TranslationProvider::new(catalog(), available()).mount();
		provider.set_locale("es").unwrap();
		let snapshot = provider.snapshot();

		let values = MessageValues::new().with("name", "Ana");
		assert_eq!(snapshot.t_with("greeting", &values), "Hello, Ana!");
		assert_eq!(snapshot.try_t_with("x.y.z", &values), None);
		assert_eq!(snapshot.format_number(1234.5), "1.234,5");
		assert_eq!(snapshot.format_relative_time(-2.0, RelativeTimeUnit::Day), "hace 2 días");
	}

	#[test]
	fn test_handles_share_state() {
		let provider = TranslationProvider::new(catalog(), available()).mount();
		let a = provider.handle();
		let b = provider.handle();
		a.set_locale("fr").unwrap();
		assert_eq!(b.locale(), locale("fr"));
		assert_eq!(provider.locale(), locale("fr"));
	}
}
