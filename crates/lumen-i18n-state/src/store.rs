// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The single source of truth for the active locale.
//!
//! `LocaleStore` is a cheap cloneable handle. Locks guard the cell and the
//! listener list but are never held while persisting or while listeners run,
//! so a listener may read the store or even call `set_locale` again.
//!
//! Changes are delivered in generation order. A change made while another is
//! being delivered is queued and reaches every listener only after the earlier
//! one has, so the last change a listener sees is always the current locale.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use lumen_common_i18n::{AvailableLocales, Locale};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::StateError;
use crate::storage::{PreferenceStore, LOCALE_PREFERENCE_KEY};

/// Delivered to subscribers after every effective locale change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleChange {
	pub previous: Locale,
	pub current: Locale,
	pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetLocaleOutcome {
	/// Requested locale was already active. Nothing was persisted or notified.
	Unchanged,
	Changed {
		previous: Locale,
		current: Locale,
		/// `false` when the preference write failed. The change still applies.
		persisted: bool,
	},
}

impl SetLocaleOutcome {
	pub fn is_changed(&self) -> bool {
		matches!(self, SetLocaleOutcome::Changed { .. })
	}
}

/// Locale plus change counter, read and written as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleCell {
	pub locale: Locale,
	pub generation: u64,
}

type Listener = Arc<dyn Fn(&LocaleChange) + Send + Sync>;

#[derive(Default)]
struct Delivery {
	pending: VecDeque<LocaleChange>,
	draining: bool,
}

struct StoreInner {
	available: AvailableLocales,
	cell: RwLock<LocaleCell>,
	listeners: Mutex<Vec<(u64, Listener)>>,
	delivery: Mutex<Delivery>,
	next_listener_id: AtomicU64,
	preferences: Arc<dyn PreferenceStore>,
}

#[derive(Clone)]
pub struct LocaleStore {
	inner: Arc<StoreInner>,
}

impl LocaleStore {
	/// Create a store holding `initial`. The caller guarantees `initial` is one
	/// of `available`; [`crate::resolve_initial_locale`] does.
	pub fn new(
		available: AvailableLocales,
		initial: Locale,
		preferences: Arc<dyn PreferenceStore>,
	) -> Self {
		let initial = if available.contains(initial) {
			initial
		} else {
			warn!(locale = %initial, "initial locale not available, using first available");
			available.first()
		};

		Self {
			inner: Arc::new(StoreInner {
				available,
				cell: RwLock::new(LocaleCell {
					locale: initial,
					generation: 0,
				}),
				listeners: Mutex::new(Vec::new()),
				delivery: Mutex::new(Delivery::default()),
				next_listener_id: AtomicU64::new(1),
				preferences,
			}),
		}
	}

	pub fn locale(&self) -> Locale {
		self.inner.cell.read().locale
	}

	pub fn generation(&self) -> u64 {
		self.inner.cell.read().generation
	}

	/// Locale and generation from the same write.
	pub fn cell(&self) -> LocaleCell {
		*self.inner.cell.read()
	}

	pub fn available_locales(&self) -> &AvailableLocales {
		&self.inner.available
	}

	/// Switch to the locale with code `requested`.
	pub fn set_locale(&self, requested: &str) -> Result<SetLocaleOutcome, StateError> {
		let Some(next) = self.inner.available.find(requested) else {
			return Err(self.unsupported(requested));
		};
		self.apply(next)
	}

	/// Switch to `next`, which must be one of the available locales.
	pub fn set(&self, next: Locale) -> Result<SetLocaleOutcome, StateError> {
		if !self.inner.available.contains(next) {
			return Err(self.unsupported(next.code()));
		}
		self.apply(next)
	}

	fn unsupported(&self, requested: &str) -> StateError {
		debug!(requested, "rejected unsupported locale");
		StateError::UnsupportedLocale {
			requested: requested.to_string(),
			available: self
				.inner
				.available
				.iter()
				.map(|l| l.code().to_string())
				.collect(),
		}
	}

	fn apply(&self, next: Locale) -> Result<SetLocaleOutcome, StateError> {
		let change = {
			let mut cell = self.inner.cell.write();
			if cell.locale == next {
				return Ok(SetLocaleOutcome::Unchanged);
			}
			let previous = cell.locale;
			cell.locale = next;
			cell.generation += 1;
			let change = LocaleChange {
				previous,
				current: next,
				generation: cell.generation,
			};
			// Queued under the cell lock so the queue stays in generation order.
			self.inner.delivery.lock().pending.push_back(change);
			change
		};

		info!(
			previous = %change.previous,
			current = %change.current,
			generation = change.generation,
			"locale changed"
		);

		let persisted = match self.inner.preferences.save(LOCALE_PREFERENCE_KEY, next.code()) {
			Ok(()) => true,
			Err(e) => {
				warn!(error = %e, locale = %next, "failed to persist locale preference");
				false
			}
		};

		self.deliver_pending();

		Ok(SetLocaleOutcome::Changed {
			previous: change.previous,
			current: change.current,
			persisted,
		})
	}

	/// Deliver queued changes until the queue is empty. Returns at once if a
	/// delivery is already running; that caller picks up whatever was queued.
	fn deliver_pending(&self) {
		{
			let mut delivery = self.inner.delivery.lock();
			if delivery.draining {
				debug!(queued = delivery.pending.len(), "locale change queued behind running delivery");
				return;
			}
			delivery.draining = true;
		}

		let _guard = DrainGuard(&self.inner);
		loop {
			let change = {
				let mut delivery = self.inner.delivery.lock();
				match delivery.pending.pop_front() {
					Some(change) => change,
					None => {
						delivery.draining = false;
						return;
					}
				}
			};
			self.notify(&change);
		}
	}

	fn notify(&self, change: &LocaleChange) {
		let listeners: Vec<Listener> = self
			.inner
			.listeners
			.lock()
			.iter()
			.map(|(_, listener)| Arc::clone(listener))
			.collect();

		debug!(count = listeners.len(), generation = change.generation, "notifying locale subscribers");

		for listener in listeners {
			listener(change);
		}
	}

	/// Register `listener` for locale changes. Listeners run synchronously,
	/// in subscription order, before `set_locale` returns, unless another
	/// delivery is already running, in which case that one delivers the change.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&LocaleChange) + Send + Sync + 'static,
	{
		let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
		self.inner.listeners.lock().push((id, Arc::new(listener)));
		Subscription {
			id,
			store: Arc::downgrade(&self.inner),
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.listeners.lock().len()
	}
}

/// Releases the delivery slot if a listener panics mid-delivery.
struct DrainGuard<'a>(&'a StoreInner);

impl Drop for DrainGuard<'_> {
	fn drop(&mut self) {
		if std::thread::panicking() {
			self.0.delivery.lock().draining = false;
		}
	}
}

impl fmt::Debug for LocaleStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocaleStore")
			.field("cell", &self.cell())
			.field("available", &self.inner.available)
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
	id: u64,
	store: Weak<StoreInner>,
}

impl Subscription {
	pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(inner) = self.store.upgrade() {
			inner.listeners.lock().retain(|(id, _)| *id != self.id);
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::PersistError;
	use crate::storage::MemoryStore;

	struct FailingStore;

	impl PreferenceStore for FailingStore {
		fn load(&self, _key: &str) -> Result<Option<String>, PersistError> {
			Ok(None)
		}

		fn save(&self, _key: &str, _value: &str) -> Result<(), PersistError> {
			Err(PersistError::io(
				"/read-only/prefs.json",
				std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
			))
		}
	}

	fn locale(code: &str) -> Locale {
		Locale::parse(code).unwrap()
	}

	fn store_with(preferences: Arc<dyn PreferenceStore>) -> LocaleStore {
		let available = AvailableLocales::from_codes(["en", "es", "fr"]).unwrap();
		LocaleStore::new(available, locale("en"), preferences)
	}

	#[test]
	fn test_set_then_get() {
		let store = store_with(Arc::new(MemoryStore::new()));
		let outcome = store.set_locale("es").unwrap();
		assert_eq!(
			outcome,
			SetLocaleOutcome::Changed {
				previous: locale("en"),
				current: locale("es"),
				persisted: true,
			}
		);
		assert_eq!(store.locale(), locale("es"));
		assert_eq!(store.generation(), 1);
	}

	#[test]
	fn test_unsupported_locale_leaves_state_untouched() {
		let preferences = Arc::new(MemoryStore::new());
		let store = store_with(preferences.clone());
		let _sub = store.subscribe(|_| panic!("must not notify"));

		let err = store.set_locale("de").unwrap_err();
		assert_eq!(
			err,
			StateError::UnsupportedLocale {
				requested: "de".to_string(),
				available: vec!["en".to_string(), "es".to_string(), "fr".to_string()],
			}
		);
		assert_eq!(err.to_string(), "unsupported locale 'de' (available: en, es, fr)");
		assert_eq!(store.locale(), locale("en"));
		assert_eq!(store.generation(), 0);
		assert_eq!(preferences.get(LOCALE_PREFERENCE_KEY), None);

		assert!(store.set(locale("de")).is_err());
		assert!(store.set_locale("xx-invalid").is_err());
	}

	#[test]
	fn test_same_locale_is_unchanged_and_silent() {
		let preferences = Arc::new(MemoryStore::new());
		let store = store_with(preferences.clone());
		let calls = Arc::new(AtomicU64::new(0));
		let counter = Arc::clone(&calls);
		let _sub = store.subscribe(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		assert_eq!(store.set_locale("en").unwrap(), SetLocaleOutcome::Unchanged);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert_eq!(preferences.get(LOCALE_PREFERENCE_KEY), None);
	}

	#[test]
	fn test_change_is_persisted() {
		let preferences = Arc::new(MemoryStore::new());
		let store = store_with(preferences.clone());
		store.set_locale("fr").unwrap();
		assert_eq!(preferences.get(LOCALE_PREFERENCE_KEY).as_deref(), Some("fr"));
	}

	#[test]
	fn test_persist_failure_does_not_roll_back() {
		let store = store_with(Arc::new(FailingStore));
		let outcome = store.set_locale("es").unwrap();
		assert!(matches!(outcome, SetLocaleOutcome::Changed { persisted: false, .. }));
		assert_eq!(store.locale(), locale("es"));
	}

	#[test]
	fn test_subscribers_run_in_order_and_see_new_state() {
		let store = store_with(Arc::new(MemoryStore::new()));
		let seen = Arc::new(Mutex::new(Vec::new()));

		let _first = {
			let seen = Arc::clone(&seen);
			let reader = store.clone();
			store.subscribe(move |change| {
				seen.lock().push(("first", change.current, reader.locale()));
			})
		};
		let _second = {
			let seen = Arc::clone(&seen);
			store.subscribe(move |change| {
				seen.lock().push(("second", change.current, change.previous));
			})
		};

		store.set_locale("es").unwrap();

		assert_eq!(
			*seen.lock(),
			vec![
				("first", locale("es"), locale("es")),
				("second", locale("es"), locale("en")),
			]
		);
	}

	#[test]
	fn test_drop_unsubscribes() {
		let store = store_with(Arc::new(MemoryStore::new()));
		let calls = Arc::new(AtomicU64::new(0));
		let counter = Arc::clone(&calls);
		let sub = store.subscribe(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		assert_eq!(store.subscriber_count(), 1);

		store.set_locale("es").unwrap();
		sub.unsubscribe();
		store.set_locale("fr").unwrap();

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(store.subscriber_count(), 0);
	}

	#[test]
	fn test_listener_may_reenter_store() {
		let store = store_with(Arc::new(MemoryStore::new()));
		let reentrant = store.clone();
		let _sub = store.subscribe(move |change| {
			if change.current.code() == "es" {
				reentrant.set_locale("fr").unwrap();
			}
		});

		store.set_locale("es").unwrap();
		assert_eq!(store.locale(), locale("fr"));
		assert_eq!(store.generation(), 2);
	}

	#[test]
	fn test_reentrant_change_reaches_later_listeners_last() {
		let store = store_with(Arc::new(MemoryStore::new()));
		let reentrant = store.clone();
		let _redirect = store.subscribe(move |change| {
			if change.current.code() == "es" {
				reentrant.set_locale("fr").unwrap();
			}
		});
		let seen = Arc::new(Mutex::new(Vec::new()));
		let _record = {
			let seen = Arc::clone(&seen);
			store.subscribe(move |change| {
				seen.lock().push((change.current.code(), change.generation));
			})
		};

		store.set_locale("es").unwrap();

		assert_eq!(store.locale(), locale("fr"));
		assert_eq!(*seen.lock(), vec![("es", 1), ("fr", 2)]);
	}

	#[test]
	fn test_panicking_listener_does_not_block_later_changes() {
		let store = store_with(Arc::new(MemoryStore::new()));
		let armed = Arc::new(std::sync::atomic::AtomicBool::new(true));
		let _bomb = {
			let armed = Arc::clone(&armed);
			store.subscribe(move |_| {
				if armed.swap(false, Ordering::SeqCst) {
					panic!("listener failure");
				}
			})
		};
		let calls = Arc::new(AtomicU64::new(0));
		let _count = {
			let calls = Arc::clone(&calls);
			store.subscribe(move |_| {
				calls.fetch_add(1, Ordering::SeqCst);
			})
		};

		let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.set_locale("es")));
		assert!(result.is_err());
		assert_eq!(store.locale(), locale("es"));

		store.set_locale("fr").unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_unavailable_initial_locale_uses_first() {
		let available = AvailableLocales::from_codes(["es", "fr"]).unwrap();
		let store = LocaleStore::new(available, locale("en"), Arc::new(MemoryStore::new()));
		assert_eq!(store.locale(), locale("es"));
	}

	#[test]
	fn test_subscription_outliving_store_is_harmless() {
		let store = store_with(Arc::new(MemoryStore::new()));
		let sub = store.subscribe(|_| {});
		drop(store);
		drop(sub);
	}
}
