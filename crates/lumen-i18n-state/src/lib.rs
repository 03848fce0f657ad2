// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Active-locale state for Lumen.
//!
//! [`TranslationProvider`] owns the lifecycle: configure it, `mount()` it,
//! then hand [`LocaleHandle`]s to anything that reads or changes the locale.
//! Renderers take one [`LocaleSnapshot`] per pass so every binding in the pass
//! sees the same locale.
//!
//! ```
//! use std::sync::Arc;
//!
//! use lumen_common_i18n::{AvailableLocales, Bundle, Locale, MessageCatalog};
//! use lumen_i18n_state::{SetLocaleOutcome, TranslationProvider};
//!
//! let en = Locale::parse("en").unwrap();
//! let available = AvailableLocales::from_codes(["en", "es"]).unwrap();
//! let catalog = MessageCatalog::builder(en)
//!     .bundle(en, Bundle::from_pairs([("nav.home", "Home")]))
//!     .build(&available)
//!     .unwrap();
//!
//! let provider = TranslationProvider::new(Arc::new(catalog), available).mount();
//! let outcome = provider.set_locale("es").unwrap();
//! assert!(outcome.is_changed());
//! assert_eq!(provider.set_locale("es").unwrap(), SetLocaleOutcome::Unchanged);
//! assert!(provider.set_locale("de").is_err());
//! ```

mod error;
mod provider;
mod storage;
mod store;

pub use error::{PersistError, StateError};
pub use provider::{
	resolve_initial_locale, LocaleHandle, LocaleSnapshot, Ready, SystemLocale, TranslationProvider, Uninitialized,
};
pub use storage::{FileStore, MemoryStore, PreferenceStore, LOCALE_PREFERENCE_KEY};
pub use store::{LocaleCell, LocaleChange, LocaleStore, SetLocaleOutcome, Subscription};
