// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization (i18n) support for Lumen.
//!
//! This crate holds everything that does not depend on the currently active
//! locale: the closed set of supported locales, immutable message catalogs
//! with base-locale fallback, and pure formatting functions that take the
//! locale on every call. Mutable locale state lives in `lumen-i18n-state`.
//!
//! # Message Keys
//!
//! Keys use hierarchical dot notation, and nested JSON objects are flattened
//! into it on load:
//!
//! - `dashboard.` prefix for learner dashboard strings
//! - `locale.` prefix for locale controls
//!
//! Example: `dashboard.progress.completed`
//!
//! # Example
//!
//! ```
//! use lumen_common_i18n::{
//!     format_message, format_number, AvailableLocales, Bundle, Locale, MessageCatalog, MessageValues,
//! };
//!
//! let en = Locale::parse("en").unwrap();
//! let es = Locale::parse("es").unwrap();
//! let available = AvailableLocales::new([en, es]).unwrap();
//!
//! let catalog = MessageCatalog::builder(en)
//!     .bundle(en, Bundle::from_pairs([("greeting", "Hello, {name}!")]))
//!     .build(&available)
//!     .unwrap();
//!
//! // Spanish has no translation, so the base template is used.
//! let values = MessageValues::new().with("name", "Ana");
//! assert_eq!(format_message(&catalog, es, "greeting", &values), "Hello, Ana!");
//!
//! assert_eq!(format_number(es, 1234.5), "1.234,5");
//! ```

mod catalog;
mod error;
pub mod format;
mod locale;
mod message;
mod resolve;

pub use catalog::{Bundle, CatalogBuilder, MessageCatalog, Resolved};
pub use error::{CatalogError, FormatError, LocaleError};
pub use format::{
	format_currency, format_date, format_date_time, format_number, format_relative_time, format_time,
	plural_category, CurrencyFormatter, DateStyle, DateTimeFormatter, DateTimeOptions, NumberFormatOptions,
	NumberFormatter, NumberStyle, PluralCategory, RelativeTimeUnit, TimeStyle,
};
pub use locale::{is_rtl, is_supported, locale_info, AvailableLocales, Direction, Locale, LocaleInfo};
pub use message::{
	format_message, interpolate, try_format_message, MessageRef, MessageValue, MessageValues, MAX_NESTING,
};
pub use resolve::negotiate_locale;

pub use locale::{DEFAULT_LOCALE, LOCALES};
