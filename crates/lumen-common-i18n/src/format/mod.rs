// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale-aware value formatting, backed by ICU4X compiled CLDR data.
//!
//! Every function takes the locale explicitly; nothing here reads ambient
//! state, so the same inputs always produce the same output.

pub mod currency;
pub mod datetime;
pub mod number;
pub mod relative;

pub use currency::{format_currency, CurrencyFormatter};
pub use datetime::{
	format_date, format_date_time, format_time, DateStyle, DateTimeFormatter, DateTimeOptions, TimeStyle,
};
pub use number::{format_number, NumberFormatOptions, NumberFormatter, NumberStyle};
pub use relative::{format_relative_time, plural_category, PluralCategory, RelativeTimeUnit};

use crate::locale::Locale;

/// The ICU locale for a supported locale code.
pub(crate) fn icu_locale(locale: Locale) -> icu::locale::Locale {
	locale.code().parse().unwrap_or(icu::locale::locale!("und"))
}
