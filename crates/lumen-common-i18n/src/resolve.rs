// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Matching OS locale tags against the available locales.

use crate::locale::{AvailableLocales, Locale};

/// Match a loosely formatted tag (typically the OS locale, e.g. `es_MX.UTF-8`)
/// against `available`, falling back to its language subtag.
pub fn negotiate_locale(available: &AvailableLocales, tag: &str) -> Option<Locale> {
	Locale::negotiate(tag).filter(|locale| available.contains(*locale))
}
