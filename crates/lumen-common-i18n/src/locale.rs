// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale metadata, direction support and the ordered set of available locales.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::LocaleError;

/// Text direction for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
	/// Left-to-right (e.g., English, Spanish)
	#[default]
	Ltr,
	/// Right-to-left (e.g., Arabic)
	Rtl,
}

impl Direction {
	pub fn is_rtl(&self) -> bool {
		matches!(self, Direction::Rtl)
	}
}

/// Metadata about a supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
	/// Canonical tag (e.g., "en", "es", "ar")
	pub code: &'static str,
	/// English name of the language
	pub name: &'static str,
	/// Native name of the language, used as the display label in locale controls
	pub native_name: &'static str,
	/// Text direction
	pub direction: Direction,
}

/// Default locale used as fallback.
pub const DEFAULT_LOCALE: &str = "en";

/// All locales the runtime knows how to format. The set is closed; anything
/// else is rejected at the boundary.
pub static LOCALES: &[LocaleInfo] = &[
	LocaleInfo {
		code: "en",
		name: "English",
		native_name: "English",
		direction: Direction::Ltr,
	},
	LocaleInfo {
		code: "es",
		name: "Spanish",
		native_name: "Español",
		direction: Direction::Ltr,
	},
	LocaleInfo {
		code: "fr",
		name: "French",
		native_name: "Français",
		direction: Direction::Ltr,
	},
	LocaleInfo {
		code: "de",
		name: "German",
		native_name: "Deutsch",
		direction: Direction::Ltr,
	},
	LocaleInfo {
		code: "pt",
		name: "Portuguese",
		native_name: "Português",
		direction: Direction::Ltr,
	},
	LocaleInfo {
		code: "ar",
		name: "Arabic",
		native_name: "العربية",
		direction: Direction::Rtl,
	},
];

/// A supported locale.
///
/// Cheap to copy; always refers to an entry of [`LOCALES`], so holding a
/// `Locale` is proof the tag is known.
#[derive(Clone, Copy)]
pub struct Locale(&'static LocaleInfo);

impl Locale {
	/// Look up a locale by its exact canonical code.
	pub fn parse(code: &str) -> Option<Locale> {
		LOCALES.iter().find(|l| l.code == code).map(Locale)
	}

	/// Match a loosely formatted tag (`es_MX`, `PT-br`, `fr.UTF-8`) against the
	/// known locales, falling back to the language subtag.
	pub fn negotiate(tag: &str) -> Option<Locale> {
		let tag = tag.split('.').next().unwrap_or_default().trim();
		if tag.is_empty() {
			return None;
		}

		let normalized = tag.replace('_', "-").to_lowercase();
		if let Some(info) = LOCALES.iter().find(|l| l.code.to_lowercase() == normalized) {
			return Some(Locale(info));
		}

		let language = normalized.split('-').next()?;
		LOCALES.iter().find(|l| l.code == language).map(Locale)
	}

	/// The locale used when nothing else resolves.
	pub fn default_locale() -> Locale {
		Locale::parse(DEFAULT_LOCALE).unwrap_or(Locale(&LOCALES[0]))
	}

	/// Iterate over every known locale in table order.
	pub fn all() -> impl Iterator<Item = Locale> {
		LOCALES.iter().map(Locale)
	}

	pub fn code(&self) -> &'static str {
		self.0.code
	}

	pub fn info(&self) -> &'static LocaleInfo {
		self.0
	}

	pub fn name(&self) -> &'static str {
		self.0.name
	}

	pub fn native_name(&self) -> &'static str {
		self.0.native_name
	}

	pub fn direction(&self) -> Direction {
		self.0.direction
	}

	pub fn is_rtl(&self) -> bool {
		self.0.direction.is_rtl()
	}
}

impl PartialEq for Locale {
	fn eq(&self, other: &Self) -> bool {
		self.0.code == other.0.code
	}
}

impl Eq for Locale {}

impl Hash for Locale {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.code.hash(state);
	}
}

impl fmt::Debug for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Locale").field(&self.0.code).finish()
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0.code)
	}
}

impl std::str::FromStr for Locale {
	type Err = LocaleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Locale::parse(s).ok_or_else(|| LocaleError::UnknownLocale(s.to_string()))
	}
}

/// The ordered, fixed set of locales a running application offers.
///
/// Order is the configured display order. There is no mutating API: once
/// built, the sequence is stable for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableLocales {
	locales: Vec<Locale>,
}

impl AvailableLocales {
	pub fn new(locales: impl IntoIterator<Item = Locale>) -> Result<Self, LocaleError> {
		let mut out: Vec<Locale> = Vec::new();
		for locale in locales {
			if out.contains(&locale) {
				return Err(LocaleError::DuplicateLocale(locale.code().to_string()));
			}
			out.push(locale);
		}
		if out.is_empty() {
			return Err(LocaleError::Empty);
		}
		Ok(Self { locales: out })
	}

	/// Build from configured codes, rejecting unknown tags.
	pub fn from_codes<I, S>(codes: I) -> Result<Self, LocaleError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let locales = codes
			.into_iter()
			.map(|code| code.as_ref().parse::<Locale>())
			.collect::<Result<Vec<_>, _>>()?;
		Self::new(locales)
	}

	/// Every known locale, in table order.
	pub fn all() -> Self {
		Self {
			locales: Locale::all().collect(),
		}
	}

	pub fn as_slice(&self) -> &[Locale] {
		&self.locales
	}

	pub fn iter(&self) -> impl Iterator<Item = Locale> + '_ {
		self.locales.iter().copied()
	}

	pub fn len(&self) -> usize {
		self.locales.len()
	}

	pub fn is_empty(&self) -> bool {
		self.locales.is_empty()
	}

	pub fn contains(&self, locale: Locale) -> bool {
		self.locales.contains(&locale)
	}

	/// Find an available locale by exact code.
	pub fn find(&self, code: &str) -> Option<Locale> {
		self.locales.iter().copied().find(|l| l.code() == code)
	}

	pub fn position(&self, locale: Locale) -> Option<usize> {
		self.locales.iter().position(|l| *l == locale)
	}

	pub fn first(&self) -> Locale {
		self.locales[0]
	}
}

impl<'a> IntoIterator for &'a AvailableLocales {
	type Item = &'a Locale;
	type IntoIter = std::slice::Iter<'a, Locale>;

	fn into_iter(self) -> Self::IntoIter {
		self.locales.iter()
	}
}

/// Get metadata for a locale.
///
/// Returns `None` if the locale is not supported.
pub fn locale_info(locale: &str) -> Option<&'static LocaleInfo> {
	LOCALES.iter().find(|l| l.code == locale)
}

/// Check if a locale uses right-to-left text direction.
///
/// Returns `false` for unsupported locales.
pub fn is_rtl(locale: &str) -> bool {
	locale_info(locale).is_some_and(|info| info.direction == Direction::Rtl)
}

/// Check if a locale is supported.
pub fn is_supported(locale: &str) -> bool {
	LOCALES.iter().any(|l| l.code == locale)
}
