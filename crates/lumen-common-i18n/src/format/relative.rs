// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Relative time phrases ("in 3 days", "hace 1 día") and plural categories.

use fixed_decimal::{Decimal, FloatPrecision, Sign};
use icu::plurals::{PluralCategory as IcuPluralCategory, PluralRules};
use icu_experimental::relativetime::{
	RelativeTimeFormatter, RelativeTimeFormatterOptions, RelativeTimeFormatterPreferences,
};
use tracing::warn;
use writeable::Writeable;

use crate::format::icu_locale;
use crate::format::number::format_number;
use crate::locale::Locale;

/// Fraction digits kept before choosing a plural form, matching `format_number`.
const MAX_FRACTION_DIGITS: i16 = 3;

/// CLDR cardinal plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
	Zero,
	One,
	Two,
	Few,
	Many,
	Other,
}

impl From<IcuPluralCategory> for PluralCategory {
	fn from(category: IcuPluralCategory) -> Self {
		match category {
			IcuPluralCategory::Zero => PluralCategory::Zero,
			IcuPluralCategory::One => PluralCategory::One,
			IcuPluralCategory::Two => PluralCategory::Two,
			IcuPluralCategory::Few => PluralCategory::Few,
			IcuPluralCategory::Many => PluralCategory::Many,
			IcuPluralCategory::Other => PluralCategory::Other,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeTimeUnit {
	Second,
	Minute,
	Hour,
	Day,
	Week,
	Month,
	Year,
}

impl RelativeTimeUnit {
	pub const ALL: [RelativeTimeUnit; 7] = [
		RelativeTimeUnit::Second,
		RelativeTimeUnit::Minute,
		RelativeTimeUnit::Hour,
		RelativeTimeUnit::Day,
		RelativeTimeUnit::Week,
		RelativeTimeUnit::Month,
		RelativeTimeUnit::Year,
	];

	fn name(self) -> &'static str {
		match self {
			RelativeTimeUnit::Second => "second",
			RelativeTimeUnit::Minute => "minute",
			RelativeTimeUnit::Hour => "hour",
			RelativeTimeUnit::Day => "day",
			RelativeTimeUnit::Week => "week",
			RelativeTimeUnit::Month => "month",
			RelativeTimeUnit::Year => "year",
		}
	}

	fn formatter(self, locale: Locale) -> Option<RelativeTimeFormatter> {
		let prefs = RelativeTimeFormatterPreferences::from(icu_locale(locale));
		let options = RelativeTimeFormatterOptions::default();
		let formatter = match self {
			RelativeTimeUnit::Second => RelativeTimeFormatter::try_new_long_second(prefs, options),
			RelativeTimeUnit::Minute => RelativeTimeFormatter::try_new_long_minute(prefs, options),
			RelativeTimeUnit::Hour => RelativeTimeFormatter::try_new_long_hour(prefs, options),
			RelativeTimeUnit::Day => RelativeTimeFormatter::try_new_long_day(prefs, options),
			RelativeTimeUnit::Week => RelativeTimeFormatter::try_new_long_week(prefs, options),
			RelativeTimeUnit::Month => RelativeTimeFormatter::try_new_long_month(prefs, options),
			RelativeTimeUnit::Year => RelativeTimeFormatter::try_new_long_year(prefs, options),
		};
		formatter
			.map_err(|err| warn!(locale = %locale, unit = self.name(), error = %err, "relative time data unavailable"))
			.ok()
	}
}

/// `|n|` rounded the way it is displayed. `None` for non-finite input.
fn magnitude(n: f64) -> Option<Decimal> {
	let mut decimal = Decimal::try_from_f64(n.abs(), FloatPrecision::RoundTrip).ok()?;
	if *decimal.magnitude_range().start() < -MAX_FRACTION_DIGITS {
		decimal.round(-MAX_FRACTION_DIGITS);
	}
	decimal.trim_end();
	Some(decimal)
}

/// The cardinal plural category of `n` in `locale`.
pub fn plural_category(locale: Locale, n: f64) -> PluralCategory {
	let Some(decimal) = magnitude(n) else {
		return PluralCategory::Other;
	};
	match PluralRules::try_new_cardinal(icu_locale(locale).into()) {
		Ok(rules) => rules.category_for(&decimal).into(),
		Err(err) => {
			warn!(locale = %locale, error = %err, "plural rules unavailable");
			PluralCategory::Other
		}
	}
}

/// Format `value` units relative to now. Negative values (including `-0`)
/// are in the past, everything else is in the future.
pub fn format_relative_time(locale: Locale, value: f64, unit: RelativeTimeUnit) -> String {
	let fallback = || format!("{} {}", format_number(locale, value), unit.name());

	let Some(mut decimal) = magnitude(value) else {
		return fallback();
	};
	if value.is_sign_negative() {
		decimal.set_sign(Sign::Negative);
	}

	match unit.formatter(locale) {
		Some(formatter) => formatter.format(decimal).write_to_string().into_owned(),
		None => fallback(),
	}
}
