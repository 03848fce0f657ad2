// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale-aware decimal and percent formatting.

use std::fmt;

use fixed_decimal::{Decimal, FloatPrecision, Sign};
use icu::decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu::decimal::DecimalFormatter;
use tracing::warn;

use crate::error::FormatError;
use crate::format::icu_locale;
use crate::locale::Locale;

const MAX_FRACTION_DIGITS: u8 = 20;
const MAX_INTEGER_DIGITS: u8 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberStyle {
	#[default]
	Decimal,
	/// Multiplies by 100 and applies the locale's percent pattern.
	Percent,
}

/// Options for [`NumberFormatter`].
///
/// Unset fraction bounds take the style defaults (0–3 digits for decimals,
/// 0 for percents), widened if needed to stay consistent with the other bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatOptions {
	pub style: NumberStyle,
	pub use_grouping: bool,
	pub minimum_integer_digits: u8,
	pub minimum_fraction_digits: Option<u8>,
	pub maximum_fraction_digits: Option<u8>,
}

impl Default for NumberFormatOptions {
	fn default() -> Self {
		Self {
			style: NumberStyle::Decimal,
			use_grouping: true,
			minimum_integer_digits: 1,
			minimum_fraction_digits: None,
			maximum_fraction_digits: None,
		}
	}
}

impl NumberFormatOptions {
	pub fn percent() -> Self {
		Self {
			style: NumberStyle::Percent,
			..Self::default()
		}
	}

	/// Exactly `digits` fraction digits.
	pub fn fixed(digits: u8) -> Self {
		Self::default().fraction_digits(digits, digits)
	}

	pub fn style(mut self, style: NumberStyle) -> Self {
		self.style = style;
		self
	}

	pub fn grouping(mut self, use_grouping: bool) -> Self {
		self.use_grouping = use_grouping;
		self
	}

	pub fn minimum_integer_digits(mut self, digits: u8) -> Self {
		self.minimum_integer_digits = digits;
		self
	}

	pub fn fraction_digits(mut self, min: u8, max: u8) -> Self {
		self.minimum_fraction_digits = Some(min);
		self.maximum_fraction_digits = Some(max);
		self
	}

	pub fn minimum_fraction_digits(mut self, digits: u8) -> Self {
		self.minimum_fraction_digits = Some(digits);
		self
	}

	pub fn maximum_fraction_digits(mut self, digits: u8) -> Self {
		self.maximum_fraction_digits = Some(digits);
		self
	}
}

/// A validated number formatter bound to one locale.
pub struct NumberFormatter {
	locale: Locale,
	style: NumberStyle,
	min_integer: i16,
	min_fraction: i16,
	max_fraction: i16,
	decimal: DecimalFormatter,
}

impl fmt::Debug for NumberFormatter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NumberFormatter")
			.field("locale", &self.locale)
			.field("style", &self.style)
			.field("min_integer", &self.min_integer)
			.field("min_fraction", &self.min_fraction)
			.field("max_fraction", &self.max_fraction)
			.finish_non_exhaustive()
	}
}

impl NumberFormatter {
	pub fn try_new(locale: Locale, options: NumberFormatOptions) -> Result<Self, FormatError> {
		if options.minimum_integer_digits == 0 || options.minimum_integer_digits > MAX_INTEGER_DIGITS {
			return Err(FormatError::invalid_option(
				"minimum_integer_digits",
				format!("must be between 1 and {MAX_INTEGER_DIGITS}"),
			));
		}

		for (name, value) in [
			("minimum_fraction_digits", options.minimum_fraction_digits),
			("maximum_fraction_digits", options.maximum_fraction_digits),
		] {
			if value.is_some_and(|v| v > MAX_FRACTION_DIGITS) {
				return Err(FormatError::invalid_option(
					name,
					format!("must be at most {MAX_FRACTION_DIGITS}"),
				));
			}
		}

		let default_max = match options.style {
			NumberStyle::Decimal => 3,
			NumberStyle::Percent => 0,
		};
		let (min_fraction, max_fraction) =
			match (options.minimum_fraction_digits, options.maximum_fraction_digits) {
				(Some(min), Some(max)) if min > max => {
					return Err(FormatError::invalid_option(
						"minimum_fraction_digits",
						format!("{min} exceeds maximum_fraction_digits {max}"),
					));
				}
				(Some(min), Some(max)) => (min, max),
				(Some(min), None) => (min, min.max(default_max)),
				(None, Some(max)) => (0, max),
				(None, None) => (0, default_max),
			};

		let mut icu_options = DecimalFormatterOptions::default();
		// CLDR's minimum-grouping rule would leave four-digit values ungrouped in
		// some locales; grouping is either always on or off here.
		icu_options.grouping_strategy = Some(if options.use_grouping {
			GroupingStrategy::Always
		} else {
			GroupingStrategy::Never
		});
		let decimal = DecimalFormatter::try_new(icu_locale(locale).into(), icu_options)
			.map_err(|err| FormatError::missing_data(locale.code(), "decimal", err))?;

		Ok(Self {
			locale,
			style: options.style,
			min_integer: i16::from(options.minimum_integer_digits),
			min_fraction: i16::from(min_fraction),
			max_fraction: i16::from(max_fraction),
			decimal,
		})
	}

	pub fn locale(&self) -> Locale {
		self.locale
	}

	pub fn format(&self, value: f64) -> String {
		let scaled = match self.style {
			NumberStyle::Decimal => value,
			NumberStyle::Percent => value * 100.0,
		};

		let body = if scaled.is_nan() {
			"NaN".to_string()
		} else if scaled.is_infinite() {
			if scaled < 0.0 { "-∞" } else { "∞" }.to_string()
		} else {
			self.format_finite(scaled)
		};

		match self.style {
			NumberStyle::Decimal => body,
			NumberStyle::Percent => percent_pattern(self.locale).replace("{0}", &body),
		}
	}

	fn format_finite(&self, value: f64) -> String {
		let Ok(mut decimal) = Decimal::try_from_f64(value.abs(), FloatPrecision::RoundTrip) else {
			return value.to_string();
		};
		if *decimal.magnitude_range().start() < -self.max_fraction {
			decimal.round(-self.max_fraction);
		}
		decimal.trim_end();
		decimal.pad_end(-self.min_fraction);
		decimal.pad_start(self.min_integer);

		// A value that rounds to zero is printed unsigned.
		if value < 0.0 && decimal.to_string().bytes().any(|b| matches!(b, b'1'..=b'9')) {
			decimal.set_sign(Sign::Negative);
		}
		self.decimal.format(&decimal).to_string()
	}
}

/// `{0}` is the formatted number.
fn percent_pattern(locale: Locale) -> &'static str {
	match locale.code() {
		"es" | "de" => "{0}\u{a0}%",
		"fr" => "{0}\u{202f}%",
		"ar" => "{0}\u{66a}\u{61c}",
		_ => "{0}%",
	}
}

/// Format with default decimal options.
pub fn format_number(locale: Locale, value: f64) -> String {
	match NumberFormatter::try_new(locale, NumberFormatOptions::default()) {
		Ok(formatter) => formatter.format(value),
		Err(err) => {
			warn!(locale = %locale, error = %err, "decimal formatter unavailable");
			value.to_string()
		}
	}
}
