// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Currency formatting.

use crate::error::FormatError;
use crate::format::number::{NumberFormatOptions, NumberFormatter};
use crate::locale::Locale;

/// Default symbol and minor-unit digits for currencies with a known symbol.
/// Any other well-formed ISO code renders as the code itself with two digits.
static CURRENCIES: &[(&str, &str, u8)] = &[
	("USD", "$", 2),
	("EUR", "€", 2),
	("GBP", "£", 2),
	("JPY", "¥", 0),
	("BRL", "R$", 2),
	("MXN", "MX$", 2),
	("CAD", "CA$", 2),
	("AUD", "A$", 2),
	("CHF", "CHF", 2),
	("SAR", "SAR", 2),
];

/// Symbols a locale spells differently from the default: (locale, code, symbol).
static LOCAL_SYMBOLS: &[(&str, &str, &str)] = &[
	("es", "USD", "US$"),
	("pt", "USD", "US$"),
	("ar", "USD", "US$"),
	("fr", "USD", "$US"),
	("fr", "CAD", "$CA"),
	("ar", "SAR", "ر.س.\u{200f}"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
	/// Symbol, separator, number (`$1.00`, `R$ 1,00`).
	Prefix(&'static str),
	/// Number, separator, symbol (`1,00 €`).
	Suffix(&'static str),
}

fn placement(locale: Locale) -> Placement {
	match locale.code() {
		"en" => Placement::Prefix(""),
		"pt" => Placement::Prefix("\u{a0}"),
		_ => Placement::Suffix("\u{a0}"),
	}
}

/// A validated currency formatter bound to one locale and currency.
#[derive(Debug)]
pub struct CurrencyFormatter {
	code: String,
	symbol: &'static str,
	placement: Placement,
	number: NumberFormatter,
}

impl CurrencyFormatter {
	pub fn try_new(locale: Locale, currency_code: &str) -> Result<Self, FormatError> {
		if currency_code.len() != 3 || !currency_code.bytes().all(|b| b.is_ascii_alphabetic()) {
			return Err(FormatError::InvalidCurrency(currency_code.to_string()));
		}
		let code = currency_code.to_ascii_uppercase();

		let known = CURRENCIES.iter().find(|(c, _, _)| *c == code);
		let digits = known.map(|(_, _, d)| *d).unwrap_or(2);
		let symbol = LOCAL_SYMBOLS
			.iter()
			.find(|(l, c, _)| *l == locale.code() && *c == code)
			.map(|(_, _, s)| *s)
			.or_else(|| known.map(|(_, s, _)| *s))
			.unwrap_or("");

		let number = NumberFormatter::try_new(locale, NumberFormatOptions::fixed(digits))?;
		Ok(Self {
			code,
			symbol,
			placement: placement(locale),
			number,
		})
	}

	pub fn locale(&self) -> Locale {
		self.number.locale()
	}

	pub fn currency_code(&self) -> &str {
		&self.code
	}

	pub fn format(&self, value: f64) -> String {
		let symbol = if self.symbol.is_empty() {
			self.code.as_str()
		} else {
			self.symbol
		};

		// The locale's sign comes from the signed rendering; the symbol goes
		// between it and the digits.
		let magnitude = self.number.format(value.abs());
		let signed = self.number.format(value);
		let sign = signed.strip_suffix(magnitude.as_str()).unwrap_or("");

		match self.placement {
			Placement::Prefix(sep) => format!("{sign}{symbol}{sep}{magnitude}"),
			Placement::Suffix(sep) => format!("{sign}{magnitude}{sep}{symbol}"),
		}
	}
}

/// Format `value` as an amount of `currency_code` (ISO 4217, case-insensitive).
pub fn format_currency(locale: Locale, value: f64, currency_code: &str) -> Result<String, FormatError> {
	Ok(CurrencyFormatter::try_new(locale, currency_code)?.format(value))
}
