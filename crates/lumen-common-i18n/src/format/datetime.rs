// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Date and time formatting (Gregorian calendar).
//!
//! Inputs are zone-free chrono values. Callers holding a zoned timestamp
//! convert it to the zone they want to display first, so output never depends
//! on the host clock or time zone.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use icu::calendar::{Date, Iso};
use icu::datetime::fieldsets::{
	self,
	enums::{DateAndTimeFieldSet, DateFieldSet, TimeFieldSet},
};
use icu::datetime::input::{DateTime, Time};
use icu::datetime::options::Length;
use tracing::warn;

use crate::error::FormatError;
use crate::format::icu_locale;
use crate::locale::Locale;

type IcuFormatter<F> = icu::datetime::DateTimeFormatter<F>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
	/// Numeric, e.g. `1/15/26`.
	Short,
	/// Abbreviated month, e.g. `Jan 15, 2026`.
	#[default]
	Medium,
	/// Full month name, e.g. `January 15, 2026`.
	Long,
	/// With weekday, e.g. `Thursday, January 15, 2026`.
	Full,
}

impl DateStyle {
	fn length(self) -> Length {
		match self {
			DateStyle::Short => Length::Short,
			DateStyle::Medium => Length::Medium,
			DateStyle::Long | DateStyle::Full => Length::Long,
		}
	}

	fn field_set(self) -> DateFieldSet {
		match self {
			DateStyle::Full => DateFieldSet::YMDE(fieldsets::YMDE::long()),
			style => DateFieldSet::YMD(fieldsets::YMD::for_length(style.length())),
		}
	}

	fn with_time(self, time: TimeStyle) -> DateAndTimeFieldSet {
		match (self, time) {
			(DateStyle::Full, TimeStyle::Short) => DateAndTimeFieldSet::YMDET(fieldsets::YMDE::long().with_time_hm()),
			(DateStyle::Full, TimeStyle::Medium) => {
				DateAndTimeFieldSet::YMDET(fieldsets::YMDE::long().with_time_hms())
			}
			(style, TimeStyle::Short) => {
				DateAndTimeFieldSet::YMDT(fieldsets::YMD::for_length(style.length()).with_time_hm())
			}
			(style, TimeStyle::Medium) => {
				DateAndTimeFieldSet::YMDT(fieldsets::YMD::for_length(style.length()).with_time_hms())
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeStyle {
	/// Hours and minutes.
	#[default]
	Short,
	/// Hours, minutes and seconds.
	Medium,
}

impl TimeStyle {
	fn field_set(self) -> TimeFieldSet {
		match self {
			TimeStyle::Short => TimeFieldSet::T(fieldsets::T::hm().with_length(Length::Short)),
			TimeStyle::Medium => TimeFieldSet::T(fieldsets::T::hms().with_length(Length::Medium)),
		}
	}
}

/// Which parts of a date-time to render. At least one must be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeOptions {
	pub date: Option<DateStyle>,
	pub time: Option<TimeStyle>,
}

impl DateTimeOptions {
	pub fn new(date: DateStyle, time: TimeStyle) -> Self {
		Self {
			date: Some(date),
			time: Some(time),
		}
	}

	pub fn date(style: DateStyle) -> Self {
		Self {
			date: Some(style),
			time: None,
		}
	}

	pub fn time(style: TimeStyle) -> Self {
		Self {
			date: None,
			time: Some(style),
		}
	}
}

enum Parts {
	Date(IcuFormatter<DateFieldSet>),
	Time(IcuFormatter<TimeFieldSet>),
	Both(IcuFormatter<DateAndTimeFieldSet>),
}

/// A validated date-time formatter bound to one locale.
pub struct DateTimeFormatter {
	locale: Locale,
	options: DateTimeOptions,
	parts: Parts,
}

impl fmt::Debug for DateTimeFormatter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DateTimeFormatter")
			.field("locale", &self.locale)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

impl DateTimeFormatter {
	pub fn try_new(locale: Locale, options: DateTimeOptions) -> Result<Self, FormatError> {
		let prefs = icu_locale(locale);
		let missing =
			|err: icu::datetime::DateTimeFormatterLoadError| FormatError::missing_data(locale.code(), "date-time", err);

		let parts = match (options.date, options.time) {
			(Some(date), Some(time)) => {
				Parts::Both(IcuFormatter::try_new(prefs.into(), date.with_time(time)).map_err(missing)?)
			}
			(Some(date), None) => Parts::Date(IcuFormatter::try_new(prefs.into(), date.field_set()).map_err(missing)?),
			(None, Some(time)) => Parts::Time(IcuFormatter::try_new(prefs.into(), time.field_set()).map_err(missing)?),
			(None, None) => {
				return Err(FormatError::invalid_option(
					"date_time",
					"at least one of date or time style is required",
				));
			}
		};
		Ok(Self {
			locale,
			options,
			parts,
		})
	}

	pub fn locale(&self) -> Locale {
		self.locale
	}

	pub fn format(&self, value: &NaiveDateTime) -> String {
		let Some(input) = to_icu(value) else {
			return value.format("%Y-%m-%d %H:%M:%S").to_string();
		};
		match &self.parts {
			Parts::Both(formatter) => formatter.format(&input).to_string(),
			Parts::Date(formatter) => formatter.format(&input).to_string(),
			Parts::Time(formatter) => formatter.format(&input).to_string(),
		}
	}
}

fn to_icu(value: &NaiveDateTime) -> Option<DateTime<Iso>> {
	let date = Date::try_new_iso(value.year(), value.month() as u8, value.day() as u8).ok()?;
	// Leap-second nanoseconds fold into the last second.
	let nanos = value.nanosecond().min(999_999_999);
	let time = Time::try_new(value.hour() as u8, value.minute() as u8, value.second() as u8, nanos).ok()?;
	Some(DateTime { date, time })
}

pub fn format_date(locale: Locale, date: NaiveDate, style: DateStyle) -> String {
	match DateTimeFormatter::try_new(locale, DateTimeOptions::date(style)) {
		Ok(formatter) => formatter.format(&date.and_time(NaiveTime::MIN)),
		Err(err) => {
			warn!(locale = %locale, error = %err, "date formatter unavailable");
			date.format("%Y-%m-%d").to_string()
		}
	}
}

pub fn format_time(locale: Locale, time: NaiveTime, style: TimeStyle) -> String {
	match DateTimeFormatter::try_new(locale, DateTimeOptions::time(style)) {
		Ok(formatter) => formatter.format(&NaiveDate::default().and_time(time)),
		Err(err) => {
			warn!(locale = %locale, error = %err, "time formatter unavailable");
			time.format("%H:%M:%S").to_string()
		}
	}
}

pub fn format_date_time(
	locale: Locale,
	value: &NaiveDateTime,
	options: DateTimeOptions,
) -> Result<String, FormatError> {
	Ok(DateTimeFormatter::try_new(locale, options)?.format(value))
}
