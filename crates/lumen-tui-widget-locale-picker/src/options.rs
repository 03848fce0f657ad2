// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lumen_common_i18n::{AvailableLocales, Locale};
use lumen_i18n_state::{LocaleHandle, LocaleSnapshot, SetLocaleOutcome};
use lumen_tui_core::Action;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// One entry of a locale control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleOption {
	pub locale: Locale,
	/// Native language name.
	pub label: &'static str,
	pub selected: bool,
}

/// Options for every available locale, in configured order, with the
/// snapshot's locale marked selected.
pub fn locale_options(snapshot: &LocaleSnapshot, available: &AvailableLocales) -> Vec<LocaleOption> {
	let active = snapshot.locale();
	available
		.iter()
		.map(|locale| LocaleOption {
			locale,
			label: locale.native_name(),
			selected: locale == active,
		})
		.collect()
}

pub(crate) fn selected_index(options: &[LocaleOption]) -> usize {
	options.iter().position(|o| o.selected).unwrap_or(0)
}

/// Ask the store to switch and report the result as an action.
pub(crate) fn switch_locale(handle: &LocaleHandle, locale: Locale) -> Vec<Action> {
	match handle.set(locale) {
		Ok(SetLocaleOutcome::Changed { previous, current, .. }) => {
			vec![Action::LocaleChanged { previous, current }]
		}
		Ok(SetLocaleOutcome::Unchanged) => Vec::new(),
		Err(e) => {
			tracing::warn!(error = %e, "locale control could not switch locale");
			vec![Action::LocaleRejected {
				requested: locale.code().to_string(),
				reason: e.to_string(),
			}]
		}
	}
}

pub(crate) fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
	let width = UnicodeWidthStr::width(s);
	if width <= max_width {
		return s.to_string();
	}
	if max_width == 0 {
		return String::new();
	}

	let mut result = String::new();
	let mut current_width = 0;
	let target_width = max_width - 1;

	for c in s.chars() {
		let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
		if current_width + char_width > target_width {
			break;
		}
		result.push(c);
		current_width += char_width;
	}
	result.push('…');
	result
}
