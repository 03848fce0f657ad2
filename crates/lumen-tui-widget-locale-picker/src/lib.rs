// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale controls.
//!
//! [`LocaleSelect`] and [`LocaleButtons`] are plain stateful widgets over a
//! slice of [`LocaleOption`]s. [`LocaleSwitcher`] and [`LocaleButtonBar`] wrap
//! them as components that read and write the locale store.

mod buttons;
mod options;
mod select;
mod switcher;

pub use buttons::{LocaleButtons, LocaleButtonsState};
pub use options::{locale_options, LocaleOption};
pub use select::{select_width, LocaleSelect, LocaleSelectState};
pub use switcher::{LocaleButtonBar, LocaleSwitcher};
