// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lumen_tui_core::TextDirection;
use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Modifier, Style},
	text::{Line, Span},
	widgets::StatefulWidget,
};
use unicode_width::UnicodeWidthStr;

use crate::options::{selected_index, truncate_with_ellipsis, LocaleOption};

const SELECTED_MARKER: &str = "●";
const CLOSED_MARKER: &str = "▾";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocaleSelectState {
	open: bool,
	highlighted: usize,
}

impl LocaleSelectState {
	pub fn is_open(&self) -> bool {
		self.open
	}

	pub fn highlighted(&self) -> usize {
		self.highlighted
	}

	/// Open with the highlight on `selected`.
	pub fn open(&mut self, selected: usize) {
		self.open = true;
		self.highlighted = selected;
	}

	pub fn close(&mut self) {
		self.open = false;
	}

	pub fn highlight_next(&mut self, total: usize) {
		if total > 0 {
			self.highlighted = (self.highlighted + 1).min(total - 1);
		}
	}

	pub fn highlight_prev(&mut self) {
		self.highlighted = self.highlighted.saturating_sub(1);
	}

	pub fn highlight_first(&mut self) {
		self.highlighted = 0;
	}

	pub fn highlight_last(&mut self, total: usize) {
		self.highlighted = total.saturating_sub(1);
	}

	pub fn clamp_to_total(&mut self, total: usize) {
		self.highlighted = self.highlighted.min(total.saturating_sub(1));
	}
}

/// Dropdown over the available locales.
///
/// Closed it is a single row with the active locale's label. Open it draws
/// one row per option in order; the selected option carries `●` and the
/// highlighted row is reversed.
#[derive(Debug, Clone)]
pub struct LocaleSelect<'a> {
	options: &'a [LocaleOption],
	style: Style,
	focused: bool,
	direction: TextDirection,
}

impl<'a> LocaleSelect<'a> {
	pub fn new(options: &'a [LocaleOption]) -> Self {
		Self {
			options,
			style: Style::default(),
			focused: false,
			direction: TextDirection::default(),
		}
	}

	pub fn style(mut self, style: Style) -> Self {
		self.style = style;
		self
	}

	pub fn focused(mut self, focused: bool) -> Self {
		self.focused = focused;
		self
	}

	pub fn direction(mut self, direction: TextDirection) -> Self {
		self.direction = direction;
		self
	}

	/// Rows needed to draw everything in `state`.
	pub fn height(&self, state: &LocaleSelectState) -> u16 {
		if state.is_open() {
			self.options.len() as u16
		} else {
			1
		}
	}

	fn render_closed(&self, area: Rect, buf: &mut Buffer) {
		let label = self.options[selected_index(self.options)].label;
		let style = if self.focused {
			self.style.add_modifier(Modifier::BOLD)
		} else {
			self.style
		};

		// Marker plus separating space.
		let label = truncate_with_ellipsis(label, (area.width as usize).saturating_sub(2));
		let line = if self.direction.is_rtl() {
			Line::from(vec![Span::styled(CLOSED_MARKER, style), Span::raw(" "), Span::styled(label, style)])
		} else {
			Line::from(vec![Span::styled(label, style), Span::raw(" "), Span::styled(CLOSED_MARKER, style)])
		};
		self.set_aligned(area, area.y, &line, buf);
	}

	fn render_open(&self, area: Rect, buf: &mut Buffer, state: &LocaleSelectState) {
		for (idx, option) in self.options.iter().enumerate().take(area.height as usize) {
			let y = area.y + idx as u16;
			let row_style = if idx == state.highlighted {
				self.style.add_modifier(Modifier::REVERSED)
			} else {
				self.style
			};
			buf.set_style(Rect::new(area.x, y, area.width, 1), row_style);

			let marker = if option.selected { SELECTED_MARKER } else { " " };
			let label = truncate_with_ellipsis(option.label, (area.width as usize).saturating_sub(2));
			let line = if self.direction.is_rtl() {
				Line::from(vec![Span::raw(label), Span::raw(" "), Span::raw(marker)])
			} else {
				Line::from(vec![Span::raw(marker), Span::raw(" "), Span::raw(label)])
			}
			.style(row_style);
			self.set_aligned(area, y, &line, buf);
		}
	}

	fn set_aligned(&self, area: Rect, y: u16, line: &Line, buf: &mut Buffer) {
		let width = (line.width() as u16).min(area.width);
		let x = area.x + self.direction.align_start(area.width, width);
		buf.set_line(x, y, line, width);
	}
}

impl StatefulWidget for LocaleSelect<'_> {
	type State = LocaleSelectState;

	fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
		if area.height == 0 || area.width == 0 || self.options.is_empty() {
			return;
		}

		state.clamp_to_total(self.options.len());

		if state.open {
			self.render_open(area, buf, state);
		} else {
			self.render_closed(area, buf);
		}
	}
}

/// Width of the widest open row, for layout.
pub fn select_width(options: &[LocaleOption]) -> u16 {
	options
		.iter()
		.map(|o| UnicodeWidthStr::width(o.label) + 2)
		.max()
		.unwrap_or(0) as u16
}
