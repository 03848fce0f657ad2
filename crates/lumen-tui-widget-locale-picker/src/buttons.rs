// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lumen_tui_core::TextDirection;
use ratatui::{
	buffer::Buffer,
	layout::{Position, Rect},
	style::{Modifier, Style},
	text::Span,
	widgets::StatefulWidget,
};
use unicode_width::UnicodeWidthStr;

use crate::options::LocaleOption;

/// Keyboard focus plus the cells each button occupied in the last render.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocaleButtonsState {
	focused: usize,
	hit_areas: Vec<Rect>,
}

impl LocaleButtonsState {
	pub fn focused(&self) -> usize {
		self.focused
	}

	pub fn set_focused(&mut self, index: usize) {
		self.focused = index;
	}

	pub fn focus_next(&mut self, total: usize) {
		if total > 0 {
			self.focused = (self.focused + 1).min(total - 1);
		}
	}

	pub fn focus_prev(&mut self) {
		self.focused = self.focused.saturating_sub(1);
	}

	pub fn clamp_to_total(&mut self, total: usize) {
		self.focused = self.focused.min(total.saturating_sub(1));
	}

	/// Index of the button drawn at (`column`, `row`), if any.
	pub fn hit_test(&self, column: u16, row: u16) -> Option<usize> {
		let position = Position::new(column, row);
		self.hit_areas.iter().position(|area| area.contains(position))
	}
}

/// One `[Label]` per option. The active locale is bold and reversed, the
/// keyboard-focused button is underlined while the row has focus.
///
/// RTL locales lay the buttons out right to left from the right edge.
/// Buttons that do not fit are not drawn and cannot be hit.
#[derive(Debug, Clone)]
pub struct LocaleButtons<'a> {
	options: &'a [LocaleOption],
	style: Style,
	focused: bool,
	direction: TextDirection,
}

impl<'a> LocaleButtons<'a> {
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

	/// Total width of all buttons with single-space gaps.
	pub fn width(&self) -> u16 {
		let buttons: usize = self.options.iter().map(|o| button_width(o.label)).sum();
		(buttons + self.options.len().saturating_sub(1)) as u16
	}
}

fn button_width(label: &str) -> usize {
	UnicodeWidthStr::width(label) + 2
}

impl StatefulWidget for LocaleButtons<'_> {
	type State = LocaleButtonsState;

	fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
		state.hit_areas = vec![Rect::default(); self.options.len()];
		if area.height == 0 || area.width == 0 || self.options.is_empty() {
			return;
		}

		state.clamp_to_total(self.options.len());

		let is_rtl = self.direction.is_rtl();
		let total_width = self.width().min(area.width);
		let mut x = area.x + self.direction.align_start(area.width, total_width);

		let mut order: Vec<usize> = (0..self.options.len()).collect();
		if is_rtl {
			order.reverse();
		}

		for idx in order {
			let option = &self.options[idx];
			let width = button_width(option.label) as u16;
			if x + width > area.right() {
				break;
			}

			let mut style = self.style;
			if option.selected {
				style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
			}
			if self.focused && idx == state.focused {
				style = style.add_modifier(Modifier::UNDERLINED);
			}

			let text = format!("[{}]", option.label);
			buf.set_span(x, area.y, &Span::styled(text, style), width);
			state.hit_areas[idx] = Rect::new(x, area.y, width, 1);

			x += width + 1;
		}
	}
}
