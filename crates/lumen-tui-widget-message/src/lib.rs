// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative message rendering.
//!
//! A [`MessageDescriptor`] names a catalog message, its placeholder values and
//! an optional default. [`render_message`] resolves it against a
//! [`LocaleSnapshot`]; [`TranslatedText`] draws the result aligned for the
//! locale's direction; [`MessageView`] keeps it current across locale changes.

use lumen_common_i18n::{interpolate, MessageValue, MessageValues};
use lumen_i18n_state::{LocaleHandle, LocaleSnapshot};
use lumen_tui_component::{Component, LocaleWatch, RenderContext, TextDirection};
use lumen_tui_core::{Action, ComponentError, Event};
use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::Style,
	text::Line,
	widgets::Widget,
	Frame,
};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDescriptor {
	pub id: String,
	pub values: MessageValues,
	/// Shown, with the same placeholder substitution, when no catalog entry
	/// exists in either the active or the base locale.
	pub default_message: Option<String>,
}

impl MessageDescriptor {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	pub fn value(mut self, name: impl Into<String>, value: impl Into<MessageValue>) -> Self {
		self.values.insert(name, value);
		self
	}

	pub fn values(mut self, values: MessageValues) -> Self {
		self.values = values;
		self
	}

	pub fn default_message(mut self, default_message: impl Into<String>) -> Self {
		self.default_message = Some(default_message.into());
		self
	}
}

/// Resolve `descriptor` in the snapshot's locale.
///
/// Order: active locale, base locale, interpolated default message, message id.
pub fn render_message(snapshot: &LocaleSnapshot, descriptor: &MessageDescriptor) -> String {
	if let Some(text) = snapshot.try_t_with(&descriptor.id, &descriptor.values) {
		return text;
	}

	match &descriptor.default_message {
		Some(default_message) => {
			debug!(key = %descriptor.id, locale = %snapshot.locale(), "rendering default message");
			interpolate(snapshot.catalog(), snapshot.locale(), default_message, &descriptor.values)
		}
		None => descriptor.id.clone(),
	}
}

/// One resolved message. Lines are split on `\n` and clipped to the area.
#[derive(Debug, Clone)]
pub struct TranslatedText<'a> {
	snapshot: &'a LocaleSnapshot,
	descriptor: &'a MessageDescriptor,
	style: Style,
	direction: Option<TextDirection>,
}

impl<'a> TranslatedText<'a> {
	pub fn new(snapshot: &'a LocaleSnapshot, descriptor: &'a MessageDescriptor) -> Self {
		Self {
			snapshot,
			descriptor,
			style: Style::default(),
			direction: None,
		}
	}

	pub fn style(mut self, style: Style) -> Self {
		self.style = style;
		self
	}

	/// Override the direction taken from the snapshot locale.
	pub fn direction(mut self, direction: TextDirection) -> Self {
		self.direction = Some(direction);
		self
	}
}

impl Widget for TranslatedText<'_> {
	fn render(self, area: Rect, buf: &mut Buffer) {
		if area.is_empty() {
			return;
		}

		let direction = self
			.direction
			.unwrap_or_else(|| self.snapshot.direction().into());
		let text = render_message(self.snapshot, self.descriptor);

		for (row, content) in text.lines().take(area.height as usize).enumerate() {
			let line = Line::styled(content, self.style);
			let width = (line.width() as u16).min(area.width);
			let x = area.x + direction.align_start(area.width, width);
			buf.set_line(x, area.y + row as u16, &line, width);
		}
	}
}

/// A [`TranslatedText`] that subscribes to the locale store on mount.
pub struct MessageView {
	id: String,
	handle: LocaleHandle,
	descriptor: MessageDescriptor,
	style: Style,
	watch: LocaleWatch,
}

impl MessageView {
	pub fn new(id: impl Into<String>, handle: LocaleHandle, descriptor: MessageDescriptor) -> Self {
		Self {
			id: id.into(),
			handle,
			descriptor,
			style: Style::default(),
			watch: LocaleWatch::new(),
		}
	}

	pub fn style(mut self, style: Style) -> Self {
		self.style = style;
		self
	}

	pub fn descriptor(&self) -> &MessageDescriptor {
		&self.descriptor
	}
}

impl Component for MessageView {
	fn id(&self) -> &str {
		&self.id
	}

	fn init(&mut self) -> Result<(), ComponentError> {
		self.watch.attach(&self.handle, &self.id);
		Ok(())
	}

	fn handle_event(&mut self, _event: &Event) -> Vec<Action> {
		Vec::new()
	}

	fn update(&mut self, _action: &Action) -> Vec<Action> {
		Vec::new()
	}

	fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
		frame.render_widget(TranslatedText::new(ctx.locale, &self.descriptor).style(self.style), area);
		self.watch.mark_rendered();
	}

	fn focusable(&self) -> bool {
		false
	}

	fn needs_render(&self) -> bool {
		self.watch.is_dirty()
	}
}
