// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Store-connected locale controls.

use lumen_i18n_state::LocaleHandle;
use lumen_tui_component::{Component, LocaleWatch, RenderContext, TextDirection};
use lumen_tui_core::{Action, ComponentError, Event, KeyCode, KeyEvent, MouseButton, MouseEventKind};
use parking_lot::Mutex;
use ratatui::{layout::Rect, Frame};

use crate::buttons::{LocaleButtons, LocaleButtonsState};
use crate::options::{locale_options, selected_index, switch_locale, LocaleOption};
use crate::select::{LocaleSelect, LocaleSelectState};

/// Dropdown bound to the locale store.
///
/// Enter, Space or Down opens it; Up/Down/Home/End move the highlight; Enter
/// or Space switches to the highlighted locale; Esc closes without switching.
pub struct LocaleSwitcher {
	id: String,
	handle: LocaleHandle,
	state: LocaleSelectState,
	watch: LocaleWatch,
}

impl LocaleSwitcher {
	pub fn new(id: impl Into<String>, handle: LocaleHandle) -> Self {
		Self {
			id: id.into(),
			handle,
			state: LocaleSelectState::default(),
			watch: LocaleWatch::new(),
		}
	}

	pub fn state(&self) -> &LocaleSelectState {
		&self.state
	}

	pub fn options(&self) -> Vec<LocaleOption> {
		locale_options(&self.handle.snapshot(), self.handle.available_locales())
	}

	/// Rows the switcher wants in its current state.
	pub fn height(&self) -> u16 {
		if self.state.is_open() {
			self.handle.available_locales().len() as u16
		} else {
			1
		}
	}

	fn handle_key(&mut self, key: &KeyEvent) -> Vec<Action> {
		let options = self.options();

		if !self.state.is_open() {
			return match key.code {
				KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
					self.state.open(selected_index(&options));
					vec![Action::Render]
				}
				_ => Vec::new(),
			};
		}

		match key.code {
			KeyCode::Up => self.state.highlight_prev(),
			KeyCode::Down => self.state.highlight_next(options.len()),
			KeyCode::Home => self.state.highlight_first(),
			KeyCode::End => self.state.highlight_last(options.len()),
			KeyCode::Esc => self.state.close(),
			KeyCode::Enter | KeyCode::Char(' ') => {
				self.state.close();
				let mut actions = vec![Action::Render];
				if let Some(option) = options.get(self.state.highlighted()) {
					actions.extend(switch_locale(&self.handle, option.locale));
				}
				return actions;
			}
			_ => return Vec::new(),
		}
		vec![Action::Render]
	}
}

impl Component for LocaleSwitcher {
	fn id(&self) -> &str {
		&self.id
	}

	fn init(&mut self) -> Result<(), ComponentError> {
		self.watch.attach(&self.handle, &self.id);
		Ok(())
	}

	fn handle_event(&mut self, event: &Event) -> Vec<Action> {
		match event {
			Event::Key(key) => self.handle_key(key),
			_ => Vec::new(),
		}
	}

	fn update(&mut self, action: &Action) -> Vec<Action> {
		match action {
			Action::Cancel | Action::FocusNext | Action::FocusPrev if self.state.is_open() => {
				self.state.close();
				vec![Action::Render]
			}
			_ => Vec::new(),
		}
	}

	fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
		let options = locale_options(ctx.locale, self.handle.available_locales());
		let mut state = self.state.clone();
		let widget = LocaleSelect::new(&options)
			.focused(ctx.is_focused(&self.id))
			.direction(ctx.direction());
		frame.render_stateful_widget(widget, area, &mut state);
		self.watch.mark_rendered();
	}

	fn needs_render(&self) -> bool {
		self.watch.is_dirty()
	}
}

/// Row of locale buttons bound to the locale store.
///
/// Left/Right move keyboard focus (mirrored for RTL), Enter or Space
/// activates it, a left click activates the button under the pointer.
/// Activating the active locale does nothing.
pub struct LocaleButtonBar {
	id: String,
	handle: LocaleHandle,
	state: Mutex<LocaleButtonsState>,
	watch: LocaleWatch,
}

impl LocaleButtonBar {
	pub fn new(id: impl Into<String>, handle: LocaleHandle) -> Self {
		Self {
			id: id.into(),
			handle,
			state: Mutex::new(LocaleButtonsState::default()),
			watch: LocaleWatch::new(),
		}
	}

	pub fn focused(&self) -> usize {
		self.state.lock().focused()
	}

	fn activate(&self, index: usize) -> Vec<Action> {
		let Some(&locale) = self.handle.available_locales().as_slice().get(index) else {
			return Vec::new();
		};
		if locale == self.handle.locale() {
			return Vec::new();
		}
		switch_locale(&self.handle, locale)
	}

	fn handle_key(&mut self, key: &KeyEvent) -> Vec<Action> {
		let total = self.handle.available_locales().len();
		let rtl = TextDirection::from_locale(self.handle.locale()).is_rtl();
		let mut state = self.state.lock();

		let forward = match key.code {
			KeyCode::Right => !rtl,
			KeyCode::Left => rtl,
			KeyCode::Enter | KeyCode::Char(' ') => {
				let index = state.focused();
				drop(state);
				return self.activate(index);
			}
			_ => return Vec::new(),
		};

		if forward {
			state.focus_next(total);
		} else {
			state.focus_prev();
		}
		vec![Action::Render]
	}
}

impl Component for LocaleButtonBar {
	fn id(&self) -> &str {
		&self.id
	}

	fn init(&mut self) -> Result<(), ComponentError> {
		let selected = self.handle.available_locales().position(self.handle.locale()).unwrap_or(0);
		self.state.lock().set_focused(selected);
		self.watch.attach(&self.handle, &self.id);
		Ok(())
	}

	fn handle_event(&mut self, event: &Event) -> Vec<Action> {
		match event {
			Event::Key(key) => self.handle_key(key),
			Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
				let hit = self.state.lock().hit_test(mouse.column, mouse.row);
				match hit {
					Some(index) => {
						self.state.lock().set_focused(index);
						self.activate(index)
					}
					None => Vec::new(),
				}
			}
			_ => Vec::new(),
		}
	}

	fn update(&mut self, _action: &Action) -> Vec<Action> {
		Vec::new()
	}

	fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
		let options = locale_options(ctx.locale, self.handle.available_locales());
		let widget = LocaleButtons::new(&options)
			.focused(ctx.is_focused(&self.id))
			.direction(ctx.direction());
		frame.render_stateful_widget(widget, area, &mut *self.state.lock());
		self.watch.mark_rendered();
	}

	fn needs_render(&self) -> bool {
		self.watch.is_dirty()
	}
}
