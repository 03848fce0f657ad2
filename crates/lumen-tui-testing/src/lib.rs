// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use lumen_common_i18n::{AvailableLocales, Bundle, Locale, MessageCatalog};
use lumen_i18n_state::{LocaleHandle, LocaleSnapshot, Ready, TranslationProvider};
use lumen_tui_component::{Component, RenderContext};
use lumen_tui_core::{Action, Event, FocusState};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, style::Style, Frame, Terminal};

#[doc(hidden)]
pub use insta;

/// Snapshot the harness buffer. Expands at the call site so the `.snap`
/// file lands next to the calling test.
#[macro_export]
macro_rules! assert_buffer_snapshot {
	($name:expr, $harness:expr) => {
		$crate::insta::assert_snapshot!($name, $harness.output())
	};
}

/// Messages shared by the widget tests: full `en`, partial `es` and `fr`.
pub fn fixture_catalog(available: &AvailableLocales) -> Arc<MessageCatalog> {
	let en = locale("en");
	let catalog = MessageCatalog::builder(en)
		.bundle(
			en,
			Bundle::from_pairs([
				("greeting", "Hello, {name}!"),
				("nav.home", "Home"),
				("locale.label", "Language"),
				("lessons.count", "{count} lessons"),
			]),
		)
		.bundle(
			locale("es"),
			Bundle::from_pairs([
				("nav.home", "Inicio"),
				("locale.label", "Idioma"),
				("lessons.count", "{count} lecciones"),
			]),
		)
		.bundle(locale("fr"), Bundle::from_pairs([("nav.home", "Accueil"), ("locale.label", "Langue")]))
		.build(available)
		.expect("fixture catalog is valid");
	Arc::new(catalog)
}

/// A mounted provider over `codes` with in-memory preferences. The first code
/// is the default locale.
pub fn mount(codes: &[&str]) -> TranslationProvider<Ready> {
	let available = AvailableLocales::from_codes(codes.iter().copied()).expect("fixture locales are valid");
	let default_locale = available.first();
	TranslationProvider::new(fixture_catalog(&available), available)
		.default_locale(default_locale)
		.mount()
}

pub fn locale(code: &str) -> Locale {
	Locale::parse(code).expect("fixture locale is known")
}

pub fn key(code: KeyCode) -> Event {
	Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn click(column: u16, row: u16) -> Event {
	Event::Mouse(MouseEvent {
		kind: MouseEventKind::Down(MouseButton::Left),
		column,
		row,
		modifiers: KeyModifiers::NONE,
	})
}

pub struct TestHarness {
	terminal: Terminal<TestBackend>,
	focus: FocusState,
}

impl TestHarness {
	pub fn new(width: u16, height: u16) -> Self {
		let backend = TestBackend::new(width, height);
		let terminal = Terminal::new(backend).expect("failed to create terminal");
		Self {
			terminal,
			focus: FocusState::default(),
		}
	}

	pub fn focus(&self) -> &FocusState {
		&self.focus
	}

	pub fn focus_mut(&mut self) -> &mut FocusState {
		&mut self.focus
	}

	pub fn render<F>(&mut self, snapshot: &LocaleSnapshot, render_fn: F) -> &TestBackend
	where
		F: FnOnce(&mut Frame, Rect, &RenderContext),
	{
		let focus = &self.focus;
		self.terminal
			.draw(|frame| {
				let area = frame.area();
				let ctx = RenderContext::new(focus, snapshot);
				render_fn(frame, area, &ctx);
			})
			.expect("failed to draw");
		self.terminal.backend()
	}

	pub fn buffer(&self) -> &Buffer {
		self.terminal.backend().buffer()
	}

	/// The whole buffer, one line per row.
	pub fn output(&self) -> String {
		buffer_to_string(self.terminal.backend())
	}

	pub fn buffer_lines(&self) -> Vec<String> {
		let buffer = self.buffer();
		let area = buffer.area;
		let mut lines = Vec::new();

		for y in area.y..area.y + area.height {
			let mut line = String::new();
			for x in area.x..area.x + area.width {
				let cell = &buffer[(x, y)];
				line.push_str(cell.symbol());
			}
			lines.push(line);
		}

		lines
	}

	/// Row and column (in cells) of the first occurrence of `needle`.
	pub fn find_text(&self, needle: &str) -> Option<(usize, usize)> {
		let lines = self.buffer_lines();
		for (row, line) in lines.iter().enumerate() {
			if let Some(byte_idx) = line.find(needle) {
				return Some((row, line[..byte_idx].chars().count()));
			}
		}
		None
	}

	pub fn style_at(&self, column: u16, row: u16) -> Style {
		self.buffer()[(column, row)].style()
	}
}

/// Drives a [`Component`] against a live locale store.
pub struct ComponentHarness<C> {
	pub harness: TestHarness,
	pub component: C,
	handle: LocaleHandle,
	actions: Vec<Action>,
}

impl<C: Component> ComponentHarness<C> {
	/// Runs `init` and registers the component for focus when it is focusable.
	pub fn new(mut component: C, handle: LocaleHandle, width: u16, height: u16) -> Self {
		component.init().expect("component init failed");
		let mut harness = TestHarness::new(width, height);
		if component.focusable() {
			harness.focus_mut().register(component.id());
		}
		Self {
			harness,
			component,
			handle,
			actions: Vec::new(),
		}
	}

	pub fn handle(&self) -> &LocaleHandle {
		&self.handle
	}

	pub fn focus(&mut self) -> &mut Self {
		let id = self.component.id().to_string();
		self.harness.focus_mut().set_focus(&id);
		self
	}

	pub fn render(&mut self) -> &TestBackend {
		let snapshot = self.handle.snapshot();
		let component = &self.component;
		self.harness.render(&snapshot, |frame, area, ctx| {
			component.render(frame, area, ctx);
		})
	}

	pub fn send_event(&mut self, event: Event) -> &TestBackend {
		let actions = self.component.handle_event(&event);
		self.actions.extend(actions);
		self.render()
	}

	pub fn send_key(&mut self, code: KeyCode) -> &TestBackend {
		self.send_event(key(code))
	}

	pub fn click(&mut self, column: u16, row: u16) -> &TestBackend {
		self.send_event(click(column, row))
	}

	pub fn user_press_enter(&mut self) -> &TestBackend {
		self.send_key(KeyCode::Enter)
	}

	/// Actions emitted since the last call.
	pub fn take_actions(&mut self) -> Vec<Action> {
		std::mem::take(&mut self.actions)
	}

	pub fn output(&self) -> String {
		self.harness.output()
	}

	pub fn find_text(&self, needle: &str) -> Option<(usize, usize)> {
		self.harness.find_text(needle)
	}

	pub fn assert_state_sequence<T, F>(&mut self, events: &[Event], mut extract_state: F, expected: &[T])
	where
		T: PartialEq + std::fmt::Debug + Clone,
		F: FnMut(&C) -> T,
	{
		assert_eq!(
			events.len(),
			expected.len(),
			"events and expected states must have the same length"
		);

		for (i, (event, expected_state)) in events.iter().zip(expected.iter()).enumerate() {
			let actions = self.component.handle_event(event);
			self.actions.extend(actions);
			let actual_state = extract_state(&self.component);
			assert_eq!(
				&actual_state, expected_state,
				"state mismatch at step {}: expected {:?}, got {:?}",
				i, expected_state, actual_state
			);
		}
	}
}

fn buffer_to_string(backend: &TestBackend) -> String {
	let buffer = backend.buffer();
	let area = buffer.area;
	let mut output = String::new();

	for y in area.y..area.y + area.height {
		for x in area.x..area.x + area.width {
			let cell = &buffer[(x, y)];
			output.push_str(cell.symbol());
		}
		if y < area.y + area.height - 1 {
			output.push('\n');
		}
	}

	output
}

#[cfg(feature = "proptest")]
pub mod strategies {
	use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
	use lumen_tui_core::Event;
	use proptest::prelude::*;

	/// Keys a locale control reacts to, plus a few it should ignore.
	pub fn key_event_strategy() -> impl Strategy<Value = KeyEvent> {
		let key_code = prop_oneof![
			Just(KeyCode::Enter),
			Just(KeyCode::Esc),
			Just(KeyCode::Char(' ')),
			Just(KeyCode::Tab),
			Just(KeyCode::Up),
			Just(KeyCode::Down),
			Just(KeyCode::Left),
			Just(KeyCode::Right),
			Just(KeyCode::Home),
			Just(KeyCode::End),
			proptest::char::range('a', 'z').prop_map(KeyCode::Char),
		];

		let modifiers = prop_oneof![Just(KeyModifiers::NONE), Just(KeyModifiers::SHIFT)];

		(key_code, modifiers).prop_map(|(code, mods)| KeyEvent::new(code, mods))
	}

	pub fn event_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<Event>> {
		proptest::collection::vec(key_event_strategy().prop_map(Event::Key), 0..=max_len)
	}
}

#[cfg(feature = "proptest")]
pub use strategies::{event_sequence_strategy, key_event_strategy};

#[cfg(test)]
mod tests {
	use super::*;
	use ratatui::widgets::{Block, Borders, Paragraph};

	struct Greeting {
		clicks: u32,
	}

	impl Component for Greeting {
		fn id(&self) -> &str {
			"greeting"
		}

		fn handle_event(&mut self, event: &Event) -> Vec<Action> {
			match event {
				Event::Key(key) if key.code == KeyCode::Enter => {
					self.clicks += 1;
					vec![Action::Render]
				}
				Event::Mouse(_) => {
					self.clicks += 10;
					Vec::new()
				}
				_ => Vec::new(),
			}
		}

		fn update(&mut self, _action: &Action) -> Vec<Action> {
			Vec::new()
		}

		fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
			let title = if ctx.is_focused(self.id()) { "*" } else { "-" };
			let block = Block::default().borders(Borders::ALL).title(title);
			frame.render_widget(
				Paragraph::new(format!("{} {}", ctx.t("nav.home"), self.clicks)).block(block),
				area,
			);
		}
	}

	#[test]
	fn test_harness_creation() {
		let harness = TestHarness::new(80, 24);
		assert_eq!(harness.buffer().area.width, 80);
		assert_eq!(harness.buffer().area.height, 24);
	}

	#[test]
	fn test_render_uses_snapshot_locale() {
		let provider = mount(&["en", "es"]);
		let mut harness = TestHarness::new(20, 1);

		provider.set_locale("es").unwrap();
		harness.render(&provider.snapshot(), |frame, area, ctx| {
			frame.render_widget(Paragraph::new(ctx.t("nav.home")), area);
		});
		assert_eq!(harness.buffer_lines(), vec![format!("{:<20}", "Inicio")]);
	}

	#[test]
	fn test_find_text_counts_cells() {
		let provider = mount(&["en"]);
		let mut harness = TestHarness::new(20, 1);
		harness.render(&provider.snapshot(), |frame, area, _ctx| {
			frame.render_widget(Paragraph::new("Español Home"), area);
		});
		assert_eq!(harness.find_text("Home"), Some((0, 8)));
		assert_eq!(harness.find_text("missing"), None);
	}

	#[test]
	fn test_component_harness_follows_locale() {
		let provider = mount(&["en", "fr"]);
		let mut harness = ComponentHarness::new(Greeting { clicks: 0 }, provider.handle(), 20, 3);

		harness.render();
		assert!(harness.find_text("Home 0").is_some());

		harness.handle().set_locale("fr").unwrap();
		harness.user_press_enter();
		assert!(harness.find_text("Accueil 1").is_some());
		assert_eq!(harness.take_actions(), vec![Action::Render]);
		assert!(harness.take_actions().is_empty());
	}

	#[test]
	fn test_focus_is_visible_to_render() {
		let provider = mount(&["en"]);
		let mut harness = ComponentHarness::new(Greeting { clicks: 0 }, provider.handle(), 20, 3);
		harness.render();
		assert!(harness.find_text("┌-").is_some());

		harness.focus().render();
		assert!(harness.find_text("┌*").is_some());
	}

	#[test]
	fn test_state_sequence() {
		let provider = mount(&["en"]);
		let mut harness = ComponentHarness::new(Greeting { clicks: 0 }, provider.handle(), 20, 3);

		let events = vec![key(KeyCode::Enter), click(1, 1), key(KeyCode::Esc)];
		harness.assert_state_sequence(&events, |c| c.clicks, &[1, 11, 11]);
	}
}
