// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{Duration, NaiveDateTime};
use lumen_common_i18n::{DateStyle, DateTimeOptions, RelativeTimeUnit, TimeStyle};
use lumen_i18n_state::{LocaleHandle, LocaleSnapshot};
use lumen_tui_component::{Component, RenderContext};
use lumen_tui_core::{
	Action, ComponentError, Event, FocusState, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, Keymap,
};
use lumen_tui_widget_locale_picker::{select_width, locale_options, LocaleButtonBar, LocaleSwitcher};
use lumen_tui_widget_message::{MessageDescriptor, MessageView, TranslatedText};
use ratatui::{
	layout::{Constraint, Direction, Layout, Rect},
	style::{Modifier, Style},
	widgets::{Block, Borders, Clear},
	Frame,
};
use tracing::{info, warn};

const SWITCHER_ID: &str = "locale-switcher";
const BUTTONS_ID: &str = "locale-buttons";

/// Sample learner shown on the dashboard.
#[derive(Debug, Clone)]
pub struct Learner {
	pub name: String,
	pub lessons_completed: u32,
	pub average_score: f64,
	pub plan_price: f64,
	pub currency: &'static str,
	pub next_session: NaiveDateTime,
	pub days_since_active: f64,
	pub streak_days: u32,
}

impl Learner {
	pub fn demo(now: NaiveDateTime) -> Self {
		Self {
			name: "Ana".to_string(),
			lessons_completed: 1284,
			average_score: 87.5,
			plan_price: 1234.5,
			currency: "EUR",
			next_session: now + Duration::days(2),
			days_since_active: 3.0,
			streak_days: 12,
		}
	}
}

/// Global shortcuts. Everything else goes to the focused component.
pub struct AppKeymap;

impl Keymap<Action> for AppKeymap {
	fn key_to_action(&self, key: &KeyEvent, _focus: &FocusState) -> Option<Action> {
		if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
			return Some(Action::Quit);
		}
		match key.code {
			KeyCode::Char('q') => Some(Action::Quit),
			KeyCode::Tab => Some(Action::FocusNext),
			KeyCode::BackTab => Some(Action::FocusPrev),
			KeyCode::Esc => Some(Action::Cancel),
			_ => None,
		}
	}
}

pub struct App {
	handle: LocaleHandle,
	focus: FocusState,
	keymap: AppKeymap,
	title: MessageView,
	switcher: LocaleSwitcher,
	buttons: LocaleButtonBar,
	learner: Learner,
	notice: Option<MessageDescriptor>,
	should_quit: bool,
}

impl App {
	/// Mount every component against `handle`.
	pub fn new(handle: LocaleHandle, learner: Learner) -> Result<Self, ComponentError> {
		let mut title = MessageView::new("title", handle.clone(), MessageDescriptor::new("app.title"))
			.style(Style::default().add_modifier(Modifier::BOLD));
		let mut switcher = LocaleSwitcher::new(SWITCHER_ID, handle.clone());
		let mut buttons = LocaleButtonBar::new(BUTTONS_ID, handle.clone());

		title.init()?;
		switcher.init()?;
		buttons.init()?;

		let mut focus = FocusState::default();
		focus.register(switcher.id());
		focus.register(buttons.id());
		focus.set_focus(SWITCHER_ID);

		Ok(Self {
			handle,
			focus,
			keymap: AppKeymap,
			title,
			switcher,
			buttons,
			learner,
			notice: None,
			should_quit: false,
		})
	}

	pub fn should_quit(&self) -> bool {
		self.should_quit
	}

	pub fn focus(&self) -> &FocusState {
		&self.focus
	}

	pub fn notice(&self) -> Option<&MessageDescriptor> {
		self.notice.as_ref()
	}

	fn components_mut(&mut self) -> [&mut dyn Component; 3] {
		[&mut self.title, &mut self.switcher, &mut self.buttons]
	}

	/// Whether any component was invalidated outside the event stream.
	pub fn needs_render(&self) -> bool {
		self.title.needs_render() || self.switcher.needs_render() || self.buttons.needs_render()
	}

	/// Returns `true` when the screen should be redrawn.
	pub fn handle_event(&mut self, event: &Event) -> bool {
		match event {
			Event::Key(key) if key.kind != KeyEventKind::Press => false,
			Event::Key(key) => {
				if let Some(action) = self.keymap.key_to_action(key, &self.focus) {
					self.dispatch(action);
					return true;
				}
				let actions = match self.focus.focused_id.as_deref() {
					Some(SWITCHER_ID) => self.switcher.handle_event(event),
					Some(BUTTONS_ID) => self.buttons.handle_event(event),
					_ => Vec::new(),
				};
				self.apply(actions);
				true
			}
			Event::Mouse(_) => {
				let actions = self.buttons.handle_event(event);
				let redraw = !actions.is_empty();
				self.apply(actions);
				redraw
			}
			Event::Resize(..) => true,
			Event::Tick => self.needs_render(),
			Event::Paste(_) | Event::FocusGained | Event::FocusLost => false,
		}
	}

	fn dispatch(&mut self, action: Action) {
		match action {
			Action::Quit => self.should_quit = true,
			Action::FocusNext | Action::FocusPrev | Action::Cancel => {
				let mut follow_up = Vec::new();
				for component in self.components_mut() {
					follow_up.extend(component.update(&action));
				}
				match action {
					Action::FocusNext => self.focus.focus_next(),
					Action::FocusPrev => self.focus.focus_prev(),
					_ => self.notice = None,
				}
				self.apply(follow_up);
			}
			other => self.apply(vec![other]),
		}
	}

	fn apply(&mut self, actions: Vec<Action>) {
		for action in actions {
			match action {
				Action::Quit => self.should_quit = true,
				Action::LocaleChanged { previous, current } => {
					info!(%previous, %current, "locale switched from the dashboard");
					self.notice =
						Some(MessageDescriptor::new("locale.changed").value("language", current.native_name()));
				}
				Action::LocaleRejected { requested, reason } => {
					warn!(%requested, %reason, "locale switch rejected");
					self.notice = Some(MessageDescriptor::new("locale.rejected").value("reason", reason));
				}
				_ => {}
			}
		}
	}

	/// Dashboard rows for one snapshot. Formatted values are computed here so
	/// every row uses the same locale.
	pub fn dashboard_lines(&self, snapshot: &LocaleSnapshot) -> Vec<MessageDescriptor> {
		let learner = &self.learner;

		let price = snapshot
			.format_currency(learner.plan_price, learner.currency)
			.unwrap_or_else(|e| {
				warn!(error = %e, currency = learner.currency, "falling back to plain number");
				snapshot.format_number(learner.plan_price)
			});
		let next_session = snapshot
			.format_date_time(&learner.next_session, DateTimeOptions::new(DateStyle::Full, TimeStyle::Short))
			.unwrap_or_else(|_| snapshot.format_date(learner.next_session.date(), DateStyle::Medium));
		let last_active = snapshot.format_relative_time(-learner.days_since_active, RelativeTimeUnit::Day);

		vec![
			MessageDescriptor::new("dashboard.welcome").value("name", learner.name.as_str()),
			MessageDescriptor::new("dashboard.progress").value("count", learner.lessons_completed),
			MessageDescriptor::new("dashboard.score").value("score", learner.average_score),
			MessageDescriptor::new("dashboard.price").value("price", price),
			MessageDescriptor::new("dashboard.next_session").value("date", next_session),
			MessageDescriptor::new("dashboard.last_active").value("when", last_active),
			MessageDescriptor::new("dashboard.streak")
				.value("days", learner.streak_days)
				.default_message("Streak: {days} days"),
		]
	}

	pub fn render(&self, frame: &mut Frame) {
		let snapshot = self.handle.snapshot();
		let ctx = RenderContext::new(&self.focus, &snapshot);
		let rtl = ctx.is_rtl();

		let rows = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(1),
				Constraint::Length(1),
				Constraint::Min(3),
				Constraint::Length(1),
			])
			.split(frame.area());
		let (header_area, buttons_area, body_area, status_area) = (rows[0], rows[1], rows[2], rows[3]);

		let options = locale_options(&snapshot, self.handle.available_locales());
		let switcher_width = (select_width(&options) + 2).min(header_area.width);
		let header = Layout::default()
			.direction(Direction::Horizontal)
			.constraints(if rtl {
				[Constraint::Length(switcher_width), Constraint::Min(1)]
			} else {
				[Constraint::Min(1), Constraint::Length(switcher_width)]
			})
			.split(header_area);
		let (title_area, switcher_area) = if rtl { (header[1], header[0]) } else { (header[0], header[1]) };

		self.title.render(frame, title_area, &ctx);
		self.buttons.render(frame, buttons_area, &ctx);
		self.render_body(frame, body_area, &ctx);
		self.render_status(frame, status_area, &ctx);

		// The open dropdown overlays whatever is below the header.
		let dropdown_area = Rect {
			height: self.switcher.height().min(frame.area().bottom().saturating_sub(switcher_area.y)),
			..switcher_area
		};
		frame.render_widget(Clear, dropdown_area);
		self.switcher.render(frame, dropdown_area, &ctx);
	}

	fn render_body(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
		let block = Block::default()
			.borders(Borders::ALL)
			.title(ctx.t("dashboard.title"));
		let inner = block.inner(area);
		frame.render_widget(block, area);

		let inner = Rect {
			x: inner.x + 1,
			width: inner.width.saturating_sub(2),
			..inner
		};
		for (row, descriptor) in self.dashboard_lines(ctx.locale).iter().enumerate() {
			if row as u16 >= inner.height {
				break;
			}
			let line_area = Rect {
				y: inner.y + row as u16,
				height: 1,
				..inner
			};
			frame.render_widget(TranslatedText::new(ctx.locale, descriptor), line_area);
		}
	}

	fn render_status(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
		let shortcuts = MessageDescriptor::new("app.shortcuts");
		let (descriptor, style) = match &self.notice {
			Some(notice) => (notice, Style::default().add_modifier(Modifier::BOLD)),
			None => (&shortcuts, Style::default().add_modifier(Modifier::DIM)),
		};
		frame.render_widget(TranslatedText::new(ctx.locale, descriptor).style(style), area);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use lumen_cli_config::I18nConfig;
	use lumen_i18n_state::{Ready, TranslationProvider};
	use lumen_tui_testing::{click, key, TestHarness};

	use crate::catalog::load_catalog;

	fn provider() -> TranslationProvider<Ready> {
		let (catalog, available) = load_catalog(&I18nConfig::default()).unwrap();
		TranslationProvider::new(catalog, available).mount()
	}

	fn app(provider: &TranslationProvider<Ready>) -> App {
		let now = NaiveDate::from_ymd_opt(2026, 1, 13)
			.unwrap()
			.and_hms_opt(18, 30, 0)
			.unwrap();
		App::new(provider.handle(), Learner::demo(now)).unwrap()
	}

	fn draw(harness: &mut TestHarness, provider: &TranslationProvider<Ready>, app: &App) {
		harness.render(&provider.snapshot(), |frame, _area, _ctx| app.render(frame));
	}

	fn text(harness: &TestHarness) -> String {
		harness.buffer_lines().join("\n")
	}

	#[test]
	fn test_dashboard_renders_in_english() {
		let provider = provider();
		let app = app(&provider);
		let mut harness = TestHarness::new(80, 14);
		draw(&mut harness, &provider, &app);

		let screen = text(&harness);
		assert!(screen.contains("Lumen Learning"));
		assert!(screen.contains("English ▾"));
		assert!(screen.contains("[English] [Español] [Français]"));
		assert!(screen.contains("Dashboard"));
		assert!(screen.contains("Welcome back, Ana!"));
		assert!(screen.contains("Lessons completed: 1,284"));
		assert!(screen.contains("€1,234.50 per month"));
		assert!(screen.contains("Thursday, January 15, 2026"));
		assert!(screen.contains("6:30"));
		assert!(screen.contains("Last active 3 days ago"));
		assert!(screen.contains("Streak: 12 days"));
	}

	#[test]
	fn test_switching_locale_rerenders_everything() {
		let provider = provider();
		let mut app = app(&provider);
		let mut harness = TestHarness::new(80, 14);

		// Open the dropdown, move to Español, confirm.
		app.handle_event(&key(KeyCode::Enter));
		app.handle_event(&key(KeyCode::Down));
		app.handle_event(&key(KeyCode::Enter));
		assert!(app.needs_render());
		draw(&mut harness, &provider, &app);

		let screen = text(&harness);
		assert!(screen.contains("Lumen Aprendizaje"));
		assert!(screen.contains("Español ▾"));
		assert!(screen.contains("Panel"));
		assert!(screen.contains("¡Bienvenida de nuevo, Ana!"));
		assert!(screen.contains("Lecciones completadas: 1.284"));
		// No Spanish entry: base template with Spanish formatting.
		assert!(screen.contains("Premium plan: 1.234,50"));
		assert!(screen.contains("Última actividad hace 3 días"));
		assert!(screen.contains("Idioma cambiado a Español"));
		assert!(!app.needs_render());
	}

	#[test]
	fn test_focus_cycles_and_buttons_take_keys() {
		let provider = provider();
		let mut app = app(&provider);
		assert!(app.focus().is_focused(SWITCHER_ID));

		app.handle_event(&key(KeyCode::Tab));
		assert!(app.focus().is_focused(BUTTONS_ID));

		app.handle_event(&key(KeyCode::Right));
		app.handle_event(&key(KeyCode::Right));
		app.handle_event(&key(KeyCode::Enter));
		assert_eq!(provider.locale().code(), "fr");
		assert!(app.notice().is_some());

		app.handle_event(&key(KeyCode::Esc));
		assert!(app.notice().is_none());
	}

	#[test]
	fn test_mouse_clicks_reach_buttons() {
		let provider = provider();
		let mut app = app(&provider);
		let mut harness = TestHarness::new(80, 14);
		draw(&mut harness, &provider, &app);

		// Row 1 holds the buttons; "[Español]" starts at column 10.
		assert!(app.handle_event(&click(12, 1)));
		assert_eq!(provider.locale().code(), "es");
		assert!(!app.handle_event(&click(70, 10)));
	}

	#[test]
	fn test_focus_change_closes_dropdown() {
		let provider = provider();
		let mut app = app(&provider);

		app.handle_event(&key(KeyCode::Enter));
		assert!(app.switcher.state().is_open());
		app.handle_event(&key(KeyCode::Tab));
		assert!(!app.switcher.state().is_open());
		assert_eq!(provider.locale().code(), "en");
	}

	#[test]
	fn test_quit_shortcuts() {
		let provider = provider();
		let mut app = app(&provider);
		app.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
		assert!(app.should_quit());

		let mut app = self::app(&provider);
		app.handle_event(&key(KeyCode::Char('q')));
		assert!(app.should_quit());
	}

	#[test]
	fn test_unknown_currency_falls_back_to_number() {
		let provider = provider();
		let mut app = app(&provider);
		app.learner.currency = "EURO";
		let lines = app.dashboard_lines(&provider.snapshot());
		let price = lines.iter().find(|d| d.id == "dashboard.price").unwrap();
		assert_eq!(
			price.values.get("price"),
			Some(&lumen_common_i18n::MessageValue::from("1,234.5"))
		);
	}
}
