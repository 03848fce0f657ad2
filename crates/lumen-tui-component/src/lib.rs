// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ratatui::layout::Rect;
use ratatui::Frame;
use tracing::debug;

use lumen_i18n_state::{LocaleHandle, LocaleSnapshot, Subscription};
use lumen_tui_core::{Action, ComponentError, Event, FocusState};

pub use lumen_tui_core::TextDirection;

/// Everything a component may read while drawing. The snapshot is taken once
/// per frame and shared by every component drawn in it.
pub struct RenderContext<'a> {
	pub focus: &'a FocusState,
	pub locale: &'a LocaleSnapshot,
}

impl<'a> RenderContext<'a> {
	pub fn new(focus: &'a FocusState, locale: &'a LocaleSnapshot) -> Self {
		Self { focus, locale }
	}

	pub fn direction(&self) -> TextDirection {
		self.locale.direction().into()
	}

	pub fn is_rtl(&self) -> bool {
		self.direction().is_rtl()
	}

	pub fn is_focused(&self, id: &str) -> bool {
		self.focus.is_focused(id)
	}

	pub fn t(&self, key: &str) -> String {
		self.locale.t(key)
	}
}

/// Core trait for TUI components.
///
/// Components are the building blocks of the TUI. They handle events,
/// produce actions, and render themselves to the terminal.
pub trait Component: Send + Sync {
	fn id(&self) -> &str;

	/// Called once when the component is attached to the UI tree ("on_mount").
	/// Use this for one-time initialization that requires the component to be fully constructed.
	fn init(&mut self) -> Result<(), ComponentError> {
		Ok(())
	}

	fn handle_event(&mut self, event: &Event) -> Vec<Action>;

	fn update(&mut self, action: &Action) -> Vec<Action>;

	fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext);

	fn focusable(&self) -> bool {
		true
	}

	/// Whether something outside the event stream changed what this
	/// component would draw since its last render.
	fn needs_render(&self) -> bool {
		false
	}
}

/// Locale subscription owned by a component.
///
/// `attach` subscribes; dropping the watch (or the component holding it)
/// unsubscribes. Every notification raises a dirty flag that the next render
/// clears.
#[derive(Debug, Default)]
pub struct LocaleWatch {
	subscription: Option<Subscription>,
	dirty: Arc<AtomicBool>,
}

impl LocaleWatch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn attach(&mut self, handle: &LocaleHandle, owner: &str) {
		let dirty = Arc::clone(&self.dirty);
		let owner = owner.to_string();
		self.subscription = Some(handle.subscribe(move |change| {
			debug!(component = %owner, locale = %change.current, "locale changed, marking dirty");
			dirty.store(true, Ordering::Release);
		}));
	}

	pub fn detach(&mut self) {
		self.subscription = None;
	}

	pub fn is_attached(&self) -> bool {
		self.subscription.is_some()
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty.load(Ordering::Acquire)
	}

	pub fn mark_rendered(&self) {
		self.dirty.store(false, Ordering::Release);
	}
}
