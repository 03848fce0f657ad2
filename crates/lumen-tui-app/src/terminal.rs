// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use lumen_tui_core::{Event, EventSource};
use ratatui::DefaultTerminal;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::app::App;

/// Terminal input merged with a periodic tick.
pub struct TerminalEvents {
	stream: EventStream,
	tick: Interval,
}

impl TerminalEvents {
	pub fn new(tick_rate: Duration) -> Self {
		let mut tick = interval(tick_rate);
		tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
		Self {
			stream: EventStream::new(),
			tick,
		}
	}
}

#[async_trait]
impl EventSource for TerminalEvents {
	async fn next(&mut self) -> Option<Event> {
		tokio::select! {
			event = self.stream.next() => match event {
				Some(Ok(event)) => Some(event.into()),
				Some(Err(e)) => {
					warn!(error = %e, "terminal event stream failed");
					None
				}
				None => None,
			},
			_ = self.tick.tick() => Some(Event::Tick),
		}
	}
}

/// Runs its closure once on drop, so every way out of a scope runs it.
struct RestoreGuard<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> RestoreGuard<F> {
	fn new(restore: F) -> Self {
		Self(Some(restore))
	}
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
	fn drop(&mut self) {
		if let Some(restore) = self.0.take() {
			restore();
		}
	}
}

fn restore_terminal() {
	if let Err(e) = io::stdout().execute(DisableMouseCapture) {
		warn!(error = %e, "failed to disable mouse capture");
	}
	ratatui::restore();
}

/// Take over the terminal and run `app` until it quits or input ends. The
/// terminal is restored on every exit, including a failed setup step.
pub async fn run<E: EventSource + Send>(app: &mut App, events: &mut E) -> Result<()> {
	let mut terminal = ratatui::init();
	let _restore = RestoreGuard::new(restore_terminal);

	io::stdout().execute(EnableMouseCapture)?;
	event_loop(&mut terminal, app, events).await
}

async fn event_loop<E: EventSource + Send>(
	terminal: &mut DefaultTerminal,
	app: &mut App,
	events: &mut E,
) -> Result<()> {
	terminal.draw(|frame| app.render(frame))?;

	while let Some(event) = events.next().await {
		let redraw = app.handle_event(&event);
		if app.should_quit() {
			debug!("quit requested");
			break;
		}
		if redraw {
			terminal.draw(|frame| app.render(frame))?;
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	fn guarded_setup(restores: &AtomicUsize, fail: bool) -> Result<()> {
		let _restore = RestoreGuard::new(|| {
			restores.fetch_add(1, Ordering::SeqCst);
		});
		if fail {
			anyhow::bail!("mouse capture unsupported");
		}
		Ok(())
	}

	#[test]
	fn test_restore_runs_when_setup_fails() {
		let restores = AtomicUsize::new(0);
		assert!(guarded_setup(&restores, true).is_err());
		assert_eq!(restores.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_restore_runs_once_on_clean_exit() {
		let restores = AtomicUsize::new(0);
		guarded_setup(&restores, false).unwrap();
		assert_eq!(restores.load(Ordering::SeqCst), 1);
	}
}
