// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lumen_tui_component::Component;
use lumen_tui_core::{Action, KeyCode};
use lumen_tui_testing::{assert_buffer_snapshot, event_sequence_strategy, key, locale, mount, ComponentHarness};
use lumen_tui_widget_locale_picker::{LocaleButtonBar, LocaleSwitcher};
use lumen_tui_widget_message::{MessageDescriptor, MessageView};
use proptest::prelude::*;
use ratatui::style::Modifier;

fn lines(rows: &[&str]) -> Vec<String> {
	rows.iter().map(|r| r.to_string()).collect()
}

#[test]
fn test_switcher_closed_shows_active_label() {
	let provider = mount(&["en", "es", "fr"]);
	let mut harness = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 12, 1);

	harness.render();
	assert_eq!(harness.harness.buffer_lines(), lines(&["English ▾   "]));
}

#[test]
fn test_switcher_lists_available_locales_in_order() {
	let provider = mount(&["en", "es", "fr"]);
	let mut harness = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 12, 3);

	harness.focus().user_press_enter();
	assert!(harness.component.state().is_open());
	assert_eq!(
		harness.harness.buffer_lines(),
		lines(&["● English   ", "  Español   ", "  Français  "])
	);

	let highlighted = harness.harness.style_at(11, 0);
	assert!(highlighted.add_modifier.contains(Modifier::REVERSED));
	assert!(!harness.harness.style_at(0, 1).add_modifier.contains(Modifier::REVERSED));
}

#[test]
fn test_switcher_commits_highlighted_locale() {
	let provider = mount(&["en", "es", "fr"]);
	let mut harness = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 12, 3);

	harness.user_press_enter();
	harness.send_key(KeyCode::Down);
	harness.user_press_enter();

	assert_eq!(provider.locale(), locale("es"));
	assert!(!harness.component.state().is_open());
	assert!(harness.take_actions().contains(&Action::LocaleChanged {
		previous: locale("en"),
		current: locale("es"),
	}));
	assert_eq!(harness.harness.buffer_lines()[0], "Español ▾   ");
}

#[test]
fn test_switcher_escape_closes_without_switching() {
	let provider = mount(&["en", "es", "fr"]);
	let mut harness = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 12, 3);

	harness.user_press_enter();
	harness.send_key(KeyCode::End);
	harness.send_key(KeyCode::Esc);

	assert!(!harness.component.state().is_open());
	assert_eq!(provider.locale(), locale("en"));
	assert!(!harness
		.take_actions()
		.iter()
		.any(|a| matches!(a, Action::LocaleChanged { .. })));
}

#[test]
fn test_switcher_truncates_labels_to_width() {
	let provider = mount(&["en", "es"]);
	let mut harness = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 6, 1);

	harness.render();
	assert_eq!(harness.output(), "Eng… ▾");
}

#[test]
fn test_locale_buttons_snapshot() {
	let provider = mount(&["en", "es", "fr"]);
	let mut harness = ComponentHarness::new(LocaleButtonBar::new("buttons", provider.handle()), provider.handle(), 30, 1);

	harness.render();
	assert_buffer_snapshot!("locale_buttons", harness);

	let active = harness.harness.style_at(0, 0);
	assert!(active.add_modifier.contains(Modifier::BOLD | Modifier::REVERSED));
	let inactive = harness.harness.style_at(10, 0);
	assert!(!inactive.add_modifier.contains(Modifier::REVERSED));
}

#[test]
fn test_clicking_a_button_switches_locale() {
	let provider = mount(&["en", "es", "fr"]);
	let mut harness = ComponentHarness::new(LocaleButtonBar::new("buttons", provider.handle()), provider.handle(), 30, 1);
	harness.render();

	// "[Español]" spans columns 10..19.
	harness.click(12, 0);
	assert_eq!(provider.locale(), locale("es"));
	assert_eq!(
		harness.take_actions(),
		vec![Action::LocaleChanged {
			previous: locale("en"),
			current: locale("es"),
		}]
	);
	assert!(harness.harness.style_at(10, 0).add_modifier.contains(Modifier::REVERSED));
	assert!(!harness.harness.style_at(0, 0).add_modifier.contains(Modifier::REVERSED));
}

#[test]
fn test_activating_the_active_button_does_nothing() {
	let provider = mount(&["en", "es"]);
	let mut harness = ComponentHarness::new(LocaleButtonBar::new("buttons", provider.handle()), provider.handle(), 30, 1);
	harness.render();

	harness.click(1, 0);
	harness.user_press_enter();
	harness.click(29, 0);

	assert!(harness.take_actions().is_empty());
	assert_eq!(provider.handle().store().generation(), 0);
}

#[test]
fn test_buttons_keyboard_activation() {
	let provider = mount(&["en", "es", "fr"]);
	let mut harness = ComponentHarness::new(LocaleButtonBar::new("buttons", provider.handle()), provider.handle(), 30, 1);

	harness.focus().render();
	harness.send_key(KeyCode::Right);
	harness.send_key(KeyCode::Right);
	assert_eq!(harness.component.focused(), 2);
	assert!(harness.harness.style_at(20, 0).add_modifier.contains(Modifier::UNDERLINED));

	harness.send_key(KeyCode::Char(' '));
	assert_eq!(provider.locale(), locale("fr"));
}

#[test]
fn test_rtl_buttons_are_mirrored() {
	let provider = mount(&["en", "ar"]);
	provider.set_locale("ar").unwrap();
	let mut harness = ComponentHarness::new(LocaleButtonBar::new("buttons", provider.handle()), provider.handle(), 20, 1);
	harness.render();

	// Right-aligned, first option rightmost: " [ar] [English]".
	assert_eq!(harness.find_text("[English]"), Some((0, 11)));

	// Focus starts on the active locale; arrows are mirrored.
	assert_eq!(harness.component.focused(), 1);
	harness.send_key(KeyCode::Right);
	assert_eq!(harness.component.focused(), 0);
	harness.send_key(KeyCode::Left);
	assert_eq!(harness.component.focused(), 1);

	harness.click(2, 0);
	assert!(harness.take_actions().is_empty());

	harness.click(12, 0);
	assert_eq!(provider.locale(), locale("en"));
}

#[test]
fn test_every_binding_rerenders_after_one_switch() {
	let provider = mount(&["en", "es", "fr"]);
	let mut switcher = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 12, 1);
	let mut buttons = ComponentHarness::new(LocaleButtonBar::new("buttons", provider.handle()), provider.handle(), 30, 1);
	let mut title = ComponentHarness::new(
		MessageView::new("title", provider.handle(), MessageDescriptor::new("nav.home")),
		provider.handle(),
		12,
		1,
	);
	switcher.render();
	buttons.render();
	title.render();

	buttons.click(20, 0);

	assert!(switcher.component.needs_render());
	assert!(title.component.needs_render());
	assert!(buttons.harness.style_at(20, 0).add_modifier.contains(Modifier::REVERSED));

	switcher.render();
	title.render();
	assert_eq!(switcher.harness.buffer_lines()[0], "Français ▾  ");
	assert_eq!(title.output(), "Accueil     ");
}

#[test]
fn test_unmount_unsubscribes() {
	let provider = mount(&["en", "es"]);
	let handle = provider.handle();
	let switcher = ComponentHarness::new(LocaleSwitcher::new("switcher", handle.clone()), handle.clone(), 12, 1);
	let buttons = ComponentHarness::new(LocaleButtonBar::new("buttons", handle.clone()), handle.clone(), 30, 1);
	assert_eq!(handle.store().subscriber_count(), 2);

	drop(switcher);
	assert_eq!(handle.store().subscriber_count(), 1);
	drop(buttons);
	assert_eq!(handle.store().subscriber_count(), 0);
}

#[test]
fn test_closed_switcher_ignores_unrelated_keys() {
	let provider = mount(&["en", "es"]);
	let mut harness = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 12, 2);

	harness.assert_state_sequence(
		&[key(KeyCode::Char('x')), key(KeyCode::Down), key(KeyCode::Down), key(KeyCode::Esc)],
		|c| (c.state().is_open(), c.state().highlighted()),
		&[(false, 0), (true, 0), (true, 1), (false, 1)],
	);
	assert_eq!(provider.locale(), locale("en"));
}

proptest! {
	#[test]
	fn switcher_state_stays_valid(events in event_sequence_strategy(24)) {
		let provider = mount(&["en", "es", "fr"]);
		let mut harness = ComponentHarness::new(LocaleSwitcher::new("switcher", provider.handle()), provider.handle(), 12, 3);

		for event in events {
			harness.send_event(event);
			prop_assert!(harness.component.state().highlighted() < 3);
			prop_assert!(provider.available_locales().contains(provider.locale()));

			if !harness.component.state().is_open() {
				let first_row = harness.harness.buffer_lines()[0].clone();
				prop_assert!(first_row.starts_with(provider.locale().native_name()));
			}
		}
	}
}
