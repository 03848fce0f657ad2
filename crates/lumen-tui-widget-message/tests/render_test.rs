// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lumen_tui_component::Component;
use lumen_tui_testing::{assert_buffer_snapshot, mount, ComponentHarness, TestHarness};
use lumen_tui_widget_message::{render_message, MessageDescriptor, MessageView, TranslatedText};
use proptest::prelude::*;

#[test]
fn test_unknown_key_renders_default_message() {
	let provider = mount(&["en", "es", "fr"]);
	let descriptor = MessageDescriptor::new("x.y.z").default_message("Fallback");
	assert_eq!(render_message(&provider.snapshot(), &descriptor), "Fallback");
}

#[test]
fn test_unknown_key_without_default_renders_key() {
	let provider = mount(&["en", "es"]);
	let descriptor = MessageDescriptor::new("x.y.z");
	assert_eq!(render_message(&provider.snapshot(), &descriptor), "x.y.z");
}

#[test]
fn test_default_message_is_interpolated() {
	let provider = mount(&["en", "es"]);
	provider.set_locale("es").unwrap();
	let descriptor = MessageDescriptor::new("x.y.z")
		.value("count", 1234.5)
		.default_message("{count} points");
	assert_eq!(render_message(&provider.snapshot(), &descriptor), "1.234,5 points");
}

#[test]
fn test_catalog_entry_beats_default_message() {
	let provider = mount(&["en", "es"]);
	let descriptor = MessageDescriptor::new("greeting")
		.value("name", "Ana")
		.default_message("unused");

	assert_eq!(render_message(&provider.snapshot(), &descriptor), "Hello, Ana!");
	provider.set_locale("es").unwrap();
	assert_eq!(render_message(&provider.snapshot(), &descriptor), "Hello, Ana!");
}

#[test]
fn test_translated_text_snapshot() {
	let provider = mount(&["en"]);
	let descriptor = MessageDescriptor::new("greeting").value("name", "Ana");
	let mut harness = TestHarness::new(11, 1);

	harness.render(&provider.snapshot(), |frame, area, ctx| {
		frame.render_widget(TranslatedText::new(ctx.locale, &descriptor), area);
	});
	assert_buffer_snapshot!("translated_text_greeting", harness);
}

#[test]
fn test_rtl_text_is_right_aligned() {
	let provider = mount(&["en", "ar"]);
	provider.set_locale("ar").unwrap();
	let descriptor = MessageDescriptor::new("nav.home");
	let mut harness = TestHarness::new(10, 1);

	harness.render(&provider.snapshot(), |frame, area, ctx| {
		frame.render_widget(TranslatedText::new(ctx.locale, &descriptor), area);
	});
	assert_eq!(harness.buffer_lines(), vec!["      Home".to_string()]);
}

#[test]
fn test_multiline_messages_are_clipped_to_area() {
	let provider = mount(&["en"]);
	let descriptor = MessageDescriptor::new("x").default_message("one\ntwo\nthree");
	let mut harness = TestHarness::new(5, 2);

	harness.render(&provider.snapshot(), |frame, area, ctx| {
		frame.render_widget(TranslatedText::new(ctx.locale, &descriptor), area);
	});
	assert_eq!(harness.buffer_lines(), vec!["one  ".to_string(), "two  ".to_string()]);
}

#[test]
fn test_message_view_rerenders_on_locale_change() {
	let provider = mount(&["en", "es", "fr"]);
	let view = MessageView::new("title", provider.handle(), MessageDescriptor::new("nav.home"));
	let mut harness = ComponentHarness::new(view, provider.handle(), 10, 1);

	harness.render();
	assert!(!harness.component.needs_render());
	assert_eq!(harness.output(), "Home      ");

	provider.set_locale("fr").unwrap();
	assert!(harness.component.needs_render());

	harness.render();
	assert!(!harness.component.needs_render());
	assert_eq!(harness.output(), "Accueil   ");
}

#[test]
fn test_dropping_view_unsubscribes() {
	let provider = mount(&["en", "es"]);
	let handle = provider.handle();
	let harness = ComponentHarness::new(
		MessageView::new("title", handle.clone(), MessageDescriptor::new("nav.home")),
		handle.clone(),
		10,
		1,
	);
	assert_eq!(handle.store().subscriber_count(), 1);
	drop(harness);
	assert_eq!(handle.store().subscriber_count(), 0);
}

proptest! {
	#[test]
	fn missing_keys_render_their_default(suffix in "[a-z]{1,12}", default in "[A-Za-z ]{1,24}") {
		let provider = mount(&["en", "es"]);
		let descriptor = MessageDescriptor::new(format!("missing.{suffix}")).default_message(default.clone());

		prop_assert_eq!(render_message(&provider.snapshot(), &descriptor), default.clone());
		provider.set_locale("es").unwrap();
		prop_assert_eq!(render_message(&provider.snapshot(), &descriptor), default);
	}
}
