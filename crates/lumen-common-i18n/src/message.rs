// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message formatting: template resolution plus named placeholder substitution.
//!
//! Templates use `{name}` placeholders. `{{` and `}}` produce literal braces.
//! A placeholder without a value is left in the output as `{name}` so missing
//! data is visible instead of silently blank.

use crate::catalog::MessageCatalog;
use crate::format::format_number;
use crate::locale::Locale;

/// Nested message references deeper than this render their id.
pub const MAX_NESTING: usize = 8;

/// A value that can be substituted into a placeholder.
///
/// The set is closed: anything else must be converted by the caller before it
/// reaches the formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageValue {
	Text(String),
	Number(f64),
	Message(MessageRef),
}

impl From<&str> for MessageValue {
	fn from(value: &str) -> Self {
		MessageValue::Text(value.to_string())
	}
}

impl From<String> for MessageValue {
	fn from(value: String) -> Self {
		MessageValue::Text(value)
	}
}

impl From<&String> for MessageValue {
	fn from(value: &String) -> Self {
		MessageValue::Text(value.clone())
	}
}

impl From<f64> for MessageValue {
	fn from(value: f64) -> Self {
		MessageValue::Number(value)
	}
}

macro_rules! impl_from_integer {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for MessageValue {
				fn from(value: $ty) -> Self {
					MessageValue::Number(value as f64)
				}
			}
		)*
	};
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<MessageRef> for MessageValue {
	fn from(value: MessageRef) -> Self {
		MessageValue::Message(value)
	}
}

/// A reference to another catalog message, resolved in the same locale as the
/// message that embeds it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRef {
	pub id: String,
	pub values: MessageValues,
}

impl MessageRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			values: MessageValues::new(),
		}
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Into<MessageValue>) -> Self {
		self.values.insert(name, value);
		self
	}
}

/// Placeholder name → value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageValues {
	entries: Vec<(String, MessageValue)>,
}

impl MessageValues {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Into<MessageValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Insert or replace the value for `name`.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MessageValue>) {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&MessageValue> {
		self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageValue)> {
		self.entries.iter().map(|(n, v)| (n.as_str(), v))
	}
}

impl<K, V> FromIterator<(K, V)> for MessageValues
where
	K: Into<String>,
	V: Into<MessageValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut values = MessageValues::new();
		for (name, value) in iter {
			values.insert(name, value);
		}
		values
	}
}

/// Resolve `key` (with base-locale fallback) and substitute `values`.
///
/// Missing keys render as the key itself.
pub fn format_message(
	catalog: &MessageCatalog,
	locale: Locale,
	key: &str,
	values: &MessageValues,
) -> String {
	try_format_message(catalog, locale, key, values).unwrap_or_else(|| key.to_string())
}

/// Like [`format_message`] but returns `None` when the key is missing from
/// both the requested and the base locale.
pub fn try_format_message(
	catalog: &MessageCatalog,
	locale: Locale,
	key: &str,
	values: &MessageValues,
) -> Option<String> {
	format_at_depth(catalog, locale, key, values, 0)
}

/// Substitute `values` into an already resolved template.
pub fn interpolate(
	catalog: &MessageCatalog,
	locale: Locale,
	template: &str,
	values: &MessageValues,
) -> String {
	interpolate_at_depth(catalog, locale, template, values, 0)
}

fn format_at_depth(
	catalog: &MessageCatalog,
	locale: Locale,
	key: &str,
	values: &MessageValues,
	depth: usize,
) -> Option<String> {
	let template = catalog.resolve(locale, key).template()?;
	Some(interpolate_at_depth(catalog, locale, template, values, depth))
}

fn interpolate_at_depth(
	catalog: &MessageCatalog,
	locale: Locale,
	template: &str,
	values: &MessageValues,
	depth: usize,
) -> String {
	let mut out = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(idx) = rest.find(['{', '}']) {
		out.push_str(&rest[..idx]);
		let tail = &rest[idx..];

		if tail.starts_with("{{") || tail.starts_with("}}") {
			out.push_str(&tail[..1]);
			rest = &tail[2..];
			continue;
		}

		if tail.starts_with('}') {
			out.push('}');
			rest = &tail[1..];
			continue;
		}

		let Some(close) = tail.find('}') else {
			// Unterminated placeholder: keep the remainder verbatim.
			out.push_str(tail);
			return out;
		};

		let name = tail[1..close].trim();
		let placeholder = &tail[..=close];
		if name.is_empty() {
			out.push_str(placeholder);
		} else {
			match values.get(name) {
				Some(value) => out.push_str(&render_value(catalog, locale, value, depth)),
				None => {
					tracing::debug!(%locale, placeholder = name, "no value for placeholder");
					out.push_str(placeholder);
				}
			}
		}
		rest = &tail[close + 1..];
	}

	out.push_str(rest);
	out
}

fn render_value(catalog: &MessageCatalog, locale: Locale, value: &MessageValue, depth: usize) -> String {
	match value {
		MessageValue::Text(text) => text.clone(),
		MessageValue::Number(n) => format_number(locale, *n),
		MessageValue::Message(nested) => {
			if depth + 1 >= MAX_NESTING {
				tracing::warn!(%locale, id = %nested.id, "message nesting too deep");
				return nested.id.clone();
			}
			format_at_depth(catalog, locale, &nested.id, &nested.values, depth + 1)
				.unwrap_or_else(|| nested.id.clone())
		}
	}
}
