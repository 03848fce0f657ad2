// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Default configuration file generation.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::ConfigError;

/// Default configuration file template.
///
/// Written to ~/.config/lumen/config.toml when no user config exists. Every
/// value is commented out so built-in defaults keep applying.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"#
# Lumen Configuration File
# Location: ~/.config/lumen/config.toml
#
# Environment variables override this file: LUMEN_<SECTION>__<FIELD>,
# e.g. LUMEN_I18N__DEFAULT_LOCALE=es.
#

[i18n]
# Locales offered by the locale switcher, in display order.
# available_locales = ["en", "es", "fr"]

# Locale used when no preference is stored and the system locale is not offered.
# default_locale = "en"

# Locale whose bundle fills in missing translations.
# base_locale = "en"

# Directory holding <code>.json or <code>.mo bundles. Built-in bundles are used when unset.
# bundle_dir = "/usr/share/lumen/locales"

# Match the operating system locale on first start.
# detect_system_locale = true

[storage]
# preferences_file = "~/.local/state/lumen/preferences.json"

[logging]
# error, warn, info, debug or trace. RUST_LOG takes precedence.
# level = "info"
# pretty or json
# format = "pretty"
"#;

/// Write [`DEFAULT_CONFIG_TEMPLATE`] to `path` if nothing exists there yet.
pub fn ensure_default_config(path: &Path) -> Result<(), ConfigError> {
	if path.exists() {
		debug!(path = %path.display(), "user config exists");
		return Ok(());
	}

	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;

	info!(path = %path.display(), "created default config file");
	Ok(())
}
