//! Server configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. stock defaults ([`ServerConfig::default`])
//! 2. a sparse TOML file (`course-site.toml` unless `--config` names another)
//! 3. environment: `PORT` and `COURSE_SITE_ENV`
//! 4. command-line flags: `--port` and `--production`
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! port = 3000
//! mode = "development"            # or "production"
//! content_root = "."              # directory holding level-N-*/module-N-*/
//! content_prefix = "/course-content"
//! # course_file = "course.json"  # replaces the embedded course document
//!
//! [static_root]
//! development = "dist/public"
//! production = "public"
//!
//! [colors]
//! background = "#0a0e14"
//! card = "#111722"
//! text = "#e6edf3"
//! text_muted = "#8b949e"
//! border = "#1f2937"
//! primary = "#22d3ee"
//! accent = "#f59e0b"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file read when `--config` is not given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "course-site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which static asset root is served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Reads a `COURSE_SITE_ENV` value. Only `production` selects production.
    pub fn from_env_value(value: &str) -> Mode {
        if value.trim().eq_ignore_ascii_case("production") {
            Mode::Production
        } else {
            Mode::Development
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
    pub mode: Mode,
    /// Directory the content prefix is mapped onto.
    pub content_root: String,
    /// URL prefix for content files. Starts with `/`, no trailing slash.
    pub content_prefix: String,
    /// Optional JSON course document replacing the embedded one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_file: Option<String>,
    pub static_root: StaticRootConfig,
    pub colors: ColorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            mode: Mode::Development,
            content_root: ".".to_string(),
            content_prefix: "/course-content".to_string(),
            course_file: None,
            static_root: StaticRootConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

/// Static asset directory per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticRootConfig {
    pub development: String,
    pub production: String,
}

impl Default for StaticRootConfig {
    fn default() -> Self {
        Self {
            development: "dist/public".to_string(),
            production: "public".to_string(),
        }
    }
}

/// Site palette, emitted as CSS custom properties ahead of the stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub card: String,
    pub text: String,
    /// Secondary text: stats, breadcrumbs, hints.
    pub text_muted: String,
    pub border: String,
    /// Cyan accent levels, links, active tracker dots.
    pub primary: String,
    /// Amber accent levels and the course-complete marker.
    pub accent: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0a0e14".to_string(),
            card: "#111722".to_string(),
            text: "#e6edf3".to_string(),
            text_muted: "#8b949e".to_string(),
            border: "#1f2937".to_string(),
            primary: "#22d3ee".to_string(),
            accent: "#f59e0b".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".into()));
        }
        let prefix = &self.content_prefix;
        if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "content_prefix must start with '/' and have no trailing slash, got {prefix:?}"
            )));
        }
        if self.content_root.is_empty() {
            return Err(ConfigError::Validation("content_root must not be empty".into()));
        }
        if self.static_root.development.is_empty() || self.static_root.production.is_empty() {
            return Err(ConfigError::Validation(
                "static_root entries must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Static asset directory for the configured mode.
    pub fn static_root(&self) -> &str {
        match self.mode {
            Mode::Development => &self.static_root.development,
            Mode::Production => &self.static_root.production,
        }
    }

    pub fn content_root_path(&self) -> PathBuf {
        PathBuf::from(&self.content_root)
    }

    /// Apply `PORT` and `COURSE_SITE_ENV` through `lookup`.
    ///
    /// Takes a lookup function instead of reading the process environment so
    /// the overlay can be tested without mutating global state.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            self.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("PORT must be a port number, got {port:?}"))
            })?;
        }
        if let Some(env) = lookup("COURSE_SITE_ENV") {
            self.mode = Mode::from_env_value(&env);
        }
        Ok(())
    }

    /// Apply command-line flags. Flags only ever override.
    pub fn apply_cli(&mut self, port: Option<u16>, production: bool) {
        if let Some(port) = port {
            self.port = port;
        }
        if production {
            self.mode = Mode::Production;
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ServerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value. `Ok(None)` when it doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ServerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the file layer.
///
/// With `explicit` set the file must exist. Without it,
/// [`DEFAULT_CONFIG_FILE`] is read if present and stock defaults are used
/// otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let overlay = load_raw_config(path)?;
    if overlay.is_none()
        && let Some(p) = explicit
    {
        return Err(ConfigError::Validation(format!(
            "config file not found: {}",
            p.display()
        )));
    }
    resolve_config(stock_defaults_value()?, overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Course Site Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The environment overrides this file (PORT, COURSE_SITE_ENV=production),
# and command-line flags override the environment.
# Unknown keys will cause an error.

# TCP port to listen on.
port = 3000

# "development" serves static assets from static_root.development,
# "production" from static_root.production.
mode = "development"

# Directory holding level-N-*/module-N-*/ content folders.
content_root = "."

# URL prefix content files are served under. No trailing slash.
content_prefix = "/course-content"

# JSON course document to load instead of the built-in one.
# course_file = "course.json"

# ---------------------------------------------------------------------------
# Static asset roots
# ---------------------------------------------------------------------------
[static_root]
development = "dist/public"
production = "public"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0a0e14"
card = "#111722"
text = "#e6edf3"
text_muted = "#8b949e"    # Stats, breadcrumbs, hints
border = "#1f2937"
primary = "#22d3ee"       # Cyan levels, links, tracker
accent = "#f59e0b"        # Amber levels
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {bg};
    --color-card: {card};
    --color-text: {text};
    --color-muted: {muted};
    --color-border: {border};
    --color-primary: {primary};
    --color-accent: {accent};
}}
"#,
        bg = colors.background,
        card = colors.card,
        text = colors.text,
        muted = colors.text_muted,
        border = colors.border,
        primary = colors.primary,
        accent = colors.accent,
    )
}
