//! # Configuration
//!
//! Settings for the demo screen, with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chatbar/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Units are terminal cells: the demo renders one point per cell, so the
//! defaults here are much smaller than the point-based defaults of
//! `InputBar::new()`.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::geometry::EdgeInsets;
use crate::core::keyboard::CURRENT_PLATFORM_VERSION;
use crate::core::style::{BarStyle, Color};
use crate::core::text_view::FontMetrics;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatbarConfig {
    #[serde(default)]
    pub bar: BarConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BarConfig {
    pub default_height: Option<f64>,
    pub horizontal_padding: Option<f64>,
    pub horizontal_spacing: Option<f64>,
    pub always_show_right_button: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TextConfig {
    pub max_lines: Option<usize>,
    pub placeholder: Option<String>,
    pub placeholder_color: Option<Color>,
    pub line_height: Option<f64>,
    pub char_width: Option<f64>,
    pub insets: Option<EdgeInsets>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StyleConfig {
    pub show_border: Option<bool>,
    pub border_padding: Option<EdgeInsets>,
    pub border_color: Option<Color>,
    pub text_background: Option<Color>,
    pub bar_background: Option<Color>,
    pub text_color: Option<Color>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KeyboardConfig {
    /// Rows the simulated keyboard takes when shown
    pub height: Option<f64>,
    pub platform_version: Option<f64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BAR_HEIGHT: f64 = 3.0;
pub const DEFAULT_HORIZONTAL_PADDING: f64 = 1.0;
pub const DEFAULT_HORIZONTAL_SPACING: f64 = 1.0;
pub const DEFAULT_MAX_LINES: usize = 5;
pub const DEFAULT_KEYBOARD_HEIGHT: f64 = 8.0;
pub const DEFAULT_PLACEHOLDER: &str = "Type a message";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub default_height: f64,
    pub horizontal_padding: f64,
    pub horizontal_spacing: f64,
    pub always_show_right_button: bool,
    pub max_lines: usize,
    pub placeholder: String,
    pub placeholder_color: Color,
    pub font: FontMetrics,
    pub text_insets: EdgeInsets,
    pub style: BarStyle,
    pub keyboard_height: f64,
    pub platform_version: f64,
}

/// Values given on the command line. `None`/`false` = not specified.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_lines: Option<usize>,
    pub always_show_right_button: bool,
    pub no_border: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.chatbar/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatbar").join("config.toml"))
}

/// Load the config.
///
/// An explicit `path` must exist. Without one, `~/.chatbar/config.toml` is
/// used; if that file doesn't exist a commented-out default is written and
/// `ChatbarConfig::default()` returned.
pub fn load_config(path: Option<&Path>) -> Result<ChatbarConfig, ConfigError> {
    if let Some(path) = path {
        return read_config(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatbarConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ChatbarConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<ChatbarConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatbarConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# chatbar configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.
# Sizes are in terminal cells.

# [bar]
# default_height = 3
# horizontal_padding = 1
# horizontal_spacing = 1
# always_show_right_button = false

# [text]
# max_lines = 5                      # 0 = grow without limit (or set CHATBAR_MAX_LINES)
# placeholder = "Type a message"
# placeholder_color = "#808080"
# line_height = 1
# char_width = 1
# insets = { top = 0, left = 0, bottom = 0, right = 0 }

# [style]
# show_border = true
# border_padding = { top = 1, left = 1, bottom = 1, right = 1 }
# border_color = "#808080"
# text_background = "#1c1c1c"
# bar_background = "#262626"
# text_color = "#d0d0d0"

# [keyboard]
# height = 8
# platform_version = 17.0            # below 8.0 uses legacy frame tracking
"##;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatbarConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Max lines: CLI → env → config → default
    let max_lines = cli
        .max_lines
        .or_else(env_max_lines)
        .or(config.text.max_lines)
        .unwrap_or(DEFAULT_MAX_LINES);

    let show_border = !cli.no_border && config.style.show_border.unwrap_or(true);

    let style = BarStyle {
        show_text_view_border: show_border,
        border_padding: config
            .style
            .border_padding
            .unwrap_or(EdgeInsets::new(1.0, 1.0, 1.0, 1.0)),
        corner_radius: 1.0,
        border_width: 1.0,
        border_color: config.style.border_color.unwrap_or(Color::rgb(0x80, 0x80, 0x80)),
        text_view_background: config.style.text_background.unwrap_or(Color::rgb(0x1c, 0x1c, 0x1c)),
        bar_background: config.style.bar_background.unwrap_or(Color::rgb(0x26, 0x26, 0x26)),
        text_color: config.style.text_color.unwrap_or(Color::rgb(0xd0, 0xd0, 0xd0)),
    };

    ResolvedConfig {
        default_height: config.bar.default_height.unwrap_or(DEFAULT_BAR_HEIGHT),
        horizontal_padding: config
            .bar
            .horizontal_padding
            .unwrap_or(DEFAULT_HORIZONTAL_PADDING),
        horizontal_spacing: config
            .bar
            .horizontal_spacing
            .unwrap_or(DEFAULT_HORIZONTAL_SPACING),
        always_show_right_button: cli.always_show_right_button
            || config.bar.always_show_right_button.unwrap_or(false),
        max_lines,
        placeholder: config
            .text
            .placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        placeholder_color: config
            .text
            .placeholder_color
            .unwrap_or(Color::rgb(0x80, 0x80, 0x80)),
        font: FontMetrics::new(
            config.text.line_height.unwrap_or(1.0),
            config.text.char_width.unwrap_or(1.0),
        ),
        text_insets: config.text.insets.unwrap_or(EdgeInsets::ZERO),
        style,
        keyboard_height: config.keyboard.height.unwrap_or(DEFAULT_KEYBOARD_HEIGHT),
        platform_version: config
            .keyboard
            .platform_version
            .unwrap_or(CURRENT_PLATFORM_VERSION),
    }
}

fn env_max_lines() -> Option<usize> {
    let raw = std::env::var("CHATBAR_MAX_LINES").ok()?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("Ignoring CHATBAR_MAX_LINES={raw:?}: {e}");
            None
        }
    }
}
