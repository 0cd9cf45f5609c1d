//! # Styling
//!
//! Colors and the purely cosmetic properties of the input bar. None of this
//! affects layout except `border_padding`, which the bar reads when the
//! border is shown.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::geometry::EdgeInsets;

/// An opaque RGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const LIGHT_GRAY: Color = Color::rgb(0xaa, 0xaa, 0xaa);
    pub const DARK_GRAY: Color = Color::rgb(0x55, 0x55, 0x55);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A gray with the given white level in `0.0..=1.0`.
    pub fn white(level: f64) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(v, v, v)
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #rrggbb", self.0)
    }
}

impl std::error::Error for ColorParseError {}

/// Cosmetic properties of the bar and the border drawn around its text view.
#[derive(Debug, Clone, PartialEq)]
pub struct BarStyle {
    /// Draw a border/background view around the text view
    pub show_text_view_border: bool,
    /// Space between the text view and its border
    pub border_padding: EdgeInsets,
    pub corner_radius: f64,
    pub border_width: f64,
    pub border_color: Color,
    pub text_view_background: Color,
    pub bar_background: Color,
    pub text_color: Color,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            show_text_view_border: false,
            border_padding: EdgeInsets::new(6.0, 8.0, 6.0, 8.0),
            corner_radius: 4.0,
            border_width: 1.0,
            border_color: Color::white(0.9),
            text_view_background: Color::WHITE,
            bar_background: Color::white(0.95),
            text_color: Color::DARK_GRAY,
        }
    }
}
