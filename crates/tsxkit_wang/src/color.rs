//! Display colors used by wang colors and transparent image keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Simple 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}', expected #rrggbb or #aarrggbb")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses Tiled's color notation. The leading `#` is optional and the
    /// alpha channel, when present, comes first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let err = || ParseColorError(s.to_string());

        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());

        match hex.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(2)?, channel(4)?, channel(6)?, channel(0)?)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.a, self.r, self.g, self.b
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::RED);
        assert_eq!("00ff00".parse::<Color>().unwrap(), Color::GREEN);
    }

    #[test]
    fn test_parse_argb() {
        let c: Color = "#80112233".parse().unwrap();
        assert_eq!(c, Color::rgba(0x11, 0x22, 0x33, 0x80));
        assert_eq!(c.to_string(), "#80112233");
    }

    #[test]
    fn test_display_opaque() {
        assert_eq!(Color::rgb(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn test_invalid() {
        assert!("#ff00".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("#ffé000".parse::<Color>().is_err());
    }
}
