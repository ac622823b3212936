//! Color values used by item and level properties.
//!
//! # Responsibility
//! - Parse and print `#rrggbb` colors.
//! - Derive the ordered color sequence handed out to one sibling group.
//!
//! # Invariants
//! - `Rgb` always serializes in canonical lowercase `#rrggbb` form.
//! - Sequence derivation is a pure function of `(color, sibling count)`;
//!   nothing is cached across calls.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear per-channel interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let channel = |a: u8, b: u8| -> u8 {
            let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

/// Hex color parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRgbError(pub String);

impl Display for ParseRgbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid hex color `{}`; expected #rgb or #rrggbb", self.0)
    }
}

impl Error for ParseRgbError {}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || ParseRgbError(trimmed.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let digit = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Self::new(
                digit(0..1)? * 17,
                digit(1..2)? * 17,
                digit(2..3)? * 17,
            )),
            6 => Ok(Self::new(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseRgbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color property value.
///
/// Serialized with a `type` tag to match the chart document schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Color {
    /// One color repeated for every sibling.
    Single { value: Rgb },
    /// Two endpoints interpolated across the sibling group.
    Gradient { from: Rgb, to: Rgb },
    /// Explicit palette indexed by sibling position.
    Enumeration { values: Vec<Rgb> },
}

impl Color {
    pub fn single(value: Rgb) -> Self {
        Self::Single { value }
    }

    /// Returns the color handed to the sibling at `index` in a group of
    /// `count` siblings.
    ///
    /// Enumeration palettes wrap around when the group is longer than the
    /// palette. An empty palette yields white.
    pub fn pick(&self, index: usize, count: usize) -> Rgb {
        let sequence = color_sequence(self, count);
        if sequence.is_empty() {
            return Rgb::WHITE;
        }
        sequence[index % sequence.len()]
    }
}

/// Compact form: `#rrggbb`, `#from..#to`, or a comma-separated palette.
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single { value } => write!(f, "{value}"),
            Self::Gradient { from, to } => write!(f, "{from}..{to}"),
            Self::Enumeration { values } => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Derives the ordered colors for a sibling group of `count` items.
///
/// - `single` repeats its value `count` times.
/// - `gradient` yields `count` colors with both endpoints included.
/// - `enumeration` returns the palette as stored, regardless of `count`.
pub fn color_sequence(color: &Color, count: usize) -> Vec<Rgb> {
    match color {
        Color::Single { value } => vec![*value; count],
        Color::Gradient { from, to } => match count {
            0 => Vec::new(),
            1 => vec![*from],
            _ => {
                let last = (count - 1) as f64;
                (0..count)
                    .map(|index| from.lerp(*to, index as f64 / last))
                    .collect()
            }
        },
        Color::Enumeration { values } => values.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{color_sequence, Color, Rgb};

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!("#fff".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert_eq!("#0A0b0C".parse::<Rgb>().unwrap(), Rgb::new(10, 11, 12));
        assert!("fff".parse::<Rgb>().is_err());
        assert!("#ffff".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_is_canonical_lowercase() {
        assert_eq!(Rgb::new(255, 0, 171).to_string(), "#ff00ab");
    }

    #[test]
    fn color_display_uses_hex_values() {
        assert_eq!(Color::single(Rgb::WHITE).to_string(), "#ffffff");
        let gradient = Color::Gradient {
            from: Rgb::BLACK,
            to: Rgb::new(0, 0, 255),
        };
        assert_eq!(gradient.to_string(), "#000000..#0000ff");
        let palette = Color::Enumeration {
            values: vec![Rgb::new(255, 0, 0), Rgb::BLACK],
        };
        assert_eq!(palette.to_string(), "#ff0000,#000000");
    }

    #[test]
    fn gradient_includes_both_endpoints() {
        let gradient = Color::Gradient {
            from: Rgb::BLACK,
            to: Rgb::WHITE,
        };
        let colors = color_sequence(&gradient, 3);
        assert_eq!(colors, vec![Rgb::BLACK, Rgb::new(128, 128, 128), Rgb::WHITE]);
        assert_eq!(color_sequence(&gradient, 1), vec![Rgb::BLACK]);
        assert!(color_sequence(&gradient, 0).is_empty());
    }

    #[test]
    fn enumeration_wraps_past_palette_end() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let palette = Color::Enumeration {
            values: vec![red, blue],
        };
        assert_eq!(palette.pick(0, 5), red);
        assert_eq!(palette.pick(1, 5), blue);
        assert_eq!(palette.pick(2, 5), red);
        assert_eq!(palette.pick(4, 5), red);
    }

    #[test]
    fn empty_palette_falls_back_to_white() {
        let palette = Color::Enumeration { values: Vec::new() };
        assert_eq!(palette.pick(0, 2), Rgb::WHITE);
    }
}
