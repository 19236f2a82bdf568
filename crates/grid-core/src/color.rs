//! Palette colors for painted cells

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the palette entries a user can paint with.
///
/// Crosses the store boundary as its capitalized name (`"Green"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaintColor {
    #[default]
    Green,
    Blue,
    Red,
    Yellow,
    Orange,
    Purple,
    Cyan,
    Mint,
}

impl PaintColor {
    /// Palette order, first row then second row
    pub const PALETTE: [PaintColor; 8] = [
        PaintColor::Green,
        PaintColor::Blue,
        PaintColor::Red,
        PaintColor::Yellow,
        PaintColor::Orange,
        PaintColor::Purple,
        PaintColor::Cyan,
        PaintColor::Mint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaintColor::Green => "Green",
            PaintColor::Blue => "Blue",
            PaintColor::Red => "Red",
            PaintColor::Yellow => "Yellow",
            PaintColor::Orange => "Orange",
            PaintColor::Purple => "Purple",
            PaintColor::Cyan => "Cyan",
            PaintColor::Mint => "Mint",
        }
    }

    /// Opaque RGBA in 0..=1
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            PaintColor::Green => [0.204, 0.780, 0.349, 1.0],
            PaintColor::Blue => [0.0, 0.478, 1.0, 1.0],
            PaintColor::Red => [1.0, 0.231, 0.188, 1.0],
            PaintColor::Yellow => [1.0, 0.8, 0.0, 1.0],
            PaintColor::Orange => [1.0, 0.584, 0.0, 1.0],
            PaintColor::Purple => [0.686, 0.322, 0.871, 1.0],
            PaintColor::Cyan => [0.196, 0.678, 0.902, 1.0],
            PaintColor::Mint => [0.0, 0.78, 0.745, 1.0],
        }
    }

    /// `#rrggbb` form for map style expressions
    pub fn hex(&self) -> String {
        let [r, g, b, _] = self.rgba();
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for PaintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown paint color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for PaintColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaintColor::PALETTE
            .iter()
            .copied()
            .find(|color| color.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for color in PaintColor::PALETTE {
            assert_eq!(color.name().parse::<PaintColor>().unwrap(), color);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("mint".parse::<PaintColor>().unwrap(), PaintColor::Mint);
        assert_eq!(" PURPLE ".parse::<PaintColor>().unwrap(), PaintColor::Purple);
        assert!("magenta".parse::<PaintColor>().is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(PaintColor::Blue.hex(), "#007aff");
        assert_eq!(PaintColor::Yellow.hex(), "#ffcc00");
    }

    #[test]
    fn test_default_is_green() {
        assert_eq!(PaintColor::default(), PaintColor::Green);
        assert_eq!(PaintColor::Green.to_string(), "Green");
    }
}
