//! Display colors for transit lines.

use std::fmt;

use crate::models::types::{Result, TransitError};

/// An RGB display color for a line.
///
/// LOOM exports carry colors as bare `RRGGBB` hex; `from_hex` also accepts
/// the `#`-prefixed form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LineColor {
    /// Neutral color used when no line color can be resolved.
    pub const FALLBACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TransitError::InvalidData(format!(
                "expected RRGGBB hex color, got {hex:?}"
            )));
        }

        let channel = |range| u8::from_str_radix(&digits[range], 16).unwrap_or(0);

        Ok(Self {
            r: channel(0..2),
            g: channel(2..4),
            b: channel(4..6),
        })
    }

    /// Render as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_and_prefixed_hex() {
        let mta_red = LineColor::new(0xEE, 0x35, 0x2E);
        assert_eq!(LineColor::from_hex("EE352E").unwrap(), mta_red);
        assert_eq!(LineColor::from_hex("#EE352E").unwrap(), mta_red);
    }

    #[test]
    fn test_round_trips_through_hex() {
        let color = LineColor::from_hex("0039A6").unwrap();
        assert_eq!(color.to_hex(), "#0039A6");
        assert_eq!(format!("{}", color), "#0039A6");
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!(LineColor::from_hex("").is_err());
        assert!(LineColor::from_hex("EE352").is_err());
        assert!(LineColor::from_hex("not-hex").is_err());
        assert!(LineColor::from_hex("#EE352E00").is_err());
    }

    #[test]
    fn test_fallback_is_black() {
        assert_eq!(LineColor::FALLBACK.to_hex(), "#000000");
    }
}
