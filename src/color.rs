use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());
static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$",
    )
    .unwrap()
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid color: {0:?}")]
    Invalid(String),
}

/// An 8-bit-per-channel color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels in `[a, r, g, b]` order.
    pub fn channels(self) -> [u8; 4] {
        [self.a, self.r, self.g, self.b]
    }

    pub fn from_channels([a, r, g, b]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Per-channel integer average (floor).
    pub fn midpoint(self, other: Rgba) -> Rgba {
        let avg = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
        Rgba {
            r: avg(self.r, other.r),
            g: avg(self.g, other.g),
            b: avg(self.b, other.b),
            a: avg(self.a, other.a),
        }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` or `rgba(r,g,b,a)`
    /// where `a` is a 0–1 fraction.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let invalid = || ColorError::Invalid(input.to_string());

        if let Some(caps) = HEX_RE.captures(trimmed) {
            let hex = &caps[1];
            let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
            return match hex.len() {
                3 => {
                    let nibble = |i: usize| byte(&hex[i..i + 1].repeat(2));
                    Ok(Rgba::opaque(nibble(0)?, nibble(1)?, nibble(2)?))
                }
                6 => Ok(Rgba::opaque(
                    byte(&hex[0..2])?,
                    byte(&hex[2..4])?,
                    byte(&hex[4..6])?,
                )),
                _ => Ok(Rgba::new(
                    byte(&hex[0..2])?,
                    byte(&hex[2..4])?,
                    byte(&hex[4..6])?,
                    byte(&hex[6..8])?,
                )),
            };
        }

        if let Some(caps) = RGB_RE.captures(trimmed) {
            let channel = |idx: usize| caps[idx].parse::<u8>().map_err(|_| invalid());
            let alpha = match caps.get(4) {
                Some(m) => {
                    let fraction: f32 = m.as_str().parse().map_err(|_| invalid())?;
                    if !(0.0..=1.0).contains(&fraction) {
                        return Err(invalid());
                    }
                    (fraction * 255.0).round() as u8
                }
                None => 255,
            };
            return Ok(Rgba::new(channel(1)?, channel(2)?, channel(3)?, alpha));
        }

        Err(invalid())
    }

    /// CSS-ready form: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgba::parse("#f00"), Ok(Rgba::opaque(255, 0, 0)));
        assert_eq!(Rgba::parse("#FBC02D"), Ok(Rgba::opaque(0xFB, 0xC0, 0x2D)));
        assert_eq!(Rgba::parse("#10203040"), Ok(Rgba::new(0x10, 0x20, 0x30, 0x40)));
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(Rgba::parse("rgb(1, 2, 3)"), Ok(Rgba::opaque(1, 2, 3)));
        assert_eq!(Rgba::parse("rgba(1,2,3,0.5)"), Ok(Rgba::new(1, 2, 3, 128)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Rgba::parse("red").is_err());
        assert!(Rgba::parse("#12345").is_err());
        assert!(Rgba::parse("rgb(300, 0, 0)").is_err());
        assert!(Rgba::parse("rgba(0, 0, 0, 1.5)").is_err());
    }

    #[test]
    fn midpoint_floors_each_channel() {
        let a = Rgba::new(255, 0, 1, 255);
        let b = Rgba::new(0, 255, 2, 254);
        assert_eq!(a.midpoint(b), Rgba::new(127, 127, 1, 254));
    }

    #[test]
    fn css_round_trips_opaque_colors() {
        let color = Rgba::opaque(0x38, 0x8E, 0x3C);
        assert_eq!(Rgba::parse(&color.to_css()), Ok(color));
    }
}
