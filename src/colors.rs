//! Named badge colors.
//!
//! The palette is a fixed table; lookups never allocate and the table is never
//! mutated at runtime.

use crate::error::BadgeError;
use resvg::tiny_skia::Color;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorName {
    Primary,
    Secondary,
    Accent,
    Success,
    Warning,
    Info,
    Error,
}

impl ColorName {
    /// Declaration order, which is also the order colors are offered to users.
    pub const ALL: [ColorName; 7] = [
        ColorName::Primary,
        ColorName::Secondary,
        ColorName::Accent,
        ColorName::Success,
        ColorName::Warning,
        ColorName::Info,
        ColorName::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Primary => "primary",
            ColorName::Secondary => "secondary",
            ColorName::Accent => "accent",
            ColorName::Success => "success",
            ColorName::Warning => "warning",
            ColorName::Info => "info",
            ColorName::Error => "error",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ColorName::Primary => "#FF6B6B",
            ColorName::Secondary => "#4ECDC4",
            ColorName::Accent => "#45B7D1",
            ColorName::Success => "#8AC46B",
            ColorName::Warning => "#FFD66B",
            ColorName::Info => "#6B88FF",
            ColorName::Error => "#FF6B87",
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorName {
    type Err = BadgeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ColorName::ALL
            .into_iter()
            .find(|color| color.as_str() == name)
            .ok_or_else(|| BadgeError::InvalidColor {
                color: name.to_string(),
                valid: available_colors().join(", "),
            })
    }
}

/// Resolve a symbolic color name to its `#RRGGBB` code.
pub fn resolve(name: &str) -> Result<&'static str, BadgeError> {
    name.parse::<ColorName>().map(|color| color.hex())
}

pub fn is_valid(name: &str) -> bool {
    ColorName::ALL.iter().any(|color| color.as_str() == name)
}

pub fn available_colors() -> Vec<&'static str> {
    ColorName::ALL.iter().map(ColorName::as_str).collect()
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (plus a few keywords) into a paint color.
pub fn parse_hex(text: &str) -> Option<Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(Color::WHITE),
        "black" => return Some(Color::BLACK),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some(Color::from_rgba8(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            255,
        )),
        6 => Some(Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        )),
        8 => Some(Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        )),
        _ => None,
    }
}

/// Format the RGB channels of a color as `#RRGGBB`.
pub fn to_hex(color: Color) -> String {
    let c = color.to_color_u8();
    format!("#{:02X}{:02X}{:02X}", c.red(), c.green(), c.blue())
}
