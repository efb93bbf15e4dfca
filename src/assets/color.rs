use std::fmt;

use crate::foundation::error::{NarrataError, NarrataResult};

/// Solid background color as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorValue {
    /// Explicit straight-alpha RGBA8 (`#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`).
    Rgba([u8; 4]),
    /// Named color (e.g. `black`), resolved by the media engine.
    Named(String),
}

impl ColorValue {
    /// Parse a hex color or a color name.
    ///
    /// Names must be ASCII alphanumeric so they can be embedded in an engine graph verbatim.
    pub fn parse(s: &str) -> NarrataResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NarrataError::input("background color must be non-empty"));
        }
        if let Some(hex) = s.strip_prefix('#').or_else(|| s.strip_prefix("0x")) {
            return parse_hex(hex).map(Self::Rgba);
        }
        if s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(Self::Named(s.to_ascii_lowercase()));
        }
        Err(NarrataError::input(format!(
            "invalid background color \"{s}\" (expected #RGB, #RRGGBB, #RRGGBBAA or a color name)"
        )))
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgba([r, g, b, 255]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Rgba([r, g, b, a]) => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

fn parse_hex(s: &str) -> NarrataResult<[u8; 4]> {
    fn hex_byte(pair: &str) -> NarrataResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| NarrataError::input(format!("invalid hex byte \"{pair}\"")))
    }

    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(NarrataError::input(format!("invalid hex color digits \"{s}\"")));
    }
    // Shorthand digits stand for a doubled nibble: `#f80` is `#ff8800`.
    let nibble = |i: usize| hex_byte(&s[i..i + 1]).map(|v| v * 17);
    match s.len() {
        3 => Ok([nibble(0)?, nibble(1)?, nibble(2)?, 255]),
        4 => Ok([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?]),
        6 => Ok([hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, 255]),
        8 => Ok([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ]),
        _ => Err(NarrataError::input(
            "hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA (case-insensitive)",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
