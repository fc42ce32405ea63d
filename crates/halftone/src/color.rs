//! Foreground and background colors.
//!
//! A [`Color`] is either an opaque sRGB triple or the transparent sentinel.
//! Only luminance drives the halftone, so alpha is never carried beyond the
//! opaque/transparent distinction.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Fill color for the canvas background or the drawn shapes.
///
/// # Example
///
/// ```
/// use halftone::Color;
///
/// let ink: Color = "#1a1a1a".parse().unwrap();
/// assert_eq!(ink, Color::rgb(0x1a, 0x1a, 0x1a));
///
/// let clear: Color = "transparent".parse().unwrap();
/// assert!(clear.is_transparent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Fully opaque sRGB color.
    Rgb {
        /// Red channel (0-255)
        r: u8,
        /// Green channel (0-255)
        g: u8,
        /// Blue channel (0-255)
        b: u8,
    },
    /// Nothing is painted.
    Transparent,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque color from 8-bit channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        matches!(self, Color::Transparent)
    }

    /// RGBA bytes as written into a raster. Transparent is `[0, 0, 0, 0]`.
    #[inline]
    pub fn to_rgba(&self) -> [u8; 4] {
        match *self {
            Color::Rgb { r, g, b } => [r, g, b, 255],
            Color::Transparent => [0, 0, 0, 0],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb { r, g, b } => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Color::Transparent => write!(f, "transparent"),
        }
    }
}

/// Error type for parsing color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3, 6 or 8 digits after '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
    /// `rgb(...)`/`rgba(...)` with the wrong number of components or a bad value
    InvalidFunction,
    /// Not a recognized color notation
    Unrecognized(String),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3, 6 or 8 digits)")
            }
            ParseColorError::InvalidHex(err) => write!(f, "invalid hex character: {}", err),
            ParseColorError::InvalidFunction => {
                write!(f, "invalid rgb()/rgba() color (expected 0-255 components)")
            }
            ParseColorError::Unrecognized(s) => write!(f, "unrecognized color: {:?}", s),
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();

        if normalized == "transparent" {
            return Ok(Color::Transparent);
        }
        if let Some(hex) = normalized.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = normalized
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_function(args, true);
        }
        if let Some(args) = normalized
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_function(args, false);
        }

        Err(ParseColorError::Unrecognized(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Result<Color, ParseColorError> {
    // Byte slicing below assumes single-byte characters
    if !hex.is_ascii() {
        return Err(ParseColorError::Unrecognized(format!("#{hex}")));
    }
    match hex.len() {
        3 => {
            // Each digit is doubled: "f80" -> "ff8800"
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            Ok(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        6 | 8 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            let color = Color::rgb(byte(0)?, byte(2)?, byte(4)?);
            if hex.len() == 8 && byte(6)? == 0 {
                Ok(Color::Transparent)
            } else {
                Ok(color)
            }
        }
        _ => Err(ParseColorError::InvalidLength),
    }
}

fn parse_function(args: &str, with_alpha: bool) -> Result<Color, ParseColorError> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(ParseColorError::InvalidFunction);
    }

    let channel = |s: &str| s.parse::<u8>().map_err(|_| ParseColorError::InvalidFunction);
    let color = Color::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);

    if with_alpha {
        let alpha: f32 = parts[3]
            .parse()
            .map_err(|_| ParseColorError::InvalidFunction)?;
        if alpha <= 0.0 {
            return Ok(Color::Transparent);
        }
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_hex() {
        assert_eq!("#1a1a1a".parse::<Color>(), Ok(Color::rgb(26, 26, 26)));
        assert_eq!("#FFFFFF".parse::<Color>(), Ok(Color::WHITE));
    }

    #[test]
    fn test_parse_short_hex_doubles_digits() {
        assert_eq!("#f80".parse::<Color>(), Ok(Color::rgb(255, 136, 0)));
    }

    #[test]
    fn test_transparent_notations() {
        for s in ["transparent", " Transparent ", "#00000000", "rgba(0,0,0,0)", "rgba(10, 20, 30, 0)"] {
            assert_eq!(s.parse::<Color>(), Ok(Color::Transparent), "{s}");
        }
    }

    #[test]
    fn test_eight_digit_hex_with_alpha_is_opaque() {
        assert_eq!("#ff000080".parse::<Color>(), Ok(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!("rgb(1, 2, 3)".parse::<Color>(), Ok(Color::rgb(1, 2, 3)));
        assert_eq!(
            "rgb(1, 2)".parse::<Color>(),
            Err(ParseColorError::InvalidFunction)
        );
        assert_eq!(
            "rgb(256, 0, 0)".parse::<Color>(),
            Err(ParseColorError::InvalidFunction)
        );
    }

    #[test]
    fn test_invalid_strings() {
        assert_eq!("#12345".parse::<Color>(), Err(ParseColorError::InvalidLength));
        assert!(matches!(
            "#gggggg".parse::<Color>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!(matches!(
            "red".parse::<Color>(),
            Err(ParseColorError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for color in [Color::rgb(26, 26, 26), Color::WHITE, Color::Transparent] {
            assert_eq!(color.to_string().parse::<Color>(), Ok(color));
        }
    }

    #[test]
    fn test_to_rgba() {
        assert_eq!(Color::rgb(1, 2, 3).to_rgba(), [1, 2, 3, 255]);
        assert_eq!(Color::Transparent.to_rgba(), [0, 0, 0, 0]);
    }
}
