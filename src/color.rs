//! Color type for black/white e-paper panels
//!
//! This module defines the [`Color`] enum for the two pixel states the panel
//! can show.
//!
//! ## Color Representation
//!
//! Pixels are stored one bit each in the black/white RAM:
//!
//! | Color | Bit | Full byte |
//! |-------|-----|-----------|
//! | Black | 0   | 0x00      |
//! | White | 1   | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use epd2in7::Color;
//!
//! assert_eq!(Color::Black.bw_byte(), 0x00);
//! assert_eq!(Color::White.bw_byte(), 0xFF);
//! assert_eq!(Color::from_bit(true), Color::White);
//! ```

/// Colors supported by the panel
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels (panel background)
    #[default]
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Get the byte value filling eight pixels of this color
    ///
    /// ```
    /// use epd2in7::Color;
    ///
    /// assert_eq!(Color::Black.bw_byte(), 0x00);
    /// assert_eq!(Color::White.bw_byte(), 0xFF);
    /// ```
    pub fn bw_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// Bit value of a single pixel (white is set)
    pub fn bit(self) -> bool {
        self == Self::White
    }

    /// Color of a single pixel bit
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::White } else { Self::Black }
    }

    /// The other color
    pub fn inverse(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_round_trip() {
        for color in [Color::Black, Color::White] {
            assert_eq!(Color::from_bit(color.bit()), color);
        }
    }

    #[test]
    fn test_inverse() {
        assert_eq!(Color::Black.inverse(), Color::White);
        assert_eq!(Color::White.inverse(), Color::Black);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_from_binary_color() {
        use embedded_graphics_core::pixelcolor::BinaryColor;
        assert_eq!(Color::from(BinaryColor::On), Color::Black);
        assert_eq!(Color::from(BinaryColor::Off), Color::White);
    }
}
