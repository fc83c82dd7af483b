//! B/W Color for EPDs

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::BinaryColor;

/// Only for the Black/White-Displays
///
/// The panels latch a set bit as white, so white is the "unset" pixel state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black color
    Black,
    /// White color
    #[default]
    White,
}

impl Color {
    /// Get the color encoding of the color for one bit
    pub fn get_bit_value(self) -> u8 {
        match self {
            Color::White => 1u8,
            Color::Black => 0u8,
        }
    }

    /// Gets a full byte of black or white pixels
    pub fn get_byte_value(self) -> u8 {
        match self {
            Color::White => 0xff,
            Color::Black => 0x00,
        }
    }

    /// Gray level used for the color in 8 bit luma images
    pub fn luma(self) -> u8 {
        match self {
            Color::White => 255,
            Color::Black => 0,
        }
    }

    /// Interprets a fill value: 0 is black, anything else white
    pub fn from_fill(fill: u8) -> Self {
        if fill == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Classifies an 8 bit luma sample that already went through the
    /// bi-level reduction
    pub(crate) fn from_luma(luma: u8) -> Self {
        if luma > 127 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Returns the inverse of the given color.
    ///
    /// Black returns White and White returns Black
    pub fn inverse(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl From<u8> for Color {
    fn from(value: u8) -> Self {
        Color::from_fill(value)
    }
}

#[cfg(feature = "graphics")]
impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for BinaryColor {
    fn from(b: Color) -> BinaryColor {
        match b {
            Color::Black => BinaryColor::On,
            Color::White => BinaryColor::Off,
        }
    }
}
