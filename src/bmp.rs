//! 1-bit BMP images
//!
//! [`MonoBmp`] validates a Windows bitmap and exposes its pixels top to bottom,
//! ready to be blitted into a display buffer with
//! [`GraphicDisplay::draw_bmp`](crate::GraphicDisplay::draw_bmp).
//!
//! Only uncompressed 1 bit per pixel images are accepted. Rows in the file are
//! padded to 4 bytes and usually stored bottom row first; both are handled here.
//!
//! ## Polarity
//!
//! [`MonoBmp::pixel`] returns `true` for white. The two palette entries decide
//! which index is white: if entry 0 is brighter than entry 1 the bits are
//! inverted, otherwise index 1 is white.
//!
//! ## Example
//!
//! ```
//! use epd2in7::bmp::{BmpError, MonoBmp};
//!
//! assert!(matches!(MonoBmp::from_slice(b"PNG"), Err(BmpError::BadMagic)));
//! ```

use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};
use tinybmp::{Bpp, ColorTable, ParseError, RawBmp, RowOrder};

/// Errors reported while decoding a bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmpError {
    /// Missing `"BM"` signature
    BadMagic,
    /// Header could not be parsed
    Malformed,
    /// Not a 1 bit per pixel image
    UnsupportedBpp(u16),
    /// Pixel data shorter than the header announces
    Truncated {
        /// Required pixel data size in bytes
        required: usize,
        /// Available pixel data in bytes
        provided: usize,
    },
    /// Output buffer too small for the decoded image
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for BmpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadMagic => write!(f, "Missing BM signature"),
            Self::Malformed => write!(f, "Malformed bitmap header"),
            Self::UnsupportedBpp(bpp) => {
                write!(f, "Unsupported bit depth: {bpp} (only 1-bit is supported)")
            }
            Self::Truncated { required, provided } => write!(
                f,
                "Truncated pixel data: required {required} bytes, provided {provided}"
            ),
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for BmpError {}

/// Decoded view of a 1-bit bitmap
///
/// Borrows the file bytes; no pixel data is copied until
/// [`decode_into`](Self::decode_into).
#[derive(Debug, Clone, Copy)]
pub struct MonoBmp<'a> {
    /// Pixel rows as stored in the file
    data: &'a [u8],
    width: u32,
    height: u32,
    /// Bytes per stored row (4-byte aligned)
    stride: usize,
    bottom_up: bool,
    /// Palette index 0 is the white entry
    inverted: bool,
}

impl<'a> MonoBmp<'a> {
    /// Parse and validate a bitmap file
    ///
    /// # Errors
    ///
    /// - [`BmpError::BadMagic`] if the data does not start with `"BM"`; nothing
    ///   else is read in that case
    /// - [`BmpError::UnsupportedBpp`] for any depth other than 1 bit, whether
    ///   or not the header parser supports it
    /// - [`BmpError::Malformed`] if the header cannot be parsed
    /// - [`BmpError::Truncated`] if the pixel data is shorter than the rows need
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self, BmpError> {
        if bytes.get(..2) != Some(b"BM".as_slice()) {
            return Err(BmpError::BadMagic);
        }

        let raw = RawBmp::from_slice(bytes).map_err(|err| match err {
            ParseError::UnsupportedBpp(bpp) => BmpError::UnsupportedBpp(bpp),
            _ => BmpError::Malformed,
        })?;
        let header = raw.header();
        if !matches!(header.bpp, Bpp::Bits1) {
            return Err(BmpError::UnsupportedBpp(header.bpp.bits()));
        }
        let width = header.image_size.width;
        let height = header.image_size.height;

        let stride = (width as usize).div_ceil(32) * 4;
        let required = stride * height as usize;
        let data = raw.image_data();
        if data.len() < required {
            return Err(BmpError::Truncated {
                required,
                provided: data.len(),
            });
        }

        Ok(Self {
            data: &data[..required],
            width,
            height,
            stride,
            bottom_up: matches!(header.row_order, RowOrder::BottomUp),
            inverted: raw.color_table().is_some_and(palette_inverted),
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the packed top-to-bottom buffer written by [`decode_into`](Self::decode_into)
    pub fn buffer_size(&self) -> usize {
        crate::rotation::buffer_size(self.width, self.height)
    }

    /// Pixel at `(x, y)` counted from the top-left corner; `true` is white
    ///
    /// Returns `false` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let row = if self.bottom_up {
            self.height - 1 - y
        } else {
            y
        };
        let index = row as usize * self.stride + (x / 8) as usize;
        let bit = self
            .data
            .get(index)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0);
        bit != self.inverted
    }

    /// Write the image as a packed, top-to-bottom buffer
    ///
    /// Rows use a `ceil(width / 8)` byte stride, most significant bit first,
    /// 1 = white.
    ///
    /// # Errors
    ///
    /// Returns [`BmpError::BufferTooSmall`] if `out` is shorter than
    /// [`buffer_size`](Self::buffer_size).
    pub fn decode_into(&self, out: &mut [u8]) -> Result<(), BmpError> {
        let required = self.buffer_size();
        if out.len() < required {
            return Err(BmpError::BufferTooSmall {
                required,
                provided: out.len(),
            });
        }
        for y in 0..self.height {
            for x in 0..self.width {
                crate::rotation::set_pixel(out, self.width, x, y, self.pixel(x, y));
            }
        }
        Ok(())
    }
}

/// Whether palette entry 0 is brighter than entry 1
fn palette_inverted(table: &ColorTable<'_>) -> bool {
    let luma = |color: Rgb888| u16::from(color.r()) + u16::from(color.g()) + u16::from(color.b());
    match (table.get(0), table.get(1)) {
        (Some(first), Some(second)) => luma(first) > luma(second),
        _ => false,
    }
}
