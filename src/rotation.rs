//! Orientation transforms for bit-packed monochrome buffers
//!
//! ## Packing
//!
//! Every buffer in this crate uses the same layout:
//!
//! - row-major, top row first
//! - 8 pixels per byte, most significant bit = leftmost pixel
//! - each row padded to `ceil(width / 8)` bytes (the stride)
//!
//! [`pixel`] and [`set_pixel`] are the only code that knows this layout; every
//! transform below goes through them, except the 180° fast path.
//!
//! ## Rotation Modes
//!
//! A logical buffer drawn in one orientation is mapped onto the panel's native
//! scan order. For a logical `w x h` buffer, pixel `(x, y)` lands at:
//!
//! | Rotation  | Native position          | Native size |
//! |-----------|--------------------------|-------------|
//! | Rotate0   | `(x, y)`                 | `w x h`     |
//! | Rotate90  | `(y, w - 1 - x)`         | `h x w`     |
//! | Rotate180 | `(w - 1 - x, h - 1 - y)` | `w x h`     |
//! | Rotate270 | `(h - 1 - y, x)`         | `h x w`     |
//!
//! ## Example
//!
//! ```
//! use epd2in7::{rotation, Rotation};
//!
//! // 16x8 landscape buffer with only the top-left pixel black
//! let mut logical = [0xFFu8; 16];
//! rotation::set_pixel(&mut logical, 16, 0, 0, false);
//!
//! let mut native = [0u8; 16];
//! let (w, h) = rotation::rotate(&logical, 16, 8, Rotation::Rotate90, &mut native).unwrap();
//! assert_eq!((w, h), (8, 16));
//!
//! // (0, 0) moved to (0, 15): the bottom-left corner
//! assert!(!rotation::pixel(&native, 8, 0, 15));
//! assert!(rotation::pixel(&native, 8, 0, 0));
//! ```

use crate::config::Rotation;

/// Errors reported by the transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationError {
    /// Source or destination shorter than the packed image
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for RotationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for RotationError {}

/// Bytes per packed row
pub const fn stride(width: u32) -> usize {
    width.div_ceil(8) as usize
}

/// Bytes needed for a packed `width x height` image
pub const fn buffer_size(width: u32, height: u32) -> usize {
    stride(width) * height as usize
}

#[inline]
fn locate(width: u32, x: u32, y: u32) -> (usize, u8) {
    (y as usize * stride(width) + (x / 8) as usize, 0x80 >> (x % 8))
}

/// Read the bit at `(x, y)`
///
/// Returns `false` for coordinates outside `buf`.
#[inline]
pub fn pixel(buf: &[u8], width: u32, x: u32, y: u32) -> bool {
    let (index, mask) = locate(width, x, y);
    buf.get(index).is_some_and(|byte| byte & mask != 0)
}

/// Write the bit at `(x, y)`
///
/// Coordinates outside `buf` are ignored.
#[inline]
pub fn set_pixel(buf: &mut [u8], width: u32, x: u32, y: u32, value: bool) {
    let (index, mask) = locate(width, x, y);
    if let Some(byte) = buf.get_mut(index) {
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
}

/// Position in a rotated `width x height` image of logical pixel `(x, y)`
///
/// `width` and `height` are the logical (pre-rotation) dimensions.
///
/// ```
/// use epd2in7::{rotation::map_to_native, Rotation};
///
/// assert_eq!(map_to_native(0, 0, 264, 176, Rotation::Rotate90), (0, 263));
/// assert_eq!(map_to_native(0, 0, 264, 176, Rotation::Rotate270), (175, 0));
/// assert_eq!(map_to_native(0, 0, 176, 264, Rotation::Rotate180), (175, 263));
/// ```
pub fn map_to_native(x: u32, y: u32, width: u32, height: u32, rotation: Rotation) -> (u32, u32) {
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (y, width - 1 - x),
        Rotation::Rotate180 => (width - 1 - x, height - 1 - y),
        Rotation::Rotate270 => (height - 1 - y, x),
    }
}

/// Reverse a packed buffer end to end, bit by bit
///
/// Byte order is reversed and every byte is bit-reversed, which reverses the
/// whole bitstream. For rows without padding bits (`width % 8 == 0`) that is
/// exactly a 180° rotation. Applying it twice restores the input.
pub fn reverse_180(src: &[u8], dst: &mut [u8]) {
    for (out, byte) in dst.iter_mut().zip(src.iter().rev()) {
        *out = byte.reverse_bits();
    }
}

/// Rotate a packed `width x height` image into `dst`
///
/// Returns the dimensions of the rotated image; they are swapped for
/// [`Rotation::Rotate90`] and [`Rotation::Rotate270`]. Only the first
/// `buffer_size` bytes of `dst` for the rotated image are written.
///
/// Quarter turns copy pixel by pixel because byte alignment does not survive
/// them. Half turns use [`reverse_180`] when rows are byte-aligned and fall back
/// to the per-pixel copy when they carry padding bits.
///
/// # Errors
///
/// Returns [`RotationError::BufferTooSmall`] if `src` or `dst` is shorter than
/// required. Nothing is written in that case.
pub fn rotate(
    src: &[u8],
    width: u32,
    height: u32,
    rotation: Rotation,
    dst: &mut [u8],
) -> Result<(u32, u32), RotationError> {
    let (out_width, out_height) = if rotation.is_transposed() {
        (height, width)
    } else {
        (width, height)
    };
    let src_len = buffer_size(width, height);
    let dst_len = buffer_size(out_width, out_height);

    if src.len() < src_len {
        return Err(RotationError::BufferTooSmall {
            required: src_len,
            provided: src.len(),
        });
    }
    if dst.len() < dst_len {
        return Err(RotationError::BufferTooSmall {
            required: dst_len,
            provided: dst.len(),
        });
    }

    let src = &src[..src_len];
    let dst = &mut dst[..dst_len];

    match rotation {
        Rotation::Rotate0 => dst.copy_from_slice(src),
        Rotation::Rotate180 if width % 8 == 0 => reverse_180(src, dst),
        _ => copy_pixels(src, width, height, rotation, dst, out_width),
    }

    Ok((out_width, out_height))
}

fn copy_pixels(
    src: &[u8],
    width: u32,
    height: u32,
    rotation: Rotation,
    dst: &mut [u8],
    dst_width: u32,
) {
    dst.fill(0);
    for y in 0..height {
        for x in 0..width {
            if pixel(src, width, x, y) {
                let (nx, ny) = map_to_native(x, y, width, height, rotation);
                set_pixel(dst, dst_width, nx, ny, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Deterministic pseudo-random fill
    fn pattern(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect()
    }

    /// Clear the padding bits at the end of each row
    fn mask_padding(buf: &mut [u8], width: u32, height: u32) {
        let pad = (stride(width) * 8) as u32 - width;
        if pad == 0 {
            return;
        }
        let keep = 0xFFu8 << pad;
        for row in 0..height as usize {
            buf[row * stride(width) + stride(width) - 1] &= keep;
        }
    }

    #[test]
    fn test_pixel_msb_first() {
        let buf = [0x80u8, 0x01];
        assert!(pixel(&buf, 16, 0, 0));
        assert!(!pixel(&buf, 16, 1, 0));
        assert!(pixel(&buf, 16, 15, 0));
    }

    #[test]
    fn test_pixel_uses_padded_stride() {
        // 10 pixels wide -> 2 bytes per row
        let mut buf = [0u8; 4];
        set_pixel(&mut buf, 10, 0, 1, true);
        assert_eq!(buf, [0x00, 0x00, 0x80, 0x00]);
        assert!(pixel(&buf, 10, 0, 1));
    }

    #[test]
    fn test_set_then_get_inverse() {
        let mut buf = [0u8; 6];
        for (x, y) in [(0, 0), (7, 0), (8, 1), (23, 1)] {
            set_pixel(&mut buf, 24, x, y, true);
            assert!(pixel(&buf, 24, x, y));
            set_pixel(&mut buf, 24, x, y, false);
            assert!(!pixel(&buf, 24, x, y));
        }
        assert_eq!(buf, [0u8; 6]);
    }

    #[test]
    fn test_out_of_range_access_is_ignored() {
        let mut buf = [0u8; 2];
        set_pixel(&mut buf, 8, 0, 5, true);
        assert_eq!(buf, [0, 0]);
        assert!(!pixel(&buf, 8, 0, 5));
    }

    #[test]
    fn test_rotate0_copies() {
        let src = pattern(22 * 264, 1);
        let mut dst = vec![0u8; src.len()];
        let dims = rotate(&src, 176, 264, Rotation::Rotate0, &mut dst).unwrap();
        assert_eq!(dims, (176, 264));
        assert_eq!(src, dst);
    }

    #[test]
    fn test_rotate90_then_270_round_trip() {
        let src = pattern(buffer_size(264, 176), 7);
        let mut native = vec![0u8; buffer_size(176, 264)];
        let mut back = vec![0u8; src.len()];

        assert_eq!(
            rotate(&src, 264, 176, Rotation::Rotate90, &mut native).unwrap(),
            (176, 264)
        );
        assert_eq!(
            rotate(&native, 176, 264, Rotation::Rotate270, &mut back).unwrap(),
            (264, 176)
        );
        assert_eq!(src, back);
    }

    #[test]
    fn test_rotate270_then_90_round_trip() {
        let src = pattern(buffer_size(264, 176), 11);
        let mut native = vec![0u8; buffer_size(176, 264)];
        let mut back = vec![0u8; src.len()];

        rotate(&src, 264, 176, Rotation::Rotate270, &mut native).unwrap();
        rotate(&native, 176, 264, Rotation::Rotate90, &mut back).unwrap();
        assert_eq!(src, back);
    }

    #[test]
    fn test_quarter_turn_round_trip_unaligned() {
        // 12x5: both orientations carry padding bits
        let mut src = pattern(buffer_size(12, 5), 3);
        mask_padding(&mut src, 12, 5);
        let mut turned = vec![0u8; buffer_size(5, 12)];
        let mut back = vec![0u8; src.len()];

        rotate(&src, 12, 5, Rotation::Rotate90, &mut turned).unwrap();
        rotate(&turned, 5, 12, Rotation::Rotate270, &mut back).unwrap();
        assert_eq!(src, back);
    }

    #[test]
    fn test_rotate90_moves_corners() {
        // 16 wide, 8 tall, white background
        let mut src = [0xFFu8; 16];
        set_pixel(&mut src, 16, 15, 0, false); // top-right
        let mut dst = [0u8; 16];
        rotate(&src, 16, 8, Rotation::Rotate90, &mut dst).unwrap();
        // (15, 0) -> (0, 0)
        assert!(!pixel(&dst, 8, 0, 0));
        assert_eq!(dst.iter().filter(|b| **b != 0xFF).count(), 1);
    }

    #[test]
    fn test_rotate270_moves_corners() {
        let mut src = [0xFFu8; 16];
        set_pixel(&mut src, 16, 0, 0, false);
        let mut dst = [0u8; 16];
        rotate(&src, 16, 8, Rotation::Rotate270, &mut dst).unwrap();
        // (0, 0) -> (7, 0)
        assert!(!pixel(&dst, 8, 7, 0));
    }

    #[test]
    fn test_reverse_180_self_inverse() {
        let src = pattern(22 * 264, 5);
        let mut once = vec![0u8; src.len()];
        let mut twice = vec![0u8; src.len()];
        reverse_180(&src, &mut once);
        reverse_180(&once, &mut twice);
        assert_eq!(src, twice);
        assert_ne!(src, once);
    }

    #[test]
    fn test_reverse_180_matches_pixel_copy_when_aligned() {
        let src = pattern(buffer_size(176, 264), 9);
        let mut fast = vec![0u8; src.len()];
        let mut slow = vec![0u8; src.len()];
        reverse_180(&src, &mut fast);
        copy_pixels(&src, 176, 264, Rotation::Rotate180, &mut slow, 176);
        assert_eq!(fast, slow);
    }

    #[test]
    fn test_rotate180_unaligned_falls_back_to_pixels() {
        // 10x2: the bitstream shortcut would shift rows by the 6 padding bits
        let mut src = [0u8; 4];
        set_pixel(&mut src, 10, 0, 0, true);
        let mut dst = [0u8; 4];
        rotate(&src, 10, 2, Rotation::Rotate180, &mut dst).unwrap();
        assert!(pixel(&dst, 10, 9, 1));
        assert_eq!(dst, [0x00, 0x00, 0x00, 0x40]);
    }

    #[test]
    fn test_rotate180_twice_is_identity() {
        let src = pattern(buffer_size(176, 264), 13);
        let mut once = vec![0u8; src.len()];
        let mut twice = vec![0u8; src.len()];
        rotate(&src, 176, 264, Rotation::Rotate180, &mut once).unwrap();
        rotate(&once, 176, 264, Rotation::Rotate180, &mut twice).unwrap();
        assert_eq!(src, twice);
    }

    #[test]
    fn test_rotate_rejects_short_buffers() {
        let src = [0u8; 4];
        let mut dst = [0u8; 2];
        // 16x2 turns into 2x16: one padded byte per row
        assert_eq!(
            rotate(&src, 16, 2, Rotation::Rotate90, &mut dst),
            Err(RotationError::BufferTooSmall {
                required: 16,
                provided: 2
            })
        );
        assert_eq!(
            rotate(&src, 16, 4, Rotation::Rotate0, &mut dst),
            Err(RotationError::BufferTooSmall {
                required: 8,
                provided: 4
            })
        );
    }

    #[test]
    fn test_map_to_native_stays_in_bounds() {
        for rotation in [
            Rotation::Rotate0,
            Rotation::Rotate90,
            Rotation::Rotate180,
            Rotation::Rotate270,
        ] {
            let (w, h) = (24, 10);
            let (nw, nh) = if rotation.is_transposed() { (h, w) } else { (w, h) };
            for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
                let (nx, ny) = map_to_native(x, y, w, h, rotation);
                assert!(nx < nw && ny < nh, "{rotation:?} ({x}, {y})");
            }
        }
    }
}
