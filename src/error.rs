//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//! - [`BmpError`](crate::bmp::BmpError) - Bitmap decoding errors
//!
//! ## Example
//!
//! ```
//! use epd2in7::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::custom().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(264, 180); // Not byte-aligned
//! assert!(result.is_err());
//! ```

use crate::bmp::BmpError;
use crate::display::PanelState;
use crate::interface::DisplayInterface;
use crate::rotation::RotationError;

/// Maximum gate outputs (rows) supported by the controller
///
/// NOTE: Panels usually wire fewer gates; configure [`crate::Dimensions`] accordingly.
pub const MAX_GATE_OUTPUTS: u16 = 296;

/// Maximum source outputs (columns) supported by the controller
pub const MAX_SOURCE_OUTPUTS: u16 = 176;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI, GPIO or busy timeout)
    ///
    /// Fatal for the operation in progress. A frame interrupted by a bus fault
    /// leaves panel RAM undefined; recover with
    /// [`Display::reset`](crate::Display::reset) and a new commit.
    Interface(I::Error),
    /// Bitmap could not be decoded
    UnsupportedFormat(BmpError),
    /// Requested placement exceeds the logical buffer
    ///
    /// Rejected before the buffer is modified.
    OutOfBounds {
        /// X coordinate of the placement
        x: u32,
        /// Y coordinate of the placement
        y: u32,
        /// Width of the placed image
        width: u32,
        /// Height of the placed image
        height: u32,
    },
    /// Buffer is too small for the display
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Operation not allowed in the current panel state
    ///
    /// The panel must be initialized with [`Display::reset`](crate::Display::reset)
    /// before refreshing, including after deep sleep.
    InvalidState(PanelState),
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::UnsupportedFormat(e) => write!(f, "Unsupported image: {e}"),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Out of bounds: {width}x{height} image at ({x}, {y}) exceeds the display"
            ),
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::InvalidState(state) => write!(f, "Invalid panel state: {state:?}"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<BmpError> for Error<I> {
    fn from(err: BmpError) -> Self {
        Self::UnsupportedFormat(err)
    }
}

impl<I: DisplayInterface> From<RotationError> for Error<I> {
    fn from(err: RotationError) -> Self {
        match err {
            RotationError::BufferTooSmall { required, provided } => {
                Self::BufferTooSmall { required, provided }
            }
        }
    }
}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called
    /// when starting from [`Builder::custom()`](crate::config::Builder::custom).
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
    /// Transfer chunk size must be non-zero
    InvalidChunkSize,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid dimensions {rows}x{cols} (max {MAX_GATE_OUTPUTS}x{MAX_SOURCE_OUTPUTS}, cols must be multiple of 8)"
            ),
            Self::InvalidChunkSize => write!(f, "Transfer chunk size must be non-zero"),
        }
    }
}

impl core::error::Error for BuilderError {}
