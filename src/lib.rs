//! 2.7" E-Paper Display Driver
//!
//! A driver for the 2.7 inch 176x264 black/white e-paper panel (SSD1680-class
//! controller) over a 4-wire SPI interface.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation required
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Four orientations, transformed to native scan order on refresh
//! - 1-bit BMP decoding and blitting
//! - Logging through the `log` facade (silent unless a logger is installed)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epd2in7::{Builder, Display, Interface, Rotation};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let config = match Builder::new().rotation(Rotation::Rotate180).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! if display.reset(&mut delay).is_err() {
//!     return;
//! }
//!
//! let mut frame = [0xFFu8; 176 / 8 * 264];
//! let mut scratch = [0u8; 176 / 8 * 264];
//! frame[0] = 0x00; // top-left 8 pixels black
//! let _ = display.commit(&frame, &mut scratch, &mut delay);
//! let _ = display.sleep();
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// 1-bit BMP decoding
pub mod bmp;
/// Color types for black/white e-paper displays
pub mod color;
/// Controller command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Panel state machine and refresh
pub mod display;
/// Error types for the driver
pub mod error;
/// Frame buffer and embedded-graphics glue
pub mod graphics;
/// Hardware interface abstraction
pub mod interface;
/// Bit-level buffer packing and orientation transforms
pub mod rotation;

pub use bmp::{BmpError, MonoBmp};
pub use color::Color;
pub use config::{
    Builder, Config, DEFAULT_TRANSFER_CHUNK_SIZE, Dimensions, InitSequence, MAX_GATE_OUTPUTS,
    MAX_SOURCE_OUTPUTS, Rotation,
};
pub use display::{Display, PanelState};
pub use error::{BuilderError, Error};
pub use graphics::GraphicDisplay;
pub use interface::InterfaceError;
pub use interface::{
    DEFAULT_BUSY_POLL_INTERVAL_MS, DEFAULT_BUSY_TIMEOUT_MS, DisplayInterface, Interface,
};
pub use rotation::RotationError;
