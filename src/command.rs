//! Panel command definitions
//!
//! Command bytes understood by the panel controller. Commands are sent over SPI
//! with the DC pin low, their parameters with the DC pin high.
//!
//! ## Command Structure
//!
//! Every command follows the pattern:
//! 1. Set DC low (command mode)
//! 2. Send command byte (one SPI transaction)
//! 3. Set DC high (data mode)
//! 4. Send data bytes, if any (one SPI transaction)
//!
//! ## Example
//!
//! ```rust,no_run
//! use epd2in7::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let pixel_data = [0xFFu8; 4];
//! // Soft reset
//! let _ = interface.send_command(command::SOFT_RESET);
//!
//! // Write to black/white RAM
//! let _ = interface.send_command(command::WRITE_RAM_BW);
//! let _ = interface.send_data(&pixel_data);
//! ```

// System control commands

/// Soft reset command (0x12)
///
/// Resets the controller registers. Wait for BUSY release after issuing.
pub const SOFT_RESET: u8 = 0x12;

/// Driver output control command (0x01)
///
/// Sets the gate line count and scanning order.
/// Requires 3 bytes: [mux (LSB), mux (MSB), scan mode]
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

/// Border waveform control command (0x3C)
///
/// Requires 1 byte of data.
pub const BORDER_WAVEFORM: u8 = 0x3C;

/// Temperature sensor control command (0x18)
///
/// Requires 1 byte: 0x80 = internal sensor
pub const TEMP_SENSOR_CONTROL: u8 = 0x18;

// RAM and data commands

/// Data entry mode command (0x11)
///
/// Controls the address counter auto-increment direction.
/// Requires 1 byte:
/// - Bit 0 (ID0): X direction (0=decrement, 1=increment)
/// - Bit 1 (ID1): Y direction (0=decrement, 1=increment)
/// - Bit 2 (AM): Address counter direction (0=X, 1=Y)
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Set RAM X address window command (0x44)
///
/// Requires 2 bytes: [start, end], in units of 8 pixels
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y address window command (0x45)
///
/// Requires 4 bytes: [start_LSB, start_MSB, end_LSB, end_MSB]
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter command (0x4E)
///
/// Requires 1 byte, in units of 8 pixels
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter command (0x4F)
///
/// Requires 2 bytes: [address_LSB, address_MSB]
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

/// Write to BW RAM command (0x24)
///
/// Bit=0: Black, Bit=1: White.
/// Followed by a full frame of pixel data.
pub const WRITE_RAM_BW: u8 = 0x24;

// Display update commands

/// Display update control 2 command (0x22)
///
/// Selects the update sequence run by [`MASTER_ACTIVATION`].
/// Requires 1 byte; values are panel-specific and configured via [`crate::Config`]
/// and [`crate::InitSequence`].
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

/// Master activation command (0x20)
///
/// Runs the sequence selected by [`DISPLAY_UPDATE_CTRL2`]. BUSY is asserted until
/// it completes.
pub const MASTER_ACTIVATION: u8 = 0x20;

// Power management commands

/// Deep sleep command (0x07)
///
/// Requires the 1-byte check code [`DEEP_SLEEP_CHECK`]. Only a hardware reset wakes
/// the panel.
pub const DEEP_SLEEP: u8 = 0x07;

/// Check code that must follow [`DEEP_SLEEP`]
pub const DEEP_SLEEP_CHECK: u8 = 0xA5;
