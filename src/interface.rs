//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with the panel controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - SPI bus (MOSI + SCK) with chip select, wrapped in an [`SpiDevice`]
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active low)
//!
//! Chip select is owned by the [`SpiDevice`]: every `send_command` and
//! `send_data` call is exactly one SPI transaction, so CS is asserted for one
//! logical transfer and released right after it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epd2in7::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! // Create interface with SPI and GPIO pins
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//!
//! // Send command
//! let _ = interface.send_command(0x12); // Soft reset
//!
//! // Send data
//! let _ = interface.send_data(&[0xFF, 0x00, 0xFF]);
//!
//! // Wait for display ready
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to the panel controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// Implementations are strict pass-throughs: calls reach the bus in the order
/// they are made, without buffering.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin low (command mode)
    /// 2. Send the command byte over SPI in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin high (data mode)
    /// 2. Send the data bytes over SPI in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must drive RST high, low, then high again, holding each
    /// level at least as long as [`RESET_HOLD_MS`] / [`RESET_PULSE_MS`] /
    /// [`RESET_HOLD_MS`].
    ///
    /// # Errors
    ///
    /// Returns an error if driving the reset pin fails.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Block until the busy pin reports idle
    ///
    /// Must not return `Ok` before an idle level has been read.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the pin fails or an implementation-specific
    /// timeout expires.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin
    ///
    /// The panel did not respond and needs a hardware reset.
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Default busy-wait timeout in milliseconds (0 = wait forever)
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 0;

/// Default delay between busy pin polls in milliseconds
pub const DEFAULT_BUSY_POLL_INTERVAL_MS: u32 = 100;

/// Minimum time RST is held high around the reset pulse
pub const RESET_HOLD_MS: u32 = 200;

/// Minimum width of the low reset pulse
pub const RESET_PULSE_MS: u32 = 2;

/// Hardware interface implementation
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`] (owns chip select)
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
///
/// ## Example
///
/// ```rust,no_run
/// use epd2in7::{Builder, Display, Interface};
/// # use core::convert::Infallible;
/// # use embedded_hal::digital::{InputPin, OutputPin};
/// # use embedded_hal::spi::{Operation, SpiDevice};
/// # struct MockSpi;
/// # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
/// # impl SpiDevice for MockSpi {
/// #     fn transaction(
/// #         &mut self,
/// #         _operations: &mut [Operation<'_, u8>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl InputPin for MockPin {
/// #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
/// #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
/// # }
/// let mut interface = Interface::new(
///     MockSpi,  // SpiDevice
///     MockPin,  // DC
///     MockPin,  // RST
///     MockPin,  // BUSY
/// );
/// interface.set_busy_timeout(10_000);
///
/// # let config = match Builder::new().build() {
/// #     Ok(config) => config,
/// #     Err(_) => return,
/// # };
/// let _display = Display::new(interface, config);
/// ```
pub struct Interface<SPI, DC, RST, BUSY> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active low)
    busy: BUSY,
    /// Timeout for busy-wait in milliseconds (0 = none)
    busy_timeout_ms: u32,
    /// Delay between busy polls in milliseconds
    busy_poll_interval_ms: u32,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface
    ///
    /// Drives DC low and RST low so the lines sit at known levels before any
    /// protocol traffic. Chip select idles high inside the [`SpiDevice`].
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, low while the panel is busy)
    pub fn new(spi: SPI, mut dc: DC, mut rst: RST, busy: BUSY) -> Self {
        let _ = dc.set_low();
        let _ = rst.set_low();
        Self {
            spi,
            dc,
            rst,
            busy,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_poll_interval_ms: DEFAULT_BUSY_POLL_INTERVAL_MS,
            busy_active_high: false,
        }
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Default is 0, which waits forever. A non-zero value makes
    /// [`busy_wait`](DisplayInterface::busy_wait) fail with
    /// [`InterfaceError::Timeout`] once the elapsed polling time reaches it.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-wait timeout in milliseconds
    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Set the delay between busy pin polls in milliseconds
    ///
    /// Default is 100ms. Values below 1ms are clamped to 1ms.
    pub fn set_busy_poll_interval(&mut self, interval_ms: u32) -> &mut Self {
        self.busy_poll_interval_ms = interval_ms.max(1);
        self
    }

    /// Get the delay between busy pin polls in milliseconds
    pub fn busy_poll_interval(&self) -> u32 {
        self.busy_poll_interval_ms
    }

    /// Set busy pin polarity
    ///
    /// Default is active-low. Set to true for panels that drive BUSY high.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Release the owned peripherals
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        // HIGH -> 200ms -> LOW -> 2ms -> HIGH -> 200ms
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_HOLD_MS);
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_HOLD_MS);
        Ok(())
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let timeout_ms = self.busy_timeout_ms;
        let mut waited_ms = 0u32;

        loop {
            let is_busy = if self.busy_active_high {
                self.busy.is_high()
            } else {
                self.busy.is_low()
            }
            .map_err(InterfaceError::Pin)?;

            if !is_busy {
                log::trace!("busy released after {waited_ms}ms");
                return Ok(());
            }

            if timeout_ms > 0 && waited_ms >= timeout_ms {
                log::debug!("busy timeout after {waited_ms}ms");
                return Err(InterfaceError::Timeout);
            }

            delay.delay_ms(self.busy_poll_interval_ms);
            waited_ms = waited_ms.saturating_add(self.busy_poll_interval_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    /// Bus events in the order they happened
    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Dc(bool),
        Rst(bool),
        Write(Vec<u8>),
        Delay(u32),
    }

    type Log<'a> = &'a RefCell<Vec<Event>>;

    struct MockSpi<'a> {
        log: Log<'a>,
        fail: bool,
    }

    impl SpiErrorType for MockSpi<'_> {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi<'_> {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), MockError> {
            if self.fail {
                return Err(MockError);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.log.borrow_mut().push(Event::Write(bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    struct DcPin<'a>(Log<'a>);
    struct RstPin<'a>(Log<'a>);

    impl ErrorType for DcPin<'_> {
        type Error = MockError;
    }
    impl ErrorType for RstPin<'_> {
        type Error = MockError;
    }

    impl OutputPin for DcPin<'_> {
        fn set_low(&mut self) -> Result<(), MockError> {
            self.0.borrow_mut().push(Event::Dc(false));
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), MockError> {
            self.0.borrow_mut().push(Event::Dc(true));
            Ok(())
        }
    }

    impl OutputPin for RstPin<'_> {
        fn set_low(&mut self) -> Result<(), MockError> {
            self.0.borrow_mut().push(Event::Rst(false));
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), MockError> {
            self.0.borrow_mut().push(Event::Rst(true));
            Ok(())
        }
    }

    /// Busy pin replaying a fixed sequence of levels, then staying at the last one
    struct BusyPin {
        levels: Vec<bool>,
        reads: usize,
    }

    impl BusyPin {
        fn new(levels: &[bool]) -> Self {
            Self {
                levels: levels.to_vec(),
                reads: 0,
            }
        }

        fn level(&mut self) -> bool {
            let index = self.reads.min(self.levels.len() - 1);
            self.reads += 1;
            self.levels[index]
        }
    }

    impl ErrorType for BusyPin {
        type Error = MockError;
    }

    impl InputPin for BusyPin {
        fn is_high(&mut self) -> Result<bool, MockError> {
            Ok(self.level())
        }
        fn is_low(&mut self) -> Result<bool, MockError> {
            Ok(!self.level())
        }
    }

    // DelayNs::delay_ms forwards to delay_ns by default; record milliseconds directly.
    struct MockDelay<'a>(Log<'a>);

    impl DelayNs for MockDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::Delay(ns / 1_000_000));
        }
        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Event::Delay(ms));
        }
    }

    fn interface<'a>(
        log: Log<'a>,
        busy: &[bool],
    ) -> Interface<MockSpi<'a>, DcPin<'a>, RstPin<'a>, BusyPin> {
        Interface::new(
            MockSpi { log, fail: false },
            DcPin(log),
            RstPin(log),
            BusyPin::new(busy),
        )
    }

    #[test]
    fn test_new_drives_idle_levels() {
        let log = RefCell::new(Vec::new());
        let _interface = interface(&log, &[true]);
        assert_eq!(*log.borrow(), [Event::Dc(false), Event::Rst(false)]);
    }

    #[test]
    fn test_command_then_data_framing() {
        let log = RefCell::new(Vec::new());
        let mut interface = interface(&log, &[true]);
        log.borrow_mut().clear();

        interface.send_command(0x44).unwrap();
        interface.send_data(&[0x00, 0x15]).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                Event::Dc(false),
                Event::Write(alloc::vec![0x44]),
                Event::Dc(true),
                Event::Write(alloc::vec![0x00, 0x15]),
            ]
        );
    }

    #[test]
    fn test_spi_failure_is_reported() {
        let log = RefCell::new(Vec::new());
        let mut interface = Interface::new(
            MockSpi {
                log: &log,
                fail: true,
            },
            DcPin(&log),
            RstPin(&log),
            BusyPin::new(&[true]),
        );
        assert!(matches!(
            interface.send_data(&[0xFF]),
            Err(InterfaceError::Spi(MockError))
        ));
    }

    #[test]
    fn test_reset_sequence_timing() {
        let log = RefCell::new(Vec::new());
        let mut interface = interface(&log, &[true]);
        let mut delay = MockDelay(&log);
        log.borrow_mut().clear();

        interface.reset(&mut delay).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                Event::Rst(true),
                Event::Delay(RESET_HOLD_MS),
                Event::Rst(false),
                Event::Delay(RESET_PULSE_MS),
                Event::Rst(true),
                Event::Delay(RESET_HOLD_MS),
            ]
        );
    }

    #[test]
    fn test_busy_wait_returns_after_idle_read() {
        let log = RefCell::new(Vec::new());
        // low = busy, high = idle
        let mut interface = interface(&log, &[false, false, false, true]);
        let mut delay = MockDelay(&log);
        log.borrow_mut().clear();

        interface.busy_wait(&mut delay).unwrap();

        let polls = log
            .borrow()
            .iter()
            .filter(|e| **e == Event::Delay(DEFAULT_BUSY_POLL_INTERVAL_MS))
            .count();
        assert_eq!(polls, 3);
        assert_eq!(interface.busy.reads, 4);
    }

    #[test]
    fn test_busy_wait_idle_immediately_does_not_delay() {
        let log = RefCell::new(Vec::new());
        let mut interface = interface(&log, &[true]);
        let mut delay = MockDelay(&log);
        log.borrow_mut().clear();

        interface.busy_wait(&mut delay).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_busy_wait_times_out_when_stuck() {
        let log = RefCell::new(Vec::new());
        let mut interface = interface(&log, &[false]);
        interface.set_busy_timeout(500);
        let mut delay = MockDelay(&log);

        let result = interface.busy_wait(&mut delay);
        assert!(matches!(result, Err(InterfaceError::Timeout)));
        // never saw idle: every read reported busy
        assert_eq!(interface.busy.reads, 6);
    }

    #[test]
    fn test_busy_active_high_polarity() {
        let log = RefCell::new(Vec::new());
        let mut interface = interface(&log, &[true, false]);
        interface.set_busy_active_high(true);
        let mut delay = MockDelay(&log);

        interface.busy_wait(&mut delay).unwrap();
        assert_eq!(interface.busy.reads, 2);
    }

    #[test]
    fn test_busy_settings() {
        let log = RefCell::new(Vec::new());
        let mut interface = interface(&log, &[true]);
        assert_eq!(interface.busy_timeout(), DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(interface.busy_poll_interval(), DEFAULT_BUSY_POLL_INTERVAL_MS);
        assert!(!interface.busy_active_high());

        interface.set_busy_timeout(5_000).set_busy_poll_interval(0);
        assert_eq!(interface.busy_timeout(), 5_000);
        assert_eq!(interface.busy_poll_interval(), 1);
    }
}
