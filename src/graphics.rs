//! Frame buffer ownership and drawing
//!
//! [`GraphicDisplay`] wraps [`Display`] together with the logical frame buffer
//! that client code draws into, and a scratch buffer used to transform the frame
//! into the panel's native scan order on every refresh.
//!
//! With the `graphics` feature it implements
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget), so the whole
//! embedded-graphics ecosystem (primitives, fonts, images) can draw on it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use epd2in7::{Builder, Color, Display, GraphicDisplay, Interface, Rotation};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! let config = match Builder::new().rotation(Rotation::Rotate90).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let size = config.dimensions.buffer_size();
//! let mut display = GraphicDisplay::new(
//!     Display::new(interface, config),
//!     vec![0xFFu8; size], // logical frame
//!     vec![0u8; size],    // scratch for the native frame
//! );
//!
//! if display.display_mut().reset(&mut delay).is_err() {
//!     return;
//! }
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut display);
//! let _ = Text::new(
//!     "Hello, E-Paper!",
//!     Point::new(10, 80),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut display);
//!
//! let _ = display.update(&mut delay);
//! ```

use embedded_hal::delay::DelayNs;

use crate::bmp::MonoBmp;
use crate::color::Color;
use crate::config::Rotation;
use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::rotation;

type GraphicsResult<I> = core::result::Result<(), Error<I>>;
type GraphicsNewResult<I, T> = core::result::Result<T, Error<I>>;

/// Display with an owned frame buffer
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B1` - Logical frame buffer, at least
///   [`Config::logical_buffer_size`](crate::Config::logical_buffer_size) bytes
/// * `B2` - Scratch buffer for the native frame, at least
///   [`Dimensions::buffer_size`](crate::Dimensions::buffer_size) bytes
///
/// Pixels are addressed in logical coordinates: `(0, 0)` is the top-left corner
/// as seen through the configured [`Rotation`].
pub struct GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    /// The underlying display driver
    display: Display<I>,
    /// Logical frame, packed for the current rotation
    buffer: B1,
    /// Native frame written on every refresh
    scratch: B2,
}

impl<I, B1, B2> GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    /// Create a new GraphicDisplay
    ///
    /// The buffer contents are used as-is; call [`fill`](Self::fill) to start
    /// from a known color.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is smaller than the logical frame or `scratch` is
    /// smaller than the native frame. Use [`try_new`](Self::try_new) to get an
    /// error instead.
    pub fn new(display: Display<I>, mut buffer: B1, mut scratch: B2) -> Self {
        let logical = display.config().logical_buffer_size();
        let native = display.dimensions().buffer_size();
        assert!(
            buffer.as_mut().len() >= logical,
            "buffer too small: required {} bytes, got {}",
            logical,
            buffer.as_mut().len()
        );
        assert!(
            scratch.as_mut().len() >= native,
            "scratch too small: required {} bytes, got {}",
            native,
            scratch.as_mut().len()
        );
        Self {
            display,
            buffer,
            scratch,
        }
    }

    /// Try to create a new GraphicDisplay, returning an error if buffers are too small
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` for the first buffer that does not fit.
    pub fn try_new(
        display: Display<I>,
        mut buffer: B1,
        mut scratch: B2,
    ) -> GraphicsNewResult<I, Self> {
        let logical = display.config().logical_buffer_size();
        if buffer.as_mut().len() < logical {
            return Err(Error::BufferTooSmall {
                required: logical,
                provided: buffer.as_mut().len(),
            });
        }
        let native = display.dimensions().buffer_size();
        if scratch.as_mut().len() < native {
            return Err(Error::BufferTooSmall {
                required: native,
                provided: scratch.as_mut().len(),
            });
        }
        Ok(Self {
            display,
            buffer,
            scratch,
        })
    }

    /// Logical width in pixels
    pub fn width(&self) -> u32 {
        u32::from(self.display.config().rotated_dimensions().cols)
    }

    /// Logical height in pixels
    pub fn height(&self) -> u32 {
        u32::from(self.display.config().rotated_dimensions().rows)
    }

    /// Set a single pixel; coordinates outside the display are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let width = self.width();
        rotation::set_pixel(self.buffer.as_mut(), width, x, y, color.bit());
    }

    /// Color of a single pixel, `None` outside the display
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(Color::from_bit(rotation::pixel(
            self.buffer.as_ref(),
            self.width(),
            x,
            y,
        )))
    }

    /// Fill the whole frame buffer with one color
    ///
    /// Only touches the buffer; nothing is sent to the panel.
    pub fn fill(&mut self, color: Color) {
        let size = self.display.config().logical_buffer_size();
        self.buffer.as_mut()[..size].fill(color.bw_byte());
    }

    /// Raw logical frame buffer
    pub fn buffer(&self) -> &[u8] {
        let size = self.display.config().logical_buffer_size();
        &self.buffer.as_ref()[..size]
    }

    /// Send the frame buffer to the panel and run a full refresh
    ///
    /// # Errors
    ///
    /// See [`Display::commit`].
    pub fn update<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.display
            .commit(self.buffer.as_ref(), self.scratch.as_mut(), delay)
    }

    /// Fill the buffer white and blank the panel
    pub fn clear_screen<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.fill(Color::White);
        self.display.clear(delay)
    }

    /// Fill the buffer black and blacken the panel
    pub fn fill_black<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.fill(Color::Black);
        self.display.fill(Color::Black, delay)
    }

    /// Change the logical orientation
    ///
    /// Existing pixels are not moved; the buffer is reinterpreted with the new
    /// logical dimensions.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if the frame buffer cannot hold the new
    /// logical frame. The rotation is unchanged in that case.
    pub fn set_rotation(&mut self, rotation: Rotation) -> GraphicsResult<I> {
        let required = rotation.dimensions(*self.display.dimensions()).buffer_size();
        let provided = self.buffer.as_ref().len();
        if provided < required {
            return Err(Error::BufferTooSmall { required, provided });
        }
        self.display.set_rotation(rotation);
        Ok(())
    }

    /// Decode a 1-bit BMP and draw it with its top-left corner at `(x, y)`
    ///
    /// The image must fit entirely inside the logical frame.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedFormat` if the bitmap cannot be decoded
    /// - `Error::OutOfBounds` if the image does not fit; the buffer is unchanged
    pub fn draw_bmp(&mut self, bytes: &[u8], x: u32, y: u32) -> GraphicsResult<I> {
        let bmp = MonoBmp::from_slice(bytes)?;
        let (width, height) = (bmp.width(), bmp.height());

        let fits = |origin: u32, extent: u32, limit: u32| {
            origin.checked_add(extent).is_some_and(|end| end <= limit)
        };
        if !fits(x, width, self.width()) || !fits(y, height, self.height()) {
            return Err(Error::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        log::debug!("draw_bmp: {width}x{height} at ({x}, {y})");
        for row in 0..height {
            for col in 0..width {
                self.set_pixel(x + col, y + row, Color::from_bit(bmp.pixel(col, row)));
            }
        }
        Ok(())
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// Needed for [`Display::reset`] and [`Display::sleep`].
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Release the display and both buffers
    pub fn release(self) -> (Display<I>, B1, B2) {
        (self.display, self.buffer, self.scratch)
    }
}

#[cfg(feature = "graphics")]
impl<I, B1, B2> embedded_graphics_core::draw_target::DrawTarget for GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = embedded_graphics_core::prelude::Pixel<Self::Color>>,
    {
        for embedded_graphics_core::prelude::Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            self.set_pixel(x, y, color);
        }
        Ok(())
    }
}

#[cfg(feature = "graphics")]
impl<I, B1, B2> embedded_graphics_core::geometry::OriginDimensions for GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    fn size(&self) -> embedded_graphics_core::geometry::Size {
        embedded_graphics_core::geometry::Size::new(self.width(), self.height())
    }
}
