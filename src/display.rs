//! Core display operations
//!
//! [`Display`] drives the panel through its power states and streams frames to
//! the controller RAM:
//!
//! ```text
//! Unpowered -> Resetting -> Initializing -> Idle <-> Refreshing
//!                                             |
//!                                             v
//!                                          Sleeping
//! ```
//!
//! [`Display::reset`] is the only way out of `Unpowered` and `Sleeping`.

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::command::{
    BORDER_WAVEFORM, DATA_ENTRY_MODE, DEEP_SLEEP, DEEP_SLEEP_CHECK, DISPLAY_UPDATE_CTRL2,
    DRIVER_OUTPUT_CONTROL, MASTER_ACTIVATION, SET_RAM_X_COUNTER, SET_RAM_X_RANGE,
    SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE, SOFT_RESET, TEMP_SENSOR_CONTROL, WRITE_RAM_BW,
};
use crate::config::{Config, Dimensions, Rotation};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::rotation;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Settle time after the soft reset command before polling busy
const SOFT_RESET_SETTLE_MS: u32 = 10;

/// Power and protocol state of the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    /// Not initialized, or RAM contents unknown after a failed transfer
    #[default]
    Unpowered,
    /// Hardware reset pulse in progress
    Resetting,
    /// Replaying the register table
    Initializing,
    /// Ready to accept a frame
    Idle,
    /// Frame transfer or refresh in progress
    Refreshing,
    /// Deep sleep; requires a reset before the next frame
    Sleeping,
}

impl PanelState {
    /// Whether a frame may be committed in this state
    pub fn accepts_frames(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Frame data for one refresh
enum Frame<'a> {
    /// Native-order bytes, streamed as-is
    Native(&'a [u8]),
    /// A constant byte repeated over the whole RAM
    Fill(u8),
}

/// Core display driver
///
/// Owns the interface and the configuration, and tracks the [`PanelState`].
/// For pixel-level drawing use [`GraphicDisplay`](crate::GraphicDisplay).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Current panel state
    state: PanelState,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No bus traffic happens until [`reset`](Self::reset).
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            state: PanelState::Unpowered,
        }
    }

    /// Current panel state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Perform hardware reset, software reset, and initialization
    ///
    /// Valid from any state. On error the panel is left `Unpowered`.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::debug!("reset from {:?}", self.state);
        let result = self.reset_and_init(delay);
        self.state = if result.is_ok() {
            PanelState::Idle
        } else {
            PanelState::Unpowered
        };
        result
    }

    fn reset_and_init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.state = PanelState::Resetting;
        self.interface.reset(delay).map_err(Error::Interface)?;

        self.state = PanelState::Initializing;
        self.send_command(SOFT_RESET)?;
        delay.delay_ms(SOFT_RESET_SETTLE_MS);
        self.busy_wait(delay)?;

        self.init(delay)
    }

    /// Replay the register table
    fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let seq = self.config.init_sequence;
        log::debug!("init: {seq:?}");

        self.send_command(DRIVER_OUTPUT_CONTROL)?;
        self.send_data(&seq.driver_output)?;

        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[seq.data_entry_mode])?;

        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data(&seq.ram_x_window)?;

        self.send_command(SET_RAM_Y_RANGE)?;
        self.send_data(&seq.ram_y_window)?;

        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[seq.border_waveform])?;

        self.send_command(TEMP_SENSOR_CONTROL)?;
        self.send_data(&[seq.temp_sensor])?;

        // Power on and load the OTP waveform
        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[seq.power_on_update])?;
        self.send_command(MASTER_ACTIVATION)?;
        self.busy_wait(delay)?;

        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(&[seq.ram_x_counter])?;

        self.send_command(SET_RAM_Y_COUNTER)?;
        self.send_data(&seq.ram_y_counter)?;

        Ok(())
    }

    /// Transfer a frame and run a full refresh
    ///
    /// `frame` is laid out for the current rotation (see
    /// [`Config::rotated_dimensions`]). For any rotation other than
    /// [`Rotation::Rotate0`] it is transformed into `scratch`, which must hold the
    /// native buffer; with `Rotate0` `scratch` is unused and may be empty.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the panel is `Idle`
    /// - [`Error::BufferTooSmall`] if `frame` or `scratch` is too short
    /// - [`Error::Interface`] on bus failure or busy timeout; the panel is left
    ///   `Unpowered` and needs a [`reset`](Self::reset)
    ///
    /// Nothing is sent on the bus unless all checks pass.
    pub fn commit<D: DelayNs>(
        &mut self,
        frame: &[u8],
        scratch: &mut [u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.check_state()?;

        let required = self.config.logical_buffer_size();
        if frame.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: frame.len(),
            });
        }

        let dims = self.config.dimensions;
        let rotation = self.config.rotation;
        let native = if rotation == Rotation::Rotate0 {
            &frame[..required]
        } else {
            let logical = self.config.rotated_dimensions();
            let native_size = dims.buffer_size();
            if scratch.len() < native_size {
                return Err(Error::BufferTooSmall {
                    required: native_size,
                    provided: scratch.len(),
                });
            }
            rotation::rotate(
                frame,
                u32::from(logical.cols),
                u32::from(logical.rows),
                rotation,
                scratch,
            )?;
            &scratch[..native_size]
        };

        log::debug!("commit: {} bytes, {rotation:?}", native.len());
        self.refresh(Frame::Native(native), delay)
    }

    /// Fill the panel white
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.fill(Color::White, delay)
    }

    /// Fill the panel with a single color
    pub fn fill<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> DisplayResult<I> {
        self.check_state()?;
        log::debug!("fill: {color:?}");
        self.refresh(Frame::Fill(color.bw_byte()), delay)
    }

    /// Enter deep sleep
    ///
    /// The controller stops responding to the bus until the next
    /// [`reset`](Self::reset). On error the panel is left `Unpowered`.
    pub fn sleep(&mut self) -> DisplayResult<I> {
        log::debug!("sleep from {:?}", self.state);
        let result = self.enter_deep_sleep();
        self.state = if result.is_ok() {
            PanelState::Sleeping
        } else {
            PanelState::Unpowered
        };
        result
    }

    fn enter_deep_sleep(&mut self) -> DisplayResult<I> {
        self.send_command(DEEP_SLEEP)?;
        self.send_data(&[DEEP_SLEEP_CHECK])
    }

    fn check_state(&self) -> DisplayResult<I> {
        if self.state.accepts_frames() {
            Ok(())
        } else {
            Err(Error::InvalidState(self.state))
        }
    }

    /// Write RAM and refresh, tracking state
    fn refresh<D: DelayNs>(&mut self, frame: Frame<'_>, delay: &mut D) -> DisplayResult<I> {
        self.state = PanelState::Refreshing;
        let result = self.write_and_refresh(frame, delay);
        self.state = if result.is_ok() {
            PanelState::Idle
        } else {
            PanelState::Unpowered
        };
        result
    }

    fn write_and_refresh<D: DelayNs>(&mut self, frame: Frame<'_>, delay: &mut D) -> DisplayResult<I> {
        let last_row = self.config.dimensions.rows.saturating_sub(1);

        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(&[0x00])?;
        self.send_command(SET_RAM_Y_COUNTER)?;
        self.send_data(&last_row.to_le_bytes())?;

        self.send_command(WRITE_RAM_BW)?;
        match frame {
            Frame::Native(bytes) => self.stream(bytes)?,
            Frame::Fill(value) => self.stream_fill(value)?,
        }

        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[self.config.display_update_full])?;
        self.send_command(MASTER_ACTIVATION)?;
        self.busy_wait(delay)
    }

    /// Send `bytes` in transactions of at most `transfer_chunk_size`
    fn stream(&mut self, bytes: &[u8]) -> DisplayResult<I> {
        for chunk in bytes.chunks(self.config.transfer_chunk_size.max(1)) {
            log::trace!("ram chunk: {} bytes", chunk.len());
            self.send_data(chunk)?;
        }
        Ok(())
    }

    fn stream_fill(&mut self, value: u8) -> DisplayResult<I> {
        const BLOCK: usize = 64;
        let block = [value; BLOCK];
        let chunk_size = self.config.transfer_chunk_size.clamp(1, BLOCK);

        let mut remaining = self.config.dimensions.buffer_size();
        while remaining > 0 {
            let len = remaining.min(chunk_size);
            self.send_data(&block[..len])?;
            remaining -= len;
        }
        Ok(())
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    /// Get native display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Get display rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Change the rotation applied to subsequent commits
    pub fn set_rotation(&mut self, rotation: Rotation) {
        log::debug!("rotation: {:?} -> {rotation:?}", self.config.rotation);
        self.config.rotation = rotation;
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the hardware interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Release the hardware interface
    pub fn release(self) -> I {
        self.interface
    }
}
