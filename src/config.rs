//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};

/// Native panel dimensions
///
/// Always the panel's intrinsic portrait geometry, independent of [`Rotation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, corresponds to gate outputs)
    pub rows: u16,
    /// Number of columns (width in pixels, corresponds to source outputs)
    pub cols: u16,
}

impl Dimensions {
    /// The 2.7" panel: 176 columns by 264 rows
    pub const EPD_2IN7: Self = Self {
        rows: 264,
        cols: 176,
    };

    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows == 0 or rows > MAX_GATE_OUTPUTS
    /// - cols == 0 or cols > MAX_SOURCE_OUTPUTS
    /// - cols % 8 != 0 (RAM rows are byte-aligned)
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_SOURCE_OUTPUTS || cols % 8 != 0 {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        crate::rotation::buffer_size(u32::from(self.cols), u32::from(self.rows))
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::EPD_2IN7
    }
}

/// Display rotation relative to native orientation
///
/// The numeric orientation used by [`Rotation::index`] counts quarter turns:
/// 0 native portrait, 1 = 90° clockwise, 2 = 180°, 3 = 270° clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Rotation from a numeric orientation, taken modulo 4
    ///
    /// ```
    /// use epd2in7::Rotation;
    ///
    /// assert_eq!(Rotation::from_index(1), Rotation::Rotate90);
    /// assert_eq!(Rotation::from_index(6), Rotation::Rotate180);
    /// ```
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Self::Rotate0,
            1 => Self::Rotate90,
            2 => Self::Rotate180,
            _ => Self::Rotate270,
        }
    }

    /// Numeric orientation (0..=3)
    pub fn index(self) -> u8 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::Rotate270 => 3,
        }
    }

    /// The rotation that undoes this one
    pub fn inverse(self) -> Self {
        Self::from_index(4 - self.index())
    }

    /// Whether width and height are swapped relative to native
    pub fn is_transposed(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }

    /// Logical dimensions seen through this rotation
    pub fn dimensions(self, native: Dimensions) -> Dimensions {
        if self.is_transposed() {
            Dimensions {
                rows: native.cols,
                cols: native.rows,
            }
        } else {
            native
        }
    }
}

/// Vendor initialization register table
///
/// Replayed verbatim by [`Display::reset`](crate::Display::reset) after the soft
/// reset. The values are a compatibility contract with the panel's OTP waveform
/// and are not derived from [`Dimensions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitSequence {
    /// Driver output control: [mux LSB, mux MSB, gate scan mode]
    pub driver_output: [u8; 3],
    /// Data entry mode (address counter direction)
    pub data_entry_mode: u8,
    /// RAM X window: [start, end] in bytes
    pub ram_x_window: [u8; 2],
    /// RAM Y window: [start LSB, start MSB, end LSB, end MSB]
    pub ram_y_window: [u8; 4],
    /// Border waveform control
    pub border_waveform: u8,
    /// Temperature sensor selection
    pub temp_sensor: u8,
    /// Display update control 2 value run once during initialization
    pub power_on_update: u8,
    /// Initial RAM X counter
    pub ram_x_counter: u8,
    /// Initial RAM Y counter: [LSB, MSB]
    pub ram_y_counter: [u8; 2],
}

impl InitSequence {
    /// Register values for the 2.7" 176x264 panel
    pub const EPD_2IN7: Self = Self {
        // 0x01B7 gate lines, no interleave
        driver_output: [0xB7, 0x01, 0x00],
        // X increment, Y increment, X counter first
        data_entry_mode: 0x03,
        // 0x15 -> (21 + 1) * 8 = 176 columns
        ram_x_window: [0x00, 0x15],
        // 0x0107 -> 263 + 1 = 264 rows
        ram_y_window: [0x00, 0x00, 0x07, 0x01],
        border_waveform: 0x05,
        // internal sensor
        temp_sensor: 0x80,
        // clock + analog on, load temperature and LUT
        power_on_update: 0xB1,
        ram_x_counter: 0x00,
        ram_y_counter: [0x00, 0x00],
    };
}

impl Default for InitSequence {
    fn default() -> Self {
        Self::EPD_2IN7
    }
}

/// Default number of bytes sent per SPI transaction when streaming a frame
pub const DEFAULT_TRANSFER_CHUNK_SIZE: usize = 4096;

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Native display dimensions
    pub dimensions: Dimensions,
    /// Display rotation
    pub rotation: Rotation,
    /// Register table replayed during initialization
    pub init_sequence: InitSequence,
    /// Display Update Control 2 value for full refresh
    pub display_update_full: u8,
    /// Maximum bytes per SPI transaction when streaming frame data
    pub transfer_chunk_size: usize,
}

impl Config {
    /// Get the rotated (logical) dimensions based on rotation setting
    pub fn rotated_dimensions(&self) -> Dimensions {
        self.rotation.dimensions(self.dimensions)
    }

    /// Size in bytes of the logical buffer for the current rotation
    pub fn logical_buffer_size(&self) -> usize {
        self.rotated_dimensions().buffer_size()
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use epd2in7::{Builder, Dimensions, Rotation};
///
/// let config = match Builder::new()
///     .dimensions(Dimensions::EPD_2IN7)
///     .rotation(Rotation::Rotate90)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.rotated_dimensions().cols, 264);
/// ```
#[must_use]
pub struct Builder {
    /// Native display dimensions
    dimensions: Option<Dimensions>,
    /// Display rotation
    rotation: Rotation,
    /// Register table replayed during initialization
    init_sequence: InitSequence,
    /// Display Update Control 2 value for full refresh
    display_update_full: u8,
    /// Maximum bytes per SPI transaction
    transfer_chunk_size: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: Some(Dimensions::EPD_2IN7),
            rotation: Rotation::Rotate0,
            init_sequence: InitSequence::EPD_2IN7,
            // Clock + analog on, load LUT, display, analog + clock off
            display_update_full: 0xC7,
            transfer_chunk_size: DEFAULT_TRANSFER_CHUNK_SIZE,
        }
    }
}

impl Builder {
    /// Create a new Builder for the 2.7" panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Builder without dimensions, for other panel sizes
    pub fn custom() -> Self {
        Self {
            dimensions: None,
            ..Self::default()
        }
    }

    /// Set native display dimensions
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the initialization register table
    pub fn init_sequence(mut self, sequence: InitSequence) -> Self {
        self.init_sequence = sequence;
        self
    }

    /// Set Display Update Control 2 value for full refresh
    pub fn display_update_full(mut self, value: u8) -> Self {
        self.display_update_full = value;
        self
    }

    /// Set the maximum number of bytes per SPI transaction
    pub fn transfer_chunk_size(mut self, bytes: usize) -> Self {
        self.transfer_chunk_size = bytes;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set and
    /// `BuilderError::InvalidChunkSize` if the transfer chunk size is zero.
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.transfer_chunk_size == 0 {
            return Err(BuilderError::InvalidChunkSize);
        }
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            rotation: self.rotation,
            init_sequence: self.init_sequence,
            display_update_full: self.display_update_full,
            transfer_chunk_size: self.transfer_chunk_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder_targets_2in7() {
        let config = Builder::new().build().unwrap();
        assert_eq!(config.dimensions, Dimensions::EPD_2IN7);
        assert_eq!(config.rotation, Rotation::Rotate0);
        assert_eq!(config.init_sequence, InitSequence::EPD_2IN7);
        assert_eq!(config.display_update_full, 0xC7);
    }

    #[test]
    fn test_custom_builder_requires_dimensions() {
        let result = Builder::custom().build();
        assert!(matches!(result, Err(BuilderError::MissingDimensions)));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = Builder::new().transfer_chunk_size(0).build();
        assert!(matches!(result, Err(BuilderError::InvalidChunkSize)));
    }

    #[test]
    fn test_dimensions_validation() {
        assert!(Dimensions::new(264, 176).is_ok());
        assert!(Dimensions::new(0, 176).is_err());
        assert!(Dimensions::new(264, 0).is_err());
        assert!(Dimensions::new(264, 175).is_err());
        assert!(Dimensions::new(MAX_GATE_OUTPUTS + 1, 176).is_err());
        assert!(Dimensions::new(264, MAX_SOURCE_OUTPUTS + 8).is_err());
    }

    #[test]
    fn test_buffer_size_2in7() {
        assert_eq!(Dimensions::EPD_2IN7.buffer_size(), 176 / 8 * 264);
    }

    #[test]
    fn test_rotated_dimensions_swap() {
        let config = Builder::new().rotation(Rotation::Rotate270).build().unwrap();
        let dims = config.rotated_dimensions();
        assert_eq!((dims.cols, dims.rows), (264, 176));
        assert_eq!(config.logical_buffer_size(), 264 / 8 * 176);

        let config = Builder::new().rotation(Rotation::Rotate180).build().unwrap();
        assert_eq!(config.rotated_dimensions(), Dimensions::EPD_2IN7);
    }

    #[test]
    fn test_rotation_index_and_inverse() {
        for index in 0..4 {
            let rotation = Rotation::from_index(index);
            assert_eq!(rotation.index(), index);
        }
        assert_eq!(Rotation::Rotate90.inverse(), Rotation::Rotate270);
        assert_eq!(Rotation::Rotate270.inverse(), Rotation::Rotate90);
        assert_eq!(Rotation::Rotate180.inverse(), Rotation::Rotate180);
        assert_eq!(Rotation::Rotate0.inverse(), Rotation::Rotate0);
    }

    #[test]
    fn test_init_sequence_window_matches_2in7_geometry() {
        let seq = InitSequence::EPD_2IN7;
        let cols = (u16::from(seq.ram_x_window[1]) + 1) * 8;
        let rows = u16::from_le_bytes([seq.ram_y_window[2], seq.ram_y_window[3]]) + 1;
        assert_eq!(Dimensions { rows, cols }, Dimensions::EPD_2IN7);
    }
}
