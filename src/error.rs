use embedded_hal::{digital, spi};
use thiserror::Error;

/// Transport error type
///
/// The HAL specific error of every pin and of the bus is reduced to the
/// portable kind `embedded-hal` defines for it, so the facade does not have to
/// carry the pin types around in its error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// Encountered an SPI error
    #[error("spi: {0}")]
    SpiError(spi::ErrorKind),

    /// Encountered an error on Busy GPIO
    #[error("busy pin: {0}")]
    BusyError(digital::ErrorKind),

    /// Encountered an error on DC GPIO
    #[error("dc pin: {0}")]
    DcError(digital::ErrorKind),

    /// Encountered an error on CS GPIO
    #[error("cs pin: {0}")]
    CsError(digital::ErrorKind),

    /// Encountered an error on RST GPIO
    #[error("rst pin: {0}")]
    RstError(digital::ErrorKind),
}

/// Everything that can go wrong between a caller's bitmap and the panel
#[derive(Debug, Error)]
pub enum Error {
    /// The image fits neither orientation of the panel
    #[error("image size {got:?} matches neither accepted size {expected:?}")]
    DimensionMismatch {
        /// Accepted `(width, height)` pairs, native axis order first
        expected: [(u32, u32); 2],
        /// Size of the offending image
        got: (u32, u32),
    },

    /// A raw buffer does not hold exactly one bit per panel pixel
    #[error("buffer holds {got} bytes, panel needs {expected}")]
    BufferLength {
        /// `ceil(width * height / 8)`
        expected: usize,
        /// Length that was handed in
        got: usize,
    },

    /// No panel driver is known under the requested name
    #[error("no panel driver named `{0}`")]
    DriverUnavailable(String),

    /// The panel was detected but its bus or pins could not be claimed
    #[error("hardware initialisation failed: {0}")]
    HardwareInitFailure(String),

    /// A transfer to the panel failed
    #[error(transparent)]
    Interface(#[from] ErrorKind),

    /// The emulation window was closed
    #[error("emulation surface was closed")]
    SurfaceClosed,

    /// A snapshot of the emulated panel could not be written
    #[error("snapshot: {0}")]
    Snapshot(#[from] image::ImageError),
}

/// Result alias used throughout the crate
pub type Result<T, E = Error> = core::result::Result<T, E>;
