//! Partial-refresh driver for Waveshare SSD16xx E-Ink Displays, with an emulator
//!
//! Images go through three steps before they show up on a panel:
//!
//! 1. [`graphics::convert`] reduces them to black and white and brings them
//!    into the panel's native, mirrored scan order
//! 2. [`cache::WriteCache`] drops frames that already went out three times in a row
//! 3. a [`traits::Sink`] shows the frame: [`sink::HardwareSink`] sends it over
//!    SPI, [`sink::EmulatedSink`] renders it with simulated ghosting
//!
//! [`epd::Epd::open`] picks the sink on its own: a panel on `/dev/spidev0.0`
//! is driven directly, otherwise it is emulated.
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 4Mhz, the speed the vendor drivers use
//!
//! ### Other....
//!
//! - Chip select is a plain GPIO, toggled around every byte
//! - Busy is high while the panel refreshes
//!
//! # Features
//!
//! - `graphics` (default): draw on a [`graphics::Canvas`] with `embedded-graphics`
//! - `linux`: drive real panels through spidev and the GPIO character device
//! - `simulator`: show emulated panels in a desktop window
//!
//! # Examples
//!
//! ```rust, no_run
//!# fn main() -> Result<(), easy_epd::error::Error> {
//! use easy_epd::prelude::*;
//!
//! let mut epd = Epd::open("epd2in9_V2", Config::default())?;
//!
//! // draw something into a landscape image
//! let mut image = epd.new_image(true, 1);
//! for x in 0..epd.height() {
//!     image.set(x, 20, Color::Black);
//! }
//!
//! epd.display(&image)?;
//!
//! // wipe the screen
//! epd.clear(1)?;
//!
//! epd.sleep()?;
//!# Ok(())
//!# }
//! ```
//!
#![deny(missing_docs)]

pub mod cache;
pub mod color;
pub mod config;
pub mod emulator;
pub mod epd;
/// Error types of the transport and of the facade
pub mod error;
pub mod graphics;
pub mod panel;
pub mod platform;
pub mod sink;
/// Traits at the seams between facade, sinks, panel drivers and transports
pub mod traits;

/// Interface for the physical connection between display and the controlling device
pub mod interface;

pub mod epd1in54_v2;
pub mod epd2in13_v2;
pub mod epd2in9_v2;

pub(crate) mod type_a {
    pub(crate) mod command;
}

/// Includes everything important besides the chosen panel modules
pub mod prelude {
    pub use crate::cache::WriteOutcome;
    pub use crate::color::Color;
    pub use crate::config::Config;
    pub use crate::epd::{Epd, FacadeState};
    pub use crate::error::{Error, Result};
    pub use crate::graphics::{Bitmap, Canvas, DisplayGeometry, MonochromeBuffer, Orientation};
    pub use crate::panel::Panel;
    pub use crate::traits::{HardwareTransport, PanelDriver, Sink, UpdateMode};

    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Computes the needed buffer length. Takes care of rounding up in case width
/// is not divisible by 8.
///
///  unused
///  bits        width
/// <----><------------------------>
/// \[XXXXX210\]\[76543210\]...\[76543210\] ^
/// \[XXXXX210\]\[76543210\]...\[76543210\] | height
/// \[XXXXX210\]\[76543210\]...\[76543210\] v
///
/// This is the layout of the controller RAM, frames handed around in this
/// crate are packed without the padding.
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width + 7) / 8 * height
}
