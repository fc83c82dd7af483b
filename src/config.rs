//! Run-time settings for opening a panel

use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::emulator::DEFAULT_LATENCY;

/// BCM numbers of the control lines
///
/// The defaults match the Waveshare Raspberry Pi HAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDefinition {
    /// Reset, output
    pub rst: u32,
    /// Data/Command, output
    pub dc: u32,
    /// Chip select, output, active low
    pub cs: u32,
    /// Busy, input, high while the panel works
    pub busy: u32,
}

impl Default for PinDefinition {
    fn default() -> Self {
        PinDefinition {
            rst: 17,
            dc: 25,
            cs: 8,
            busy: 24,
        }
    }
}

/// Settings used by [`Epd::open`](crate::epd::Epd::open)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Run the full and then the partial init right after opening real hardware
    pub auto_init: bool,
    /// Always emulate, even when a panel is attached
    pub emulate: bool,
    /// Control lines
    pub pins: PinDefinition,
    /// spidev node the panel hangs off
    pub spi_path: PathBuf,
    /// GPIO character device holding the control lines
    pub gpio_chip: PathBuf,
    /// SPI clock
    pub spi_speed_hz: u32,
    /// Sleep between two reads of the busy line
    pub busy_poll: Duration,
    /// Minimum duration of one emulated write
    pub emulated_latency: Duration,
    /// Screen pixels per panel pixel in the emulation window
    pub window_scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            auto_init: true,
            emulate: false,
            pins: PinDefinition::default(),
            spi_path: PathBuf::from("/dev/spidev0.0"),
            gpio_chip: PathBuf::from("/dev/gpiochip0"),
            spi_speed_hz: 4_000_000,
            busy_poll: Duration::from_millis(10),
            emulated_latency: DEFAULT_LATENCY,
            window_scale: 2,
        }
    }
}

impl Config {
    /// The defaults, overridden by `EASY_EPD_*` environment variables
    ///
    /// - `EASY_EPD_SPI`: spidev node
    /// - `EASY_EPD_GPIOCHIP`: GPIO character device
    /// - `EASY_EPD_LATENCY_MS`: emulated write duration in milliseconds
    /// - `EASY_EPD_EMULATE`: any value but `0` forces emulation
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Config::default();
        if let Some(path) = lookup("EASY_EPD_SPI") {
            config.spi_path = path.into();
        }
        if let Some(path) = lookup("EASY_EPD_GPIOCHIP") {
            config.gpio_chip = path.into();
        }
        if let Some(ms) = lookup("EASY_EPD_LATENCY_MS") {
            match ms.trim().parse() {
                Ok(ms) => config.emulated_latency = Duration::from_millis(ms),
                Err(_) => warn!("ignoring EASY_EPD_LATENCY_MS={ms:?}, not a number"),
            }
        }
        if let Some(flag) = lookup("EASY_EPD_EMULATE") {
            config.emulate = flag.trim() != "0";
        }
        config
    }

    /// Disables the automatic init on hardware
    pub fn without_auto_init(mut self) -> Self {
        self.auto_init = false;
        self
    }

    /// Forces emulation with the given write duration
    pub fn emulated(mut self, latency: Duration) -> Self {
        self.emulate = true;
        self.emulated_latency = latency;
        self
    }
}
