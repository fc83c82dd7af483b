//! Detection and bring-up of a physically attached panel

use log::{debug, info};

use crate::config::Config;

/// `true` when a panel can be driven: hardware support is compiled in, the
/// SPI node exists and emulation is not forced
pub fn hardware_present(config: &Config) -> bool {
    if config.emulate {
        debug!("emulation forced by configuration");
        return false;
    }
    if !cfg!(all(target_os = "linux", feature = "linux")) {
        debug!("built without the linux backend");
        return false;
    }
    let present = config.spi_path.exists();
    debug!("{} present: {present}", config.spi_path.display());
    present
}

#[cfg(all(target_os = "linux", feature = "linux"))]
pub use self::linux::{open_transport, LinuxTransport};

#[cfg(all(target_os = "linux", feature = "linux"))]
mod linux {
    use linux_embedded_hal::{
        gpio_cdev::{Chip, LineRequestFlags},
        spidev::{SpiModeFlags, SpidevOptions},
        CdevPin, Delay, SpidevBus,
    };
    use log::info;

    use crate::config::Config;
    use crate::error::{Error, Result};
    use crate::interface::DisplayInterface;

    /// The transport used on Linux boards: spidev plus gpio-cdev lines
    pub type LinuxTransport = DisplayInterface<SpidevBus, CdevPin, CdevPin, CdevPin, CdevPin, Delay>;

    fn init_failure<E: core::fmt::Display>(what: &str) -> impl FnOnce(E) -> Error + '_ {
        move |e| Error::HardwareInitFailure(format!("{what}: {e}"))
    }

    fn request_line(
        chip: &mut Chip,
        offset: u32,
        flags: LineRequestFlags,
        default: u8,
        label: &str,
    ) -> Result<CdevPin> {
        let handle = chip
            .get_line(offset)
            .and_then(|line| line.request(flags, default, label))
            .map_err(init_failure(label))?;
        CdevPin::new(handle).map_err(init_failure(label))
    }

    /// Opens the SPI bus and claims the control lines
    pub fn open_transport(config: &Config) -> Result<LinuxTransport> {
        let mut spi = SpidevBus::open(&config.spi_path).map_err(init_failure("spi"))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.spi_speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).map_err(init_failure("spi"))?;

        let mut chip = Chip::new(&config.gpio_chip).map_err(init_failure("gpio chip"))?;
        let pins = config.pins;
        let rst = request_line(&mut chip, pins.rst, LineRequestFlags::OUTPUT, 1, "easy-epd-rst")?;
        let dc = request_line(&mut chip, pins.dc, LineRequestFlags::OUTPUT, 0, "easy-epd-dc")?;
        let cs = request_line(&mut chip, pins.cs, LineRequestFlags::OUTPUT, 1, "easy-epd-cs")?;
        let busy = request_line(&mut chip, pins.busy, LineRequestFlags::INPUT, 0, "easy-epd-busy")?;

        info!(
            "opened {} at {} Hz",
            config.spi_path.display(),
            config.spi_speed_hz
        );
        let poll_ms = u32::try_from(config.busy_poll.as_millis()).unwrap_or(u32::MAX);
        Ok(DisplayInterface::new(spi, cs, busy, dc, rst, Delay, Some(poll_ms)))
    }
}

/// Logs which backend a facade ended up with
pub(crate) fn log_backend(name: &str, hardware: bool) {
    if hardware {
        info!("driving {name} on real hardware");
    } else {
        info!("no panel found, emulating {name}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_spi_node_means_emulation() {
        let config = Config {
            spi_path: PathBuf::from("/definitely/not/a/spidev"),
            ..Config::default()
        };
        assert!(!hardware_present(&config));
    }

    #[test]
    fn forced_emulation_wins() {
        let config = Config {
            spi_path: std::env::temp_dir(),
            emulate: true,
            ..Config::default()
        };
        assert!(!hardware_present(&config));
    }

    #[cfg(all(target_os = "linux", feature = "linux"))]
    #[test]
    fn existing_spi_node_means_hardware() {
        let config = Config {
            spi_path: std::env::temp_dir(),
            ..Config::default()
        };
        assert!(hardware_present(&config));
    }

    #[cfg(not(all(target_os = "linux", feature = "linux")))]
    #[test]
    fn no_backend_means_emulation() {
        let config = Config {
            spi_path: std::env::temp_dir(),
            ..Config::default()
        };
        assert!(!hardware_present(&config));
    }
}
