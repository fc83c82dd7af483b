//! A simple Driver for the Waveshare 1.54" E-Ink Display (V2) via SPI
//!
//! GDEH0154D67, SSD1681 controller. Both refresh modes run the waveforms
//! stored in the controller OTP.

/// Width of the display
pub const WIDTH: u32 = 200;
/// Height of the display
pub const HEIGHT: u32 = 200;

use crate::error::ErrorKind;
use crate::graphics::DisplayGeometry;
use crate::traits::{HardwareTransport, PanelDriver, TransportExt, UpdateMode};

use crate::type_a::command::{update, Command};

/// Epd1in54 (V2) driver
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Epd1in54 {
    /// Refresh LUT
    refresh: UpdateMode,
}

impl Epd1in54 {
    /// Creates the driver, nothing is sent until [`PanelDriver::init`]
    pub fn new() -> Self {
        Epd1in54::default()
    }

    /// Waveform the controller was last initialised for
    pub fn mode(&self) -> UpdateMode {
        self.refresh
    }

    fn init_full<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.cmd(Command::SwReset)?;
        transport.wait_while_busy()?;

        // 3 Databytes:
        // A[7:0]
        // 0.. A[8]
        // 0.. B[2:0]
        // A = Height of Screen - 1, B = 0x01 (TB, scan from the bottom gate)
        transport.cmd_with_data(
            Command::DriverOutputControl,
            &[(HEIGHT - 1) as u8, ((HEIGHT - 1) >> 8) as u8, 0x01],
        )?;

        // x increment, y decrement
        transport.cmd_with_data(Command::DataEntryMode, &[0x01])?;

        transport.cmd_with_data(
            Command::RamXRange,
            &[0x00, ((WIDTH - 1) >> 3) as u8],
        )?;
        transport.cmd_with_data(
            Command::RamYRange,
            &[(HEIGHT - 1) as u8, ((HEIGHT - 1) >> 8) as u8, 0x00, 0x00],
        )?;

        transport.cmd_with_data(Command::BorderWaveform, &[0x01])?;

        // internal temperature sensor, then load the matching OTP waveform
        transport.cmd_with_data(Command::TemperatureSensor, &[0x80])?;
        transport.cmd_with_data(Command::UpdateSequence, &[update::LOAD_TEMP_AND_LUT])?;
        transport.cmd(Command::MasterActivation)?;
        transport.wait_while_busy()?;

        transport.cmd_with_data(Command::RamXCounter, &[0x00])?;
        transport.cmd_with_data(
            Command::RamYCounter,
            &[(HEIGHT - 1) as u8, ((HEIGHT - 1) >> 8) as u8],
        )?;
        transport.wait_while_busy()
    }

    fn init_partial<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        // border follows VCOM so it does not flicker on every partial refresh
        transport.cmd_with_data(Command::BorderWaveform, &[0x80])
    }

    fn activate<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
        sequence: u8,
    ) -> Result<(), ErrorKind> {
        transport.cmd_with_data(Command::UpdateSequence, &[sequence])?;
        transport.cmd(Command::MasterActivation)?;
        transport.wait_while_busy()
    }
}

impl PanelDriver for Epd1in54 {
    fn geometry(&self) -> DisplayGeometry {
        DisplayGeometry::new(WIDTH, HEIGHT)
    }

    fn black_plane_command(&self) -> u8 {
        Command::WriteBlackRam as u8
    }

    fn red_plane_command(&self) -> u8 {
        Command::WritePreviousRam as u8
    }

    fn init<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
        mode: UpdateMode,
    ) -> Result<(), ErrorKind> {
        transport.reset()?;
        transport.wait_while_busy()?;

        match mode {
            UpdateMode::Full => self.init_full(transport)?,
            UpdateMode::Partial => self.init_partial(transport)?,
        }
        self.refresh = mode;
        Ok(())
    }

    fn sleep<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.wait_while_busy()?;
        // 0x00 for Normal mode (Power on Reset), 0x01 for Deep Sleep Mode
        transport.cmd_with_data(Command::DeepSleep, &[0x01])
    }

    fn turn_on_display<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        self.activate(transport, update::FULL_1IN54)
    }

    fn turn_on_display_part<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        self.activate(transport, update::PART_1IN54)
    }
}
