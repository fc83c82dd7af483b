//! A simple Driver for the Waveshare 2.9" E-Ink Display V2 (SSD1680)
//!
//! Specification: <https://www.waveshare.com/w/upload/7/79/2.9inch-e-paper-v2-specification.pdf>
//!
//! Both waveforms are uploaded by the host. The partial one keeps the previous
//! frame in the red RAM, which is why every partial write also sends the
//! inverted frame there.

/// Width of epd2in9 in pixels
pub const WIDTH: u32 = 128;
/// Height of epd2in9 in pixels
pub const HEIGHT: u32 = 296;

const LUT_PARTIAL_2IN9: [u8; 159] = [
    0x0, 0x40, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x80, 0x80, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x40, 0x40, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x80, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0A, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x22, 0x22, 0x22, 0x22, 0x22,
    0x22, 0x0, 0x0, 0x0, 0x22, 0x17, 0x41, 0xB0, 0x32, 0x36,
];

const WS_20_30: [u8; 159] = [
    0x80, 0x66, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x40, 0x0, 0x0, 0x0, 0x10, 0x66, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x20, 0x0, 0x0, 0x0, 0x80, 0x66, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x40, 0x0, 0x0, 0x0,
    0x10, 0x66, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x20, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x14, 0x8, 0x0, 0x0, 0x0, 0x0, 0x1, 0xA, 0xA, 0x0, 0xA, 0xA, 0x0,
    0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x14, 0x8, 0x0, 0x1, 0x0, 0x0, 0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1,
    0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x44, 0x44, 0x44, 0x44,
    0x44, 0x44, 0x0, 0x0, 0x0, 0x22, 0x17, 0x41, 0x0, 0x32, 0x36,
];

use crate::error::ErrorKind;
use crate::graphics::DisplayGeometry;
use crate::traits::{HardwareTransport, PanelDriver, TransportExt, UpdateMode};

use crate::type_a::command::{update, Command};

/// Epd2in9 (V2) driver
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Epd2in9 {
    /// Waveform the controller was last initialised for
    mode: UpdateMode,
}

impl Epd2in9 {
    /// Creates the driver, nothing is sent until [`PanelDriver::init`]
    pub fn new() -> Self {
        Epd2in9::default()
    }

    /// Waveform the controller was last initialised for
    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    fn init_full<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.reset()?;

        transport.wait_while_busy()?;
        transport.cmd(Command::SwReset)?;
        transport.wait_while_busy()?;

        // 3 Databytes:
        // A[7:0]
        // 0.. A[8]
        // 0.. B[2:0]
        // Default Values: A = Height of Screen (0x127), B = 0x00 (GD, SM and TB=0?)
        transport.cmd_with_data(Command::DriverOutputControl, &[0x27, 0x01, 0x00])?;

        // One Databyte with default value 0x03
        //  -> address: x increment, y increment, address counter is updated in x direction
        transport.cmd_with_data(Command::DataEntryMode, &[0x03])?;

        self.use_full_frame(transport)?;
        transport.cmd_with_data(Command::UpdateOptions, &[0x00, 0x80])?;
        transport.wait_while_busy()?;

        // set LUT by host
        self.set_lut_helper(transport, &WS_20_30)
    }

    fn init_partial<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.reset()?;

        self.set_lut_helper(transport, &LUT_PARTIAL_2IN9)?;
        transport.cmd_with_data(
            Command::OtpSelection,
            &[0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00],
        )?;
        transport.cmd_with_data(Command::BorderWaveform, &[0x80])?;
        transport.cmd_with_data(Command::UpdateSequence, &[update::POWER_ON])?;
        transport.cmd(Command::MasterActivation)?;
        transport.wait_while_busy()?;

        self.use_full_frame(transport)
    }

    fn use_full_frame<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        // choose full frame/ram
        transport.cmd_with_data(
            Command::RamXRange,
            &[0x00, ((WIDTH - 1) >> 3) as u8],
        )?;
        // 2 Databytes: A[7:0] & 0..A[8] for each - start and end
        transport.cmd_with_data(
            Command::RamYRange,
            &[0x00, 0x00, (HEIGHT - 1) as u8, ((HEIGHT - 1) >> 8) as u8],
        )?;

        // start from the beginning
        transport.wait_while_busy()?;
        transport.cmd_with_data(Command::RamXCounter, &[0x00])?;
        transport.cmd_with_data(Command::RamYCounter, &[0x00, 0x00])
    }

    /// Uploads a waveform, this function is also used internally for init
    fn set_lut_helper<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
        lut: &[u8; 159],
    ) -> Result<(), ErrorKind> {
        transport.wait_while_busy()?;
        transport.cmd_with_data(Command::Waveform, &lut[0..153])?;
        transport.wait_while_busy()?;
        transport.cmd_with_data(Command::WaveformEnd, &lut[153..154])?;
        transport.cmd_with_data(Command::GateVoltage, &lut[154..155])?;
        transport.cmd_with_data(Command::SourceVoltage, &lut[155..158])?;
        transport.cmd_with_data(Command::Vcom, &lut[158..159])
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

impl PanelDriver for Epd2in9 {
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
        match mode {
            UpdateMode::Full => self.init_full(transport)?,
            UpdateMode::Partial => self.init_partial(transport)?,
        }
        self.mode = mode;
        Ok(())
    }

    fn sleep<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.wait_while_busy()?;
        // 0x00 for Normal mode (Power on Reset), 0x01 for Deep Sleep Mode
        transport.cmd_with_data(Command::DeepSleep, &[0x01])?;
        transport.delay_ms(2000);
        Ok(())
    }

    /// Enable clock signal, Enable Analog, Load temperature value, DISPLAY with DISPLAY Mode 1, Disable Analog, Disable OSC
    fn turn_on_display<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        self.activate(transport, update::FULL_2IN9)
    }

    fn turn_on_display_part<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        self.activate(transport, update::PART_2IN9)
    }
}
