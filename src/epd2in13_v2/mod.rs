//! A Driver for the Waveshare 2.13" E-Ink Display (V2) via SPI
//!
//! # References
//!
//! - [Waveshare product page](https://www.waveshare.com/wiki/2.13inch_e-Paper_HAT)
//! - [Waveshare C driver](https://github.com/waveshare/e-Paper/blob/master/RaspberryPi%26JetsonNano/c/lib/e-Paper/EPD_2in13_V2.c)
//! - [Waveshare Python driver](https://github.com/waveshare/e-Paper/blob/master/RaspberryPi%26JetsonNano/python/lib/waveshare_epd/epd2in13_V2.py)
//!

use crate::error::ErrorKind;
use crate::graphics::DisplayGeometry;
use crate::traits::{HardwareTransport, PanelDriver, TransportExt, UpdateMode};

pub(crate) mod command;
use self::command::{
    border_follows, data_entry, gate_scan, Command, Step, UpdateSequence, DEEP_SLEEP_RETAIN_RAM,
};

/// Width of the display.
pub const WIDTH: u32 = 122;

/// Height of the display
pub const HEIGHT: u32 = 250;

#[rustfmt::skip]
const LUT_FULL_UPDATE: [u8; 76] = [
    0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // LUT0: BB:     VS 0 ~7
    0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // LUT1: BW:     VS 0 ~7
    0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // LUT2: WB:     VS 0 ~7
    0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // LUT3: WW:     VS 0 ~7
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT4: VCOM:   VS 0 ~7

    0x03, 0x03, 0x00, 0x00, 0x02, // TP0 A~D RP0
    0x09, 0x09, 0x00, 0x00, 0x02, // TP1 A~D RP1
    0x03, 0x03, 0x00, 0x00, 0x02, // TP2 A~D RP2
    0x00, 0x00, 0x00, 0x00, 0x00, // TP3 A~D RP3
    0x00, 0x00, 0x00, 0x00, 0x00, // TP4 A~D RP4
    0x00, 0x00, 0x00, 0x00, 0x00, // TP5 A~D RP5
    0x00, 0x00, 0x00, 0x00, 0x00, // TP6 A~D RP6

    0x15, 0x41, 0xA8, 0x32, 0x30, 0x0A,
];

#[rustfmt::skip]
const LUT_PARTIAL_UPDATE: [u8; 76] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT0: BB:     VS 0 ~7
    0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT1: BW:     VS 0 ~7
    0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT2: WB:     VS 0 ~7
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT3: WW:     VS 0 ~7
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT4: VCOM:   VS 0 ~7

    0x0A, 0x00, 0x00, 0x00, 0x00, // TP0 A~D RP0
    0x00, 0x00, 0x00, 0x00, 0x00, // TP1 A~D RP1
    0x00, 0x00, 0x00, 0x00, 0x00, // TP2 A~D RP2
    0x00, 0x00, 0x00, 0x00, 0x00, // TP3 A~D RP3
    0x00, 0x00, 0x00, 0x00, 0x00, // TP4 A~D RP4
    0x00, 0x00, 0x00, 0x00, 0x00, // TP5 A~D RP5
    0x00, 0x00, 0x00, 0x00, 0x00, // TP6 A~D RP6

    0x15, 0x41, 0xA8, 0x32, 0x30, 0x0A,
];

/// EPD2in13 (V2) driver
///
/// The SSD1675B has no waveform in OTP that suits partial refreshes, both
/// tables are uploaded on init.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Epd2in13 {
    refresh: UpdateMode,
}

impl Epd2in13 {
    /// Creates the driver, nothing is sent until [`PanelDriver::init`]
    pub fn new() -> Self {
        Epd2in13::default()
    }

    /// Waveform the controller was last initialised for
    pub fn mode(&self) -> UpdateMode {
        self.refresh
    }

    fn init_full<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.wait_while_busy()?;
        transport.cmd(Command::SwReset)?;
        transport.wait_while_busy()?;

        transport.cmd_with_data(Command::AnalogBlockControl, &[0x54])?;
        transport.cmd_with_data(Command::DigitalBlockControl, &[0x3B])?;

        transport.cmd_with_data(Command::DriverOutputControl, &gate_scan((HEIGHT - 1) as u16))?;
        transport.cmd_with_data(Command::DataEntryMode, &[data_entry(true, false, false)])?;

        // x is counted in bytes, y runs backwards from the last gate line
        transport.cmd_with_data(Command::RamXRange, &[0x00, ((WIDTH - 1) / 8) as u8])?;
        transport.cmd_with_data(
            Command::RamYRange,
            &[(HEIGHT - 1) as u8, ((HEIGHT - 1) >> 8) as u8, 0x00, 0x00],
        )?;

        transport.cmd_with_data(Command::BorderWaveform, &[border_follows(3)])?;
        transport.cmd_with_data(Command::Vcom, &[0x55])?;

        // the voltages trail the waveform table
        transport.cmd_with_data(Command::GateVoltage, &LUT_FULL_UPDATE[70..71])?;
        transport.cmd_with_data(Command::SourceVoltage, &LUT_FULL_UPDATE[71..74])?;
        transport.cmd_with_data(Command::DummyLinePeriod, &LUT_FULL_UPDATE[74..75])?;
        transport.cmd_with_data(Command::GateLineWidth, &LUT_FULL_UPDATE[75..76])?;
        transport.cmd_with_data(Command::Waveform, &LUT_FULL_UPDATE[0..70])?;

        transport.cmd_with_data(Command::RamXCounter, &[0x00])?;
        transport.cmd_with_data(
            Command::RamYCounter,
            &[(HEIGHT - 1) as u8, ((HEIGHT - 1) >> 8) as u8],
        )?;
        transport.wait_while_busy()
    }

    fn init_partial<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.cmd_with_data(Command::Vcom, &[0x26])?;
        transport.wait_while_busy()?;

        transport.cmd_with_data(Command::Waveform, &LUT_PARTIAL_UPDATE[0..70])?;
        transport.cmd_with_data(
            Command::OtpSelection,
            &[0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00],
        )?;

        // clock and analog stay on between partial updates
        self.activate(transport, &[Step::AnalogOn, Step::ClockOn])?;

        transport.cmd_with_data(Command::BorderWaveform, &[border_follows(1)])
    }

    fn activate<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
        steps: &[Step],
    ) -> Result<(), ErrorKind> {
        let sequence = UpdateSequence::of(steps);
        transport.cmd_with_data(Command::UpdateSequence, &[sequence.bits()])?;
        transport.cmd(Command::MasterActivation)?;
        transport.wait_while_busy()
    }
}

impl PanelDriver for Epd2in13 {
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

        match mode {
            UpdateMode::Full => self.init_full(transport)?,
            UpdateMode::Partial => self.init_partial(transport)?,
        }
        self.refresh = mode;
        Ok(())
    }

    fn sleep<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        transport.wait_while_busy()?;

        // power down analog and clock before entering deep sleep
        let power_off = UpdateSequence::of(&[
            Step::AnalogOn,
            Step::ClockOn,
            Step::AnalogOff,
            Step::ClockOff,
        ]);
        transport.cmd_with_data(Command::UpdateSequence, &[power_off.bits()])?;
        transport.cmd(Command::MasterActivation)?;

        transport.cmd_with_data(Command::DeepSleep, &[DEEP_SLEEP_RETAIN_RAM])
    }

    fn turn_on_display<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        self.activate(
            transport,
            &[
                Step::AnalogOn,
                Step::ClockOn,
                Step::Display,
                Step::AnalogOff,
                Step::ClockOff,
            ],
        )
    }

    fn turn_on_display_part<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        self.activate(transport, &[Step::Display, Step::DisplayMode2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::recording::{Op, RecordingTransport};

    #[test]
    fn epd_size() {
        assert_eq!(WIDTH, 122);
        assert_eq!(HEIGHT, 250);
        assert_eq!(Epd2in13::new().geometry().packed_len(), 3813);
    }

    #[test]
    fn full_init_sequence() {
        let mut transport = RecordingTransport::default();
        let mut epd = Epd2in13::new();
        epd.init(&mut transport, UpdateMode::Full).unwrap();

        assert_eq!(transport.ops[0], Op::Reset);
        assert_eq!(
            transport.commands(),
            vec![
                0x12, 0x74, 0x7E, 0x01, 0x11, 0x44, 0x45, 0x3C, 0x2C, 0x03, 0x04, 0x3A, 0x3B,
                0x32, 0x4E, 0x4F
            ]
        );
        assert_eq!(transport.data_of(0x01), vec![vec![0xF9, 0x00, 0x00]]);
        assert_eq!(transport.data_of(0x11), vec![vec![0x01]]);
        assert_eq!(transport.data_of(0x44), vec![vec![0x00, 0x0F]]);
        assert_eq!(transport.data_of(0x04), vec![vec![0x41, 0xA8, 0x32]]);
        assert_eq!(transport.data_of(0x32)[0].len(), 70);
        assert_eq!(transport.ops.last(), Some(&Op::WaitBusy));
    }

    #[test]
    fn partial_init_sequence() {
        let mut transport = RecordingTransport::default();
        let mut epd = Epd2in13::new();
        epd.init(&mut transport, UpdateMode::Partial).unwrap();

        assert_eq!(
            transport.commands(),
            vec![0x2C, 0x32, 0x37, 0x22, 0x20, 0x3C]
        );
        assert_eq!(transport.data_of(0x2C), vec![vec![0x26]]);
        assert_eq!(transport.data_of(0x22), vec![vec![0xC0]]);
        assert_eq!(transport.data_of(0x3C), vec![vec![0x01]]);
        assert_eq!(epd.mode(), UpdateMode::Partial);
    }

    #[test]
    fn refresh_sequences() {
        let mut epd = Epd2in13::new();

        let mut transport = RecordingTransport::default();
        epd.turn_on_display(&mut transport).unwrap();
        assert_eq!(transport.data_of(0x22), vec![vec![0xC7]]);

        let mut transport = RecordingTransport::default();
        epd.turn_on_display_part(&mut transport).unwrap();
        assert_eq!(transport.data_of(0x22), vec![vec![0x0C]]);
        assert_eq!(transport.ops.last(), Some(&Op::WaitBusy));
    }

    #[test]
    fn sleep_powers_down_first() {
        let mut transport = RecordingTransport::default();
        Epd2in13::new().sleep(&mut transport).unwrap();
        assert_eq!(transport.data_of(0x22), vec![vec![0xC3]]);
        assert_eq!(transport.data_of(0x10), vec![vec![0x01]]);
    }
}
