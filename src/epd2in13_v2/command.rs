//! Opcodes and register values of the SSD1675B on the 2.13" (V2) panel

use bit_field::BitField;

use crate::traits;

/// SSD1675B opcodes sent by the driver
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Last gate line and scan order, see [`gate_scan`]
    DriverOutputControl = 0x01,
    /// VGH level
    GateVoltage = 0x03,
    /// VSH1, VSH2 and VSL levels
    SourceVoltage = 0x04,
    DeepSleep = 0x10,
    /// Address counter direction, see [`data_entry`]
    DataEntryMode = 0x11,
    SwReset = 0x12,
    /// Runs the steps selected with [`Command::UpdateSequence`] and raises busy
    MasterActivation = 0x20,
    UpdateSequence = 0x22,
    /// Black/white RAM, the frame to show
    WriteBlackRam = 0x24,
    /// Red RAM, the partial waveform compares against it
    WritePreviousRam = 0x26,
    Vcom = 0x2C,
    /// First 70 bytes of a waveform table
    Waveform = 0x32,
    OtpSelection = 0x37,
    DummyLinePeriod = 0x3A,
    GateLineWidth = 0x3B,
    BorderWaveform = 0x3C,
    RamXRange = 0x44,
    RamYRange = 0x45,
    RamXCounter = 0x4E,
    RamYCounter = 0x4F,
    AnalogBlockControl = 0x74,
    DigitalBlockControl = 0x7E,
}

impl traits::Command for Command {
    fn address(self) -> u8 {
        self as u8
    }
}

/// Keeps RAM content, woken up by a hardware reset
pub(crate) const DEEP_SLEEP_RETAIN_RAM: u8 = 0x01;

/// One step of an update sequence, the value is its bit in the register
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    ClockOff = 0,
    AnalogOff = 1,
    Display = 2,
    /// Selects the second display mode, the one the partial waveform uses
    DisplayMode2 = 3,
    ClockOn = 6,
    AnalogOn = 7,
}

/// Value of [`Command::UpdateSequence`]
///
/// The controller runs the selected steps from the MSB down, so powering up,
/// displaying and powering down fit into a single activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UpdateSequence(u8);

impl UpdateSequence {
    pub fn of(steps: &[Step]) -> Self {
        let mut bits = 0u8;
        for &step in steps {
            bits.set_bit(step as usize, true);
        }
        UpdateSequence(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

/// Argument of [`Command::DriverOutputControl`] for a panel scanning gates
/// `0..=last_gate` in order
pub(crate) fn gate_scan(last_gate: u16) -> [u8; 3] {
    [
        last_gate.get_bits(0..8) as u8,
        last_gate.get_bits(8..9) as u8,
        0x00,
    ]
}

/// Argument of [`Command::DataEntryMode`]
///
/// `y_first` moves the address counter along y after every byte instead of x.
pub(crate) fn data_entry(x_increments: bool, y_increments: bool, y_first: bool) -> u8 {
    *0u8.set_bit(0, x_increments)
        .set_bit(1, y_increments)
        .set_bit(2, y_first)
}

/// Argument of [`Command::BorderWaveform`] that drives the border like a
/// pixel on waveform `lut` (0..=3)
pub(crate) fn border_follows(lut: u8) -> u8 {
    // source select 00: GS transition, fix level bits stay at VSS
    *0u8.set_bits(0..2, lut & 0b11)
}
