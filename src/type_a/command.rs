//! Opcodes shared by the SSD1680 (2.9" V2) and SSD1681 (1.54" V2) controllers

use crate::traits;

/// SSD1680/SSD1681 opcodes sent by the drivers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Last gate line (two bytes) and scan order
    DriverOutputControl = 0x01,
    GateVoltage = 0x03,
    SourceVoltage = 0x04,
    /// `0x01` keeps RAM, only a hardware reset wakes the controller
    DeepSleep = 0x10,
    DataEntryMode = 0x11,
    SwReset = 0x12,
    /// Selects the internal temperature sensor with `0x80`
    TemperatureSensor = 0x18,
    MasterActivation = 0x20,
    /// RAM bypass and source output range
    UpdateOptions = 0x21,
    UpdateSequence = 0x22,
    /// Black/white RAM, the frame to show
    WriteBlackRam = 0x24,
    /// Red RAM, holds the previous frame for partial refreshes
    WritePreviousRam = 0x26,
    Vcom = 0x2C,
    /// First 153 bytes of a host supplied waveform
    Waveform = 0x32,
    OtpSelection = 0x37,
    BorderWaveform = 0x3C,
    /// Byte 154 of the waveform, sent on its own
    WaveformEnd = 0x3F,
    RamXRange = 0x44,
    RamYRange = 0x45,
    RamXCounter = 0x4E,
    RamYCounter = 0x4F,
}

impl traits::Command for Command {
    fn address(self) -> u8 {
        self as u8
    }
}

/// Values for [`Command::UpdateSequence`]
pub(crate) mod update {
    /// Power up, load temperature and waveform, display, power down
    pub const FULL_2IN9: u8 = 0xC7;
    /// Display with mode 2, clock and analog stay on
    pub const PART_2IN9: u8 = 0x0F;
    /// Like [`FULL_2IN9`] with the OTP waveform reloaded on every refresh
    pub const FULL_1IN54: u8 = 0xF7;
    /// Every step set, the SSD1681 picks the partial OTP waveform from it
    pub const PART_1IN54: u8 = 0xFF;
    /// Only power up clock and analog
    pub const POWER_ON: u8 = 0xC0;
    pub const LOAD_TEMP_AND_LUT: u8 = 0xB1;
}
