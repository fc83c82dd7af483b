use crate::error::{ErrorKind, Result};
use crate::graphics::{DisplayGeometry, MonochromeBuffer};

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Seperates the different waveforms a panel can be initialised for
///
/// These are the `FULL_UPDATE` and `PART_UPDATE` modes of the vendor drivers.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum UpdateMode {
    /// The "normal" full refresh sequence, flashes the whole panel
    #[default]
    Full,
    /// The quick partial refresh, no flashing but leaves ghosting behind
    Partial,
}

/// The wire-level capabilities of the connection between display and the
/// controlling device
///
/// Implementors provide the primitive line and bus operations, the framing of
/// commands and data on top of them is shared.
pub trait HardwareTransport {
    /// Drives the Data/Command line: `true` for data, `false` for commands
    fn set_data_command_line(&mut self, data: bool) -> Result<(), ErrorKind>;

    /// Selects (`true`) or releases (`false`) the panel on the bus
    fn set_chip_select(&mut self, selected: bool) -> Result<(), ErrorKind>;

    /// Clocks one byte out without touching any control line
    fn write_byte(&mut self, byte: u8) -> Result<(), ErrorKind>;

    /// Blocks until the panel releases its busy line
    ///
    /// There is no timeout, a panel that never gets idle blocks forever.
    fn wait_while_busy(&mut self) -> Result<(), ErrorKind>;

    /// Pulses the reset line
    ///
    /// Often used to awake the module from deep sleep.
    fn reset(&mut self) -> Result<(), ErrorKind>;

    /// Blocks for the given number of milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Basic function for sending a command opcode.
    fn send_command(&mut self, opcode: u8) -> Result<(), ErrorKind> {
        // low for commands
        self.set_data_command_line(false)?;
        self.framed_write(opcode)
    }

    /// Basic function for sending a single byte of data.
    fn send_data(&mut self, byte: u8) -> Result<(), ErrorKind> {
        // high for data
        self.set_data_command_line(true)?;
        self.framed_write(byte)
    }

    /// Writes one byte with the chip select asserted around it
    fn framed_write(&mut self, byte: u8) -> Result<(), ErrorKind> {
        self.set_chip_select(true)?;
        let result = self.write_byte(byte);
        // release the bus even when the transfer failed
        self.set_chip_select(false)?;
        result
    }
}

/// Crate internal helpers on top of [`HardwareTransport`]
pub(crate) trait TransportExt: HardwareTransport {
    fn cmd<C: Command>(&mut self, command: C) -> Result<(), ErrorKind> {
        self.send_command(command.address())
    }

    fn cmd_with_data<C: Command>(&mut self, command: C, data: &[u8]) -> Result<(), ErrorKind> {
        self.cmd(command)?;
        for &byte in data {
            self.send_data(byte)?;
        }
        Ok(())
    }
}

impl<T: HardwareTransport + ?Sized> TransportExt for T {}

/// The operations every supported panel family provides
///
/// The buffer pipeline stays in this crate, a driver only knows how to bring
/// its controller up and down and how to kick off a refresh.
pub trait PanelDriver {
    /// Panel geometry in native axis order
    fn geometry(&self) -> DisplayGeometry;

    /// Opcode that starts a write into the black/white RAM
    fn black_plane_command(&self) -> u8;

    /// Opcode that starts a write into the red (previous frame) RAM
    fn red_plane_command(&self) -> u8;

    /// Initialises the controller for the given waveform
    ///
    /// This function calls [reset](HardwareTransport::reset),
    /// so you don't need to call reset your self when trying to wake your device up
    /// after setting it to sleep.
    fn init<T: HardwareTransport>(&mut self, transport: &mut T, mode: UpdateMode)
        -> Result<(), ErrorKind>;

    /// Let the device enter deep-sleep mode to save power.
    ///
    /// The deep sleep mode returns to standby with a hardware reset.
    fn sleep<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind>;

    /// Triggers a full refresh of the RAM content and waits for it
    fn turn_on_display<T: HardwareTransport>(&mut self, transport: &mut T)
        -> Result<(), ErrorKind>;

    /// Triggers a partial refresh of the RAM content and waits for it
    fn turn_on_display_part<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind>;
}

/// Where packed frames end up: a real panel or the emulator
///
/// Every write blocks until the frame is visible.
pub trait Sink {
    /// Geometry of the panel behind this sink
    fn geometry(&self) -> DisplayGeometry;

    /// Transmits one packed frame and waits until it is shown
    fn write(&mut self, buffer: &MonochromeBuffer) -> Result<()>;

    /// Prepares the panel for the given waveform
    fn init(&mut self, mode: UpdateMode) -> Result<()>;

    /// Resets the panel
    fn reset(&mut self) -> Result<()>;

    /// `true` when the panel has to be wiped with a white frame after
    /// [`init`](Self::init) and [`reset`](Self::reset)
    ///
    /// The wipe goes through the facade's write path so the write cache
    /// knows what the panel shows.
    fn wipes_on_init(&self) -> bool {
        false
    }

    /// Puts the panel into deep sleep
    fn sleep(&mut self) -> Result<()> {
        Ok(())
    }

    /// Refreshes the panel from its RAM with the full waveform
    fn turn_on_display(&mut self) -> Result<()> {
        Ok(())
    }

    /// Refreshes the panel from its RAM with the partial waveform
    fn turn_on_display_part(&mut self) -> Result<()> {
        Ok(())
    }
}
