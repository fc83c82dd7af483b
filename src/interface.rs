use crate::error::ErrorKind;
use crate::traits::HardwareTransport;
use embedded_hal::{
    delay::DelayNs,
    digital::{self, InputPin, OutputPin},
    spi::{self, SpiBus},
};

/// The Connection Interface of the Waveshare SSD16xx panels
///
/// The chip select is driven by hand around every single byte, the way the
/// vendor drivers frame their transfers, so the bus is taken as a plain
/// [`SpiBus`] instead of a `SpiDevice`.
pub struct DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY> {
    spi: SPI,
    /// Low selects the panel
    cs: CS,
    /// High for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    delay: DELAY,
    /// number of ms the idle loop should sleep on
    busy_poll_ms: u32,
}

impl<SPI, CS, BUSY, DC, RST, DELAY> DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// If no poll interval is given, a default of 10ms is used.
    pub fn new(
        spi: SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        busy_poll_ms: Option<u32>,
    ) -> Self {
        DisplayInterface {
            spi,
            cs,
            busy,
            dc,
            rst,
            delay,
            busy_poll_ms: busy_poll_ms.unwrap_or(10),
        }
    }

    /// Hands back the bus, the pins and the delay
    pub fn release(self) -> (SPI, CS, BUSY, DC, RST, DELAY) {
        (self.spi, self.cs, self.busy, self.dc, self.rst, self.delay)
    }

    /// Checks if device is still busy
    ///
    /// The SSD16xx controllers hold the line high while they work.
    pub fn is_busy(&mut self) -> Result<bool, ErrorKind> {
        self.busy
            .is_high()
            .map_err(|e| ErrorKind::BusyError(digital::Error::kind(&e)))
    }
}

impl<SPI, CS, BUSY, DC, RST, DELAY> HardwareTransport
    for DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn set_data_command_line(&mut self, data: bool) -> Result<(), ErrorKind> {
        let result = if data {
            self.dc.set_high()
        } else {
            self.dc.set_low()
        };
        result.map_err(|e| ErrorKind::DcError(digital::Error::kind(&e)))
    }

    fn set_chip_select(&mut self, selected: bool) -> Result<(), ErrorKind> {
        // active low
        let result = if selected {
            self.cs.set_low()
        } else {
            self.cs.set_high()
        };
        result.map_err(|e| ErrorKind::CsError(digital::Error::kind(&e)))
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), ErrorKind> {
        self.spi
            .write(&[byte])
            .and_then(|_| self.spi.flush())
            .map_err(|e| ErrorKind::SpiError(spi::Error::kind(&e)))
    }

    fn wait_while_busy(&mut self) -> Result<(), ErrorKind> {
        while self.is_busy()? {
            if self.busy_poll_ms > 0 {
                self.delay.delay_ms(self.busy_poll_ms);
            }
        }
        Ok(())
    }

    /// The timing of keeping the reset pin low seems to be important and different per device.
    /// The SSD16xx panels reset properly with 10ms.
    fn reset(&mut self) -> Result<(), ErrorKind> {
        let rst = |e: RST::Error| ErrorKind::RstError(digital::Error::kind(&e));
        self.rst.set_high().map_err(rst)?;
        self.delay.delay_ms(20);
        self.rst.set_low().map_err(rst)?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(rst)?;
        self.delay.delay_ms(20);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, State, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    #[test]
    fn command_is_framed_by_cs_with_dc_low() {
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(vec![0x24]),
            SpiTransaction::flush(),
        ]);
        let cs = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let busy = PinMock::new(&[]);
        let dc = PinMock::new(&[PinTransaction::set(State::Low)]);
        let rst = PinMock::new(&[]);

        let mut interface = DisplayInterface::new(spi, cs, busy, dc, rst, NoopDelay::new(), None);
        interface.send_command(0x24).unwrap();

        let (mut spi, mut cs, mut busy, mut dc, mut rst, _) = interface.release();
        spi.done();
        cs.done();
        busy.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn data_bytes_are_sent_one_frame_each() {
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(vec![0xAB]),
            SpiTransaction::flush(),
            SpiTransaction::write_vec(vec![0xCD]),
            SpiTransaction::flush(),
        ]);
        let cs = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let busy = PinMock::new(&[]);
        let dc = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::High),
        ]);
        let rst = PinMock::new(&[]);

        let mut interface = DisplayInterface::new(spi, cs, busy, dc, rst, NoopDelay::new(), None);
        interface.send_data(0xAB).unwrap();
        interface.send_data(0xCD).unwrap();

        let (mut spi, mut cs, mut busy, mut dc, mut rst, _) = interface.release();
        spi.done();
        cs.done();
        busy.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn waits_until_busy_is_released() {
        let spi = SpiMock::new(&[]);
        let cs = PinMock::new(&[]);
        let busy = PinMock::new(&[
            PinTransaction::get(State::High),
            PinTransaction::get(State::High),
            PinTransaction::get(State::Low),
        ]);
        let dc = PinMock::new(&[]);
        let rst = PinMock::new(&[]);

        let mut interface =
            DisplayInterface::new(spi, cs, busy, dc, rst, NoopDelay::new(), Some(1));
        interface.wait_while_busy().unwrap();

        let (mut spi, mut cs, mut busy, mut dc, mut rst, _) = interface.release();
        spi.done();
        cs.done();
        busy.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn reset_pulses_low() {
        let spi = SpiMock::new(&[]);
        let cs = PinMock::new(&[]);
        let busy = PinMock::new(&[]);
        let dc = PinMock::new(&[]);
        let rst = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);

        let mut interface = DisplayInterface::new(spi, cs, busy, dc, rst, NoopDelay::new(), None);
        interface.reset().unwrap();

        let (mut spi, mut cs, mut busy, mut dc, mut rst, _) = interface.release();
        spi.done();
        cs.done();
        busy.done();
        dc.done();
        rst.done();
    }
}
