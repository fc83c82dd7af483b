//! The two places a packed frame can go

use log::debug;

use crate::emulator::{EmulationEngine, RenderSurface};
use crate::error::Result;
use crate::graphics::{DisplayGeometry, MonochromeBuffer};
use crate::panel::Panel;
use crate::traits::{HardwareTransport, PanelDriver, Sink, UpdateMode};

/// A real panel behind a [`HardwareTransport`]
#[derive(Debug)]
pub struct HardwareSink<T, P = Panel> {
    transport: T,
    panel: P,
}

impl<T: HardwareTransport, P: PanelDriver> HardwareSink<T, P> {
    /// Pairs a transport with the driver of the panel it is wired to
    pub fn new(transport: T, panel: P) -> Self {
        HardwareSink { transport, panel }
    }

    /// The panel driver
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Gives back the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Writes `bytes` after a plane command, one framed transfer per byte
    fn write_plane(
        &mut self,
        command: u8,
        bytes: impl Iterator<Item = u8>,
    ) -> Result<()> {
        self.transport.send_command(command)?;
        for byte in bytes {
            self.transport.send_data(byte)?;
        }
        Ok(())
    }
}

impl<T: HardwareTransport, P: PanelDriver> Sink for HardwareSink<T, P> {
    fn geometry(&self) -> DisplayGeometry {
        self.panel.geometry()
    }

    /// Sends the frame to the black RAM, its complement to the red RAM and
    /// runs the partial refresh
    fn write(&mut self, buffer: &MonochromeBuffer) -> Result<()> {
        let ram = buffer.to_ram_rows();
        let black = self.panel.black_plane_command();
        let red = self.panel.red_plane_command();

        self.write_plane(black, ram.iter().copied())?;
        self.write_plane(red, ram.iter().map(|byte| !byte))?;
        self.panel.turn_on_display_part(&mut self.transport)?;
        debug!("sent {} bytes per plane", ram.len());
        Ok(())
    }

    fn init(&mut self, mode: UpdateMode) -> Result<()> {
        self.panel.init(&mut self.transport, mode)?;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.transport.reset()?;
        Ok(())
    }

    fn sleep(&mut self) -> Result<()> {
        self.panel.sleep(&mut self.transport)?;
        Ok(())
    }

    fn turn_on_display(&mut self) -> Result<()> {
        self.panel.turn_on_display(&mut self.transport)?;
        Ok(())
    }

    fn turn_on_display_part(&mut self) -> Result<()> {
        self.panel.turn_on_display_part(&mut self.transport)?;
        Ok(())
    }
}

/// A panel emulated on a [`RenderSurface`]
#[derive(Debug)]
pub struct EmulatedSink<S> {
    engine: EmulationEngine<S>,
}

impl<S: RenderSurface> EmulatedSink<S> {
    /// Wraps an engine
    pub fn new(engine: EmulationEngine<S>) -> Self {
        EmulatedSink { engine }
    }

    /// The engine doing the rendering
    pub fn engine(&self) -> &EmulationEngine<S> {
        &self.engine
    }
}

impl<S: RenderSurface> Sink for EmulatedSink<S> {
    fn geometry(&self) -> DisplayGeometry {
        self.engine.geometry()
    }

    fn write(&mut self, buffer: &MonochromeBuffer) -> Result<()> {
        self.engine.render(buffer)
    }

    /// There is no controller to set up
    fn init(&mut self, _mode: UpdateMode) -> Result<()> {
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// The emulated panel is cleared instead of initialised
    fn wipes_on_init(&self) -> bool {
        true
    }
}

/// The sink picked by [`Epd::open`](crate::epd::Epd::open)
pub enum AutoSink {
    /// A panel wired to this board
    #[cfg(all(target_os = "linux", feature = "linux"))]
    Hardware(HardwareSink<crate::platform::LinuxTransport>),
    /// No panel found, shown by the emulator
    Emulated(EmulatedSink<crate::emulator::DefaultSurface>),
}

impl AutoSink {
    /// `true` when frames go to a real panel
    pub fn is_hardware(&self) -> bool {
        !matches!(self, AutoSink::Emulated(_))
    }
}

macro_rules! dispatch {
    ($self:ident, $sink:ident => $call:expr) => {
        match $self {
            #[cfg(all(target_os = "linux", feature = "linux"))]
            AutoSink::Hardware($sink) => $call,
            AutoSink::Emulated($sink) => $call,
        }
    };
}

impl Sink for AutoSink {
    fn geometry(&self) -> DisplayGeometry {
        dispatch!(self, sink => sink.geometry())
    }

    fn write(&mut self, buffer: &MonochromeBuffer) -> Result<()> {
        dispatch!(self, sink => sink.write(buffer))
    }

    fn init(&mut self, mode: UpdateMode) -> Result<()> {
        dispatch!(self, sink => sink.init(mode))
    }

    fn reset(&mut self) -> Result<()> {
        dispatch!(self, sink => sink.reset())
    }

    fn wipes_on_init(&self) -> bool {
        dispatch!(self, sink => sink.wipes_on_init())
    }

    fn sleep(&mut self) -> Result<()> {
        dispatch!(self, sink => sink.sleep())
    }

    fn turn_on_display(&mut self) -> Result<()> {
        dispatch!(self, sink => sink.turn_on_display())
    }

    fn turn_on_display_part(&mut self) -> Result<()> {
        dispatch!(self, sink => sink.turn_on_display_part())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::emulator::FrameSurface;
    use crate::epd2in13_v2::Epd2in13;
    use crate::interface::recording::{Op, RecordingTransport};
    use std::time::Duration;

    #[test]
    fn hardware_write_sends_both_planes() {
        let geometry = DisplayGeometry::new(8, 2);
        let mut bytes = vec![0u8; 2];
        bytes[0] = 0b1010_0000;
        let buffer = MonochromeBuffer::from_bytes(geometry, bytes).unwrap();

        // byte aligned rows go out unchanged
        let panel: Panel = "epd2in9_V2".parse().unwrap();
        let mut sink = HardwareSink::new(RecordingTransport::default(), panel);
        sink.write(&buffer).unwrap();

        let transport = sink.release();
        assert_eq!(
            &transport.ops[..8],
            &[
                Op::Command(0x24),
                Op::Data(0b1010_0000),
                Op::Data(0x00),
                Op::Command(0x26),
                Op::Data(0b0101_1111),
                Op::Data(0xFF),
                Op::Command(0x22),
                Op::Data(0x0F),
            ]
        );
        assert_eq!(&transport.ops[8..], &[Op::Command(0x20), Op::WaitBusy]);
    }

    #[test]
    fn hardware_rows_are_padded_for_odd_widths() {
        let geometry = DisplayGeometry::new(122, 250);
        let buffer = MonochromeBuffer::filled(geometry, Color::White);
        let mut sink = HardwareSink::new(RecordingTransport::default(), Epd2in13::new());
        sink.write(&buffer).unwrap();

        let transport = sink.release();
        let black = transport.data_of(0x24).remove(0);
        let red = transport.data_of(0x26).remove(0);
        assert_eq!(black.len(), 4000);
        assert_eq!(red.len(), 4000);
        // 122 pixels fill 15 bytes and two bits of the 16th
        assert_eq!(&black[14..17], &[0xFF, 0xC0, 0xFF]);
        assert_eq!(&red[14..17], &[0x00, 0x3F, 0x00]);
        assert_eq!(transport.data_of(0x22), vec![vec![0x0C]]);
    }

    #[test]
    fn transport_errors_surface() {
        let panel: Panel = "epd1in54_V2".parse().unwrap();
        let buffer = MonochromeBuffer::filled(panel.geometry(), Color::Black);
        let mut sink = HardwareSink::new(RecordingTransport::failing_after(10), panel);
        assert!(matches!(
            sink.write(&buffer),
            Err(crate::error::Error::Interface(_))
        ));
    }

    #[test]
    fn emulated_sink_leaves_the_wipe_to_the_caller() {
        let geometry = DisplayGeometry::new(8, 16);
        let engine = EmulationEngine::new(FrameSurface::new(geometry), geometry)
            .with_latency(Duration::ZERO);
        let mut sink = EmulatedSink::new(engine);
        assert!(sink.wipes_on_init());

        sink.write(&MonochromeBuffer::filled(geometry, Color::Black))
            .unwrap();
        sink.init(UpdateMode::Full).unwrap();
        sink.reset().unwrap();
        assert_eq!(sink.engine().grid().level(0, 0).luma(), 0);

        // no controller to talk to
        sink.sleep().unwrap();
        sink.turn_on_display().unwrap();
        assert_eq!(sink.engine().surface().refresh_count(), 1);
    }

    #[test]
    fn hardware_sink_is_not_wiped() {
        let sink = HardwareSink::new(RecordingTransport::default(), Epd2in13::new());
        assert!(!sink.wipes_on_init());
    }
}
