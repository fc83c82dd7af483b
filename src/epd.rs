//! The facade applications talk to
//!
//! # Example
//!
//!```rust, no_run
//!# fn main() -> Result<(), easy_epd::error::Error> {
//!use easy_epd::prelude::*;
//!
//!// real panel if one is wired up, emulator window otherwise
//!let mut epd = Epd::open("epd2in13_V2", Config::from_env())?;
//!
//!let mut image = epd.new_image(true, 255);
//!image.set(10, 10, Color::Black);
//!
//!// write twice to get rid of most of the ghosting
//!epd.display_image(&image, 2, Orientation::Normal)?;
//!
//!epd.sleep()?;
//!# Ok(())
//!# }
//!```

use log::debug;

use crate::cache::{WriteCache, WriteOutcome};
use crate::color::Color;
use crate::config::Config;
use crate::emulator::{EmulationEngine, RenderSurface};
use crate::error::{Error, Result};
use crate::graphics::{convert, Bitmap, Canvas, DisplayGeometry, MonochromeBuffer, Orientation};
use crate::panel::Panel;
use crate::platform;
use crate::sink::{AutoSink, EmulatedSink};
use crate::traits::{PanelDriver, Sink, UpdateMode};

/// Lifecycle of a facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacadeState {
    /// Nothing was sent yet
    #[default]
    Uninitialized,
    /// [`Epd::init`] ran at least once
    Initialized,
    /// At least one frame went out
    Active,
}

/// An e-paper panel, real or emulated
///
/// Owns the sink exclusively, only one facade may drive a panel at a time.
#[derive(Debug)]
pub struct Epd<S> {
    sink: S,
    cache: WriteCache,
    state: FacadeState,
}

impl<S: Sink> Epd<S> {
    /// Wraps an already opened sink
    pub fn new(sink: S) -> Self {
        Epd {
            sink,
            cache: WriteCache::new(),
            state: FacadeState::Uninitialized,
        }
    }

    /// Native panel geometry
    pub fn geometry(&self) -> DisplayGeometry {
        self.sink.geometry()
    }

    /// Panel width in pixels
    pub fn width(&self) -> u32 {
        self.geometry().width
    }

    /// Panel height in pixels
    pub fn height(&self) -> u32 {
        self.geometry().height
    }

    /// Where the facade is in its lifecycle
    pub fn state(&self) -> FacadeState {
        self.state
    }

    /// The sink frames are written to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Gives back the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Prepares the panel for full or partial refreshes
    ///
    /// An emulated panel has nothing to set up and is cleared to white instead.
    pub fn init(&mut self, mode: UpdateMode) -> Result<()> {
        self.sink.init(mode)?;
        if self.state == FacadeState::Uninitialized {
            self.state = FacadeState::Initialized;
        }
        debug!("panel initialised for {mode:?} updates");
        self.wipe_if_needed()
    }

    fn wipe_if_needed(&mut self) -> Result<()> {
        if self.sink.wipes_on_init() {
            self.clear(255)?;
        }
        Ok(())
    }

    /// A blank canvas sized for the panel
    ///
    /// `horizontal` gives a landscape canvas (`height` x `width`), otherwise
    /// it is in native order. A `fill` of 0 is black, anything else white.
    pub fn new_image(&self, horizontal: bool, fill: u8) -> Canvas {
        let geometry = self.geometry();
        let (width, height) = if horizontal {
            geometry.horizontal()
        } else {
            (geometry.width, geometry.height)
        };
        Canvas::new(width, height, Color::from_fill(fill))
    }

    /// Converts an image into a frame for this panel
    pub fn get_buffer<B: Bitmap + ?Sized>(
        &self,
        image: &B,
        orientation: Orientation,
    ) -> Result<MonochromeBuffer> {
        convert(image, self.geometry(), orientation)
    }

    /// Writes a frame with a partial refresh, unless it already went out
    /// often enough in a row
    pub fn display_partial(&mut self, buffer: &MonochromeBuffer) -> Result<WriteOutcome> {
        let geometry = self.geometry();
        if buffer.geometry() != geometry {
            return Err(Error::DimensionMismatch {
                expected: geometry.accepted_sizes(),
                got: (buffer.geometry().width, buffer.geometry().height),
            });
        }

        let outcome = self.cache.write(buffer, &mut self.sink)?;
        if outcome == WriteOutcome::Written {
            self.state = FacadeState::Active;
        }
        Ok(outcome)
    }

    /// Same as [`display_partial`](Self::display_partial)
    pub fn display_part_base_image(&mut self, buffer: &MonochromeBuffer) -> Result<WriteOutcome> {
        self.display_partial(buffer)
    }

    /// Converts `image` once and writes it `repeat` times
    ///
    /// Every write takes about a second. Repeats wipe out the ghosting of the
    /// previous image, more than three are suppressed by the write cache.
    /// Returns how many writes actually went out.
    pub fn display_image<B: Bitmap + ?Sized>(
        &mut self,
        image: &B,
        repeat: u32,
        orientation: Orientation,
    ) -> Result<usize> {
        let buffer = self.get_buffer(image, orientation)?;
        let mut written = 0;
        for _ in 0..repeat {
            if self.display_partial(&buffer)? == WriteOutcome::Written {
                written += 1;
            }
        }
        Ok(written)
    }

    /// [`display_image`](Self::display_image) with a single write in normal
    /// orientation
    pub fn display<B: Bitmap + ?Sized>(&mut self, image: &B) -> Result<usize> {
        self.display_image(image, 1, Orientation::Normal)
    }

    /// Fills the panel with one color, 0 is black, anything else white
    pub fn clear(&mut self, fill: u8) -> Result<usize> {
        let image = self.new_image(true, fill);
        self.display(&image)
    }

    /// Resets the panel
    ///
    /// Wakes a real panel up from deep sleep, an emulated one is cleared.
    pub fn reset(&mut self) -> Result<()> {
        self.sink.reset()?;
        self.wipe_if_needed()
    }

    /// Puts the panel into deep sleep, call [`init`](Self::init) to wake it up
    pub fn sleep(&mut self) -> Result<()> {
        self.sink.sleep()
    }

    /// Runs a full refresh of what is in the panel RAM
    pub fn turn_on_display(&mut self) -> Result<()> {
        self.sink.turn_on_display()
    }

    /// Runs a partial refresh of what is in the panel RAM
    pub fn turn_on_display_part(&mut self) -> Result<()> {
        self.sink.turn_on_display_part()
    }
}

impl<S: RenderSurface> Epd<EmulatedSink<S>> {
    /// An emulated panel drawing on `surface`
    pub fn emulated(panel: Panel, surface: S, config: &Config) -> Self {
        let engine =
            EmulationEngine::new(surface, panel.geometry()).with_latency(config.emulated_latency);
        Epd::new(EmulatedSink::new(engine))
    }
}

impl Epd<AutoSink> {
    /// Opens the panel with the vendor driver name `name`, e.g. `epd2in13_V2`
    ///
    /// Drives the panel on the SPI bus when one is found, emulates it
    /// otherwise. The choice holds for the lifetime of the facade. On hardware
    /// the full and then the partial init run right away unless
    /// [`Config::auto_init`] is off.
    pub fn open(name: &str, config: Config) -> Result<Self> {
        let panel: Panel = name.parse()?;
        let hardware = platform::hardware_present(&config);
        platform::log_backend(panel.name(), hardware);

        #[cfg(all(target_os = "linux", feature = "linux"))]
        if hardware {
            return Self::open_hardware(panel, &config);
        }

        let surface = open_surface(panel, &config);
        let engine =
            EmulationEngine::new(surface, panel.geometry()).with_latency(config.emulated_latency);
        Ok(Epd::new(AutoSink::Emulated(EmulatedSink::new(engine))))
    }

    #[cfg(all(target_os = "linux", feature = "linux"))]
    fn open_hardware(panel: Panel, config: &Config) -> Result<Self> {
        use crate::sink::HardwareSink;

        let transport = platform::open_transport(config)?;
        let mut epd = Epd::new(AutoSink::Hardware(HardwareSink::new(transport, panel)));
        if config.auto_init {
            epd.init(UpdateMode::Full)?;
            epd.init(UpdateMode::Partial)?;
            log::info!("{} ready for partial updates", panel.name());
        }
        Ok(epd)
    }
}

#[cfg(feature = "simulator")]
fn open_surface(panel: Panel, config: &Config) -> crate::emulator::DefaultSurface {
    crate::emulator::WindowSurface::new(panel.name(), panel.geometry(), config.window_scale)
}

#[cfg(not(feature = "simulator"))]
fn open_surface(panel: Panel, _config: &Config) -> crate::emulator::DefaultSurface {
    log::info!("simulator feature is off, frames are kept off-screen");
    crate::emulator::FrameSurface::new(panel.geometry())
}
