//! Software stand-in for a panel
//!
//! Partial refreshes on real e-paper leave a grey trace where dark pixels
//! turned white. The engine keeps a per pixel [`GhostLevel`] and walks it up a
//! fixed ladder on every white write, so the emulated panel fades the way the
//! hardware does. Each render also takes at least as long as a real refresh.

use std::thread;
use std::time::{Duration, Instant};

use image::GrayImage;
use log::{trace, warn};

use crate::color::Color;
use crate::error::Result;
use crate::graphics::{unpack, DisplayGeometry, MonochromeBuffer};

mod surface;
pub use self::surface::FrameSurface;

#[cfg(feature = "simulator")]
mod window;
#[cfg(feature = "simulator")]
pub use self::window::WindowSurface;

/// Surface the emulated panel opens when none is given explicitly
#[cfg(feature = "simulator")]
pub type DefaultSurface = WindowSurface;
/// Surface the emulated panel opens when none is given explicitly
#[cfg(not(feature = "simulator"))]
pub type DefaultSurface = FrameSurface;

/// Minimum duration of one emulated write
pub const DEFAULT_LATENCY: Duration = Duration::from_secs(1);

/// Brightness of an emulated pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GhostLevel {
    /// Freshly written black
    Black,
    /// First white write after black
    Dark,
    /// Second white write after black
    Light,
    /// Fully cleared
    #[default]
    White,
}

impl GhostLevel {
    /// The level after one more white write
    pub fn brighten(self) -> Self {
        match self {
            GhostLevel::Black => GhostLevel::Dark,
            GhostLevel::Dark => GhostLevel::Light,
            GhostLevel::Light | GhostLevel::White => GhostLevel::White,
        }
    }

    /// The level after writing `color` onto this pixel
    pub fn after(self, color: Color) -> Self {
        match color {
            Color::Black => GhostLevel::Black,
            Color::White => self.brighten(),
        }
    }

    /// Gray value shown for the level
    pub fn luma(self) -> u8 {
        match self {
            GhostLevel::Black => 0,
            GhostLevel::Dark => 180,
            GhostLevel::Light => 220,
            GhostLevel::White => 255,
        }
    }
}

/// Ghost levels of every pixel on the visible panel
///
/// The grid is laid out the way the panel is looked at (landscape), so it is
/// `height` pixels wide and `width` pixels high for a native geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostGrid {
    width: u32,
    height: u32,
    levels: Vec<GhostLevel>,
}

impl GhostGrid {
    /// A fully white grid for the given panel
    pub fn new(geometry: DisplayGeometry) -> Self {
        let (width, height) = geometry.horizontal();
        GhostGrid {
            width,
            height,
            levels: vec![GhostLevel::White; geometry.pixel_count()],
        }
    }

    /// Width of the visible grid
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the visible grid
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Level of one visible pixel
    pub fn level(&self, x: u32, y: u32) -> GhostLevel {
        self.levels[(y * self.width + x) as usize]
    }

    /// Applies a black and white frame in visible order
    pub fn apply(&mut self, frame: &GrayImage) {
        debug_assert_eq!(frame.dimensions(), (self.width, self.height));
        for (level, pixel) in self.levels.iter_mut().zip(frame.pixels()) {
            *level = level.after(Color::from_luma(pixel.0[0]));
        }
    }
}

/// A 2D raster the emulator draws on
pub trait RenderSurface {
    /// Sets the gray value of one pixel, shown on the next refresh
    fn set_pixel(&mut self, x: u32, y: u32, luma: u8);

    /// Makes all pixels set so far visible
    fn refresh(&mut self) -> Result<()>;
}

/// Renders packed frames with ghosting onto a [`RenderSurface`]
#[derive(Debug)]
pub struct EmulationEngine<S> {
    surface: S,
    grid: GhostGrid,
    geometry: DisplayGeometry,
    latency: Duration,
}

impl<S: RenderSurface> EmulationEngine<S> {
    /// Creates an engine with a white panel and the default latency
    pub fn new(surface: S, geometry: DisplayGeometry) -> Self {
        EmulationEngine {
            surface,
            grid: GhostGrid::new(geometry),
            geometry,
            latency: DEFAULT_LATENCY,
        }
    }

    /// Changes the minimum duration of a render
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Geometry of the emulated panel
    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// Current ghost levels
    pub fn grid(&self) -> &GhostGrid {
        &self.grid
    }

    /// The surface frames are rendered on
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Shows a frame and blocks until the emulated refresh is over
    pub fn render(&mut self, buffer: &MonochromeBuffer) -> Result<()> {
        let started = Instant::now();

        self.grid.apply(&unpack(buffer));
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                self.surface.set_pixel(x, y, self.grid.level(x, y).luma());
            }
        }
        self.surface.refresh()?;

        let elapsed = started.elapsed();
        match self.latency.checked_sub(elapsed) {
            Some(remaining) => {
                trace!("frame rendered in {elapsed:?}, waiting {remaining:?}");
                thread::sleep(remaining);
            }
            None if !self.latency.is_zero() => {
                warn!(
                    "emulated write took {elapsed:?}, longer than {:?}",
                    self.latency
                );
            }
            None => {}
        }
        Ok(())
    }
}
