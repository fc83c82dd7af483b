use embedded_graphics_core::{
    pixelcolor::Gray8,
    prelude::{DrawTarget, GrayColor, OriginDimensions, Point, Size},
    Pixel,
};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::info;

use super::RenderSurface;
use crate::error::{Error, Result};
use crate::graphics::DisplayGeometry;

/// A desktop window showing the emulated panel
///
/// Closing the window makes the next refresh fail with
/// [`Error::SurfaceClosed`].
pub struct WindowSurface {
    display: SimulatorDisplay<Gray8>,
    window: Window,
    closed: bool,
}

impl WindowSurface {
    /// Opens a window titled `title`, `scale` screen pixels per panel pixel
    pub fn new(title: &str, geometry: DisplayGeometry, scale: u32) -> Self {
        let (width, height) = geometry.horizontal();
        let mut display = SimulatorDisplay::new(Size::new(width, height));
        let _ = display.clear(Gray8::WHITE);

        let output_settings = OutputSettingsBuilder::new().scale(scale.max(1)).build();
        let window = Window::new(title, &output_settings);
        info!("emulating {title} in a {width}x{height} window");

        WindowSurface {
            display,
            window,
            closed: false,
        }
    }
}

impl RenderSurface for WindowSurface {
    fn set_pixel(&mut self, x: u32, y: u32, luma: u8) {
        let point = Point::new(x as i32, y as i32);
        let _ = self.display.draw_iter([Pixel(point, Gray8::new(luma))]);
    }

    fn refresh(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::SurfaceClosed);
        }
        self.window.update(&self.display);
        if self
            .window
            .events()
            .any(|event| matches!(event, SimulatorEvent::Quit))
        {
            self.closed = true;
            return Err(Error::SurfaceClosed);
        }
        Ok(())
    }
}

impl core::fmt::Debug for WindowSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowSurface")
            .field("size", &self.display.size())
            .field("closed", &self.closed)
            .finish()
    }
}
