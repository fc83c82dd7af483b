use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma};

use super::RenderSurface;
use crate::error::Result;
use crate::graphics::DisplayGeometry;

/// An off-screen surface that keeps the last shown frame
///
/// Used when no window can be opened and in tests.
#[derive(Debug, Clone)]
pub struct FrameSurface {
    pending: GrayImage,
    frame: GrayImage,
    refresh_count: usize,
}

impl FrameSurface {
    /// A white surface in landscape order for the given panel
    pub fn new(geometry: DisplayGeometry) -> Self {
        let (width, height) = geometry.horizontal();
        let white: GrayImage = ImageBuffer::from_pixel(width, height, Luma([255]));
        FrameSurface {
            pending: white.clone(),
            frame: white,
            refresh_count: 0,
        }
    }

    /// The frame shown by the last refresh
    pub fn frame(&self) -> &GrayImage {
        &self.frame
    }

    /// How many frames were shown so far
    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }

    /// Writes the shown frame to a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.frame.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

impl RenderSurface for FrameSurface {
    fn set_pixel(&mut self, x: u32, y: u32, luma: u8) {
        if x < self.pending.width() && y < self.pending.height() {
            self.pending.put_pixel(x, y, Luma([luma]));
        }
    }

    fn refresh(&mut self) -> Result<()> {
        self.frame.clone_from(&self.pending);
        self.refresh_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_show_after_refresh() {
        let mut surface = FrameSurface::new(DisplayGeometry::new(4, 8));
        assert_eq!(surface.frame().dimensions(), (8, 4));

        surface.set_pixel(1, 2, 180);
        assert_eq!(surface.frame().get_pixel(1, 2).0[0], 255);

        surface.refresh().unwrap();
        assert_eq!(surface.frame().get_pixel(1, 2).0[0], 180);
        assert_eq!(surface.refresh_count(), 1);
    }

    #[test]
    fn snapshot_is_written() {
        let mut surface = FrameSurface::new(DisplayGeometry::new(4, 8));
        surface.set_pixel(0, 0, 0);
        surface.refresh().unwrap();

        let path = std::env::temp_dir().join(format!("easy-epd-{}.png", std::process::id()));
        surface.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap().to_luma8();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.dimensions(), (8, 4));
        assert_eq!(loaded.get_pixel(0, 0).0[0], 0);
    }
}
