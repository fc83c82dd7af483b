//! Bitmap to panel buffer conversion
//!
//! The panels scan their RAM column-mirrored and in portrait order. Everything
//! in here maps between that native layout and the images applications draw.

use image::{imageops, DynamicImage, GrayImage, ImageBuffer, Luma, RgbImage, RgbaImage};

use crate::color::Color;
use crate::error::{Error, Result};

#[cfg(feature = "graphics")]
use embedded_graphics_core::{pixelcolor::BinaryColor, prelude::*};

/// Size of a panel in its native axis order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayGeometry {
    /// Native width in pixels (the short side on all supported panels)
    pub width: u32,
    /// Native height in pixels
    pub height: u32,
}

impl DisplayGeometry {
    /// Creates a geometry
    pub const fn new(width: u32, height: u32) -> Self {
        DisplayGeometry { width, height }
    }

    /// Number of pixels on the panel
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of a packed frame: one bit per pixel, rounded up to whole bytes
    pub const fn packed_len(&self) -> usize {
        (self.pixel_count() + 7) / 8
    }

    /// Size of a landscape ("horizontal") image for this panel
    pub const fn horizontal(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    /// The two image sizes the converter accepts, native order first
    pub const fn accepted_sizes(&self) -> [(u32, u32); 2] {
        [(self.width, self.height), (self.height, self.width)]
    }
}

/// How an image is placed on the panel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Shown as drawn
    #[default]
    Normal,
    /// Rotated by 180 degrees
    UpsideDown,
}

/// A frame in the panel's native layout, one bit per pixel, 1 is white
///
/// Bits are packed row-major and MSB first without padding between rows, so
/// the length is always `ceil(width * height / 8)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonochromeBuffer {
    geometry: DisplayGeometry,
    bytes: Vec<u8>,
}

impl MonochromeBuffer {
    /// Wraps raw packed bytes, checking that they cover the whole panel
    pub fn from_bytes(geometry: DisplayGeometry, bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != geometry.packed_len() {
            return Err(Error::BufferLength {
                expected: geometry.packed_len(),
                got: bytes.len(),
            });
        }
        Ok(MonochromeBuffer { geometry, bytes })
    }

    /// A frame where every pixel has the same color
    pub fn filled(geometry: DisplayGeometry, color: Color) -> Self {
        let mut bytes = vec![color.get_byte_value(); geometry.packed_len()];
        // keep the unused tail bits clear
        if let (Some(last), 1..) = (bytes.last_mut(), geometry.pixel_count() % 8) {
            *last &= 0xFF << (8 - geometry.pixel_count() % 8);
        }
        MonochromeBuffer { geometry, bytes }
    }

    /// Geometry the frame was packed for
    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// The packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of packed bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for a zero sized panel only
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Color of the pixel at native coordinates, `None` outside of the panel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        let index = y as usize * self.geometry.width as usize + x as usize;
        let bit = (self.bytes[index / 8] >> (7 - index % 8)) & 1;
        Some(if bit == 1 { Color::White } else { Color::Black })
    }

    /// Copies the frame into the controller RAM layout, where every row
    /// starts on a byte boundary
    pub fn to_ram_rows(&self) -> Vec<u8> {
        let DisplayGeometry { width, height } = self.geometry;
        if width % 8 == 0 {
            return self.bytes.clone();
        }
        let line = crate::buffer_len(width as usize, 1);
        let mut ram = vec![0u8; crate::buffer_len(width as usize, height as usize)];
        for y in 0..height {
            for x in 0..width {
                if self.pixel(x, y) == Some(Color::White) {
                    let index = y as usize * line + x as usize / 8;
                    ram[index] |= 0x80 >> (x % 8);
                }
            }
        }
        ram
    }
}

/// Anything that can be flattened to an 8 bit luma image
pub trait Bitmap {
    /// Returns a single channel copy of the image
    fn to_luma(&self) -> GrayImage;
}

impl Bitmap for DynamicImage {
    fn to_luma(&self) -> GrayImage {
        self.to_luma8()
    }
}

impl Bitmap for GrayImage {
    fn to_luma(&self) -> GrayImage {
        self.clone()
    }
}

impl Bitmap for RgbImage {
    fn to_luma(&self) -> GrayImage {
        imageops::grayscale(self)
    }
}

impl Bitmap for RgbaImage {
    fn to_luma(&self) -> GrayImage {
        imageops::grayscale(self)
    }
}

impl Bitmap for Canvas {
    fn to_luma(&self) -> GrayImage {
        self.image.clone()
    }
}

/// Converts an image of either orientation into a native panel frame
///
/// The image is reduced to black and white first (Floyd-Steinberg), then an
/// image in landscape order is turned into the panel's portrait order. The
/// panel scans its columns right to left, so the result is mirrored before
/// it is packed.
pub fn convert<B: Bitmap + ?Sized>(
    image: &B,
    geometry: DisplayGeometry,
    orientation: Orientation,
) -> Result<MonochromeBuffer> {
    let mut mono = image.to_luma();
    imageops::dither(&mut mono, &imageops::BiLevel);

    let got = mono.dimensions();
    let native = if got == geometry.horizontal() {
        // quarter turn counterclockwise, clockwise when upside down
        match orientation {
            Orientation::Normal => imageops::rotate270(&mono),
            Orientation::UpsideDown => imageops::rotate90(&mono),
        }
    } else if orientation == Orientation::UpsideDown {
        imageops::rotate180(&mono)
    } else {
        mono
    };

    if native.dimensions() != (geometry.width, geometry.height) {
        return Err(Error::DimensionMismatch {
            expected: geometry.accepted_sizes(),
            got,
        });
    }

    let mirrored = imageops::flip_horizontal(&native);
    Ok(pack(&mirrored, geometry))
}

fn pack(image: &GrayImage, geometry: DisplayGeometry) -> MonochromeBuffer {
    let mut bytes = vec![0u8; geometry.packed_len()];
    for (index, pixel) in image.pixels().enumerate() {
        if Color::from_luma(pixel.0[0]) == Color::White {
            bytes[index / 8] |= 0x80 >> (index % 8);
        }
    }
    MonochromeBuffer { geometry, bytes }
}

/// Turns a native frame back into the landscape image a panel shows for it
///
/// This is the inverse of [`convert`] with [`Orientation::Normal`] for
/// landscape images: undo the mirror, then a quarter turn back.
pub fn unpack(buffer: &MonochromeBuffer) -> GrayImage {
    let DisplayGeometry { width, height } = buffer.geometry();
    let native: GrayImage = ImageBuffer::from_fn(width, height, |x, y| {
        Luma([buffer.pixel(x, y).unwrap_or_default().luma()])
    });
    imageops::rotate90(&imageops::flip_horizontal(&native))
}

/// A black and white drawing surface sized for a panel
///
/// Returned by [`Epd::new_image`](crate::epd::Epd::new_image); draw on it with
/// `embedded-graphics` or through [`Canvas::image_mut`] and hand it back to
/// the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: GrayImage,
}

impl Canvas {
    /// Creates a canvas filled with one color
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Canvas {
            image: ImageBuffer::from_pixel(width, height, Luma([fill.luma()])),
        }
    }

    /// Width of the canvas in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the canvas in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Sets a pixel, out of range coordinates are ignored
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, Luma([color.luma()]));
        }
    }

    /// Color of a pixel, `None` outside of the canvas
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.image
            .get_pixel_checked(x, y)
            .map(|pixel| Color::from_luma(pixel.0[0]))
    }

    /// The underlying luma image
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Mutable access for `image`/`imageproc` style drawing
    pub fn image_mut(&mut self) -> &mut GrayImage {
        &mut self.image
    }

    /// Gives up the canvas and returns its image
    pub fn into_image(self) -> DynamicImage {
        DynamicImage::ImageLuma8(self.image)
    }
}

/// For use with embedded_grahics
#[cfg(feature = "graphics")]
impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set(x, y, color.into());
            }
        }
        Ok(())
    }
}

/// For use with embedded_grahics
#[cfg(feature = "graphics")]
impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOMETRY: DisplayGeometry = DisplayGeometry::new(122, 250);

    fn native_grid(buffer: &MonochromeBuffer) -> Vec<Vec<Color>> {
        let g = buffer.geometry();
        (0..g.height)
            .map(|y| (0..g.width).filter_map(|x| buffer.pixel(x, y)).collect())
            .collect()
    }

    #[test]
    fn packed_length_for_both_orientations() {
        for &(w, h) in &[(122u32, 250u32), (128, 296), (200, 200), (13, 7)] {
            let geometry = DisplayGeometry::new(w, h);
            let expected = ((w * h + 7) / 8) as usize;
            for &(iw, ih) in &geometry.accepted_sizes() {
                let canvas = Canvas::new(iw, ih, Color::White);
                let buffer = convert(&canvas, geometry, Orientation::Normal).unwrap();
                assert_eq!(buffer.len(), expected);
            }
        }
    }

    #[test]
    fn orthogonal_image_is_rotated_into_native_order() {
        let canvas = Canvas::new(250, 122, Color::White);
        let buffer = convert(&canvas, GEOMETRY, Orientation::Normal).unwrap();
        assert_eq!(buffer.len(), 3813);
        assert_eq!(buffer.geometry(), GEOMETRY);
    }

    #[test]
    fn wrong_size_is_rejected() {
        let canvas = Canvas::new(100, 100, Color::White);
        match convert(&canvas, GEOMETRY, Orientation::Normal) {
            Err(Error::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, [(122, 250), (250, 122)]);
                assert_eq!(got, (100, 100));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn white_is_one_and_black_is_zero() {
        let geometry = DisplayGeometry::new(8, 2);
        let white = convert(&Canvas::new(8, 2, Color::White), geometry, Orientation::Normal);
        assert_eq!(white.unwrap().as_bytes(), &[0xFF, 0xFF]);
        let black = convert(&Canvas::new(8, 2, Color::Black), geometry, Orientation::Normal);
        assert_eq!(black.unwrap().as_bytes(), &[0x00, 0x00]);
    }

    #[test]
    fn native_image_is_mirrored() {
        let geometry = DisplayGeometry::new(8, 2);
        let mut canvas = Canvas::new(8, 2, Color::White);
        // left most pixel of the first row
        canvas.set(0, 0, Color::Black);
        let buffer = convert(&canvas, geometry, Orientation::Normal).unwrap();
        assert_eq!(buffer.as_bytes(), &[0b1111_1110, 0xFF]);
    }

    #[test]
    fn upside_down_is_a_half_turn() {
        let mut canvas = Canvas::new(250, 122, Color::White);
        for x in 10..40 {
            canvas.set(x, 3, Color::Black);
        }
        canvas.set(249, 121, Color::Black);
        canvas.set(0, 60, Color::Black);

        let normal = native_grid(&convert(&canvas, GEOMETRY, Orientation::Normal).unwrap());
        let flipped = native_grid(&convert(&canvas, GEOMETRY, Orientation::UpsideDown).unwrap());

        let (w, h) = (GEOMETRY.width as usize, GEOMETRY.height as usize);
        for y in 0..h {
            for x in 0..w {
                assert_eq!(normal[y][x], flipped[h - 1 - y][w - 1 - x]);
            }
        }
    }

    #[test]
    fn upside_down_native_image_is_a_half_turn() {
        let geometry = DisplayGeometry::new(16, 24);
        let mut canvas = Canvas::new(16, 24, Color::White);
        canvas.set(1, 2, Color::Black);
        canvas.set(15, 0, Color::Black);

        let normal = native_grid(&convert(&canvas, geometry, Orientation::Normal).unwrap());
        let flipped = native_grid(&convert(&canvas, geometry, Orientation::UpsideDown).unwrap());
        for y in 0..24 {
            for x in 0..16 {
                assert_eq!(normal[y][x], flipped[23 - y][15 - x]);
            }
        }
    }

    #[test]
    fn unpack_restores_landscape_image() {
        let mut canvas = Canvas::new(250, 122, Color::White);
        canvas.set(0, 0, Color::Black);
        canvas.set(200, 17, Color::Black);
        canvas.set(249, 121, Color::Black);

        let buffer = convert(&canvas, GEOMETRY, Orientation::Normal).unwrap();
        let shown = unpack(&buffer);
        assert_eq!(shown.dimensions(), (250, 122));
        for (x, y, pixel) in shown.enumerate_pixels() {
            assert_eq!(Color::from_luma(pixel.0[0]), canvas.get(x, y).unwrap());
        }
    }

    #[test]
    fn gray_input_is_reduced_to_two_levels() {
        let gray: GrayImage = ImageBuffer::from_pixel(16, 8, Luma([128]));
        let buffer = convert(&gray, DisplayGeometry::new(16, 8), Orientation::Normal).unwrap();
        let black = (0..8)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| buffer.pixel(x, y) == Some(Color::Black))
            .count();
        // dithering a mid gray leaves both colors on the panel
        assert!(black > 0 && black < 128);
    }

    #[test]
    fn from_bytes_checks_length() {
        let geometry = DisplayGeometry::new(8, 3);
        assert!(MonochromeBuffer::from_bytes(geometry, vec![0; 3]).is_ok());
        assert!(matches!(
            MonochromeBuffer::from_bytes(geometry, vec![0; 4]),
            Err(Error::BufferLength {
                expected: 3,
                got: 4
            })
        ));
    }

    #[test]
    fn filled_buffer_matches_converted_canvas() {
        let canvas = Canvas::new(250, 122, Color::White);
        let converted = convert(&canvas, GEOMETRY, Orientation::Normal).unwrap();
        assert_eq!(converted, MonochromeBuffer::filled(GEOMETRY, Color::White));
    }

    #[test]
    fn pixel_outside_of_the_panel() {
        let buffer = MonochromeBuffer::filled(DisplayGeometry::new(10, 2), Color::Black);
        assert_eq!(buffer.pixel(9, 1), Some(Color::Black));
        assert_eq!(buffer.pixel(10, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
    }

    #[test]
    fn ram_rows_are_byte_aligned() {
        let geometry = DisplayGeometry::new(10, 2);
        let buffer = MonochromeBuffer::filled(geometry, Color::White);
        assert_eq!(buffer.as_bytes(), &[0xFF, 0xFF, 0xF0]);
        assert_eq!(buffer.to_ram_rows(), vec![0xFF, 0xC0, 0xFF, 0xC0]);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn canvas_is_a_draw_target() {
        use embedded_graphics::{
            prelude::*,
            primitives::{Line, PrimitiveStyle},
        };

        let mut canvas = Canvas::new(250, 122, Color::White);
        let _ = Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas);

        for x in 0..8 {
            assert_eq!(canvas.get(x, 0), Some(Color::Black));
        }
        assert_eq!(canvas.get(8, 0), Some(Color::White));
        assert_eq!(canvas.size(), Size::new(250, 122));
    }
}
