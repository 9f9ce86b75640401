//! Monochrome frame buffer in SSD1306 page layout.
//!
//! Every screen is drawn into this RAM buffer with `embedded-graphics`; a
//! [`FrameSink`](crate::hw::FrameSink) then pushes the pages to the panel.
//! Each byte is one 8-pixel-tall column slice of a page, LSB at the top.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::{DISPLAY_BUFFER_SIZE, SCREEN_HEIGHT, SCREEN_PAGES, SCREEN_WIDTH};

pub struct FrameBuffer {
    bytes: [u8; DISPLAY_BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    pub fn clear_all(&mut self) {
        self.bytes.fill(0);
    }

    /// Whether the pixel at (x, y) is lit. Out-of-range coordinates are dark.
    pub fn is_lit(&self, x: i32, y: i32) -> bool {
        match Self::locate(x, y) {
            Some((idx, bit)) => self.bytes[idx] & bit != 0,
            None => false,
        }
    }

    /// Number of lit pixels inside the column range `[x0, x1)`.
    pub fn lit_in_columns(&self, x0: i32, x1: i32) -> usize {
        (x0..x1)
            .flat_map(|x| (0..SCREEN_HEIGHT as i32).map(move |y| (x, y)))
            .filter(|&(x, y)| self.is_lit(x, y))
            .count()
    }

    /// One page (8 pixel rows) of column bytes, ready for a GDDRAM write.
    pub fn page(&self, page: usize) -> &[u8] {
        let width = SCREEN_WIDTH as usize;
        &self.bytes[page * width..(page + 1) * width]
    }

    pub fn pages(&self) -> impl Iterator<Item = &[u8]> {
        (0..SCREEN_PAGES).map(move |p| self.page(p))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= SCREEN_WIDTH as i32 || y >= SCREEN_HEIGHT as i32 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((x + (y / 8) * SCREEN_WIDTH as usize, 1 << (y % 8)))
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // Text scrolled partly off-screen lands here with negative x; clip it.
        for Pixel(point, color) in pixels {
            if let Some((idx, bit)) = Self::locate(point.x, point.y) {
                match color {
                    BinaryColor::On => self.bytes[idx] |= bit,
                    BinaryColor::Off => self.bytes[idx] &= !bit,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn pixel_lands_in_page_layout() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(3, 10), BinaryColor::On).draw(&mut fb).unwrap();

        // y=10 is page 1, bit 2
        assert_eq!(fb.page(1)[3], 0b0000_0100);
        assert!(fb.is_lit(3, 10));
        assert!(!fb.is_lit(3, 9));
    }

    #[test]
    fn off_screen_pixels_are_clipped() {
        let mut fb = FrameBuffer::new();
        Rectangle::new(Point::new(-10, -10), Size::new(100, 100))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();

        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
        assert!(!fb.is_lit(-1, 0));
        assert!(!fb.is_lit(SCREEN_WIDTH as i32, 0));
    }

    #[test]
    fn clear_all_darkens_everything() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut fb).unwrap();
        fb.clear_all();
        assert_eq!(fb.lit_in_columns(0, SCREEN_WIDTH as i32), 0);
    }

    #[test]
    fn pages_cover_whole_height() {
        let fb = FrameBuffer::new();
        assert_eq!(fb.pages().count(), 5);
        assert!(fb.pages().all(|p| p.len() == SCREEN_WIDTH as usize));
    }
}
