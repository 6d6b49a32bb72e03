//! Composite surface
//!
//! A fixed-size RGBA canvas owned exclusively by the compositor. Drawing
//! is destructive and the surface is never cleared between ticks; stale
//! regions persist until something paints over them.

use bytes::Bytes;

use crate::layout::Rect;
use crate::media::VideoFrame;

/// A solid RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Opaque color from red/green/blue components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0xff])
    }
}

/// The composite canvas
#[derive(Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a black opaque surface
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 0xff;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw a frame into the destination rectangle, scaling with
    /// nearest-neighbor sampling
    ///
    /// The rectangle is clipped to the canvas; degenerate frames or rects
    /// draw nothing.
    pub fn draw_frame(&mut self, frame: &VideoFrame, dest: Rect) {
        if frame.width == 0 || frame.height == 0 || dest.width == 0 || dest.height == 0 {
            return;
        }

        let max_x = dest.right().min(self.width);
        let max_y = dest.bottom().min(self.height);

        for y in dest.y..max_y {
            let src_y = ((y - dest.y) as u64 * frame.height as u64 / dest.height as u64) as u32;
            for x in dest.x..max_x {
                let src_x = ((x - dest.x) as u64 * frame.width as u64 / dest.width as u64) as u32;
                let src = ((src_y * frame.width + src_x) * 4) as usize;
                let dst = ((y * self.width + x) * 4) as usize;
                self.pixels[dst..dst + 4].copy_from_slice(&frame.data[src..src + 4]);
            }
        }
    }

    /// Fill the rectangle with a solid color (placeholder painting)
    pub fn fill_rect(&mut self, color: Color, dest: Rect) {
        let max_x = dest.right().min(self.width);
        let max_y = dest.bottom().min(self.height);

        for y in dest.y..max_y {
            for x in dest.x..max_x {
                let dst = ((y * self.width + x) * 4) as usize;
                self.pixels[dst..dst + 4].copy_from_slice(&color.0);
            }
        }
    }

    /// Pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Read-only snapshot of the current canvas contents
    pub fn snapshot(&self) -> VideoFrame {
        VideoFrame {
            width: self.width,
            height: self.height,
            data: Bytes::copy_from_slice(&self.pixels),
        }
    }
}
