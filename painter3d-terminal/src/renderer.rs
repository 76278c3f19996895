/// Half-block true-color renderer for framebuffers
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use painter3d_core::Framebuffer;
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// Draws a framebuffer into a `width × height` cell area.
///
/// Each cell shows two vertically stacked pixels, so the area holds a square
/// image of up to `min(width, 2 · height)` pixels per side. The framebuffer
/// is resampled nearest-neighbour to that size.
pub struct HalfBlockRenderer {
    width: usize,
    height: usize,
}

impl HalfBlockRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Side of the displayed square in pixels, rounded down to an even number
    pub fn side(&self) -> usize {
        self.width.min(self.height * 2) & !1
    }

    /// Resample to `side × side` packed RGB pixels, top row first
    pub fn sample(&self, framebuffer: &Framebuffer) -> Vec<[u8; 3]> {
        let side = self.side();
        let resolution = framebuffer.resolution();
        if side == 0 || resolution == 0 {
            return Vec::new();
        }

        let mut pixels = Vec::with_capacity(side * side);
        for row in 0..side {
            // Framebuffer rows count up from the bottom
            let y = resolution - 1 - row * resolution / side;
            for column in 0..side {
                let x = column * resolution / side;
                let rgb = framebuffer.get(x, y).map(|p| p.to_rgb8()).unwrap_or([0; 3]);
                pixels.push(rgb);
            }
        }
        pixels
    }

    /// Queue the image starting at terminal row `top`; the caller flushes
    pub fn draw<W: Write>(
        &self,
        framebuffer: &Framebuffer,
        top: u16,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let side = self.side();
        let pixels = self.sample(framebuffer);
        if pixels.is_empty() {
            return Ok(());
        }
        let left = ((self.width - side) / 2) as u16;

        for (cell_row, pair) in pixels.chunks(side * 2).enumerate() {
            let (upper, lower) = pair.split_at(side);
            writer.queue(crossterm::cursor::MoveTo(left, top + cell_row as u16))?;
            for (&[r, g, b], &[rb, gb, bb]) in upper.iter().zip(lower) {
                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(SetBackgroundColor(Color::Rgb {
                    r: rb,
                    g: gb,
                    b: bb,
                }))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
