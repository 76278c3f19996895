/// Square RGB pixel buffer produced by the rasterizer
use crate::color::Rgb;

/// An R×R grid of RGB pixels, initialized to black.
///
/// Pixels are stored row-major with the origin at the bottom-left: `(0, 0)`
/// is the bottom-left pixel and row `resolution - 1` is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    resolution: usize,
    pixels: Vec<Rgb>,
}

impl Framebuffer {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            pixels: vec![Rgb::BLACK; resolution * resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel; returns false when `(x, y)` is outside the buffer
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Like [`Framebuffer::set`] but for coordinates that may be negative
    pub(crate) fn plot(&mut self, x: i64, y: i64, color: Rgb) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => self.set(x, y, color),
            _ => false,
        }
    }

    /// Number of pixels holding exactly `color`
    pub fn count(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Number of pixels that are not background
    pub fn covered(&self) -> usize {
        self.pixels.len() - self.count(Rgb::BLACK)
    }

    /// One row of pixels, `y = 0` being the bottom row
    pub fn row(&self, y: usize) -> Option<&[Rgb]> {
        if y >= self.resolution {
            return None;
        }
        let start = y * self.resolution;
        Some(&self.pixels[start..start + self.resolution])
    }

    /// Rows from the top of the image down, as a display expects them
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[Rgb]> + '_ {
        (0..self.resolution).rev().filter_map(move |y| self.row(y))
    }

    /// Packed 8-bit RGB, top row first
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.rows_top_down()
            .flat_map(|row| row.iter().flat_map(|p| p.to_rgb8()))
            .collect()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.resolution && y < self.resolution).then(|| y * self.resolution + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_black() {
        let fb = Framebuffer::new(4);
        assert_eq!(fb.pixels().len(), 16);
        assert_eq!(fb.count(Rgb::BLACK), 16);
        assert_eq!(fb.covered(), 0);
    }

    #[test]
    fn test_set_and_bounds() {
        let mut fb = Framebuffer::new(3);
        assert!(fb.set(2, 0, Rgb::WHITE));
        assert!(!fb.set(3, 0, Rgb::WHITE));
        assert!(!fb.plot(-1, 1, Rgb::WHITE));
        assert!(fb.plot(0, 2, Rgb::WHITE));
        assert_eq!(fb.get(2, 0), Some(Rgb::WHITE));
        assert_eq!(fb.get(0, 3), None);
        assert_eq!(fb.covered(), 2);
    }

    #[test]
    fn test_rgb8_is_top_down() {
        let mut fb = Framebuffer::new(2);
        // Bottom-left red, top-right white
        fb.set(0, 0, Rgb::new(1.0, 0.0, 0.0));
        fb.set(1, 1, Rgb::WHITE);
        assert_eq!(
            fb.to_rgb8(),
            vec![0, 0, 0, 255, 255, 255, 255, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_rows_are_bounds_checked() {
        let mut fb = Framebuffer::new(3);
        fb.set(1, 2, Rgb::WHITE);
        assert_eq!(fb.row(2), Some(&[Rgb::BLACK, Rgb::WHITE, Rgb::BLACK][..]));
        assert_eq!(fb.row(3), None);
        assert_eq!(fb.row(usize::MAX), None);
        assert_eq!(fb.rows_top_down().next(), fb.row(2));
    }

    #[test]
    fn test_empty_buffer() {
        let fb = Framebuffer::new(0);
        assert!(fb.pixels().is_empty());
        assert_eq!(fb.rows_top_down().count(), 0);
        assert!(fb.to_rgb8().is_empty());
    }
}
