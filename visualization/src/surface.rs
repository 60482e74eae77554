//! Raster surfaces the renderers draw into.

use specgram_core::{Rgba, TRANSPARENT};

/// A rectangular block of RGBA pixels, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRegion {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelRegion {
    /// A fully transparent region.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let mut region = Self::new(width, height);
        region.fill(color);
        region
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color);
    }

    pub fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) * 4
    }
}

/// Output collaborator: an addressable pixel surface of fixed size.
#[cfg_attr(test, mockall::automock)]
pub trait RasterSurface {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Copy out a region. Pixels outside the surface read as transparent.
    fn get_region(&self, x: usize, y: usize, width: usize, height: usize) -> PixelRegion;

    /// Copy a region in with its top-left corner at `(x, y)`, clipped to the surface.
    fn put_region(&mut self, region: &PixelRegion, x: usize, y: usize);

    /// Called once the surface holds a complete new frame.
    fn present(&mut self) {}
}

/// In-memory surface, the default target of every renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: PixelRegion,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: PixelRegion::new(width, height),
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels.pixel(x, y)
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.data()
    }

    /// All pixels of row `y`.
    pub fn row(&self, y: usize) -> Vec<Rgba> {
        (0..self.pixels.width()).map(|x| self.pixel(x, y)).collect()
    }

    /// All pixels of column `x`.
    pub fn column(&self, x: usize) -> Vec<Rgba> {
        (0..self.pixels.height()).map(|y| self.pixel(x, y)).collect()
    }
}

impl RasterSurface for PixelBuffer {
    fn width(&self) -> usize {
        self.pixels.width()
    }

    fn height(&self) -> usize {
        self.pixels.height()
    }

    fn get_region(&self, x: usize, y: usize, width: usize, height: usize) -> PixelRegion {
        let mut region = PixelRegion::new(width, height);
        for ry in 0..height {
            for rx in 0..width {
                let (sx, sy) = (x + rx, y + ry);
                let color = if sx < self.width() && sy < self.height() {
                    self.pixels.pixel(sx, sy)
                } else {
                    TRANSPARENT
                };
                region.set_pixel(rx, ry, color);
            }
        }
        region
    }

    fn put_region(&mut self, region: &PixelRegion, x: usize, y: usize) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let cols = region.width().min(self.width() - x);
        let rows = region.height().min(self.height() - y);
        let src_stride = region.width() * 4;
        let dst_stride = self.width() * 4;

        for ry in 0..rows {
            let src = ry * src_stride;
            let dst = (y + ry) * dst_stride + x * 4;
            self.pixels.data[dst..dst + cols * 4]
                .copy_from_slice(&region.data()[src..src + cols * 4]);
        }
    }
}
