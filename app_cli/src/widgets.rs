//! Terminal widgets for the live display.

use fourier::plot::{curve_points, frequency_marks, Scale};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Block, Widget},
};
use specgram::{PixelBuffer, RasterSurface, Rgba};

fn cell_color(px: Rgba) -> Color {
    if px[3] == 0 {
        Color::Reset
    } else {
        Color::Rgb(px[0], px[1], px[2])
    }
}

/// Draws a pixel surface scaled to the area, two pixel rows per cell.
pub struct WaterfallView<'a> {
    block: Option<Block<'a>>,
    surface: &'a PixelBuffer,
}

impl<'a> WaterfallView<'a> {
    pub fn new(surface: &'a PixelBuffer) -> Self {
        Self {
            block: None,
            surface,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> Widget for WaterfallView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block.unwrap_or_default();
        let inner = block.inner(area);
        block.render(area, buf);

        let (width, height) = (self.surface.width(), self.surface.height());
        if inner.width < 1 || inner.height < 1 || width == 0 || height == 0 {
            return;
        }

        let rows = inner.height as usize * 2;
        for cy in 0..inner.height {
            for cx in 0..inner.width {
                let x = cx as usize * width / inner.width as usize;
                let top = (cy as usize * 2) * height / rows;
                let bottom = (cy as usize * 2 + 1) * height / rows;

                let cell = buf.get_mut(inner.left() + cx, inner.top() + cy);
                cell.set_char(symbols::half_block::UPPER);
                cell.set_style(
                    Style::default()
                        .fg(cell_color(self.surface.pixel(x, top)))
                        .bg(cell_color(self.surface.pixel(x, bottom))),
                );
            }
        }
    }
}

/// Bar view of the latest analyser levels with a note grid along the bottom.
pub struct SpectrumView<'a> {
    block: Option<Block<'a>>,
    levels: &'a [u8],
    max_freq: f64,
    style: Style,
}

impl<'a> SpectrumView<'a> {
    /// `levels` span 0 Hz up to `max_freq`.
    pub fn new(levels: &'a [u8], max_freq: f64) -> Self {
        Self {
            block: None,
            levels,
            max_freq,
            style: Style::default().fg(Color::Green),
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> Widget for SpectrumView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block.unwrap_or_default();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 1 || inner.height < 2 || self.levels.is_empty() {
            return;
        }

        // The bottom row holds the grid labels
        let bar_rows = inner.height - 1;
        let data: Vec<f64> = self.levels.iter().map(|&v| v as f64).collect();
        let stride = (data.len() as f64 / inner.width as f64).max(1.0);
        let points = curve_points(
            &data,
            stride,
            Scale::Fixed(1.0 / 255.0),
            Some(1.0),
            inner.width as usize,
            bar_rows as usize * 2,
        );

        for (x, y) in points {
            let column = x as u16;
            if column >= inner.width {
                break;
            }
            let top = y.round().clamp(0.0, bar_rows as f64) as u16;
            for row in top..bar_rows {
                let cell = buf.get_mut(inner.left() + column, inner.top() + row);
                cell.set_symbol(symbols::block::FULL);
                cell.set_style(self.style);
            }
        }

        let grid = frequency_marks(inner.width as usize, self.max_freq);
        for (index, label) in grid.indices.iter().zip(&grid.labels) {
            if *index < 0 || *index >= inner.width as i64 {
                continue;
            }
            buf.set_string(
                inner.left() + *index as u16,
                inner.bottom() - 1,
                label,
                Style::default().fg(Color::Gray),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waterfall_view_maps_pixels_to_half_blocks() {
        let mut surface = PixelBuffer::new(2, 2);
        surface.fill([10, 20, 30, 255]);
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);

        WaterfallView::new(&surface).render(area, &mut buf);

        let cell = buf.get(0, 0);
        assert_eq!(cell.symbol(), symbols::half_block::UPPER.to_string());
        assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
        assert_eq!(cell.bg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn test_transparent_pixels_use_the_terminal_background() {
        let surface = PixelBuffer::new(4, 4);
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);

        WaterfallView::new(&surface).render(area, &mut buf);
        assert_eq!(buf.get(3, 1).fg, Color::Reset);
    }

    #[test]
    fn test_spectrum_bars_follow_levels() {
        let levels = [255u8, 0, 128, 0];
        let area = Rect::new(0, 0, 4, 5);
        let mut buf = Buffer::empty(area);

        SpectrumView::new(&levels, 100.0).render(area, &mut buf);

        // Four bar rows above the label row
        assert_eq!(buf.get(0, 0).symbol(), symbols::block::FULL);
        assert_eq!(buf.get(0, 3).symbol(), symbols::block::FULL);
        assert_eq!(buf.get(1, 3).symbol(), " ");
        assert_eq!(buf.get(2, 1).symbol(), " ");
        assert_eq!(buf.get(2, 2).symbol(), symbols::block::FULL);
    }
}
