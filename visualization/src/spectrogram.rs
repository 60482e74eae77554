//! Scrolling spectrogram renderer.
//!
//! A `Spectrogram` owns a raster surface and writes one composited line
//! into it per call to [`Spectrogram::new_line`]. Waterfalls shift the
//! existing content one line toward the tail before writing at the head;
//! raster scans overwrite at an advancing position that wraps around.

use crate::colormap::ColorMap;
use crate::compositor::LineCompositor;
use crate::surface::{PixelBuffer, PixelRegion, RasterSurface};
use log::{debug, trace, warn};
use specgram_core::{
    Direction, DisplayMode, Error, LineRate, OptionValue, RenderOptions, Rgba, ScrollConfig,
    HIGHLIGHT,
};
use std::time::Duration;

/// Default line length in pixels.
pub const DEFAULT_PX_PER_LINE: usize = 200;

/// Default number of lines kept on the surface.
pub const DEFAULT_LINES: usize = 200;

/// Geometry fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub px_per_line: usize,
    pub lines: usize,
    pub mode: DisplayMode,
    pub scroll: ScrollConfig,
}

impl RenderConfig {
    /// Surface `(width, height)` in pixels for this geometry.
    pub fn surface_size(&self) -> (usize, usize) {
        if self.scroll.is_vertical() {
            (self.px_per_line, self.lines)
        } else {
            (self.lines, self.px_per_line)
        }
    }
}

/// Builder for [`Spectrogram`].
#[derive(Debug, Clone)]
pub struct SpectrogramBuilder {
    mode: DisplayMode,
    direction: Direction,
    px_per_line: usize,
    lines: usize,
    input_len: Option<usize>,
    options: RenderOptions,
}

impl SpectrogramBuilder {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            direction: Direction::default(),
            px_per_line: DEFAULT_PX_PER_LINE,
            lines: DEFAULT_LINES,
            input_len: None,
            options: RenderOptions::default(),
        }
    }

    /// Pixels per line and number of lines.
    pub fn size(mut self, px_per_line: usize, lines: usize) -> Self {
        self.px_per_line = px_per_line;
        self.lines = lines;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Length of the input buffers. Sets the default end of the sample window.
    pub fn input_len(mut self, len: usize) -> Self {
        self.input_len = Some(len);
        self
    }

    pub fn options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    fn config(&self) -> Result<RenderConfig, Error> {
        if self.px_per_line == 0 || self.lines == 0 {
            return Err(Error::InvalidGeometry(format!(
                "{} pixels per line by {} lines",
                self.px_per_line, self.lines
            )));
        }
        Ok(RenderConfig {
            px_per_line: self.px_per_line,
            lines: self.lines,
            mode: self.mode,
            scroll: ScrollConfig::for_display(self.mode, self.direction),
        })
    }

    /// Build a renderer drawing into a fresh in-memory surface.
    pub fn build(self) -> Result<Spectrogram<PixelBuffer>, Error> {
        let (width, height) = self.config()?.surface_size();
        self.build_on(PixelBuffer::new(width, height))
    }

    /// Build a renderer drawing into `surface`, which must match the geometry.
    pub fn build_on<S: RasterSurface>(self, surface: S) -> Result<Spectrogram<S>, Error> {
        let config = self.config()?;
        let (width, height) = config.surface_size();
        if surface.width() != width || surface.height() != height {
            return Err(Error::InvalidGeometry(format!(
                "surface is {}x{}, expected {}x{}",
                surface.width(),
                surface.height(),
                width,
                height
            )));
        }

        let end = self.input_len.unwrap_or(config.px_per_line) as f64;
        let mut spectrogram = Spectrogram {
            config,
            compositor: LineCompositor::new(config.px_per_line, 0.0, end),
            colors: ColorMap::default(),
            line_rate: LineRate::default(),
            interval: LineRate::default()
                .interval()
                .unwrap_or(Duration::from_millis(33)),
            next_line: 0,
            surface,
            line: Vec::with_capacity(config.px_per_line),
        };
        spectrogram.apply_options(&self.options);
        spectrogram.stop();

        debug!(
            "Created {} {}x{} ({:?})",
            config.mode, config.px_per_line, config.lines, config.scroll
        );
        Ok(spectrogram)
    }
}

/// Scrolling raster renderer.
pub struct Spectrogram<S: RasterSurface = PixelBuffer> {
    config: RenderConfig,
    compositor: LineCompositor,
    colors: ColorMap,
    line_rate: LineRate,
    interval: Duration,
    next_line: usize,
    surface: S,
    line: Vec<Rgba>,
}

impl Spectrogram<PixelBuffer> {
    pub fn builder(mode: DisplayMode) -> SpectrogramBuilder {
        SpectrogramBuilder::new(mode)
    }

    /// Waterfall over input buffers of `input_len` samples.
    pub fn waterfall(
        input_len: usize,
        px_per_line: usize,
        lines: usize,
        direction: Direction,
        options: RenderOptions,
    ) -> Result<Self, Error> {
        SpectrogramBuilder::new(DisplayMode::Waterfall)
            .size(px_per_line, lines)
            .direction(direction)
            .input_len(input_len)
            .options(options)
            .build()
    }

    /// Raster scan over input buffers of `input_len` samples.
    pub fn rasterscan(
        input_len: usize,
        px_per_line: usize,
        lines: usize,
        direction: Direction,
        options: RenderOptions,
    ) -> Result<Self, Error> {
        SpectrogramBuilder::new(DisplayMode::RasterScan)
            .size(px_per_line, lines)
            .direction(direction)
            .input_len(input_len)
            .options(options)
            .build()
    }
}

impl<S: RasterSurface> Spectrogram<S> {
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn compositor(&self) -> &LineCompositor {
        &self.compositor
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.colors
    }

    pub fn line_rate(&self) -> LineRate {
        self.line_rate
    }

    /// Time between lines of a continuously updating display.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Line index the next call to `new_line` writes.
    pub fn next_line(&self) -> usize {
        self.next_line
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Change the line rate. Out of range rates are reported and ignored.
    pub fn set_line_rate(&mut self, rate: f64) -> Result<(), Error> {
        let rate = LineRate::new(rate)?;
        if let Some(interval) = rate.interval() {
            self.interval = interval;
        }
        self.line_rate = rate;
        debug!("Line rate set to {}", rate);
        Ok(())
    }

    /// Replace the color map. A malformed map leaves the current one in place.
    pub fn set_color_map<E: AsRef<[u8]>>(&mut self, entries: &[E]) -> Result<(), Error> {
        self.colors = ColorMap::build(entries)?;
        Ok(())
    }

    pub fn set_log_scale(&mut self, log_scale: bool) {
        self.compositor.set_log_scale(log_scale);
    }

    /// Set one option by name. Anything rejected is logged and dropped.
    pub fn set_option(&mut self, key: &str, value: &OptionValue) {
        let mut options = RenderOptions::default();
        match options.set(key, value) {
            Ok(()) => self.apply_options(&options),
            Err(e) => debug!("Ignoring option: {}", e),
        }
    }

    /// Apply every option that is set. Rejected values keep the previous state.
    pub fn apply_options(&mut self, options: &RenderOptions) {
        if let Some(rate) = options.line_rate {
            // Reported by LineRate::new
            let _ = self.set_line_rate(rate);
        }
        match options.start_bin {
            Some(start) if start >= 0.0 => self.compositor.set_start_offset(start),
            Some(start) => debug!("Ignoring negative startBin {}", start),
            None => {}
        }
        match options.end_bin {
            Some(end) if end >= 0.0 => self.compositor.set_end_offset(end),
            Some(end) => debug!("Ignoring negative endBin {}", end),
            None => {}
        }
        if let Some(log_scale) = options.log_scale {
            self.compositor.set_log_scale(log_scale);
        }
        if let Some(entries) = &options.color_map {
            if let Err(e) = self.set_color_map(entries) {
                warn!("Keeping previous color map: {}", e);
            }
        }
    }

    /// Fill the whole surface with color map entry 0.
    pub fn clear(&mut self) {
        let (width, height) = self.config.surface_size();
        let fill = PixelRegion::filled(width, height, self.colors.background());
        self.surface.put_region(&fill, 0, 0);
        self.surface.present();
    }

    /// Reset the write position to the starting edge. Pixels are kept.
    pub fn stop(&mut self) {
        self.next_line = self
            .config
            .scroll
            .initial_line(self.config.mode, self.config.lines);
    }

    /// Composite one line of samples into the surface and present it.
    pub fn new_line<T: Copy + Into<f64>>(&mut self, samples: &[T]) {
        self.compositor.compose(samples, &self.colors, &mut self.line);
        trace!("Writing line {}", self.next_line);

        if self.config.scroll.is_vertical() {
            self.vertical_line();
        } else {
            self.horizontal_line();
        }
        self.surface.present();
    }

    fn advance(&mut self) {
        let lines = self.config.lines;
        self.next_line = if self.config.scroll.scan_advances_forward() {
            (self.next_line + 1) % lines
        } else if self.next_line == 0 {
            lines - 1
        } else {
            self.next_line - 1
        };
    }

    fn draws_highlight(&self) -> bool {
        self.config.mode == DisplayMode::RasterScan && !self.line_rate.is_static()
    }

    // Lines are rows; only the new row is written.
    fn vertical_line(&mut self) {
        let RenderConfig {
            px_per_line, lines, ..
        } = self.config;

        if self.config.mode == DisplayMode::Waterfall && lines > 1 {
            if self.config.scroll.is_reverse() {
                let kept = self.surface.get_region(0, 0, px_per_line, lines - 1);
                self.surface.put_region(&kept, 0, 1);
            } else {
                let kept = self.surface.get_region(0, 1, px_per_line, lines - 1);
                self.surface.put_region(&kept, 0, 0);
            }
        }

        let mut row = PixelRegion::new(px_per_line, 1);
        for (x, color) in self.line.iter().enumerate() {
            row.set_pixel(x, 0, *color);
        }
        self.surface.put_region(&row, 0, self.next_line);

        if self.config.mode == DisplayMode::RasterScan {
            self.advance();
            if self.draws_highlight() {
                let highlight = PixelRegion::filled(px_per_line, 1, HIGHLIGHT);
                self.surface.put_region(&highlight, 0, self.next_line);
            }
        }
    }

    // Lines are columns; the whole page is read back and rewritten.
    fn horizontal_line(&mut self) {
        let RenderConfig {
            px_per_line, lines, ..
        } = self.config;

        if self.config.mode == DisplayMode::Waterfall && lines > 1 {
            if self.config.scroll.is_reverse() {
                let kept = self.surface.get_region(0, 0, lines - 1, px_per_line);
                self.surface.put_region(&kept, 1, 0);
            } else {
                let kept = self.surface.get_region(1, 0, lines - 1, px_per_line);
                self.surface.put_region(&kept, 0, 0);
            }
        }

        let mut page = self.surface.get_region(0, 0, lines, px_per_line);
        for (i, color) in self.line.iter().enumerate() {
            // Low bins at the bottom
            page.set_pixel(self.next_line, px_per_line - 1 - i, *color);
        }

        if self.config.mode == DisplayMode::RasterScan {
            self.advance();
            if self.draws_highlight() {
                for y in 0..px_per_line {
                    page.set_pixel(self.next_line, y, HIGHLIGHT);
                }
            }
        }
        self.surface.put_region(&page, 0, 0);
    }
}
