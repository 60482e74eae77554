//! Turns one line of input samples into one line of pixels.

use crate::colormap::ColorMap;
use specgram_core::{clamp_intensity, Rgba};

/// Output pixels per octave when the sample axis is log scaled.
pub const PIXELS_PER_OCTAVE: f64 = 48.0;

/// Maps a window of input samples onto `px_per_line` colored pixels.
///
/// In linear mode each pixel samples the nearest input index. In log mode
/// each pixel averages the input over a logarithmically spaced interval,
/// weighting the samples that straddle the interval edges by their
/// fractional coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCompositor {
    px_per_line: usize,
    start_offset: f64,
    end_offset: f64,
    log_scale: bool,
}

impl LineCompositor {
    pub fn new(px_per_line: usize, start_offset: f64, end_offset: f64) -> Self {
        Self {
            px_per_line,
            start_offset,
            end_offset,
            log_scale: false,
        }
    }

    pub fn px_per_line(&self) -> usize {
        self.px_per_line
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn end_offset(&self) -> f64 {
        self.end_offset
    }

    pub fn log_scale(&self) -> bool {
        self.log_scale
    }

    pub fn set_start_offset(&mut self, start: f64) {
        self.start_offset = start;
    }

    pub fn set_end_offset(&mut self, end: f64) {
        self.end_offset = end;
    }

    pub fn set_log_scale(&mut self, log_scale: bool) {
        self.log_scale = log_scale;
    }

    fn factor(&self) -> f64 {
        let span = self.end_offset - self.start_offset;
        if self.log_scale {
            let octaves = (self.px_per_line.saturating_sub(1)) as f64 / PIXELS_PER_OCTAVE;
            let denom = octaves.exp2() - 1.0;
            if denom > 0.0 {
                span / denom
            } else {
                span
            }
        } else {
            span / self.px_per_line.max(1) as f64
        }
    }

    /// Fractional input index at the log-spaced pixel position `x`.
    fn log_boundary(&self, factor: f64, x: f64) -> f64 {
        factor * ((x / PIXELS_PER_OCTAVE).exp2() - 1.0) + self.start_offset
    }

    /// Intensity of output pixel `i`, or `None` if it covers no input.
    pub fn intensity<T: Copy + Into<f64>>(&self, samples: &[T], i: usize) -> Option<u8> {
        let factor = self.factor();
        if self.log_scale {
            let lo = self.log_boundary(factor, i as f64 - 0.5);
            let hi = self.log_boundary(factor, i as f64 + 0.5);
            integrate(samples, lo, hi).map(clamp_intensity)
        } else {
            let idx = (self.start_offset + i as f64 * factor).round();
            if idx < 0.0 || idx >= samples.len() as f64 {
                return None;
            }
            Some(clamp_intensity(samples[idx as usize].into()))
        }
    }

    /// Render `samples` into `out`, which is resized to `px_per_line`.
    pub fn compose<T: Copy + Into<f64>>(
        &self,
        samples: &[T],
        colors: &ColorMap,
        out: &mut Vec<Rgba>,
    ) {
        out.clear();
        out.extend((0..self.px_per_line).map(|i| match self.intensity(samples, i) {
            Some(level) => colors.color(level),
            None => colors.sentinel(),
        }));
    }
}

/// Mean of the piecewise-constant signal over `[lo, hi)`, where sample `k`
/// covers `[k, k + 1)` and is clamped into 0..=255 first. The interval is
/// clipped to the available samples.
fn integrate<T: Copy + Into<f64>>(samples: &[T], lo: f64, hi: f64) -> Option<f64> {
    let lo = lo.max(0.0);
    let hi = hi.min(samples.len() as f64);
    if !(hi > lo) {
        return None;
    }

    let first = lo.floor() as usize;
    let last = (hi.ceil() as usize).min(samples.len());
    let mut sum = 0.0;
    for (k, sample) in samples.iter().enumerate().take(last).skip(first) {
        let covered = (hi.min(k as f64 + 1.0) - lo.max(k as f64)).max(0.0);
        sum += covered * clamp_intensity((*sample).into()) as f64;
    }
    Some(sum / (hi - lo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_spike_maps_to_first_pixel() {
        let mut samples = vec![0u8; 256];
        samples[0] = 255;
        let map = ColorMap::jet();
        let compositor = LineCompositor::new(256, 0.0, 256.0);

        let mut line = Vec::new();
        compositor.compose(&samples, &map, &mut line);

        assert_eq!(line.len(), 256);
        assert_eq!(line[0], map.lookup(255));
        assert!(line[1..].iter().all(|px| *px == map.lookup(0)));
    }

    #[test]
    fn test_linear_mode_resamples_window() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let compositor = LineCompositor::new(10, 20.0, 70.0);

        let levels: Vec<u8> = (0..10)
            .map(|i| compositor.intensity(&samples, i).unwrap())
            .collect();
        assert_eq!(levels, vec![20, 25, 30, 35, 40, 45, 50, 55, 60, 65]);
    }

    #[test]
    fn test_samples_are_clamped_before_lookup() {
        let samples = [-40.0f64, 300.0, 127.6];
        let compositor = LineCompositor::new(3, 0.0, 3.0);

        assert_eq!(compositor.intensity(&samples, 0), Some(0));
        assert_eq!(compositor.intensity(&samples, 1), Some(255));
        assert_eq!(compositor.intensity(&samples, 2), Some(128));
    }

    #[test]
    fn test_missing_samples_use_sentinel() {
        let samples = [200u8; 4];
        let map = ColorMap::jet();
        let compositor = LineCompositor::new(8, 0.0, 8.0);

        let mut line = Vec::new();
        compositor.compose(&samples, &map, &mut line);
        assert_eq!(line[3], map.lookup(200));
        assert_eq!(line[4], map.sentinel());
        assert_eq!(line[7], map.sentinel());
    }

    #[test]
    fn test_log_mode_of_constant_input_is_constant() {
        let samples = vec![90u16; 1024];
        let mut compositor = LineCompositor::new(200, 2.0, 1000.0);
        compositor.set_log_scale(true);

        for i in 0..200 {
            assert_eq!(compositor.intensity(&samples, i), Some(90), "pixel {}", i);
        }
    }

    #[test]
    fn test_log_mode_spans_the_window() {
        let mut compositor = LineCompositor::new(97, 0.0, 512.0);
        compositor.set_log_scale(true);
        let factor = compositor.factor();

        assert!((compositor.log_boundary(factor, 0.0) - 0.0).abs() < 1e-9);
        assert!((compositor.log_boundary(factor, 96.0) - 512.0).abs() < 1e-9);
        // The second octave of pixels covers twice the bins of the first
        let first = compositor.log_boundary(factor, 48.0);
        assert!((compositor.log_boundary(factor, 96.0) - first - 2.0 * first).abs() < 1e-9);
    }

    #[test]
    fn test_log_mode_integrates_partial_bins() {
        // Pixel spans cover fractions of bins at the low end
        let samples = [0.0f32, 100.0, 200.0, 0.0];
        let value = integrate(&samples, 0.5, 2.5).unwrap();
        // 0.5 * 0 + 1.0 * 100 + 0.5 * 200 over a span of 2
        assert!((value - 100.0).abs() < 1e-9);

        assert_eq!(integrate(&samples, 5.0, 6.0), None);
        assert!((integrate(&samples, -1.0, 1.0).unwrap() - 0.0).abs() < 1e-9);
    }
}
