//! Plot geometry for waveform and spectrum views.
//!
//! Nothing here draws; callers get pixel positions and labels and render
//! them with whatever backend they have.

use crate::Spectrum;

/// Vertical grid lines at pixel columns, each with an optional label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub indices: Vec<i64>,
    pub labels: Vec<String>,
}

/// Middle C in Hz.
pub const MIDDLE_C: f64 = 261.6256;

/// Note grid used once the axis extends beyond 1 kHz.
const NOTES: [(f64, &str); 29] = [
    (55.0, "A"),
    (110.0, "A"),
    (164.8138, "E"),
    (220.0, "A"),
    (261.6256, "C"),
    (329.6276, "E"),
    (391.9954, "G"),
    (440.0, "A"),
    (523.2511, "C"),
    (587.3295, "D"),
    (659.2551, "E"),
    (698.4565, "F"),
    (783.9909, "G"),
    (880.0, "A"),
    (932.3275, "B♭"),
    (987.7666, "B"),
    (1046.502, "C"),
    (1108.731, "C♯"),
    (1174.659, "D"),
    (1244.508, "E♭"),
    (1318.510, "E"),
    (1396.913, "F"),
    (1479.978, "F♯"),
    (1567.982, "G"),
    (1661.219, "A♭"),
    (1760.0, "A"),
    (1864.655, "B♭"),
    (1975.533, "B"),
    (2093.005, "C"),
];

/// One grid line per whole second across `width` pixels.
pub fn second_marks(width: usize, total_seconds: f64) -> Grid {
    let mut grid = Grid::default();
    if !(total_seconds > 0.0) {
        return grid;
    }
    let mut i = 0u32;
    while i as f64 <= total_seconds {
        grid.indices
            .push((i as f64 * width as f64 / total_seconds).round() as i64);
        grid.labels.push(format!("{} sec", i));
        i += 1;
    }
    grid
}

/// Frequency grid across `width` pixels up to `max_freq` Hz.
///
/// Above 1 kHz the lines sit on musical notes, otherwise on every whole Hz.
pub fn frequency_marks(width: usize, max_freq: f64) -> Grid {
    let mut grid = Grid::default();
    if !(max_freq > 0.0) {
        return grid;
    }
    let px = |f: f64| (f * width as f64 / max_freq).round() as i64;

    if max_freq > 1000.0 {
        for (freq, name) in NOTES {
            grid.indices.push(px(freq));
            grid.labels.push(name.to_string());
        }
    } else {
        let mut i = 0u32;
        while i as f64 <= max_freq {
            grid.indices.push(px(i as f64));
            grid.labels.push(format!("{} Hz", i));
            i += 1;
        }
    }
    grid
}

/// Pixel column of middle C on a `width`-pixel axis up to `max_freq` Hz.
pub fn middle_c_position(width: usize, max_freq: f64) -> f64 {
    MIDDLE_C * width as f64 / max_freq
}

/// Vertical scaling applied to curve values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Fixed(f64),
    /// Fit the largest magnitude to 95% of the half height.
    Auto,
}

impl Scale {
    fn resolve(self, data: &[f64]) -> f64 {
        match self {
            Scale::Fixed(s) => s,
            Scale::Auto => {
                let peak = data.iter().fold(0.0f64, |m, v| m.max(v.abs()));
                if peak > 0.0 {
                    0.95 / peak
                } else {
                    1.0
                }
            }
        }
    }
}

/// Polyline through `data` on a `width` by `height` canvas with zero on
/// the horizontal midline.
///
/// Every `stride`-th value is taken (fractional strides round). `x_step`
/// defaults to spreading the taken values over the full width.
pub fn curve_points(
    data: &[f64],
    stride: f64,
    scale: Scale,
    x_step: Option<f64>,
    width: usize,
    height: usize,
) -> Vec<(f64, f64)> {
    if data.is_empty() || !(stride > 0.0) {
        return Vec::new();
    }
    let scale = scale.resolve(data);
    let x_step = x_step
        .filter(|s| *s != 0.0)
        .unwrap_or(stride / data.len() as f64 * width as f64);

    let mut points = Vec::new();
    let (mut i, mut x) = (0.0, 0.0);
    while i < data.len() as f64 {
        let value = data[(i.round() as usize).min(data.len() - 1)];
        points.push((x, (1.0 - value * scale) * height as f64 / 2.0));
        i += stride;
        x += x_step;
    }
    points
}

/// Curves of a spectrum view, sharing one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumPlot {
    pub reals: Vec<f64>,
    pub imags: Vec<f64>,
    pub magnitudes: Vec<f64>,
    /// Scale that keeps the tallest magnitude just inside the half height.
    pub scale: f64,
}

impl SpectrumPlot {
    /// The DC term is dropped so it does not dominate the scale.
    pub fn from_spectrum(spectrum: &Spectrum) -> Self {
        let mut reals = spectrum.reals.clone();
        let mut imags = spectrum.imags.clone();
        if let (Some(r), Some(i)) = (reals.first_mut(), imags.first_mut()) {
            *r = 0.0;
            *i = 0.0;
        }
        let magnitudes: Vec<f64> = reals
            .iter()
            .zip(&imags)
            .map(|(r, i)| r.hypot(*i))
            .collect();
        let max = magnitudes.iter().fold(0.0f64, |m, v| m.max(*v)) * 1.05;

        Self {
            reals,
            imags,
            magnitudes,
            scale: if max > 0.0 { 1.0 / max } else { 1.0 },
        }
    }
}
