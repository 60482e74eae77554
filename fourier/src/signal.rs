//! Test signals, resampling and frequency axes.

use std::f64::consts::PI;

/// Sum of cosines at `frequencies` (Hz) over `secs` seconds in `n` samples.
///
/// Amplitudes are normalized by their sum so the mix peaks at 1.0. A zero
/// amplitude total yields silence.
pub fn compute_cosines(n: usize, secs: f64, frequencies: &[f64], amplitudes: &[f64]) -> Vec<f32> {
    let mut out = vec![0.0f32; n];
    let total: f64 = amplitudes.iter().sum();
    if n == 0 || total == 0.0 {
        return out;
    }

    let amp_factor = 1.0 / total;
    for (&freq, &amp) in frequencies.iter().zip(amplitudes) {
        let w = freq * 2.0 * PI * secs / n as f64;
        for (x, value) in out.iter_mut().enumerate() {
            *value += (amp_factor * amp * (w * x as f64).cos()) as f32;
        }
    }
    out
}

/// Every `step`-th sample, rounding fractional positions.
pub fn extract(data: &[f32], step: f64) -> Vec<f32> {
    if data.is_empty() || !(step > 0.0) {
        return Vec::new();
    }
    let count = (data.len() as f64 / step).ceil() as usize;
    (0..count)
        .map(|j| {
            let i = (j as f64 * step).round() as usize;
            data[i.min(data.len() - 1)]
        })
        .collect()
}

/// Box-filter downsampling: each output is the sum of the samples in its
/// window of width `step`, divided by `step`.
pub fn average_down(data: &[f32], step: f64) -> Vec<f32> {
    if !(step > 0.0) {
        return Vec::new();
    }
    let count = (data.len() as f64 / step).floor() as usize;
    (0..count)
        .map(|j| {
            let start = j as f64 * step;
            let end = start + step;
            let mut k = start.round() as usize;
            let mut sum = 0.0f64;
            while (k as f64) < end && k < data.len() {
                sum += data[k] as f64;
                k += 1;
            }
            (sum / step) as f32
        })
        .collect()
}

/// `count` evenly spaced frequencies from 0 up to, not including, `max`.
pub fn linear_frequencies(max: f64, count: usize) -> Vec<f64> {
    (0..count).map(|j| j as f64 * max / count as f64).collect()
}

/// `count` frequencies spaced geometrically from `min` to `max` inclusive.
pub fn log2_frequencies(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let octaves = (max / min).log2();
            (0..count)
                .map(|j| min * (j as f64 * octaves / (count - 1) as f64).exp2())
                .collect()
        }
    }
}

/// Center of mass of `data` wound around the unit circle once every
/// `cycles` samples, as `(x, y)` with y pointing up.
pub fn winding_center(data: &[f32], cycles: f64) -> (f64, f64) {
    if data.is_empty() || cycles == 0.0 {
        return (0.0, 0.0);
    }
    let f = 2.0 * PI / cycles;
    let (sx, sy) = data
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sx, sy), (i, &v)| {
            let (sin, cos) = (i as f64 * f).sin_cos();
            (sx + v as f64 * cos, sy - v as f64 * sin)
        });
    (sx / data.len() as f64, sy / data.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosines_are_normalized() {
        let mix = compute_cosines(100, 1.0, &[3.0, 5.0], &[1.0, 3.0]);
        assert_eq!(mix.len(), 100);
        assert!((mix[0] - 1.0).abs() < 1e-6);
        assert!(mix.iter().all(|v| v.abs() <= 1.0 + 1e-6));

        assert!(compute_cosines(10, 1.0, &[3.0], &[0.0])
            .iter()
            .all(|v| *v == 0.0));
    }

    #[test]
    fn test_extract_takes_every_step() {
        let data: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(extract(&data, 3.0), vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(extract(&data, 2.5), vec![0.0, 3.0, 5.0, 8.0]);
        assert!(extract(&data, 0.0).is_empty());
    }

    #[test]
    fn test_average_down_box_filters() {
        let data = [1.0f32, 3.0, 5.0, 7.0, 9.0];
        assert_eq!(average_down(&data, 2.0), vec![2.0, 6.0]);
        assert_eq!(average_down(&data, 1.0), data.to_vec());
    }

    #[test]
    fn test_frequency_axes() {
        assert_eq!(linear_frequencies(8.0, 4), vec![0.0, 2.0, 4.0, 6.0]);

        let log = log2_frequencies(100.0, 800.0, 4);
        let expected = [100.0, 200.0, 400.0, 800.0];
        for (got, want) in log.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
        assert_eq!(log2_frequencies(50.0, 100.0, 1), vec![50.0]);
    }

    #[test]
    fn test_winding_center_is_off_origin_at_signal_frequency() {
        let n = 400;
        let period = 20.0;
        let data: Vec<f32> = (0..n)
            .map(|i| 1.0 + (2.0 * PI * i as f64 / period).cos() as f32)
            .collect();

        let (x, y) = winding_center(&data, period);
        assert!((x - 0.5).abs() < 1e-4);
        assert!(y.abs() < 1e-4);

        let (x, y) = winding_center(&data, 7.3);
        assert!(x.hypot(y) < 0.1);
    }
}
