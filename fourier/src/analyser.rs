//! Frequency analyser producing byte magnitudes for the renderers.
//!
//! Each frame takes the most recent `fft_size` samples, applies a Blackman
//! window, transforms them, smooths the magnitudes against the previous
//! frame and maps decibels linearly onto 0..=255 between `min_db` and
//! `max_db`.

use crate::{best_available, FourierTransform};
use log::debug;
use specgram_core::Error;
use std::f64::consts::PI;

pub const DEFAULT_MIN_DB: f64 = -70.0;
pub const DEFAULT_MAX_DB: f64 = -30.0;
pub const DEFAULT_SMOOTHING: f64 = 0.2;

/// Map a level in decibels onto 0..=255, `min_db` to 0 and `max_db` to 255.
pub fn db_to_byte(db: f64, min_db: f64, max_db: f64) -> u8 {
    let scaled = (255.0 / (max_db - min_db) * (db - min_db)).floor();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, 255.0) as u8
}

fn blackman(size: usize) -> Vec<f64> {
    let (a0, a1, a2) = (0.42, 0.5, 0.08);
    (0..size)
        .map(|n| {
            let phase = 2.0 * PI * n as f64 / size as f64;
            a0 - a1 * phase.cos() + a2 * (2.0 * phase).cos()
        })
        .collect()
}

pub struct Analyser {
    fft_size: usize,
    sample_rate: f64,
    min_db: f64,
    max_db: f64,
    smoothing: f64,
    window: Vec<f64>,
    bin_frequencies: Vec<f64>,
    previous: Vec<f64>,
    transform: Box<dyn FourierTransform>,
}

impl Analyser {
    /// `fft_size` must be a power of two in 32..=32768.
    pub fn new(fft_size: usize, sample_rate: f64) -> Result<Self, Error> {
        if !fft_size.is_power_of_two() || !(32..=32768).contains(&fft_size) {
            return Err(Error::InvalidOption {
                key: "fftSize".to_string(),
                reason: format!("{} is not a power of two in 32..=32768", fft_size),
            });
        }
        if !(sample_rate > 0.0) {
            return Err(Error::InvalidOption {
                key: "sampleRate".to_string(),
                reason: format!("{} is not positive", sample_rate),
            });
        }

        let duration = fft_size as f64 / sample_rate;
        let bins = fft_size / 2;
        let transform = best_available();
        debug!(
            "Analyser with {} bins over {:.3}s using the {} transform",
            bins,
            duration,
            transform.name()
        );

        Ok(Self {
            fft_size,
            sample_rate,
            min_db: DEFAULT_MIN_DB,
            max_db: DEFAULT_MAX_DB,
            smoothing: DEFAULT_SMOOTHING,
            window: blackman(fft_size),
            bin_frequencies: (0..bins).map(|k| k as f64 / duration).collect(),
            previous: vec![0.0; bins],
            transform,
        })
    }

    pub fn with_decibels(mut self, min_db: f64, max_db: f64) -> Result<Self, Error> {
        if !(min_db < max_db) {
            return Err(Error::InvalidOption {
                key: "decibels".to_string(),
                reason: format!("min {} must be below max {}", min_db, max_db),
            });
        }
        self.min_db = min_db;
        self.max_db = max_db;
        Ok(self)
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&smoothing) {
            return Err(Error::InvalidOption {
                key: "smoothing".to_string(),
                reason: format!("{} is outside 0..=1", smoothing),
            });
        }
        self.smoothing = smoothing;
        Ok(self)
    }

    pub fn with_transform(mut self, transform: Box<dyn FourierTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Center frequency of bin `k` in Hz.
    pub fn bin_frequency(&self, k: usize) -> f64 {
        k as f64 * self.sample_rate / self.fft_size as f64
    }

    pub fn decibel_range(&self) -> (f64, f64) {
        (self.min_db, self.max_db)
    }

    /// Smoothed magnitudes in decibels of the latest frame of `samples`.
    ///
    /// Short input is padded with leading silence.
    pub fn frequency_data(&mut self, samples: &[f32]) -> Vec<f64> {
        let n = self.fft_size;
        let tail = &samples[samples.len().saturating_sub(n)..];
        let pad = n - tail.len();

        let mut frame = vec![0.0f32; n];
        for (i, &x) in tail.iter().enumerate() {
            frame[pad + i] = (x as f64 * self.window[pad + i]) as f32;
        }

        let duration = n as f64 / self.sample_rate;
        let spectrum = self
            .transform
            .transform(&frame, duration, &self.bin_frequencies);

        let tau = self.smoothing;
        spectrum
            .magnitudes()
            .iter()
            .zip(self.previous.iter_mut())
            .map(|(&magnitude, previous)| {
                let smoothed = tau * *previous + (1.0 - tau) * magnitude / n as f64;
                *previous = if smoothed.is_finite() { smoothed } else { 0.0 };
                20.0 * previous.log10()
            })
            .collect()
    }

    /// Byte magnitudes of the latest frame, written into `out`.
    pub fn byte_frequency_data(&mut self, samples: &[f32], out: &mut Vec<u8>) {
        let (min_db, max_db) = (self.min_db, self.max_db);
        let levels = self.frequency_data(samples);
        out.clear();
        out.extend(levels.iter().map(|&db| db_to_byte(db, min_db, max_db)));
    }

    /// Forget the smoothing history.
    pub fn reset(&mut self) {
        self.previous.iter_mut().for_each(|v| *v = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DirectTransform;

    fn tone(bin: usize, size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| (2.0 * PI * bin as f64 * i as f64 / size as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn test_db_scaling_endpoints() {
        assert_eq!(db_to_byte(-70.0, -70.0, -30.0), 0);
        assert_eq!(db_to_byte(-30.0, -70.0, -30.0), 255);
        assert_eq!(db_to_byte(-50.0, -70.0, -30.0), 127);
        assert_eq!(db_to_byte(f64::NEG_INFINITY, -70.0, -30.0), 0);
        assert_eq!(db_to_byte(0.0, -70.0, -30.0), 255);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(Analyser::new(1000, 44_100.0).is_err());
        assert!(Analyser::new(16, 44_100.0).is_err());
        assert!(Analyser::new(1024, 0.0).is_err());
        assert!(Analyser::new(1024, 8_000.0)
            .unwrap()
            .with_decibels(-30.0, -70.0)
            .is_err());
        assert!(Analyser::new(1024, 8_000.0)
            .unwrap()
            .with_smoothing(1.5)
            .is_err());
    }

    #[test_log::test]
    fn test_tone_lights_its_bin() {
        let mut analyser = Analyser::new(256, 8_000.0)
            .unwrap()
            .with_transform(Box::new(DirectTransform));
        assert_eq!(analyser.frequency_bin_count(), 128);
        assert_eq!(analyser.bin_frequency(32), 1_000.0);

        let mut bytes = Vec::new();
        analyser.byte_frequency_data(&tone(32, 256), &mut bytes);

        assert_eq!(bytes.len(), 128);
        assert_eq!(bytes[32], 255);
        assert_eq!(bytes[100], 0);
        assert_eq!(bytes[5], 0);
    }

    #[test]
    fn test_smoothing_decays_towards_silence() {
        let mut analyser = Analyser::new(256, 8_000.0)
            .unwrap()
            .with_smoothing(0.5)
            .unwrap()
            .with_transform(Box::new(DirectTransform));

        let loud = analyser.frequency_data(&tone(32, 256));
        let fading = analyser.frequency_data(&vec![0.0; 256]);
        // Each silent frame halves the magnitude
        assert!((fading[32] - (loud[32] + 20.0 * 0.5f64.log10())).abs() < 1e-9);

        analyser.reset();
        let silent = analyser.frequency_data(&[]);
        assert!(silent.iter().all(|db| *db == f64::NEG_INFINITY));
    }
}
