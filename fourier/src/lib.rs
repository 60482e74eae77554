//! Fourier transforms and signal helpers for specgram.
//!
//! The direct transform sums the DFT at arbitrary target frequencies in
//! O(n·m). An FFT-backed strategy is available behind the `fast` feature
//! and honors the same contract at whole-bin frequencies.

use log::trace;
use std::f64::consts::PI;

pub mod analyser;
pub mod plot;
pub mod signal;

pub use analyser::Analyser;
pub use signal::{
    average_down, compute_cosines, extract, linear_frequencies, log2_frequencies, winding_center,
};

/// One frequency of a computed spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumSample {
    pub frequency: f64,
    pub real: f64,
    pub imag: f64,
}

impl SpectrumSample {
    pub fn magnitude(&self) -> f64 {
        self.real.hypot(self.imag)
    }

    pub fn phase(&self) -> f64 {
        self.imag.atan2(self.real)
    }
}

/// Real and imaginary parts at a list of frequencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub reals: Vec<f64>,
    pub imags: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn sample(&self, i: usize) -> SpectrumSample {
        SpectrumSample {
            frequency: self.frequencies[i],
            real: self.reals[i],
            imag: self.imags[i],
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = SpectrumSample> + '_ {
        (0..self.len()).map(|i| self.sample(i))
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.samples().map(|s| s.magnitude()).collect()
    }

    /// Index of the largest magnitude, `None` for an empty spectrum.
    pub fn peak(&self) -> Option<usize> {
        self.magnitudes()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Computes a spectrum of `samples` spanning `duration_secs` at the given
/// frequencies in Hz.
pub trait FourierTransform: Send + Sync {
    fn transform(&self, samples: &[f32], duration_secs: f64, frequencies: &[f64]) -> Spectrum;

    fn name(&self) -> &'static str;
}

/// One DFT term at angular step `w` per sample.
fn direct_sum(samples: &[f32], w: f64) -> (f64, f64) {
    let (mut re, mut im) = (0.0, 0.0);
    for (i, &x) in samples.iter().enumerate() {
        let (sin, cos) = (i as f64 * w).sin_cos();
        re += x as f64 * cos;
        im -= x as f64 * sin;
    }
    (re, im)
}

/// Direct summation of the DFT, always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectTransform;

impl FourierTransform for DirectTransform {
    fn transform(&self, samples: &[f32], duration_secs: f64, frequencies: &[f64]) -> Spectrum {
        let n = samples.len();
        let mut spectrum = Spectrum {
            frequencies: frequencies.to_vec(),
            reals: vec![0.0; frequencies.len()],
            imags: vec![0.0; frequencies.len()],
        };
        if n == 0 {
            return spectrum;
        }

        let step = 2.0 * PI * duration_secs / n as f64;
        for (j, &f) in frequencies.iter().enumerate() {
            let (re, im) = direct_sum(samples, f * step);
            spectrum.reals[j] = re;
            spectrum.imags[j] = im;
        }
        trace!("Direct transform of {} samples at {} frequencies", n, frequencies.len());
        spectrum
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

#[cfg(feature = "fast")]
mod fast {
    use super::{direct_sum, FourierTransform, Spectrum};
    use log::trace;
    use rustfft::{num_complex::Complex, FftPlanner};
    use std::f64::consts::PI;
    use std::sync::Mutex;

    /// Largest distance from a whole bin still read from the FFT output.
    const BIN_TOLERANCE: f64 = 1e-9;

    /// FFT-backed transform with the same results as [`super::DirectTransform`].
    ///
    /// A frequency with `f · duration` on a whole bin `k` reads bin
    /// `k mod n` of one full FFT. Any other frequency falls back to the
    /// direct sum for that frequency alone.
    pub struct FastTransform {
        planner: Mutex<FftPlanner<f64>>,
    }

    impl FastTransform {
        pub fn new() -> Self {
            Self {
                planner: Mutex::new(FftPlanner::new()),
            }
        }
    }

    impl Default for FastTransform {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FourierTransform for FastTransform {
        fn transform(&self, samples: &[f32], duration_secs: f64, frequencies: &[f64]) -> Spectrum {
            let n = samples.len();
            let mut spectrum = Spectrum {
                frequencies: frequencies.to_vec(),
                reals: vec![0.0; frequencies.len()],
                imags: vec![0.0; frequencies.len()],
            };
            if n == 0 {
                return spectrum;
            }

            let fft = {
                let mut planner = self
                    .planner
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                planner.plan_fft_forward(n)
            };
            let mut buffer: Vec<Complex<f64>> =
                samples.iter().map(|&x| Complex::new(x as f64, 0.0)).collect();
            fft.process(&mut buffer);

            let step = 2.0 * PI * duration_secs / n as f64;
            let mut off_bin = 0;
            for (j, &f) in frequencies.iter().enumerate() {
                let k = f * duration_secs;
                let (re, im) = if (k - k.round()).abs() <= BIN_TOLERANCE {
                    let bin = buffer[(k.round() as i64).rem_euclid(n as i64) as usize];
                    (bin.re, bin.im)
                } else {
                    off_bin += 1;
                    direct_sum(samples, f * step)
                };
                spectrum.reals[j] = re;
                spectrum.imags[j] = im;
            }
            trace!(
                "FFT of {} samples, {} of {} frequencies summed directly",
                n,
                off_bin,
                frequencies.len()
            );
            spectrum
        }

        fn name(&self) -> &'static str {
            "fft"
        }
    }
}

#[cfg(feature = "fast")]
pub use fast::FastTransform;

/// The accelerated transform, if this build includes one.
pub fn accelerated() -> Option<Box<dyn FourierTransform>> {
    #[cfg(feature = "fast")]
    {
        Some(Box::new(FastTransform::new()))
    }
    #[cfg(not(feature = "fast"))]
    {
        None
    }
}

/// The accelerated transform when available, otherwise direct summation.
pub fn best_available() -> Box<dyn FourierTransform> {
    accelerated().unwrap_or_else(|| Box::new(DirectTransform))
}

/// Direct transform of `samples` at `frequencies`, returning `(reals, imags)`.
pub fn transform(samples: &[f32], duration_secs: f64, frequencies: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let spectrum = DirectTransform.transform(samples, duration_secs, frequencies);
    (spectrum.reals, spectrum.imags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_peaks_at_its_frequency() {
        let secs = 2.0;
        let n = 2_000;
        let f0 = 13.0;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * f0 * secs * i as f64 / n as f64).cos() as f32)
            .collect();

        let frequencies = linear_frequencies(40.0, 160);
        assert!(frequencies.contains(&f0));
        let spectrum = DirectTransform.transform(&samples, secs, &frequencies);
        let peak = spectrum.peak().unwrap();
        assert_eq!(spectrum.frequencies[peak], f0);

        // Half the energy lands at the positive frequency
        assert!((spectrum.sample(peak).magnitude() - n as f64 / 2.0).abs() < 1e-6 * n as f64);
    }

    #[test]
    fn test_cosine_peaks_on_log_spaced_frequencies() {
        let secs = 1.0;
        let n = 4_096;
        let frequencies = log2_frequencies(20.0, 1_280.0, 7);
        let f0 = frequencies[4];
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * f0 * secs * i as f64 / n as f64).cos() as f32)
            .collect();

        let spectrum = DirectTransform.transform(&samples, secs, &frequencies);
        assert_eq!(spectrum.peak(), Some(4));
    }

    #[test]
    fn test_sine_is_purely_imaginary() {
        let n = 64;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 4.0 * i as f64 / n as f64).sin() as f32)
            .collect();
        let (reals, imags) = transform(&samples, 1.0, &[4.0]);

        assert!(reals[0].abs() < 1e-4);
        assert!((imags[0] + n as f64 / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_input_gives_zeros() {
        let spectrum = DirectTransform.transform(&[], 1.0, &[1.0, 2.0]);
        assert_eq!(spectrum.reals, vec![0.0, 0.0]);
        assert_eq!(spectrum.imags, vec![0.0, 0.0]);
        assert_eq!(Spectrum::default().peak(), None);
    }

    #[test]
    fn test_sample_phase_and_magnitude() {
        let s = SpectrumSample {
            frequency: 1.0,
            real: 3.0,
            imag: -4.0,
        };
        assert_eq!(s.magnitude(), 5.0);
        assert!((s.phase() + (4.0f64).atan2(3.0)).abs() < 1e-12);
    }

    #[cfg(feature = "fast")]
    #[test]
    fn test_fast_matches_direct_on_whole_bins() {
        let n = 256;
        let secs = 0.5;
        let samples = compute_cosines(n, secs, &[6.0, 22.0], &[1.0, 3.0]);
        let frequencies: Vec<f64> = (0..n / 2).map(|k| k as f64 / secs).collect();

        let direct = DirectTransform.transform(&samples, secs, &frequencies);
        let fast = FastTransform::new().transform(&samples, secs, &frequencies);
        for k in 0..frequencies.len() {
            assert!((direct.reals[k] - fast.reals[k]).abs() < 1e-6, "bin {}", k);
            assert!((direct.imags[k] - fast.imags[k]).abs() < 1e-6, "bin {}", k);
        }

        // Whole bins past either end alias the same way the direct sum does
        let wrapped = [10_000.0, -4.0];
        let direct = DirectTransform.transform(&samples, secs, &wrapped);
        let fast = FastTransform::new().transform(&samples, secs, &wrapped);
        for k in 0..wrapped.len() {
            assert!((direct.reals[k] - fast.reals[k]).abs() < 1e-6, "frequency {}", wrapped[k]);
            assert!((direct.imags[k] - fast.imags[k]).abs() < 1e-6, "frequency {}", wrapped[k]);
        }
    }

    #[test]
    fn test_best_available_matches_direct_between_bins() {
        let n = 256;
        let secs = 1.0;
        let samples = compute_cosines(n, secs, &[10.0], &[1.0]);
        let mut frequencies = log2_frequencies(20.0, 80.0, 5);
        frequencies.extend([10.0, 10.4, 3.25]);

        let direct = DirectTransform.transform(&samples, secs, &frequencies);
        let best = best_available().transform(&samples, secs, &frequencies);
        for k in 0..frequencies.len() {
            assert!(
                (direct.reals[k] - best.reals[k]).abs() < 1e-6,
                "real at {} Hz",
                frequencies[k]
            );
            assert!(
                (direct.imags[k] - best.imags[k]).abs() < 1e-6,
                "imag at {} Hz",
                frequencies[k]
            );
        }
    }

    #[test]
    fn test_best_available_reports_a_strategy() {
        let strategy = best_available();
        if cfg!(feature = "fast") {
            assert_eq!(strategy.name(), "fft");
        } else {
            assert_eq!(strategy.name(), "direct");
        }
    }
}
