//! Synthetic input: a tone mix run through the analyser into a shared buffer.

use fourier::{compute_cosines, Analyser};
use log::trace;
use settings_manager::SignalSettings;
use specgram::{Error, SharedBuffer};

/// Relative depth of the slow pitch wobble applied to each tone.
const WOBBLE_DEPTH: f64 = 0.03;

pub struct SignalPipeline {
    analyser: Analyser,
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
    frame: u64,
    levels: Vec<u8>,
    output: SharedBuffer,
}

impl SignalPipeline {
    pub fn new(signal: &SignalSettings) -> Result<Self, Error> {
        let analyser = Analyser::new(signal.fft_size, signal.sample_rate)?
            .with_decibels(signal.min_db, signal.max_db)?
            .with_smoothing(signal.smoothing)?;
        let bins = analyser.frequency_bin_count();

        Ok(Self {
            analyser,
            frequencies: signal.frequencies.clone(),
            amplitudes: signal.amplitudes.clone(),
            frame: 0,
            levels: vec![0; bins],
            output: SharedBuffer::new(bins),
        })
    }

    /// Buffer the renderer reads its lines from.
    pub fn output(&self) -> SharedBuffer {
        self.output.clone()
    }

    pub fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count()
    }

    /// Highest frequency covered by the levels.
    pub fn max_frequency(&self) -> f64 {
        self.analyser.sample_rate() / 2.0
    }

    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub fn peak_frequency(&self) -> f64 {
        let peak = self
            .levels
            .iter()
            .enumerate()
            .max_by_key(|(_, level)| **level)
            .map(|(k, _)| k)
            .unwrap_or(0);
        self.analyser.bin_frequency(peak)
    }

    /// Synthesize and analyse the next frame, then publish its levels.
    pub fn pump(&mut self) {
        let n = self.analyser.fft_size();
        let secs = n as f64 / self.analyser.sample_rate();
        let phase = self.frame as f64 * 0.05;
        let frequencies: Vec<f64> = self
            .frequencies
            .iter()
            .enumerate()
            .map(|(i, f)| f * (1.0 + WOBBLE_DEPTH * (phase + i as f64).sin()))
            .collect();

        let samples = compute_cosines(n, secs, &frequencies, &self.amplitudes);
        self.analyser.byte_frequency_data(&samples, &mut self.levels);

        let line: Vec<f32> = self.levels.iter().map(|&v| v as f32).collect();
        self.output.write(&line);
        self.frame += 1;
        trace!("Pumped frame {}", self.frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specgram::SampleSource;

    #[test]
    fn test_pump_publishes_levels() {
        let settings = SignalSettings {
            frequencies: vec![1_000.0],
            amplitudes: vec![1.0],
            ..SignalSettings::default()
        };
        let mut pipeline = SignalPipeline::new(&settings).unwrap();
        let output = pipeline.output();
        assert_eq!(output.len(), settings.fft_size / 2);

        pipeline.pump();
        let mut line = Vec::new();
        output.read_into(&mut line);

        assert_eq!(line.len(), pipeline.bin_count());
        assert!(line.iter().any(|v| *v == 255.0));
        // The first frame has no wobble offset on the first tone
        assert!((pipeline.peak_frequency() - 1_000.0).abs() <= 8.0);
        assert_eq!(pipeline.max_frequency(), 4_000.0);
    }

    #[test]
    fn test_invalid_signal_settings_fail() {
        let settings = SignalSettings {
            fft_size: 1000,
            ..SignalSettings::default()
        };
        assert!(SignalPipeline::new(&settings).is_err());
    }
}
