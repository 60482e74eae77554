//! Continuously updating displays.

use log::{debug, info};
use scheduler::TimedLoop;
use specgram_core::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use visualization::{PixelBuffer, RasterSurface, SampleSource, Spectrogram};

fn lock<S: RasterSurface>(renderer: &Mutex<Spectrogram<S>>) -> MutexGuard<'_, Spectrogram<S>> {
    renderer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A renderer fed from a [`SampleSource`] once per line interval.
///
/// With a line rate of 0 each `start` draws exactly one line. Otherwise
/// `start` spawns a timed loop on the current tokio runtime that reads the
/// source and draws a line per tick until `stop`.
pub struct LiveSpectrogram<S: RasterSurface + Send + 'static = PixelBuffer> {
    renderer: Arc<Mutex<Spectrogram<S>>>,
    source: Arc<dyn SampleSource>,
    timed: TimedLoop,
}

impl<S: RasterSurface + Send + 'static> LiveSpectrogram<S> {
    pub fn new(renderer: Spectrogram<S>, source: Arc<dyn SampleSource>) -> Self {
        let timed = TimedLoop::new(renderer.interval());
        Self {
            renderer: Arc::new(Mutex::new(renderer)),
            source,
            timed,
        }
    }

    /// Shared handle to the renderer, e.g. for a UI thread to read the surface.
    pub fn renderer(&self) -> Arc<Mutex<Spectrogram<S>>> {
        self.renderer.clone()
    }

    /// Run `f` with the renderer locked.
    pub fn with_renderer<R>(&self, f: impl FnOnce(&mut Spectrogram<S>) -> R) -> R {
        f(&mut lock(&self.renderer))
    }

    pub fn is_running(&self) -> bool {
        self.timed.is_running()
    }

    /// Begin drawing. Must be called from within a tokio runtime unless the
    /// line rate is 0.
    pub fn start(&mut self) {
        let line_rate = lock(&self.renderer).line_rate();
        if line_rate.is_static() {
            debug!("Static display, drawing a single line");
            self.draw_from_source();
            return;
        }

        let renderer = self.renderer.clone();
        let source = self.source.clone();
        let mut samples = Vec::with_capacity(source.len());
        self.timed.set_interval(lock(&self.renderer).interval());
        self.timed.start(move || {
            source.read_into(&mut samples);
            lock(&renderer).new_line(samples.as_slice());
        });
        info!("Live display started at {}", line_rate);
    }

    /// Stop the loop and reset the write position. Drawn pixels are kept.
    pub fn stop(&mut self) {
        self.timed.stop();
        lock(&self.renderer).stop();
    }

    /// Draw one line from explicit samples, outside the loop.
    pub fn new_line<T: Copy + Into<f64>>(&self, samples: &[T]) {
        lock(&self.renderer).new_line(samples);
    }

    pub fn clear(&self) {
        lock(&self.renderer).clear();
    }

    /// Change the line rate. A running loop adopts the new interval on its
    /// next tick. A rate of 0 keeps the current interval and halts a running
    /// loop without resetting the write position.
    pub fn set_line_rate(&mut self, rate: f64) -> Result<(), Error> {
        let mut renderer = lock(&self.renderer);
        renderer.set_line_rate(rate)?;
        self.timed.set_interval(renderer.interval());
        if renderer.line_rate().is_static() && self.timed.is_running() {
            debug!("Line rate set to 0, halting the live loop");
            self.timed.stop();
        }
        Ok(())
    }

    fn draw_from_source(&self) {
        let mut samples = Vec::with_capacity(self.source.len());
        self.source.read_into(&mut samples);
        lock(&self.renderer).new_line(samples.as_slice());
    }
}
