//! specgram: scrolling spectrogram displays
//!
//! Re-exports the workspace crates and adds [`LiveSpectrogram`], which
//! drives a renderer from a sample source at the renderer's line rate.

pub mod stream;

pub use stream::LiveSpectrogram;

pub use fourier::{self, DirectTransform, FourierTransform, Spectrum};
pub use scheduler::{self, Clock, RateTimer, TimedLoop};
pub use settings_manager::{self, ConfigManager, Settings};
pub use specgram_core::{
    self, Direction, DisplayMode, Error, LineRate, OptionValue, RenderOptions, Rgba,
};
pub use visualization::{
    self, raster_image, ColorMap, PixelBuffer, RasterSurface, SampleSource, SharedBuffer,
    Spectrogram, SpectrogramBuilder,
};
