//! Spectrogram rendering for specgram.
//!
//! This crate maps lines of intensity samples through a color map into a
//! scrolling raster surface, in waterfall or raster scan form.

pub mod colormap;
pub mod compositor;
pub mod image;
pub mod source;
pub mod spectrogram;
pub mod surface;

pub use colormap::{ColorMap, COLOR_MAP_SIZE};
pub use compositor::LineCompositor;
pub use image::raster_image;
pub use source::{SampleSource, SharedBuffer};
pub use spectrogram::{RenderConfig, Spectrogram, SpectrogramBuilder};
pub use surface::{PixelBuffer, PixelRegion, RasterSurface};
