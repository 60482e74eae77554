//! Shared vocabulary for specgram.
//!
//! Error type, pixel representation, scroll geometry and the render
//! option surface used by every other crate in the workspace.

use thiserror::Error;

pub mod direction;
pub mod options;
pub mod rate;

pub use direction::{Direction, DisplayMode, HeadDirection, Orientation, ScrollConfig};
pub use options::{OptionValue, RenderOptions};
pub use rate::LineRate;

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid color map: {0}")]
    InvalidColorMap(String),

    #[error("Invalid line rate {0} [0 <= lineRate <= 50 lines/sec]")]
    InvalidRate(f64),

    #[error("Invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error), // Catch-all for other errors
}

/// One pixel as red, green, blue, alpha.
pub type Rgba = [u8; 4];

/// Fully transparent pixel, also used for degenerate lookups.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Opaque white, used to mark the newest line of a scan display.
pub const HIGHLIGHT: Rgba = [255, 255, 255, 255];

/// Highest accepted line rate, in lines per second.
pub const MAX_LINE_RATE: f64 = 50.0;

/// Line rate used until one is configured.
pub const DEFAULT_LINE_RATE: f64 = 30.0;

/// Coerce an arbitrary sample value into the 0..=255 intensity domain.
///
/// NaN maps to 0, everything else is rounded to nearest and clamped.
pub fn clamp_intensity(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
