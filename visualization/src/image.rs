//! One-shot raster images built from a full 2-D array.

use crate::spectrogram::SpectrogramBuilder;
use crate::surface::PixelBuffer;
use log::debug;
use specgram_core::{Direction, DisplayMode, Error, RenderOptions};

/// Render `data` (one slice per row, values 0..=255) as a static image.
///
/// `cols` is the number of pixels per line. Only `Up`, `Down` and `Left`
/// are honored; any other direction draws downward. The line rate is
/// forced to 0 so no highlight line is drawn.
pub fn raster_image<T: Copy + Into<f64>>(
    data: &[Vec<T>],
    cols: usize,
    direction: Direction,
    options: RenderOptions,
) -> Result<PixelBuffer, Error> {
    let direction = match direction {
        Direction::Up | Direction::Down | Direction::Left => direction,
        Direction::Right => {
            debug!("Raster images do not draw rightward, using down");
            Direction::Down
        }
    };

    let mut options = options;
    options.line_rate = Some(0.0);

    let mut raster = SpectrogramBuilder::new(DisplayMode::RasterScan)
        .size(cols, data.len())
        .direction(direction)
        .input_len(cols)
        .options(options)
        .build()?;

    for row in data {
        raster.new_line(row.as_slice());
    }
    Ok(raster.into_surface())
}
