use fourier::{compute_cosines, Analyser, DirectTransform};
use settings_manager::Settings;
use specgram::{
    ColorMap, Direction, LiveSpectrogram, RasterSurface, RenderOptions, SharedBuffer, Spectrogram,
};
use std::sync::Arc;
use std::time::Duration;

const FFT_SIZE: usize = 256;
const SAMPLE_RATE: f64 = 8_000.0;

/// A tone exactly on analyser bin `bin`.
fn tone(bin: usize) -> Vec<f32> {
    let secs = FFT_SIZE as f64 / SAMPLE_RATE;
    let freq = bin as f64 * SAMPLE_RATE / FFT_SIZE as f64;
    compute_cosines(FFT_SIZE, secs, &[freq], &[1.0])
}

fn analyse(samples: &[f32]) -> Vec<f32> {
    let mut analyser = Analyser::new(FFT_SIZE, SAMPLE_RATE)
        .unwrap()
        .with_transform(Box::new(DirectTransform));
    let mut bytes = Vec::new();
    analyser.byte_frequency_data(samples, &mut bytes);
    bytes.into_iter().map(f32::from).collect()
}

#[test_log::test]
fn test_analysed_tone_lands_on_its_pixel() {
    let levels = analyse(&tone(32));
    assert_eq!(levels.len(), FFT_SIZE / 2);

    let mut waterfall = Spectrogram::waterfall(
        levels.len(),
        levels.len(),
        16,
        Direction::Down,
        RenderOptions::new().with_line_rate(0.0),
    )
    .unwrap();
    waterfall.new_line(levels.as_slice());

    let jet = ColorMap::jet();
    let head = waterfall.next_line();
    assert_eq!(waterfall.surface().pixel(32, head), jet.lookup(255));
    assert_eq!(waterfall.surface().pixel(100, head), jet.lookup(0));
}

#[tokio::test(start_paused = true)]
async fn test_live_waterfall_scrolls_source_lines() {
    let buffer = SharedBuffer::new(FFT_SIZE / 2);
    let renderer = Spectrogram::waterfall(
        FFT_SIZE / 2,
        FFT_SIZE / 2,
        8,
        Direction::Up,
        RenderOptions::new().with_line_rate(10.0),
    )
    .unwrap();
    let mut display = LiveSpectrogram::new(renderer, Arc::new(buffer.clone()));
    display.clear();

    buffer.write(&analyse(&tone(10)));
    display.start();
    // First tick is immediate, the next lands at twice the interval
    tokio::time::sleep(Duration::from_millis(150)).await;

    buffer.write(&analyse(&tone(50)));
    tokio::time::sleep(Duration::from_millis(100)).await;
    display.stop();

    let jet = ColorMap::jet();
    display.with_renderer(|r| {
        let surface = r.surface();
        let head = r.next_line();
        // An upward waterfall writes at the bottom row and pushes content up
        assert_eq!(head, surface.height() - 1);
        assert_eq!(surface.pixel(50, head), jet.lookup(255));
        assert_eq!(surface.pixel(10, head), jet.lookup(0));
        assert_eq!(surface.pixel(10, head - 1), jet.lookup(255));
        // Rows never written still hold the cleared background
        assert_eq!(surface.pixel(0, 0), jet.background());
    });
}

#[test]
fn test_settings_drive_renderer_construction() {
    let settings = Settings::default();
    let bins = settings.signal.fft_size / 2;
    let renderer = Spectrogram::builder(settings.display.mode)
        .size(settings.display.px_per_line, settings.display.lines)
        .direction(settings.display.direction)
        .input_len(bins)
        .options(settings.render.clone())
        .build()
        .unwrap();

    assert_eq!(renderer.line_rate().get(), 45.0);
    assert!(renderer.compositor().log_scale());
    assert_eq!(renderer.compositor().end_offset(), bins as f64);
    // Rightward displays draw lines as columns
    assert_eq!(renderer.surface().width(), settings.display.lines);
    assert_eq!(renderer.surface().height(), settings.display.px_per_line);
}

#[test]
fn test_static_display_draws_once_per_start() {
    let buffer = SharedBuffer::new(4);
    buffer.write(&[255.0; 4]);
    let renderer = Spectrogram::rasterscan(
        4,
        4,
        3,
        Direction::Down,
        RenderOptions::new().with_line_rate(0.0),
    )
    .unwrap();
    let mut display = LiveSpectrogram::new(renderer, Arc::new(buffer));

    // No runtime needed for static displays
    display.start();
    display.start();
    assert!(!display.is_running());
    display.with_renderer(|r| {
        assert_eq!(r.next_line(), 2);
        assert_eq!(r.surface().pixel(0, 1), ColorMap::jet().lookup(255));
        assert_eq!(r.surface().pixel(0, 2), [0, 0, 0, 0]);
    });
}
