//! CLI application for specgram

mod signal;
mod widgets;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info, warn};
use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use settings_manager::{ConfigManager, Settings};
use signal::SignalPipeline;
use specgram::{Direction, DisplayMode, LiveSpectrogram, Spectrogram};
use specgram_core::MAX_LINE_RATE;
use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use widgets::{SpectrumView, WaterfallView};

/// specgram - live scrolling spectrogram in the terminal
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    /// Config file to use instead of the one in the user config directory
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Scroll direction: up, down, left or right
    #[clap(long)]
    direction: Option<Direction>,

    /// Display mode: waterfall or rasterscan
    #[clap(long)]
    mode: Option<DisplayMode>,

    /// Lines per second, 0 to 50
    #[clap(long)]
    rate: Option<f64>,

    /// Log-scale the frequency axis
    #[clap(long)]
    log_scale: Option<bool>,

    /// Draw one line per start instead of scrolling continuously
    #[clap(long = "static")]
    static_display: bool,
}

impl Args {
    /// Overlay command line choices onto the loaded settings
    fn apply(&self, settings: &mut Settings) {
        if let Some(direction) = self.direction {
            settings.display.direction = direction;
        }
        if let Some(mode) = self.mode {
            settings.display.mode = mode;
        }
        if let Some(rate) = self.rate {
            settings.render.line_rate = Some(rate);
        }
        if let Some(log_scale) = self.log_scale {
            settings.render.log_scale = Some(log_scale);
        }
        if self.static_display {
            settings.render.line_rate = Some(0.0);
        }
    }
}

/// App state
struct App {
    /// Whether the app should exit
    should_quit: bool,
    settings: Settings,
    signal: SignalPipeline,
    display: LiveSpectrogram,
    status: String,
}

impl App {
    fn new(settings: Settings) -> Result<Self> {
        let signal = SignalPipeline::new(&settings.signal)?;
        let renderer = Spectrogram::builder(settings.display.mode)
            .size(settings.display.px_per_line, settings.display.lines)
            .direction(settings.display.direction)
            .input_len(signal.bin_count())
            .options(settings.render.clone())
            .build()?;
        let display = LiveSpectrogram::new(renderer, Arc::new(signal.output()));
        display.clear();

        Ok(Self {
            should_quit: false,
            settings,
            signal,
            display,
            status: "Press space to start".to_string(),
        })
    }

    fn line_rate(&self) -> f64 {
        self.display.with_renderer(|r| r.line_rate().get())
    }

    fn toggle_running(&mut self) {
        if self.display.is_running() {
            self.display.stop();
            self.status = "Stopped".to_string();
        } else {
            self.display.start();
            self.status = if self.display.is_running() {
                format!("Running at {} lines/sec", self.line_rate())
            } else {
                "Drew one line".to_string()
            };
        }
    }

    fn change_rate(&mut self, delta: f64) {
        let rate = (self.line_rate() + delta).clamp(0.0, MAX_LINE_RATE);
        match self.display.set_line_rate(rate) {
            Ok(()) => self.status = format!("Line rate {} lines/sec", rate),
            Err(e) => {
                warn!("{}", e);
                self.status = e.to_string();
            }
        }
    }

    /// Handle input events
    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Char(' ') => self.toggle_running(),
                KeyCode::Char('c') => {
                    self.display.clear();
                    self.status = "Cleared".to_string();
                }
                KeyCode::Char('l') => {
                    let log_scale = self.display.with_renderer(|r| {
                        let log_scale = !r.compositor().log_scale();
                        r.set_log_scale(log_scale);
                        log_scale
                    });
                    self.status = format!("Log scale {}", if log_scale { "on" } else { "off" });
                }
                KeyCode::Char('+') => self.change_rate(5.0),
                KeyCode::Char('-') => self.change_rate(-5.0),
                _ => {}
            }
        }
        Ok(())
    }

    /// Advance the synthetic input by one frame
    fn on_tick(&mut self) {
        self.signal.pump();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configure logging based on debug flag
    if args.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
        debug!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    info!("Starting specgram CLI");

    let config = match &args.config {
        Some(path) => ConfigManager::with_file(path),
        None => ConfigManager::new(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(anyhow::anyhow!("Failed to load config: {}", e));
        }
    };
    let mut settings = config.settings().clone();
    args.apply(&mut settings);
    settings.validate()?;
    let mut app = App::new(settings)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    let tick_rate = Duration::from_millis(20);
    let mut last_tick = Instant::now();

    let result = loop {
        // Render the UI
        if let Err(e) = terminal.draw(|f| ui(f, &app)) {
            break Err(e.into());
        }

        // Poll for events
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));

        match poll_event(timeout) {
            Ok(Some(event)) => {
                if let Err(e) = app.handle_event(event) {
                    break Err(e);
                }
            }
            Ok(None) => {}
            Err(e) => break Err(e),
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        // Check if we should quit
        if app.should_quit {
            break Ok(());
        }
    };

    app.display.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting specgram CLI");

    result
}

/// Wait up to `timeout` for the next terminal event
fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),      // Status area
            Constraint::Percentage(65), // Waterfall area
            Constraint::Min(6),         // Spectrum area
        ])
        .split(f.size());

    let display = &app.settings.display;
    let status = Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("specgram", Style::default().fg(Color::Green)),
            Span::raw(format!(
                " - {} {} | peak {:.0} Hz | {}",
                display.mode,
                display.direction,
                app.signal.peak_frequency(),
                app.status
            )),
        ]),
        Line::raw("space start/stop  c clear  l log scale  +/- rate  q quit"),
    ]))
    .block(Block::default().title("Status").borders(Borders::ALL));
    f.render_widget(status, chunks[0]);

    app.display.with_renderer(|r| {
        let view = WaterfallView::new(r.surface())
            .block(Block::default().title("Spectrogram").borders(Borders::ALL));
        f.render_widget(view, chunks[1]);
    });

    let spectrum = SpectrumView::new(app.signal.levels(), app.signal.max_frequency())
        .block(Block::default().title("Spectrum").borders(Borders::ALL));
    f.render_widget(spectrum, chunks[2]);
}
