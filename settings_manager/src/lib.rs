//! Configuration management for specgram
//!
//! This crate handles loading, saving and accessing
//! application configuration. Settings are layered: built-in defaults,
//! then the TOML config file, then `SPECGRAM_*` environment variables
//! (nested keys separated by `__`, e.g. `SPECGRAM_DISPLAY__MODE=rasterscan`).

use config::{Config, Environment, File, FileFormat};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use specgram_core::{Direction, DisplayMode, Error, LineRate, RenderOptions};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SPECGRAM";

/// Geometry and scroll behavior of the display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Pixels along each drawn line
    pub px_per_line: usize,

    /// Number of lines kept on screen
    pub lines: usize,

    pub mode: DisplayMode,

    pub direction: Direction,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            px_per_line: 200,
            lines: 200,
            mode: DisplayMode::Waterfall,
            direction: Direction::Right,
        }
    }
}

/// Synthetic input signal and the analyser that turns it into lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalSettings {
    /// Tone frequencies in Hz
    pub frequencies: Vec<f64>,

    /// Relative tone amplitudes, one per frequency
    pub amplitudes: Vec<f64>,

    /// Samples per second
    pub sample_rate: f64,

    /// Analyser frame size, a power of two
    pub fft_size: usize,

    pub min_db: f64,

    pub max_db: f64,

    /// Weight of the previous frame, 0..=1
    pub smoothing: f64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            frequencies: vec![220.0, 440.0, 1318.51],
            amplitudes: vec![1.0, 0.6, 0.3],
            sample_rate: 8000.0,
            fft_size: 1024,
            min_db: -70.0,
            max_db: -30.0,
            smoothing: 0.2,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,

    /// Options handed to the renderer on construction
    pub render: RenderOptions,

    pub signal: SignalSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display: DisplaySettings::default(),
            render: RenderOptions::new()
                .with_line_rate(45.0)
                .with_log_scale(true),
            signal: SignalSettings::default(),
        }
    }
}

impl Settings {
    /// Check the combination of values a renderer and analyser can use
    pub fn validate(&self) -> Result<(), Error> {
        if self.display.px_per_line == 0 || self.display.lines == 0 {
            return Err(Error::Config(format!(
                "Display must be at least 1x1, got {}x{}",
                self.display.px_per_line, self.display.lines
            )));
        }
        if let Some(rate) = self.render.line_rate {
            LineRate::new(rate)?;
        }
        let signal = &self.signal;
        if signal.frequencies.len() != signal.amplitudes.len() {
            return Err(Error::Config(format!(
                "{} frequencies but {} amplitudes",
                signal.frequencies.len(),
                signal.amplitudes.len()
            )));
        }
        if !(signal.min_db < signal.max_db) {
            return Err(Error::Config(format!(
                "min_db {} must be below max_db {}",
                signal.min_db, signal.max_db
            )));
        }
        if !(signal.sample_rate > 0.0) {
            return Err(Error::Config(format!(
                "Sample rate must be positive, got {}",
                signal.sample_rate
            )));
        }
        Ok(())
    }
}

/// Configuration manager
pub struct ConfigManager {
    settings: Settings,
    config_file: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager from the user's config directory
    pub fn new() -> Result<Self, Error> {
        // Get user's config directory
        let mut config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Failed to determine config directory".to_string()))?;
        config_dir.push("specgram");

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        Self::with_file(config_dir.join("config.toml"))
    }

    /// Create a new ConfigManager with a custom file path
    pub fn with_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::load(path.as_ref(), ENV_PREFIX)
    }

    fn load(config_file: &Path, env_prefix: &str) -> Result<Self, Error> {
        if !config_file.exists() {
            debug!("Config file {:?} not found, using defaults", config_file);
        }
        let settings = Self::load_layered(config_file, env_prefix)?;
        settings.validate()?;
        info!("Loaded settings from {:?}", config_file);

        Ok(Self {
            settings,
            config_file: config_file.to_path_buf(),
        })
    }

    /// Merge defaults, the optional TOML file and the environment
    fn load_layered(path: &Path, env_prefix: &str) -> Result<Settings, Error> {
        let defaults = Config::try_from(&Settings::default())
            .map_err(|e| Error::Config(format!("Failed to build defaults: {}", e)))?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?
            .try_deserialize()
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save settings to the config file
    pub fn save(&self) -> Result<(), Error> {
        let toml = toml::to_string_pretty(&self.settings)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;

        // Ensure parent directory exists
        if let Some(parent) = self.config_file.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        fs::write(&self.config_file, toml)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        debug!("Saved config to {:?}", self.config_file);
        Ok(())
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Get the current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to settings
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings with a new value
    pub fn update_settings(&mut self, new_settings: Settings) {
        self.settings = new_settings;
    }
}
