//! Render option surface.
//!
//! Options can be given as a typed struct, as individual string-keyed
//! values, or as a JSON object. Keys are matched case-insensitively and
//! anything unrecognized or malformed is dropped with a debug message.

use crate::{clamp_intensity, Error};
use log::debug;
use serde::{Deserialize, Serialize};

/// A loosely typed option value, as it arrives from a key/value surface.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<OptionValue>),
}

impl OptionValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) if !n.is_nan() => Some(*n),
            OptionValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Null => Some(false),
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => self.as_number().map(|n| n != 0.0),
            },
            _ => self.as_number().map(|n| n != 0.0),
        }
    }

    fn as_color_entries(&self) -> Option<Vec<Vec<u8>>> {
        let OptionValue::List(entries) = self else {
            return None;
        };
        entries
            .iter()
            .map(|entry| match entry {
                OptionValue::List(channels) => channels
                    .iter()
                    .map(|c| c.as_number().map(clamp_intensity))
                    .collect::<Option<Vec<u8>>>(),
                _ => None,
            })
            .collect()
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<&serde_json::Value> for OptionValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => OptionValue::Null,
            serde_json::Value::Bool(b) => OptionValue::Bool(*b),
            serde_json::Value::Number(n) => OptionValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => OptionValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                OptionValue::List(items.iter().map(OptionValue::from).collect())
            }
            // Nested objects are never meaningful here
            serde_json::Value::Object(_) => OptionValue::Text(value.to_string()),
        }
    }
}

/// Settings recognized by the spectrogram renderers.
///
/// Every field is optional; `None` leaves the renderer's current value alone.
/// Lowercased keys are accepted when reading, as some config layers fold case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Lines per second for continuously updating displays, 0 for static.
    #[serde(skip_serializing_if = "Option::is_none", alias = "linerate")]
    pub line_rate: Option<f64>,

    /// First input sample index mapped onto the line.
    #[serde(skip_serializing_if = "Option::is_none", alias = "startbin")]
    pub start_bin: Option<f64>,

    /// Input sample index mapped onto the end of the line.
    #[serde(skip_serializing_if = "Option::is_none", alias = "endbin")]
    pub end_bin: Option<f64>,

    /// Compress the sample axis logarithmically.
    #[serde(skip_serializing_if = "Option::is_none", alias = "logscale")]
    pub log_scale: Option<bool>,

    /// Replacement color map, each entry `[r, g, b, a]`.
    #[serde(skip_serializing_if = "Option::is_none", alias = "colormap")]
    pub color_map: Option<Vec<Vec<u8>>>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_rate(mut self, rate: f64) -> Self {
        self.line_rate = Some(rate);
        self
    }

    pub fn with_bins(mut self, start: f64, end: f64) -> Self {
        self.start_bin = Some(start);
        self.end_bin = Some(end);
        self
    }

    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = Some(log_scale);
        self
    }

    pub fn with_color_map(mut self, entries: Vec<Vec<u8>>) -> Self {
        self.color_map = Some(entries);
        self
    }

    /// Set a single option by name.
    ///
    /// Unrecognized keys and malformed values yield `InvalidOption` and leave
    /// the options unchanged.
    pub fn set(&mut self, key: &str, value: &OptionValue) -> Result<(), Error> {
        let invalid = |reason: &str| Error::InvalidOption {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        match key.to_ascii_lowercase().as_str() {
            "linerate" => {
                let rate = value.as_number().ok_or_else(|| invalid("not a number"))?;
                self.line_rate = Some(rate);
            }
            "startbin" => {
                let bin = value
                    .as_number()
                    .filter(|b| *b >= 0.0)
                    .ok_or_else(|| invalid("expected a non-negative number"))?;
                self.start_bin = Some(bin);
            }
            "endbin" => {
                let bin = value
                    .as_number()
                    .filter(|b| *b >= 0.0)
                    .ok_or_else(|| invalid("expected a non-negative number"))?;
                self.end_bin = Some(bin);
            }
            "logscale" => {
                let flag = value.as_flag().ok_or_else(|| invalid("not a boolean"))?;
                self.log_scale = Some(flag);
            }
            "colormap" => {
                let entries = value
                    .as_color_entries()
                    .ok_or_else(|| invalid("expected a list of [r, g, b, a] entries"))?;
                self.color_map = Some(entries);
            }
            _ => return Err(invalid("unrecognized option")),
        }
        Ok(())
    }

    /// Set an option, logging and dropping it if it is rejected.
    pub fn set_lenient(&mut self, key: &str, value: &OptionValue) {
        if let Err(e) = self.set(key, value) {
            debug!("Ignoring option: {}", e);
        }
    }

    /// Build options from a JSON object such as `{"lineRate": 20, "logScale": true}`.
    ///
    /// Only a document that is not a JSON object is an error.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse options: {}", e)))?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Config("Options must be a JSON object".to_string()))?;

        let mut options = Self::default();
        for (key, value) in object {
            options.set_lenient(key, &OptionValue::from(value));
        }
        Ok(options)
    }

    /// Overlay the fields that are set in `other` onto `self`.
    pub fn merge(&mut self, other: &RenderOptions) {
        if other.line_rate.is_some() {
            self.line_rate = other.line_rate;
        }
        if other.start_bin.is_some() {
            self.start_bin = other.start_bin;
        }
        if other.end_bin.is_some() {
            self.end_bin = other.end_bin;
        }
        if other.log_scale.is_some() {
            self.log_scale = other.log_scale;
        }
        if other.color_map.is_some() {
            self.color_map = other.color_map.clone();
        }
    }
}
