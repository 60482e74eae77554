use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How new lines enter the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Every new line shifts the existing content one line toward the tail.
    #[default]
    Waterfall,
    /// New lines overwrite the raster at an advancing, wrapping position.
    #[serde(alias = "raster")]
    RasterScan,
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "waterfall" | "wf" => Ok(DisplayMode::Waterfall),
            "rasterscan" | "raster" | "rs" => Ok(DisplayMode::RasterScan),
            other => Err(Error::Config(format!("Unknown display mode '{}'", other))),
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Waterfall => write!(f, "waterfall"),
            DisplayMode::RasterScan => write!(f, "rasterscan"),
        }
    }
}

/// Public direction names accepted by the display constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a direction name, falling back to `Down` for anything unknown.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", name)
    }
}

/// Whether lines are pixel rows or pixel columns of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Lines are rows; the surface is `px_per_line` wide and `lines` tall.
    Vertical,
    /// Lines are columns; the surface is `lines` wide and `px_per_line` tall.
    Horizontal,
}

/// Which end of the line axis receives new data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadDirection {
    /// Head at the high index.
    Forward,
    /// Head at the low index.
    Reverse,
}

/// One of the four fixed scroll configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollConfig {
    pub orientation: Orientation,
    pub head: HeadDirection,
}

impl ScrollConfig {
    pub fn new(orientation: Orientation, head: HeadDirection) -> Self {
        Self { orientation, head }
    }

    /// Resolve a public direction name for the given display mode.
    ///
    /// Waterfalls and scans disagree on the vertical pair: a downward
    /// waterfall writes at the top and pushes content down, while a
    /// downward scan starts at the top and walks down.
    pub fn for_display(mode: DisplayMode, direction: Direction) -> Self {
        use HeadDirection::*;
        use Orientation::*;

        match (mode, direction) {
            (DisplayMode::Waterfall, Direction::Up) => Self::new(Vertical, Forward),
            (DisplayMode::Waterfall, Direction::Down) => Self::new(Vertical, Reverse),
            (DisplayMode::Waterfall, Direction::Left) => Self::new(Horizontal, Forward),
            (DisplayMode::Waterfall, Direction::Right) => Self::new(Horizontal, Reverse),
            (DisplayMode::RasterScan, Direction::Up) => Self::new(Vertical, Reverse),
            (DisplayMode::RasterScan, Direction::Down) => Self::new(Vertical, Forward),
            (DisplayMode::RasterScan, Direction::Left) => Self::new(Horizontal, Forward),
            (DisplayMode::RasterScan, Direction::Right) => Self::new(Horizontal, Reverse),
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    pub fn is_reverse(&self) -> bool {
        self.head == HeadDirection::Reverse
    }

    /// Whether a scan advances toward higher line indices.
    pub fn scan_advances_forward(&self) -> bool {
        self.is_vertical() != self.is_reverse()
    }

    /// Line index that receives the first line after construction or stop.
    pub fn initial_line(&self, mode: DisplayMode, lines: usize) -> usize {
        let last = lines.saturating_sub(1);
        match mode {
            DisplayMode::Waterfall => {
                if self.is_reverse() {
                    0
                } else {
                    last
                }
            }
            DisplayMode::RasterScan => {
                if self.scan_advances_forward() {
                    0
                } else {
                    last
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing_is_case_insensitive() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("Left".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(" right ".parse::<Direction>().unwrap(), Direction::Right);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::parse_or_default("sideways"), Direction::Down);
    }

    #[test]
    fn test_waterfall_directions() {
        let down = ScrollConfig::for_display(DisplayMode::Waterfall, Direction::Down);
        assert_eq!(down.orientation, Orientation::Vertical);
        assert!(down.is_reverse());
        assert_eq!(down.initial_line(DisplayMode::Waterfall, 10), 0);

        let up = ScrollConfig::for_display(DisplayMode::Waterfall, Direction::Up);
        assert_eq!(up.initial_line(DisplayMode::Waterfall, 10), 9);

        let right = ScrollConfig::for_display(DisplayMode::Waterfall, Direction::Right);
        assert_eq!(right.orientation, Orientation::Horizontal);
        assert_eq!(right.initial_line(DisplayMode::Waterfall, 10), 0);
    }

    #[test]
    fn test_scan_directions() {
        let down = ScrollConfig::for_display(DisplayMode::RasterScan, Direction::Down);
        assert!(down.scan_advances_forward());
        assert_eq!(down.initial_line(DisplayMode::RasterScan, 8), 0);

        let up = ScrollConfig::for_display(DisplayMode::RasterScan, Direction::Up);
        assert!(!up.scan_advances_forward());
        assert_eq!(up.initial_line(DisplayMode::RasterScan, 8), 7);

        let right = ScrollConfig::for_display(DisplayMode::RasterScan, Direction::Right);
        assert!(right.scan_advances_forward());
        assert_eq!(right.initial_line(DisplayMode::RasterScan, 8), 0);

        let left = ScrollConfig::for_display(DisplayMode::RasterScan, Direction::Left);
        assert!(!left.scan_advances_forward());
        assert_eq!(left.initial_line(DisplayMode::RasterScan, 8), 7);
    }

    #[test]
    fn test_display_mode_parsing() {
        assert_eq!("RS".parse::<DisplayMode>().unwrap(), DisplayMode::RasterScan);
        assert_eq!("Waterfall".parse::<DisplayMode>().unwrap(), DisplayMode::Waterfall);
        assert!("spiral".parse::<DisplayMode>().is_err());
    }
}
