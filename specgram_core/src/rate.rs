use crate::{Error, MAX_LINE_RATE};
use log::error;
use std::time::Duration;

/// A validated line rate in lines per second.
///
/// Zero selects a static display: one line per start, never repeated.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LineRate(f64);

impl LineRate {
    pub const STATIC: LineRate = LineRate(0.0);

    /// Validate `rate`, reporting anything outside `0..=50` or not a number.
    pub fn new(rate: f64) -> Result<Self, Error> {
        if rate.is_nan() || !(0.0..=MAX_LINE_RATE).contains(&rate) {
            error!("invalid line rate {} [0 <= lineRate <= {} lines/sec]", rate, MAX_LINE_RATE);
            return Err(Error::InvalidRate(rate));
        }
        Ok(Self(rate))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn is_static(&self) -> bool {
        self.0 == 0.0
    }

    /// Time between lines, `None` for a static display.
    pub fn interval(&self) -> Option<Duration> {
        if self.is_static() {
            None
        } else {
            Some(Duration::from_secs_f64(1.0 / self.0))
        }
    }
}

impl Default for LineRate {
    fn default() -> Self {
        Self(crate::DEFAULT_LINE_RATE)
    }
}

impl std::fmt::Display for LineRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lines/sec", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_accepts_the_documented_range() {
        assert!(LineRate::new(0.0).unwrap().is_static());
        assert_eq!(LineRate::new(0.0).unwrap().interval(), None);
        assert_eq!(
            LineRate::new(20.0).unwrap().interval(),
            Some(Duration::from_millis(50))
        );
        assert_eq!(LineRate::new(50.0).unwrap().get(), 50.0);
    }

    #[test_log::test]
    fn test_rejects_out_of_range_rates() {
        assert!(matches!(LineRate::new(60.0), Err(Error::InvalidRate(r)) if r == 60.0));
        assert!(LineRate::new(-1.0).is_err());
        assert!(LineRate::new(f64::NAN).is_err());
        assert!(LineRate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_default_is_thirty_lines_per_second() {
        let rate = LineRate::default();
        assert_eq!(rate.get(), 30.0);
        assert!(!rate.is_static());
    }
}
