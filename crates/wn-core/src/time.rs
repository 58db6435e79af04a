//! Clock-time value type.
//!
//! Hydraulic settings (duration, step sizes, report start) and solver
//! output timestamps are exchanged as `"HH:MM"` strings. `ClockTime`
//! stores whole minutes so arithmetic and comparison stay exact; hours
//! may exceed 24 (a 72-hour duration is "72:00").

use core::fmt;
use core::str::FromStr;

use crate::error::{WnError, WnResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u32,
}

impl ClockTime {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self {
            minutes: hours * 60 + minutes,
        }
    }

    /// Truncate a seconds offset to whole minutes.
    pub fn from_seconds(seconds: u64) -> Self {
        let hours = (seconds / 3600) as u32;
        let minutes = ((seconds % 3600) / 60) as u32;
        Self::new(hours, minutes)
    }

    /// Hours component (not bounded to 24).
    pub fn hours(self) -> u32 {
        self.minutes / 60
    }

    /// Minutes component, 0..60.
    pub fn minutes(self) -> u32 {
        self.minutes % 60
    }

    pub fn total_minutes(self) -> u32 {
        self.minutes
    }

    pub fn as_decimal_hours(self) -> f64 {
        f64::from(self.minutes) / 60.0
    }
}

impl FromStr for ClockTime {
    type Err = WnError;

    fn from_str(text: &str) -> WnResult<Self> {
        let malformed = || WnError::MalformedClockTime {
            text: text.to_string(),
        };

        let (h, m) = text.split_once(':').ok_or_else(malformed)?;
        let hours: u32 = h.parse().map_err(|_| malformed())?;
        let minutes: u32 = m.parse().map_err(|_| malformed())?;
        if m.len() != 2 || minutes >= 60 {
            return Err(malformed());
        }
        Ok(Self::new(hours, minutes))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for text in ["00:00", "06:30", "23:59", "72:00"] {
            let t: ClockTime = text.parse().unwrap();
            assert_eq!(t.to_string(), text);
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        for text in ["", "12", "12:", ":30", "12:60", "12:5", "ab:cd", "12:00:00"] {
            assert!(text.parse::<ClockTime>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn from_seconds_truncates() {
        // 3661 s = 1 h, 1 min, 1 s
        let t = ClockTime::from_seconds(3661);
        assert_eq!(t.to_string(), "01:01");
        assert_eq!(ClockTime::from_seconds(59).to_string(), "00:00");
        assert_eq!(ClockTime::from_seconds(86_400).to_string(), "24:00");
    }

    #[test]
    fn decimal_hours() {
        let t = ClockTime::new(1, 30);
        assert!((t.as_decimal_hours() - 1.5).abs() < 1e-12);
    }

    proptest::proptest! {
        #[test]
        fn display_parse_round_trip(h in 0u32..200, m in 0u32..60) {
            let t = ClockTime::new(h, m);
            let parsed: ClockTime = t.to_string().parse().unwrap();
            proptest::prop_assert_eq!(parsed, t);
        }
    }
}
