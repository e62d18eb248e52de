//! Time-based rolling period for file outputs

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a file output starts a new period stamp
///
/// Size-based rolling is configured separately (`rolling_size_kb`) and
/// applies within a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationInterval {
    /// Never start a new period; only the size limit rolls files
    Infinite,
    Year,
    Month,
    Day,
    #[default]
    Hour,
    Minute,
}

impl RotationInterval {
    /// Start of the period containing `time`
    ///
    /// Returns `None` for `Infinite`, whose single period never changes.
    #[must_use]
    pub fn period_start(&self, time: &DateTime<Local>) -> Option<NaiveDateTime> {
        let date = time.date_naive();
        match self {
            RotationInterval::Infinite => None,
            RotationInterval::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0),
            RotationInterval::Month => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0)
            }
            RotationInterval::Day => date.and_hms_opt(0, 0, 0),
            RotationInterval::Hour => date.and_hms_opt(time.hour(), 0, 0),
            RotationInterval::Minute => date.and_hms_opt(time.hour(), time.minute(), 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RotationInterval::Infinite => "Infinite",
            RotationInterval::Year => "Year",
            RotationInterval::Month => "Month",
            RotationInterval::Day => "Day",
            RotationInterval::Hour => "Hour",
            RotationInterval::Minute => "Minute",
        }
    }
}

impl fmt::Display for RotationInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotationInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infinite" | "never" => Ok(RotationInterval::Infinite),
            "year" => Ok(RotationInterval::Year),
            "month" => Ok(RotationInterval::Month),
            "day" => Ok(RotationInterval::Day),
            "hour" => Ok(RotationInterval::Hour),
            "minute" => Ok(RotationInterval::Minute),
            _ => Err(format!("Invalid rolling interval: '{}'", s.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).earliest().unwrap()
    }

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0).unwrap()
    }

    #[test]
    fn test_period_start_truncates() {
        let t = at(2025, 7, 19, 14, 37, 52);
        assert_eq!(RotationInterval::Year.period_start(&t), Some(naive(2025, 1, 1, 0, 0)));
        assert_eq!(RotationInterval::Month.period_start(&t), Some(naive(2025, 7, 1, 0, 0)));
        assert_eq!(RotationInterval::Day.period_start(&t), Some(naive(2025, 7, 19, 0, 0)));
        assert_eq!(RotationInterval::Hour.period_start(&t), Some(naive(2025, 7, 19, 14, 0)));
        assert_eq!(RotationInterval::Minute.period_start(&t), Some(naive(2025, 7, 19, 14, 37)));
        assert_eq!(RotationInterval::Infinite.period_start(&t), None);
    }

    #[test]
    fn test_same_hour_same_period() {
        let a = at(2025, 7, 19, 14, 0, 1);
        let b = at(2025, 7, 19, 14, 59, 59);
        let c = at(2025, 7, 19, 15, 0, 0);
        let hour = RotationInterval::Hour;
        assert_eq!(hour.period_start(&a), hour.period_start(&b));
        assert_ne!(hour.period_start(&b), hour.period_start(&c));
    }

    #[test]
    fn test_parse() {
        assert_eq!("hour".parse(), Ok(RotationInterval::Hour));
        assert_eq!("Day".parse(), Ok(RotationInterval::Day));
        assert_eq!(" INFINITE ".parse(), Ok(RotationInterval::Infinite));
        assert!("fortnight".parse::<RotationInterval>().is_err());
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(RotationInterval::default(), RotationInterval::Hour);
        assert_eq!(RotationInterval::Minute.to_string(), "Minute");
    }
}
