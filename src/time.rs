// src/time.rs
//! Wire time representation and the shared time-of-day decoder

use crate::error::{NmeaError, Result};
use crate::scan::{scan, Slot};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// UTC time as carried by the sentences: date from RMC, time of day from
/// GGA/RMC. Sub-seconds are normalized to hundredths regardless of the
/// precision transmitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NmeaTime {
    /// Years since 1900
    pub year: i32,
    /// Month, zero-based (0 = January)
    pub mon: i32,
    pub day: i32,
    pub hour: i32,
    pub min: i32,
    pub sec: i32,
    /// Hundredths of a second
    pub hsec: i32,
}

impl NmeaTime {
    /// Convert to a chrono UTC timestamp; `None` while no date has been
    /// merged yet or the fields are out of range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let year = 1900 + self.year;
        let mon = u32::try_from(self.mon + 1).ok()?;
        let day = u32::try_from(self.day).ok()?;
        let hour = u32::try_from(self.hour).ok()?;
        let min = u32::try_from(self.min).ok()?;
        let sec = u32::try_from(self.sec).ok()?;
        let milli = u32::try_from(self.hsec.checked_mul(10)?).ok()?;
        let date = NaiveDate::from_ymd_opt(year, mon, day)?;
        let time = NaiveTime::from_hms_milli_opt(hour, min, sec, milli)?;
        Some(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
    }
}

/// Decode a time-of-day sub-string. The length alone selects the format:
/// 6 chars `hhmmss`, 8 `hhmmss.s`, 9 `hhmmss.ss`, 10 `hhmmss.sss`. The
/// fractional part is rescaled to hundredths. Date fields are left zero.
pub fn parse_time(s: &str) -> Result<NmeaTime> {
    let mut hour = None;
    let mut min = None;
    let mut sec = None;
    let mut frac = None;

    let matched = match s.len() {
        6 => scan(
            s,
            "%2d%2d%2d",
            &mut [Slot::Int(&mut hour), Slot::Int(&mut min), Slot::Int(&mut sec)],
        ),
        8 | 9 | 10 => scan(
            s,
            "%2d%2d%2d.%d",
            &mut [
                Slot::Int(&mut hour),
                Slot::Int(&mut min),
                Slot::Int(&mut sec),
                Slot::Int(&mut frac),
            ],
        ),
        _ => {
            return Err(NmeaError::TimeFormat(format!(
                "unrecognized time format '{}'",
                s
            )))
        }
    };

    let expected = if s.len() == 6 { 3 } else { 4 };
    let (Some(hour), Some(min), Some(sec)) = (hour, min, sec) else {
        return Err(NmeaError::TimeFormat(format!("incomplete time '{}'", s)));
    };
    if matched != expected || (expected == 4 && frac.is_none()) {
        return Err(NmeaError::TimeFormat(format!("unparsable time '{}'", s)));
    }

    // Normalize the fraction to hundredths: one transmitted digit is
    // tenths, three are thousandths
    let hsec = match s.len() {
        8 => frac.unwrap_or(0) * 10,
        10 => frac.unwrap_or(0) / 10,
        _ => frac.unwrap_or(0),
    };

    let time = NmeaTime { hour, min, sec, hsec, ..NmeaTime::default() };
    validate_time(&time, s)?;
    Ok(time)
}

/// Range check for a decoded time of day (leap second allowed)
fn validate_time(t: &NmeaTime, s: &str) -> Result<()> {
    let ok = (0..=23).contains(&t.hour)
        && (0..=59).contains(&t.min)
        && (0..=60).contains(&t.sec)
        && (0..=99).contains(&t.hsec);
    if ok {
        Ok(())
    } else {
        Err(NmeaError::TimeFormat(format!("time out of range '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_seconds() {
        let t = parse_time("123519").unwrap();
        assert_eq!((t.hour, t.min, t.sec, t.hsec), (12, 35, 19, 0));
    }

    #[test]
    fn test_fraction_normalizes_to_hundredths() {
        // One, two and three fractional digits all mean the same instant
        assert_eq!(parse_time("123519.5").unwrap().hsec, 50);
        assert_eq!(parse_time("123519.50").unwrap().hsec, 50);
        assert_eq!(parse_time("123519.500").unwrap().hsec, 50);
    }

    #[test]
    fn test_unrecognized_lengths_fail() {
        assert!(parse_time("").is_err());
        assert!(parse_time("12351").is_err());
        assert!(parse_time("123519.").is_err());
        assert!(parse_time("123519.5000").is_err());
    }

    #[test]
    fn test_garbage_fails() {
        assert!(parse_time("12x519").is_err());
        assert!(parse_time("123519.ab").is_err());
    }

    #[test]
    fn test_out_of_range_fails() {
        assert!(parse_time("253519").is_err());
        assert!(parse_time("126019").is_err());
        assert!(parse_time("123561").is_err());
    }

    #[test]
    fn test_leap_second_allowed() {
        assert_eq!(parse_time("235960").unwrap().sec, 60);
    }

    #[test]
    fn test_to_datetime() {
        let t = NmeaTime { year: 94, mon: 2, day: 23, hour: 12, min: 35, sec: 19, hsec: 50 };
        let dt = t.to_datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "1994-03-23T12:35:19.500+00:00");
    }

    #[test]
    fn test_to_datetime_without_date() {
        assert_eq!(NmeaTime::default().to_datetime(), None);
    }
}
