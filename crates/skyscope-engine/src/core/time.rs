//! Simulated clock values and the `YYYY/MM/DD HH:MM:SS` text surface.
//!
//! `ClockTime` is a naive civil date-time (no time zone) on top of
//! `chrono::NaiveDateTime`, limited to four-digit years.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

const FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const YEAR_MIN: i32 = 1;
const YEAR_MAX: i32 = 9999;

/// Why a clock string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected YYYY/MM/DD HH:MM:SS, got {0:?}")]
    Format(String),
    #[error("invalid date {text:?}: {source}")]
    Invalid {
        text: String,
        source: chrono::ParseError,
    },
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },
}

/// Calendar unit for clock adjustments and playback steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Day,
    Month,
    Year,
}

/// A civil date-time with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveDateTime);

impl ClockTime {
    /// Build from calendar fields, rejecting anything out of range.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, TimeParseError> {
        check_year(year)?;
        check("month", month, 1, 12)?;
        check("hour", hour, 0, 23)?;
        check("minute", minute, 0, 59)?;
        check("second", second, 0, 59)?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(TimeParseError::OutOfRange { field: "day", value: day })?;
        date.and_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or(TimeParseError::OutOfRange { field: "second", value: second })
    }

    /// Build from seconds since the Unix epoch.
    pub fn from_unix_seconds(secs: i64) -> Self {
        match DateTime::from_timestamp(secs, 0) {
            Some(dt) => Self::from(dt.naive_utc()),
            None if secs < 0 => Self(earliest()),
            None => Self(latest()),
        }
    }

    pub fn unix_seconds(&self) -> i64 {
        self.0.and_utc().timestamp()
    }

    /// `(year, month, day)`.
    pub fn date(&self) -> (i32, u32, u32) {
        (self.0.year(), self.0.month(), self.0.day())
    }

    /// `(hour, minute, second)`.
    pub fn time(&self) -> (u32, u32, u32) {
        (self.0.hour(), self.0.minute(), self.0.second())
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Shift by whole calendar units.
    ///
    /// Month and year steps keep the day of month and let it roll over into
    /// the following month when it does not exist (Jan 31 + 1 month lands
    /// on Mar 2 or 3, Feb 29 + 1 year lands on Mar 1). Results beyond the
    /// four-digit years saturate.
    pub fn advance(&self, unit: TimeUnit, amount: i32) -> Self {
        let shifted = match unit {
            TimeUnit::Day => {
                let days = Days::new(u64::from(amount.unsigned_abs()));
                if amount >= 0 {
                    self.0.checked_add_days(days)
                } else {
                    self.0.checked_sub_days(days)
                }
            }
            TimeUnit::Month => self.add_months_rolling(i64::from(amount)),
            TimeUnit::Year => self.add_months_rolling(i64::from(amount) * 12),
        };
        match shifted {
            Some(dt) => Self::from(dt),
            None if amount < 0 => Self(earliest()),
            None => Self(latest()),
        }
    }

    /// Move the first of the month, then add the day offset back.
    fn add_months_rolling(&self, months: i64) -> Option<NaiveDateTime> {
        let offset = Days::new(u64::from(self.0.day() - 1));
        let first = self.0.with_day(1)?;
        let step = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        let moved = if months >= 0 {
            first.checked_add_months(step)
        } else {
            first.checked_sub_months(step)
        }?;
        moved.checked_add_days(offset)
    }
}

impl From<NaiveDateTime> for ClockTime {
    /// Saturates outside the four-digit years.
    fn from(dt: NaiveDateTime) -> Self {
        if dt.year() < YEAR_MIN {
            Self(earliest())
        } else if dt.year() > YEAR_MAX {
            Self(latest())
        } else {
            Self(dt)
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        // `%Y` and friends also accept unpadded fields.
        if !has_fixed_width(text) {
            return Err(TimeParseError::Format(text.to_string()));
        }
        let dt = NaiveDateTime::parse_from_str(text, FORMAT).map_err(|source| {
            TimeParseError::Invalid {
                text: text.to_string(),
                source,
            }
        })?;
        check_year(dt.year())?;
        // chrono keeps `:60` as a leap second.
        if dt.nanosecond() >= 1_000_000_000 {
            return Err(TimeParseError::OutOfRange { field: "second", value: 60 });
        }
        Ok(Self(dt))
    }
}

/// Source of the current wall-clock time.
pub trait WallClock {
    fn now(&self) -> ClockTime;
}

/// Wall clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub ClockTime);

impl WallClock for FixedClock {
    fn now(&self) -> ClockTime {
        self.0
    }
}

/// The editable clock text field, detached from any document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInput {
    text: String,
}

impl TimeInput {
    pub fn new(time: ClockTime) -> Self {
        Self {
            text: time.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the raw text (user typing). Not validated until resolved.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Show `time` in canonical form.
    pub fn show(&mut self, time: ClockTime) {
        self.text = time.to_string();
    }

    pub fn parse(&self) -> Result<ClockTime, TimeParseError> {
        self.text.parse()
    }

    /// Parse the text; on failure fall back to `clock.now()` and rewrite the
    /// text so no invalid value stays visible.
    pub fn resolve(&mut self, clock: &dyn WallClock) -> ClockTime {
        match self.parse() {
            Ok(time) => time,
            Err(err) => {
                log::warn!("time input rejected: {err}; using wall clock");
                let now = clock.now();
                self.show(now);
                now
            }
        }
    }
}

fn check(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), TimeParseError> {
    if value < min || value > max {
        return Err(TimeParseError::OutOfRange { field, value });
    }
    Ok(())
}

fn check_year(year: i32) -> Result<(), TimeParseError> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(TimeParseError::OutOfRange {
            field: "year",
            value: year.unsigned_abs(),
        });
    }
    Ok(())
}

/// `DDDD/DD/DD DD:DD:DD`, digits and separators in place.
fn has_fixed_width(text: &str) -> bool {
    const SHAPE: &[u8; 19] = b"dddd/dd/dd dd:dd:dd";
    text.len() == SHAPE.len()
        && text.bytes().zip(SHAPE.iter()).all(|(b, &s)| match s {
            b'd' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

fn earliest() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(YEAR_MIN, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn latest() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(YEAR_MAX, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn format_parse_round_trip() {
        for s in [
            "2024/01/01 00:00:00",
            "2000/02/29 23:59:59",
            "1999/12/31 12:34:56",
            "0001/01/01 00:00:00",
            "9999/12/31 23:59:59",
            "1970/01/01 00:00:01",
        ] {
            assert_eq!(t(s).to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for s in [
            "",
            "2024/01/01",
            "2024-01-01 00:00:00",
            "2024/1/01 00:00:00",
            "2024/01/01 0:00:00",
            "2024/01/01 00:00:00 ",
            "abcd/01/01 00:00:00",
            "2024/01/01T00:00:00",
        ] {
            assert!(matches!(s.parse::<ClockTime>(), Err(TimeParseError::Format(_))), "{s:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(matches!(
            "2023/02/29 00:00:00".parse::<ClockTime>(),
            Err(TimeParseError::Invalid { .. })
        ));
        assert_eq!(
            ClockTime::from_ymd_hms(2023, 2, 29, 0, 0, 0),
            Err(TimeParseError::OutOfRange { field: "day", value: 29 })
        );
        assert!("2024/13/01 00:00:00".parse::<ClockTime>().is_err());
        assert!("2024/01/01 24:00:00".parse::<ClockTime>().is_err());
        assert!("2016/12/31 23:59:60".parse::<ClockTime>().is_err());
        assert_eq!(
            "0000/01/01 00:00:00".parse::<ClockTime>(),
            Err(TimeParseError::OutOfRange { field: "year", value: 0 })
        );
    }

    #[test]
    fn unix_epoch_conversion() {
        let epoch = t("1970/01/01 00:00:00");
        assert_eq!(epoch.unix_seconds(), 0);
        assert_eq!(ClockTime::from_unix_seconds(86_400 + 61), t("1970/01/02 00:01:01"));
        assert_eq!(ClockTime::from_unix_seconds(-1), t("1969/12/31 23:59:59"));
    }

    #[test]
    fn advance_days_crosses_month_and_year() {
        assert_eq!(t("2023/12/31 10:00:00").advance(TimeUnit::Day, 1), t("2024/01/01 10:00:00"));
        assert_eq!(t("2024/03/01 10:00:00").advance(TimeUnit::Day, -1), t("2024/02/29 10:00:00"));
    }

    #[test]
    fn advance_months_rolls_day_overflow() {
        assert_eq!(t("2024/01/31 00:00:00").advance(TimeUnit::Month, 1), t("2024/03/02 00:00:00"));
        assert_eq!(t("2023/01/31 00:00:00").advance(TimeUnit::Month, 1), t("2023/03/03 00:00:00"));
        assert_eq!(t("2024/01/15 08:00:00").advance(TimeUnit::Month, -2), t("2023/11/15 08:00:00"));
        assert_eq!(t("2024/05/15 00:00:00").advance(TimeUnit::Month, 12), t("2025/05/15 00:00:00"));
    }

    #[test]
    fn advance_years_from_leap_day() {
        assert_eq!(t("2024/02/29 00:00:00").advance(TimeUnit::Year, 1), t("2025/03/01 00:00:00"));
        assert_eq!(t("2024/02/29 00:00:00").advance(TimeUnit::Year, 4), t("2028/02/29 00:00:00"));
    }

    #[test]
    fn advance_clamps_to_four_digit_years() {
        let end = t("9999/06/01 00:00:00").advance(TimeUnit::Year, 5);
        assert_eq!(end.to_string(), "9999/12/31 23:59:59");
    }

    #[test]
    fn advance_backwards_saturates_at_year_one() {
        let start = t("0001/03/01 06:00:00").advance(TimeUnit::Month, -5);
        assert_eq!(start.to_string(), "0001/01/01 00:00:00");
        assert_eq!(t("0001/01/02 06:00:00").advance(TimeUnit::Day, -1), t("0001/01/01 06:00:00"));
    }

    #[test]
    fn from_naive_clamps_to_four_digit_years() {
        let far = NaiveDate::from_ymd_opt(12_000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(ClockTime::from(far).to_string(), "9999/12/31 23:59:59");
    }

    #[test]
    fn time_input_falls_back_to_wall_clock() {
        let now = t("2025/06/01 12:00:00");
        let clock = FixedClock(now);
        let mut input = TimeInput::new(t("2024/01/01 00:00:00"));

        input.set_text("not a date");
        assert_eq!(input.resolve(&clock), now);
        assert_eq!(input.text(), "2025/06/01 12:00:00");

        input.set_text("2020/05/05 05:05:05");
        assert_eq!(input.resolve(&clock), t("2020/05/05 05:05:05"));
        assert_eq!(input.text(), "2020/05/05 05:05:05");
    }
}
