use chrono::NaiveDate;
use skyscope_engine::{ClockTime, WallClock};

/// The browser's local wall clock.
pub struct JsClock;

impl WallClock for JsClock {
    fn now(&self) -> ClockTime {
        let d = js_sys::Date::new_0();
        NaiveDate::from_ymd_opt(d.get_full_year() as i32, d.get_month() + 1, d.get_date())
            .and_then(|date| date.and_hms_opt(d.get_hours(), d.get_minutes(), d.get_seconds()))
            .map(ClockTime::from)
            .unwrap_or_else(|| {
                log::warn!("local date rejected; using UTC");
                ClockTime::from_unix_seconds((js_sys::Date::now() / 1000.0) as i64)
            })
    }
}
