//! Conversion between calendar values and spreadsheet date serials
//!
//! A serial is a day count from the workbook epoch, with the time of day as
//! the fractional part. The 1900 system counts 1900-02-29 as a real day (a
//! Lotus 1-2-3 compatibility quirk), so serials from 61 onwards are one day
//! ahead of the true calendar distance.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Serial of the phantom 1900-02-29 in the 1900 system
const PHANTOM_LEAP_DAY: f64 = 60.0;

fn epoch(date_1904: bool) -> NaiveDateTime {
    let date = if date_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)
    } else {
        // Serial 0 displays as 1900-01-00, i.e. 1899-12-31
        NaiveDate::from_ymd_opt(1899, 12, 31)
    };
    date.unwrap_or_default().and_time(NaiveTime::MIN)
}

/// Convert a date-time to a serial number in the given date system
pub fn datetime_to_serial(dt: NaiveDateTime, date_1904: bool) -> f64 {
    let millis = dt.signed_duration_since(epoch(date_1904)).num_milliseconds();
    let mut serial = millis as f64 / MILLIS_PER_DAY;
    // Everything from 1900-03-01 on sits after the phantom day
    if !date_1904 && serial >= PHANTOM_LEAP_DAY {
        serial += 1.0;
    }
    serial
}

/// Convert a serial number back to a date-time
///
/// Returns `None` when the serial falls outside the representable range or
/// on the phantom 1900-02-29 of the 1900 system.
pub fn datetime_from_serial(serial: f64, date_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let mut days = serial;
    if !date_1904 {
        if days >= PHANTOM_LEAP_DAY + 1.0 {
            days -= 1.0;
        } else if days >= PHANTOM_LEAP_DAY {
            return None;
        }
    }
    let millis = (days * MILLIS_PER_DAY + 0.5).floor() as i64;
    epoch(date_1904).checked_add_signed(Duration::try_milliseconds(millis)?)
}

/// Convert a time of day to the fractional part of a serial
pub fn time_to_serial(time: NaiveTime) -> f64 {
    let millis = time.num_seconds_from_midnight() as f64 * 1000.0
        + (time.nanosecond() / 1_000_000) as f64;
    millis / MILLIS_PER_DAY
}
