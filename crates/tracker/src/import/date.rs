//! Order creation date parsing.
//!
//! Import files carry dates as `day/month/year` with an optional
//! `hour:minute[:second]`, the two parts separated by whitespace and/or a
//! comma (`23/10/2025, 14:30:00`). Anything else is given a second chance
//! through a few machine formats and the month-first `10/23/2025` form, so a
//! value that reads both ways is always taken as day-first. Dates without an
//! offset are local time.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Formats tried when the day-first form does not match.
const FALLBACK_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y, %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y, %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Date-only fallbacks, read as midnight.
const FALLBACK_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse an `OrderCreationDate` value.
///
/// Returns `None` when no format matches or the date does not exist.
#[must_use]
pub fn parse_order_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    parse_day_first(raw)
        .and_then(local_to_utc)
        .or_else(|| parse_fallback(raw))
}

/// `d/m/yyyy[,][ ]H:M[:S]`.
fn parse_day_first(raw: &str) -> Option<NaiveDateTime> {
    let (date, time) = match raw.split_once([',', ' ', '\t']) {
        Some((date, time)) => (date, Some(time.trim_start_matches([',', ' ', '\t']))),
        None => (raw, None),
    };

    let mut parts = date.split('/');
    let day = number(parts.next()?)?;
    let month = number(parts.next()?)?;
    let year = parts.next()?;
    if parts.next().is_some() || year.len() != 4 {
        return None;
    }
    let year = i32::try_from(number(year)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = match time {
        Some(time) => parse_time(time)?,
        None => NaiveTime::MIN,
    };

    Some(date.and_time(time))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let mut parts = raw.split(':');
    let hour = number(parts.next()?)?;
    let minute = number(parts.next()?)?;
    let second = parts.next().map_or(Some(0), number)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn number(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw.len() > 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_fallback(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .and_then(local_to_utc)
}

/// Interpret a wall-clock time in the local zone. On a DST overlap the
/// earlier instant wins; times skipped by a DST jump are rejected.
fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn local(raw: &str) -> DateTime<Local> {
        parse_order_date(raw).unwrap().with_timezone(&Local)
    }

    #[test]
    fn test_day_first_with_comma_and_seconds() {
        let dt = local("23/10/2025, 14:30:00");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 10, 23));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 30, 0));
    }

    #[test]
    fn test_day_first_variants() {
        let dt = local("3/7/2024 08:05");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 7, 3));
        assert_eq!((dt.hour(), dt.minute()), (8, 5));

        let dt = local("01/02/2023");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 2, 1));
        assert_eq!(dt.hour(), 0);

        let dt = local("15/06/2025,9:00");
        assert_eq!((dt.day(), dt.hour()), (15, 9));
    }

    #[test]
    fn test_impossible_dates_are_rejected() {
        assert!(parse_order_date("31/02/2025").is_none());
        assert!(parse_order_date("00/01/2025").is_none());
        assert!(parse_order_date("13/13/2025").is_none());
        assert!(parse_order_date("12/12/2025 25:00").is_none());
    }

    #[test]
    fn test_machine_formats() {
        let dt = parse_order_date("2025-10-23T12:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 10, 23, 12, 30, 0).unwrap());

        let dt = parse_order_date("Thu, 23 Oct 2025 12:30:00 +0200").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 10, 23, 10, 30, 0).unwrap());

        let dt = local("2025-10-23 14:30");
        assert_eq!((dt.day(), dt.hour(), dt.minute()), (23, 14, 30));

        let dt = local("2025-10-23");
        assert_eq!((dt.month(), dt.day(), dt.hour()), (10, 23, 0));
    }

    #[test]
    fn test_month_first_when_day_first_is_impossible() {
        let dt = local("10/23/2025");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 10, 23));
        assert_eq!(dt.hour(), 0);

        let dt = local("10/23/2025, 14:30:00");
        assert_eq!((dt.month(), dt.day(), dt.hour(), dt.minute()), (10, 23, 14, 30));

        let dt = local("12/13/2025 08:15");
        assert_eq!((dt.month(), dt.day(), dt.hour()), (12, 13, 8));

        // Both readings valid: day-first wins.
        let dt = local("05/06/2025");
        assert_eq!((dt.month(), dt.day()), (6, 5));
    }

    #[test]
    fn test_garbage_and_empty() {
        assert!(parse_order_date("").is_none());
        assert!(parse_order_date("   ").is_none());
        assert!(parse_order_date("bientôt").is_none());
        assert!(parse_order_date("23/10/25").is_none());
        assert!(parse_order_date("23-10-2025").is_none());
    }
}
