//! Conversions to Delius local time. Delius stores dates and times as
//! Europe/London wall clock values.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::London;

/// London date and time of an instant.
pub fn to_london_date_and_time<Tz: TimeZone>(instant: &DateTime<Tz>) -> (NaiveDate, NaiveTime) {
    let local = instant.with_timezone(&London);
    (local.date_naive(), local.time())
}

/// Today's date in London.
pub fn london_today() -> NaiveDate {
    Utc::now().with_timezone(&London).date_naive()
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    fn instant(value: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(value).unwrap()
    }

    #[test]
    fn test_winter_instants_are_utc() {
        let (date, time) = to_london_date_and_time(&instant("2021-01-10T09:30:00Z"));

        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 1, 10).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn test_summer_instants_shift_by_an_hour() {
        let (date, time) = to_london_date_and_time(&instant("2021-06-30T23:30:00Z"));

        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 7, 1).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(0, 30, 0).unwrap());
    }

    #[test]
    fn test_offsets_are_respected() {
        let (_, time) = to_london_date_and_time(&instant("2021-03-01T13:00:00+02:00"));

        assert_eq!(time, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
    }
}
