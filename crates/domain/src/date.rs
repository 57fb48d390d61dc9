use chrono::prelude::*;

/// Parses a reminder date in the `YYYY-MM-DD` format
pub fn parse_reminder_date(datestr: &str) -> anyhow::Result<NaiveDate> {
    let parts = datestr.split('-').collect::<Vec<_>>();
    let widths_ok = parts.len() == 3
        && parts[0].len() == 4
        && parts[1].len() == 2
        && parts[2].len() == 2;
    if !widths_ok || !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
        return Err(anyhow::Error::msg(format!("Malformed date: {}", datestr)));
    }
    NaiveDate::parse_from_str(datestr, "%Y-%m-%d")
        .map_err(|_| anyhow::Error::msg(format!("Invalid date: {}", datestr)))
}

/// Parses a reminder time given as `HH:MM`, `HH:MM:SS` or `HH:MM:SS.ffffff`
pub fn parse_reminder_time(timestr: &str) -> anyhow::Result<NaiveTime> {
    let format = match timestr.split(':').count() {
        2 => "%H:%M",
        3 => "%H:%M:%S%.f",
        _ => return Err(anyhow::Error::msg(format!("Malformed time: {}", timestr))),
    };
    NaiveTime::parse_from_str(timestr, format)
        .map_err(|_| anyhow::Error::msg(format!("Invalid time: {}", timestr)))
}

pub fn format_reminder_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_reminder_time(time: &NaiveTime) -> String {
    if time.nanosecond() == 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M:%S%.6f").to_string()
    }
}

/// Reminder dates and times are wall-clock values that are always
/// interpreted as UTC.
pub fn reminder_instant(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

pub fn split_instant(instant: &DateTime<Utc>) -> (NaiveDate, NaiveTime) {
    let naive = instant.naive_utc();
    (naive.date(), naive.time())
}

/// Serde helpers for `YYYY-MM-DD` dates on the wire
pub mod reminder_date_format {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_reminder_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_reminder_date(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for `HH:MM[:SS]` times on the wire
pub mod reminder_time_format {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_reminder_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_reminder_time(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_dates() {
        let valid_dates = vec!["2018-01-01", "2025-12-31", "2020-01-12", "2020-02-29"];

        for date in &valid_dates {
            assert!(parse_reminder_date(date).is_ok(), "{}", date);
        }
    }

    #[test]
    fn it_rejects_invalid_dates() {
        let invalid_dates = vec![
            "2018--1-1",
            "2020-1-32",
            "2021-02-29",
            "2020-0-1",
            "2020-1-0",
            "20-01-01",
            "2020/01/01",
            "2024-2-9",
            "2024-02-9",
            "2024-+2-09",
        ];

        for date in &invalid_dates {
            assert!(parse_reminder_date(date).is_err(), "{}", date);
        }
    }

    #[test]
    fn it_parses_times_with_and_without_seconds() {
        assert_eq!(
            parse_reminder_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_reminder_time("23:59:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert_eq!(
            parse_reminder_time("07:00:00.250000").unwrap(),
            NaiveTime::from_hms_micro_opt(7, 0, 0, 250_000).unwrap()
        );
        assert!(parse_reminder_time("24:00").is_err());
        assert!(parse_reminder_time("9").is_err());
        assert!(parse_reminder_time("09:30:00:00").is_err());
    }

    #[test]
    fn formats_times_without_redundant_fraction() {
        let t = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_reminder_time(&t), "09:05:00");
        let t = NaiveTime::from_hms_micro_opt(9, 5, 0, 1).unwrap();
        assert_eq!(format_reminder_time(&t), "09:05:00.000001");
    }

    #[test]
    fn instant_round_trips_through_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let instant = reminder_instant(date, time);
        assert_eq!(instant.to_rfc3339(), "2024-03-01T09:00:00+00:00");
        assert_eq!(split_instant(&instant), (date, time));
    }
}
