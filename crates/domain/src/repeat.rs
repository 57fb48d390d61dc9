use crate::date::{reminder_instant, split_instant};
use chrono::{Duration, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// How often a reminder repeats. `None` means the reminder fires once.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    None,
    Minutely,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Default for RepeatType {
    fn default() -> Self {
        Self::None
    }
}

impl RepeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minutely => "minutely",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn is_repeating(&self) -> bool {
        *self != Self::None
    }
}

impl Display for RepeatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RepeatType {
    type Err = InvalidRepeatRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "minutely" => Ok(Self::Minutely),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(InvalidRepeatRule::UnknownRepeatType(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRepeatRule {
    #[error("Unknown repeat type: {0}")]
    UnknownRepeatType(String),
    #[error("Repeat interval must be at least 1, got: {0}")]
    NonPositiveInterval(i64),
    #[error("Reminder does not repeat")]
    NoRecurrence,
    #[error("Next occurrence is outside of the supported date range")]
    OutOfRange,
}

/// A validated repeat rule: a recurring `RepeatType` together with
/// an interval of at least one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatRule {
    repeat_type: RepeatType,
    interval: u32,
}

impl RepeatRule {
    pub fn new(repeat_type: RepeatType, interval: i64) -> Result<Self, InvalidRepeatRule> {
        if !repeat_type.is_repeating() {
            return Err(InvalidRepeatRule::NoRecurrence);
        }
        if interval < 1 {
            return Err(InvalidRepeatRule::NonPositiveInterval(interval));
        }
        let interval = u32::try_from(interval).map_err(|_| InvalidRepeatRule::OutOfRange)?;
        Ok(Self {
            repeat_type,
            interval,
        })
    }

    pub fn repeat_type(&self) -> RepeatType {
        self.repeat_type
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Advances a UTC wall-clock date and time by one step of this rule.
    ///
    /// Day based rules use calendar arithmetic. Month and year based rules keep the
    /// day of month and clamp it to the last day of the target month when that month
    /// is shorter, e.g. Jan 31 + 1 month = Feb 29 in a leap year.
    pub fn next(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<(NaiveDate, NaiveTime), InvalidRepeatRule> {
        let interval = i64::from(self.interval);
        let next = match self.repeat_type {
            RepeatType::None => return Err(InvalidRepeatRule::NoRecurrence),
            RepeatType::Minutely => {
                reminder_instant(date, time).checked_add_signed(Duration::minutes(interval))
            }
            RepeatType::Daily => date
                .checked_add_signed(Duration::days(interval))
                .map(|d| reminder_instant(d, time)),
            RepeatType::Weekly => date
                .checked_add_signed(Duration::weeks(interval))
                .map(|d| reminder_instant(d, time)),
            RepeatType::Monthly => date
                .checked_add_months(Months::new(self.interval))
                .map(|d| reminder_instant(d, time)),
            RepeatType::Yearly => self
                .interval
                .checked_mul(12)
                .and_then(|months| date.checked_add_months(Months::new(months)))
                .map(|d| reminder_instant(d, time)),
        };

        next.map(|instant| split_instant(&instant))
            .ok_or(InvalidRepeatRule::OutOfRange)
    }
}

/// Computes the occurrence following `current_date` `current_time` for the given
/// repeat type and interval.
pub fn next_occurrence(
    current_date: NaiveDate,
    current_time: NaiveTime,
    repeat_type: RepeatType,
    repeat_interval: i64,
) -> Result<(NaiveDate, NaiveTime), InvalidRepeatRule> {
    RepeatRule::new(repeat_type, repeat_interval)?.next(current_date, current_time)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::date::reminder_instant;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_repeat_types() {
        for (s, t) in [
            ("none", RepeatType::None),
            ("minutely", RepeatType::Minutely),
            ("daily", RepeatType::Daily),
            ("weekly", RepeatType::Weekly),
            ("monthly", RepeatType::Monthly),
            ("yearly", RepeatType::Yearly),
        ] {
            assert_eq!(s.parse::<RepeatType>().unwrap(), t);
            assert_eq!(t.to_string(), s);
        }
        assert_eq!(
            "hourly".parse::<RepeatType>(),
            Err(InvalidRepeatRule::UnknownRepeatType("hourly".into()))
        );
    }

    #[test]
    fn rejects_invalid_rules() {
        assert_eq!(
            next_occurrence(date(2024, 1, 1), time(9, 0), RepeatType::None, 1),
            Err(InvalidRepeatRule::NoRecurrence)
        );
        assert_eq!(
            next_occurrence(date(2024, 1, 1), time(9, 0), RepeatType::Daily, 0),
            Err(InvalidRepeatRule::NonPositiveInterval(0))
        );
        assert_eq!(
            next_occurrence(date(2024, 1, 1), time(9, 0), RepeatType::Weekly, -3),
            Err(InvalidRepeatRule::NonPositiveInterval(-3))
        );
    }

    #[test]
    fn minutely_crosses_midnight() {
        assert_eq!(
            next_occurrence(date(2023, 12, 31), time(23, 50), RepeatType::Minutely, 15),
            Ok((date(2024, 1, 1), time(0, 5)))
        );
    }

    #[test]
    fn daily_and_weekly_use_calendar_days() {
        assert_eq!(
            next_occurrence(date(2024, 3, 1), time(9, 0), RepeatType::Daily, 2),
            Ok((date(2024, 3, 3), time(9, 0)))
        );
        assert_eq!(
            next_occurrence(date(2024, 2, 28), time(9, 0), RepeatType::Daily, 1),
            Ok((date(2024, 2, 29), time(9, 0)))
        );
        assert_eq!(
            next_occurrence(date(2024, 12, 30), time(18, 30), RepeatType::Weekly, 1),
            Ok((date(2025, 1, 6), time(18, 30)))
        );
    }

    #[test]
    fn monthly_clamps_to_last_day_of_month() {
        assert_eq!(
            next_occurrence(date(2024, 1, 31), time(9, 0), RepeatType::Monthly, 1),
            Ok((date(2024, 2, 29), time(9, 0)))
        );
        assert_eq!(
            next_occurrence(date(2023, 1, 31), time(9, 0), RepeatType::Monthly, 1),
            Ok((date(2023, 2, 28), time(9, 0)))
        );
        assert_eq!(
            next_occurrence(date(2024, 10, 31), time(9, 0), RepeatType::Monthly, 2),
            Ok((date(2024, 12, 31), time(9, 0)))
        );
        assert_eq!(
            next_occurrence(date(2024, 11, 15), time(9, 0), RepeatType::Monthly, 3),
            Ok((date(2025, 2, 15), time(9, 0)))
        );
    }

    #[test]
    fn yearly_clamps_leap_day() {
        assert_eq!(
            next_occurrence(date(2024, 2, 29), time(7, 0), RepeatType::Yearly, 1),
            Ok((date(2025, 2, 28), time(7, 0)))
        );
        assert_eq!(
            next_occurrence(date(2024, 2, 29), time(7, 0), RepeatType::Yearly, 4),
            Ok((date(2028, 2, 29), time(7, 0)))
        );
    }

    #[test]
    fn next_occurrence_moves_strictly_forward() {
        let start = (date(2024, 1, 31), time(23, 59));
        for repeat_type in [
            RepeatType::Minutely,
            RepeatType::Daily,
            RepeatType::Weekly,
            RepeatType::Monthly,
            RepeatType::Yearly,
        ] {
            for interval in 1..5 {
                let (d, t) = next_occurrence(start.0, start.1, repeat_type, interval).unwrap();
                assert!(reminder_instant(d, t) > reminder_instant(start.0, start.1));
            }
        }
    }

    #[test]
    fn fixed_length_rules_are_additive() {
        let start = (date(2024, 2, 27), time(22, 10));
        for (repeat_type, interval) in [
            (RepeatType::Minutely, 7),
            (RepeatType::Daily, 3),
            (RepeatType::Weekly, 2),
        ] {
            let k = 5;
            let mut current = start;
            for _ in 0..k {
                current = next_occurrence(current.0, current.1, repeat_type, interval).unwrap();
            }
            let direct = next_occurrence(start.0, start.1, repeat_type, interval * k).unwrap();
            assert_eq!(current, direct, "{:?}", repeat_type);
        }
    }

    #[test]
    fn is_deterministic() {
        let a = next_occurrence(date(2024, 5, 31), time(6, 0), RepeatType::Monthly, 1);
        let b = next_occurrence(date(2024, 5, 31), time(6, 0), RepeatType::Monthly, 1);
        assert_eq!(a, b);
        assert_eq!(a, Ok((date(2024, 6, 30), time(6, 0))));
    }

    #[test]
    fn reports_out_of_range() {
        assert_eq!(
            next_occurrence(NaiveDate::MAX, time(0, 0), RepeatType::Daily, 1),
            Err(InvalidRepeatRule::OutOfRange)
        );
    }
}
