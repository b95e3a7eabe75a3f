use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthYearError {
    #[error("expected MM-YYYY, got `{0}`")]
    Format(String),
    #[error("month must be between 01 and 12, got {0}")]
    Month(u32),
}

/// A calendar month without a day component, written `MM-YYYY` on the wire.
///
/// Persisted as the first day of the month so that range comparisons in SQL line up with
/// month boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Result<Self, MonthYearError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(MonthYearError::Month(month))
    }

    pub fn parse(raw: &str) -> Result<Self, MonthYearError> {
        let bytes = raw.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[2] == b'-'
            && bytes[..2].iter().all(u8::is_ascii_digit)
            && bytes[3..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(MonthYearError::Format(raw.to_string()));
        }

        let month: u32 = raw[..2]
            .parse()
            .map_err(|_| MonthYearError::Format(raw.to_string()))?;
        let year: i32 = raw[3..]
            .parse()
            .map_err(|_| MonthYearError::Format(raw.to_string()))?;

        Self::new(month, year)
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }
}

impl From<MonthYear> for NaiveDate {
    fn from(value: MonthYear) -> Self {
        value.0
    }
}

impl FromStr for MonthYear {
    type Err = MonthYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_and_year() {
        let value = MonthYear::parse("07-2025").unwrap();
        assert_eq!(value.month(), 7);
        assert_eq!(value.year(), 2025);
        assert_eq!(
            value.first_day(),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
    }

    #[test]
    fn display_is_zero_padded() {
        let value = MonthYear::new(1, 2024).unwrap();
        assert_eq!(value.to_string(), "01-2024");
        assert_eq!(MonthYear::parse(&value.to_string()).unwrap(), value);
    }

    #[test]
    fn malformed_input_is_rejected() {
        for raw in [
            "",
            "1-2024",
            "01-24",
            "2024-01",
            "01/2024",
            " 01-2024",
            "01-2024 ",
            "+1-2024",
            "ab-2024",
            "01-20x4",
        ] {
            assert_eq!(
                MonthYear::parse(raw),
                Err(MonthYearError::Format(raw.to_string())),
                "input: {raw:?}"
            );
        }
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert_eq!(MonthYear::parse("00-2024"), Err(MonthYearError::Month(0)));
        assert_eq!(MonthYear::parse("13-2024"), Err(MonthYearError::Month(13)));
    }

    #[test]
    fn date_conversion_drops_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let value = MonthYear::from(date);
        assert_eq!(value.to_string(), "03-2024");
        assert_eq!(
            NaiveDate::from(value),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn ordering_follows_the_calendar() {
        let december = MonthYear::parse("12-2023").unwrap();
        let january = MonthYear::parse("01-2024").unwrap();
        assert!(december < january);
    }

    #[test]
    fn serde_uses_the_wire_format() {
        let value = MonthYear::parse("09-2024").unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"09-2024\"");
        assert_eq!(serde_json::from_str::<MonthYear>(&json).unwrap(), value);
        assert!(serde_json::from_str::<MonthYear>("\"2024-09-01\"").is_err());
    }
}
