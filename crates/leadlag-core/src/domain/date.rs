use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Calendar date of a daily close, without time-of-day or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    /// Parses `YYYY-MM-DD`. A trailing time component (`T…` or ` …`) is ignored so that
    /// feeds emitting full timestamps still key on the date alone.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let date_part = match trimmed.char_indices().nth(10) {
            Some((index, 'T')) | Some((index, ' ')) => &trimmed[..index],
            _ => trimmed,
        };

        Date::parse(date_part, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    /// Date `days` calendar days earlier, saturating at the minimum representable date.
    pub fn days_before(self, days: u32) -> Self {
        Self(
            self.0
                .checked_sub(Duration::days(i64::from(days)))
                .unwrap_or(Date::MIN),
        )
    }

    /// Date `days` calendar days later, saturating at the maximum representable date.
    pub fn days_after(self, days: u32) -> Self {
        Self(
            self.0
                .checked_add(Duration::days(i64::from(days)))
                .unwrap_or(Date::MAX),
        )
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }

    /// `YYYYMMDD`, the form used in quote-service query strings.
    pub fn format_compact(self) -> String {
        self.0
            .format(format_description!("[year][month][day]"))
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// RFC3339 timestamp guaranteed to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| {
            ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            }
        })?;

        if parsed.offset() != UtcOffset::UTC {
            return Err(ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            });
        }

        Ok(Self(parsed))
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamped_dates() {
        let plain = TradingDate::parse("2024-03-05").expect("plain date");
        let stamped = TradingDate::parse("2024-03-05T21:00:00Z").expect("timestamped date");
        assert_eq!(plain, stamped);
        assert_eq!(plain.format_iso(), "2024-03-05");
        assert_eq!(plain.format_compact(), "20240305");
    }

    #[test]
    fn rejects_garbage_dates() {
        let err = TradingDate::parse("05/03/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn days_before_crosses_year_boundary() {
        let date = TradingDate::parse("2024-01-10").expect("date");
        assert_eq!(date.days_before(15).format_iso(), "2023-12-26");
        assert_eq!(date.days_before(15).days_after(15), date);
    }

    #[test]
    fn rejects_non_utc_timestamp() {
        let err = UtcDateTime::parse("2024-01-01T01:00:00+01:00").expect_err("must fail");
        assert!(matches!(err, ValidationError::TimestampNotUtc { .. }));
    }
}
