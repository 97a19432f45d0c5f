use crate::prelude::*;

pub fn now() -> DateTime {
  Utc::now().naive_utc()
}

/// Lenient timestamp (de)serialization for request bodies.
///
/// Accepts RFC 3339 (converted to UTC), `YYYY-MM-DDTHH:MM:SS[.f]`,
/// `YYYY-MM-DD HH:MM:SS[.f]` and plain dates (midnight).
pub mod timestamp {
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer, de};

  use super::DateTime;

  const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

  pub fn parse(raw: &str) -> Option<DateTime> {
    let raw = raw.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
      return Some(dt.naive_utc());
    }

    DateTime::parse_from_str(raw, FORMAT)
      .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
      .ok()
      .or_else(|| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
          .ok()
          .and_then(|date| date.and_hms_opt(0, 0, 0))
      })
  }

  pub fn serialize<S: Serializer>(
    date: &DateTime,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(FORMAT))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw)
      .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`")))
  }

  pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
      date: &Option<DateTime>,
      serializer: S,
    ) -> Result<S::Ok, S::Error> {
      match date {
        Some(date) => super::serialize(date, serializer),
        None => serializer.serialize_none(),
      }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
      deserializer: D,
    ) -> Result<Option<DateTime>, D::Error> {
      match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
          de::Error::custom(format!("invalid timestamp `{raw}`"))
        }),
        None => Ok(None),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::timestamp::parse;

  #[test]
  fn parses_supported_formats() {
    let midnight =
      NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0);

    assert_eq!(parse("2024-06-01"), midnight);
    assert_eq!(parse("2024-06-01T00:00:00"), midnight);
    assert_eq!(parse("2024-06-01 00:00:00"), midnight);
    assert_eq!(parse("2024-06-01T02:00:00+02:00"), midnight);
    assert_eq!(parse(" 2024-06-01T00:00:00.000Z "), midnight);
  }

  #[test]
  fn rejects_garbage() {
    assert_eq!(parse("next tuesday"), None);
    assert_eq!(parse("2024-13-01"), None);
    assert_eq!(parse(""), None);
  }
}
