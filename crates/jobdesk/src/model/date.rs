//! Date values that survive a round trip through text storage.
//!
//! Persisted documents may contain dates written by older builds or edited by
//! hand. Parsing never fails: anything that is not a recognisable calendar
//! instant becomes [`StoredDate::Invalid`], which keeps the raw text so it can
//! be written back unchanged.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{self, IgnoredAny, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoredDate {
    Valid(DateTime<Utc>),
    Invalid(String),
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl StoredDate {
    /// The current instant, truncated to the millisecond precision used on disk.
    pub fn now() -> Self {
        StoredDate::from_millis(Utc::now().timestamp_millis())
    }

    /// Parses a stored date string. Naive timestamps are taken as UTC and
    /// every instant is truncated to milliseconds.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return StoredDate::from(dt.with_timezone(&Utc));
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return StoredDate::from(naive.and_utc());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return StoredDate::from(naive.and_utc());
            }
        }

        StoredDate::Invalid(raw.to_string())
    }

    pub fn from_millis(millis: i64) -> Self {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(dt) => StoredDate::Valid(dt),
            None => StoredDate::Invalid(millis.to_string()),
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredDate::Valid(dt) => Some(*dt),
            StoredDate::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, StoredDate::Valid(_))
    }

    /// Compares two dates when both are valid.
    pub fn partial_cmp_valid(&self, other: &StoredDate) -> Option<Ordering> {
        match (self, other) {
            (StoredDate::Valid(a), StoredDate::Valid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn to_storage_string(&self) -> String {
        match self {
            StoredDate::Valid(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            StoredDate::Invalid(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for StoredDate {
    fn from(dt: DateTime<Utc>) -> Self {
        StoredDate::from_millis(dt.timestamp_millis())
    }
}

impl fmt::Display for StoredDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredDate::Valid(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            StoredDate::Invalid(_) => write!(f, "Invalid Date"),
        }
    }
}

impl Serialize for StoredDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_storage_string())
    }
}

struct StoredDateVisitor;

impl<'de> Visitor<'de> for StoredDateVisitor {
    type Value = StoredDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date string or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<StoredDate, E> {
        Ok(StoredDate::parse(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<StoredDate, E> {
        Ok(StoredDate::from_millis(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<StoredDate, E> {
        match i64::try_from(v) {
            Ok(millis) => Ok(StoredDate::from_millis(millis)),
            Err(_) => Ok(StoredDate::Invalid(v.to_string())),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<StoredDate, E> {
        if v.is_finite() {
            Ok(StoredDate::from_millis(v as i64))
        } else {
            Ok(StoredDate::Invalid(v.to_string()))
        }
    }

    // Anything else is kept as an invalid date rather than failing the record.

    fn visit_unit<E: de::Error>(self) -> Result<StoredDate, E> {
        Ok(StoredDate::Invalid(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<StoredDate, E> {
        Ok(StoredDate::Invalid(String::new()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<StoredDate, E> {
        Ok(StoredDate::Invalid(v.to_string()))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<StoredDate, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(StoredDate::Invalid(String::new()))
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<StoredDate, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(StoredDate::Invalid(String::new()))
    }
}

impl<'de> Deserialize<'de> for StoredDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StoredDateVisitor)
    }
}
