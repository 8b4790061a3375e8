use std::fmt;

use chrono::{FixedOffset, LocalResult, NaiveDateTime, TimeZone as _, Utc};
use chrono_tz::Tz;

use crate::error::{FieldError, HydrateError};
use crate::object::{Object, ObjectKind};
use crate::properties::Properties;
use crate::registry::{ObjectType, TypeMeta};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Zone

/// A time zone as carried by the date/time built-ins.
///
/// The variant decides the `timezone_type` property:
///
/// | variant | `timezone_type` | `timezone` |
/// |---|---|---|
/// | [`Zone::Offset`] | 1 | `+02:00` |
/// | [`Zone::Abbreviation`] | 2 | `UTC` |
/// | [`Zone::Named`] | 3 | `Europe/Paris` |
///
/// Only the zero-offset abbreviations `UTC`, `GMT` and `Z` are understood.
///
/// # Examples
///
/// ```
/// use knot_object::Zone;
///
/// let zone = Zone::parse(3, "Europe/Paris").unwrap();
/// assert_eq!(zone.timezone_type(), 3);
/// assert_eq!(zone.to_string(), "Europe/Paris");
///
/// assert_eq!(Zone::parse(1, "-05:30").unwrap().to_string(), "-05:30");
/// assert!(Zone::parse(2, "CEST").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Offset(FixedOffset),
    Abbreviation(&'static str),
    Named(Tz),
}

const ABBREVIATIONS: [&str; 3] = ["UTC", "GMT", "Z"];

impl Zone {
    pub const UTC: Zone = Zone::Abbreviation("UTC");

    pub const fn timezone_type(&self) -> i64 {
        match self {
            Zone::Offset(_) => 1,
            Zone::Abbreviation(_) => 2,
            Zone::Named(_) => 3,
        }
    }

    /// Resolves a `timezone_type`/`timezone` pair.
    pub fn parse(timezone_type: i64, name: &str) -> Result<Zone, HydrateError> {
        let invalid = |reason: String| HydrateError::Invalid {
            name: "timezone",
            reason,
        };
        match timezone_type {
            1 => name
                .parse::<FixedOffset>()
                .map(Zone::Offset)
                .map_err(|_| invalid(format!("`{name}` is not a UTC offset"))),
            2 => ABBREVIATIONS
                .into_iter()
                .find(|abbr| abbr.eq_ignore_ascii_case(name))
                .map(Zone::Abbreviation)
                .ok_or_else(|| invalid(format!("unknown abbreviation `{name}`"))),
            3 => name
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| invalid(format!("unknown zone identifier `{name}`"))),
            other => Err(HydrateError::Invalid {
                name: "timezone_type",
                reason: format!("expected 1, 2 or 3, found {other}"),
            }),
        }
    }

    /// Reads `timezone_type` and `timezone` from a property map.
    pub(super) fn from_properties(props: &Properties) -> Result<Zone, HydrateError> {
        let timezone_type = props.require::<i64>("timezone_type")?;
        let name = props.require::<String>("timezone")?;
        Zone::parse(timezone_type, &name)
    }

    /// Wall-clock time of `instant` in this zone.
    pub fn to_local(&self, instant: &chrono::DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Offset(offset) => instant.with_timezone(offset).naive_local(),
            Zone::Abbreviation(_) => instant.naive_utc(),
            Zone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// The instant a wall-clock time denotes in this zone.
    ///
    /// A local time repeated by a transition resolves to its earlier
    /// occurrence. A local time skipped by a transition is rejected.
    pub fn from_local(&self, local: &NaiveDateTime) -> Result<chrono::DateTime<Utc>, HydrateError> {
        let resolved = match self {
            Zone::Offset(offset) => offset
                .from_local_datetime(local)
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Abbreviation(_) => LocalResult::Single(Utc.from_utc_datetime(local)),
            Zone::Named(tz) => tz.from_local_datetime(local).map(|dt| dt.with_timezone(&Utc)),
        };
        match resolved {
            LocalResult::Single(instant) => Ok(instant),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            LocalResult::None => Err(HydrateError::Invalid {
                name: "date",
                reason: format!("`{local}` does not exist in {self}"),
            }),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Offset(offset) => write!(f, "{offset}"),
            Zone::Abbreviation(abbr) => f.write_str(abbr),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl Default for Zone {
    #[inline]
    fn default() -> Self {
        Zone::UTC
    }
}

// -----------------------------------------------------------------------------
// DateTimeZone

/// A time zone value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeZone {
    zone: Zone,
}

impl DateTimeZone {
    #[inline]
    pub const fn new(zone: Zone) -> Self {
        Self { zone }
    }

    #[inline]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    fn hydrate(props: &Properties) -> Result<Box<dyn Object>, HydrateError> {
        Ok(Box::new(Self::new(Zone::from_properties(props)?)))
    }
}

impl Object for DateTimeZone {
    #[inline]
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    #[inline]
    fn kind(&self) -> ObjectKind {
        ObjectKind::Temporal
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["timezone_type", "timezone"]
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "timezone_type" => Some(Value::Int(self.zone.timezone_type())),
            "timezone" => Some(Value::Str(self.zone.to_string())),
            _ => None,
        }
    }

    fn set_field(&mut self, _: &str, _: Value) -> Result<(), FieldError> {
        Err(FieldError::Immutable(Self::TYPE_NAME))
    }
}

impl ObjectType for DateTimeZone {
    const TYPE_NAME: &'static str = "DateTimeZone";

    fn type_meta() -> TypeMeta {
        TypeMeta::with_hydrate(Self::TYPE_NAME, Self::hydrate)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone as _, Utc};

    use super::{DateTimeZone, Zone};
    use crate::object::Object;
    use crate::properties::Properties;
    use crate::value::Value;

    #[test]
    fn abbreviations_are_case_insensitive() {
        assert_eq!(Zone::parse(2, "gmt").unwrap(), Zone::Abbreviation("GMT"));
        assert!(Zone::parse(4, "UTC").is_err());
    }

    #[test]
    fn dst_transitions() {
        let zone = Zone::parse(3, "Europe/Paris").unwrap();
        let gap = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let overlap = NaiveDate::from_ymd_opt(2024, 10, 27)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();

        assert!(zone.from_local(&gap).is_err());

        // 02:30 happens twice; the first one is still summer time.
        let first = Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 10, 27, 1, 30, 0).unwrap();
        assert_eq!(zone.to_local(&first), overlap);
        assert_eq!(zone.to_local(&second), overlap);
        assert_eq!(zone.from_local(&overlap).unwrap(), first);
    }

    #[test]
    fn zone_object_properties() {
        let tz = DateTimeZone::new(Zone::parse(1, "+02:00").unwrap());
        assert_eq!(tz.field("timezone_type"), Some(Value::Int(1)));
        assert_eq!(tz.field("timezone"), Some(Value::from("+02:00")));

        let props: Properties = [("timezone_type", Value::Int(3)), ("timezone", Value::from("Asia/Tokyo"))]
            .into_iter()
            .collect();
        let rebuilt = DateTimeZone::hydrate(&props).unwrap();
        assert_eq!(rebuilt.field("timezone"), Some(Value::from("Asia/Tokyo")));
    }
}
