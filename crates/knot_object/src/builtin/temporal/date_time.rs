use chrono::{NaiveDateTime, Utc};

use super::zone::Zone;
use crate::error::{FieldError, HydrateError};
use crate::object::{Object, ObjectKind};
use crate::properties::Properties;
use crate::registry::{ObjectType, TypeMeta};
use crate::value::Value;

/// Layout of the `date` property: local wall time with microseconds.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const FIELDS: &[&str] = &["date", "timezone_type", "timezone"];

fn read_field(instant: &chrono::DateTime<Utc>, zone: &Zone, name: &str) -> Option<Value> {
    match name {
        "date" => Some(Value::Str(zone.to_local(instant).format(DATE_FORMAT).to_string())),
        "timezone_type" => Some(Value::Int(zone.timezone_type())),
        "timezone" => Some(Value::Str(zone.to_string())),
        _ => None,
    }
}

fn parse_properties(props: &Properties) -> Result<(chrono::DateTime<Utc>, Zone), HydrateError> {
    let zone = Zone::from_properties(props)?;
    let date = props.require::<String>("date")?;
    // `%.f` also accepts dates without a fraction.
    let local = NaiveDateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S%.f").map_err(|e| {
        HydrateError::Invalid {
            name: "date",
            reason: format!("`{date}`: {e}"),
        }
    })?;
    Ok((zone.from_local(&local)?, zone))
}

macro_rules! date_time_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            instant: chrono::DateTime<Utc>,
            zone: Zone,
        }

        impl $name {
            #[inline]
            pub const fn new(instant: chrono::DateTime<Utc>, zone: Zone) -> Self {
                Self { instant, zone }
            }

            /// The current time in `zone`.
            #[inline]
            pub fn now(zone: Zone) -> Self {
                Self::new(Utc::now(), zone)
            }

            /// Interprets a wall-clock time in `zone`.
            pub fn from_local(local: NaiveDateTime, zone: Zone) -> Result<Self, HydrateError> {
                Ok(Self::new(zone.from_local(&local)?, zone))
            }

            #[inline]
            pub const fn instant(&self) -> chrono::DateTime<Utc> {
                self.instant
            }

            #[inline]
            pub const fn zone(&self) -> Zone {
                self.zone
            }

            /// Wall-clock time in this value's zone.
            #[inline]
            pub fn local(&self) -> NaiveDateTime {
                self.zone.to_local(&self.instant)
            }

            fn hydrate(props: &Properties) -> Result<Box<dyn Object>, HydrateError> {
                let (instant, zone) = parse_properties(props)?;
                Ok(Box::new(Self::new(instant, zone)))
            }
        }

        impl Object for $name {
            #[inline]
            fn type_name(&self) -> &'static str {
                Self::TYPE_NAME
            }

            #[inline]
            fn kind(&self) -> ObjectKind {
                ObjectKind::Temporal
            }

            #[inline]
            fn field_names(&self) -> &'static [&'static str] {
                FIELDS
            }

            fn field(&self, name: &str) -> Option<Value> {
                read_field(&self.instant, &self.zone, name)
            }

            fn set_field(&mut self, _: &str, _: Value) -> Result<(), FieldError> {
                Err(FieldError::Immutable(Self::TYPE_NAME))
            }
        }

        impl ObjectType for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn type_meta() -> TypeMeta {
                TypeMeta::with_hydrate(Self::TYPE_NAME, Self::hydrate)
            }
        }
    };
}

date_time_type! {
    /// A point in time together with the zone it is expressed in.
    ///
    /// Serialized as `date`, `timezone_type` and `timezone`; see
    /// [`Zone`] for the zone encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use knot_object::{DateTime, Object, Value, Zone};
    ///
    /// let local = NaiveDate::from_ymd_opt(2024, 7, 1)
    ///     .unwrap()
    ///     .and_hms_micro_opt(12, 30, 0, 250)
    ///     .unwrap();
    /// let paris = Zone::parse(3, "Europe/Paris").unwrap();
    /// let dt = DateTime::from_local(local, paris).unwrap();
    ///
    /// assert_eq!(dt.field("date"), Some(Value::from("2024-07-01 12:30:00.000250")));
    /// assert_eq!(dt.instant().to_rfc3339(), "2024-07-01T10:30:00.000250+00:00");
    /// ```
    DateTime
}

date_time_type! {
    /// Same as [`DateTime`], without in-place modification.
    DateTimeImmutable
}

impl DateTime {
    #[inline]
    pub fn set_instant(&mut self, instant: chrono::DateTime<Utc>) {
        self.instant = instant;
    }

    /// Moves to another zone, keeping the instant.
    #[inline]
    pub fn set_zone(&mut self, zone: Zone) {
        self.zone = zone;
    }
}

impl DateTimeImmutable {
    /// Returns the same instant expressed in another zone.
    #[inline]
    pub const fn with_zone(self, zone: Zone) -> Self {
        Self::new(self.instant, zone)
    }
}

impl From<DateTime> for DateTimeImmutable {
    #[inline]
    fn from(value: DateTime) -> Self {
        Self::new(value.instant, value.zone)
    }
}

impl From<DateTimeImmutable> for DateTime {
    #[inline]
    fn from(value: DateTimeImmutable) -> Self {
        Self::new(value.instant, value.zone)
    }
}

// -----------------------------------------------------------------------------
// Tests
