use chrono::TimeDelta;

use crate::error::{FieldError, HydrateError};
use crate::object::{Object, ObjectKind};
use crate::properties::Properties;
use crate::registry::{ObjectType, TypeMeta};
use crate::value::Value;

// -----------------------------------------------------------------------------
// DateInterval

/// A calendar interval such as "1 year, 2 months and 3 days".
///
/// | property | field |
/// |---|---|
/// | `y` `m` `d` `h` `i` `s` | `years` .. `seconds` |
/// | `f` | `fraction` of a second |
/// | `invert` | `1` for a negative interval |
/// | `days` | `total_days`, or `false` when unknown |
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DateInterval {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub fraction: f64,
    pub invert: bool,
    /// Total length in days, known only for intervals computed from two dates.
    pub total_days: Option<i64>,
}

const FIELDS: &[&str] = &["y", "m", "d", "h", "i", "s", "f", "invert", "days"];

impl DateInterval {
    pub const fn new(years: i64, months: i64, days: i64, hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
            fraction: 0.0,
            invert: false,
            total_days: None,
        }
    }

    /// Splits an exact duration into days, hours, minutes and seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use knot_object::DateInterval;
    ///
    /// let iv = DateInterval::from_duration(-TimeDelta::seconds(90_061));
    /// assert_eq!((iv.days, iv.hours, iv.minutes, iv.seconds), (1, 1, 1, 1));
    /// assert!(iv.invert);
    /// assert_eq!(iv.total_days, Some(1));
    /// ```
    pub fn from_duration(duration: TimeDelta) -> Self {
        let invert = duration < TimeDelta::zero();
        let duration = if invert { -duration } else { duration };

        let total = duration.num_seconds();
        let days = total / 86_400;
        Self {
            years: 0,
            months: 0,
            days,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
            fraction: f64::from(duration.subsec_nanos()) / 1e9,
            invert,
            total_days: Some(days),
        }
    }

    /// Rebuilds an interval from its properties.
    ///
    /// Components are taken as they are, signs included, so every interval
    /// that can be built also restores.
    fn hydrate(props: &Properties) -> Result<Box<dyn Object>, HydrateError> {
        let invert = match props.require::<i64>("invert")? {
            0 => false,
            1 => true,
            other => {
                return Err(HydrateError::Invalid {
                    name: "invert",
                    reason: format!("expected 0 or 1, found {other}"),
                });
            }
        };

        let total_days = match props.get("days") {
            None => return Err(HydrateError::Missing("days")),
            Some(Value::Bool(false)) => None,
            Some(_) => Some(props.require::<i64>("days")?),
        };

        Ok(Box::new(Self {
            years: props.require("y")?,
            months: props.require("m")?,
            days: props.require("d")?,
            hours: props.require("h")?,
            minutes: props.require("i")?,
            seconds: props.require("s")?,
            fraction: props.require("f")?,
            invert,
            total_days,
        }))
    }
}

impl Object for DateInterval {
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
        let value = match name {
            "y" => Value::Int(self.years),
            "m" => Value::Int(self.months),
            "d" => Value::Int(self.days),
            "h" => Value::Int(self.hours),
            "i" => Value::Int(self.minutes),
            "s" => Value::Int(self.seconds),
            "f" => Value::Float(self.fraction),
            "invert" => Value::Int(i64::from(self.invert)),
            "days" => self.total_days.map_or(Value::Bool(false), Value::Int),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, _: &str, _: Value) -> Result<(), FieldError> {
        Err(FieldError::Immutable(Self::TYPE_NAME))
    }
}

impl ObjectType for DateInterval {
    const TYPE_NAME: &'static str = "DateInterval";

    fn type_meta() -> TypeMeta {
        TypeMeta::with_hydrate(Self::TYPE_NAME, Self::hydrate)
    }
}

// -----------------------------------------------------------------------------
// Tests
