use super::date_time::DateTime;
use super::interval::DateInterval;
use crate::error::FieldError;
use crate::object::{Object, ObjectKind};
use crate::registry::{ObjectType, TypeMeta};
use crate::value::Value;

// -----------------------------------------------------------------------------
// DatePeriod

/// A recurring range of dates: a start, a step and either an end or a
/// number of recurrences.
///
/// A `DatePeriod` can live in a value graph, but serializing one fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatePeriod {
    start: DateTime,
    interval: DateInterval,
    end: Option<DateTime>,
    recurrences: Option<u32>,
}

impl DatePeriod {
    /// A period without an end.
    pub const fn open(start: DateTime, interval: DateInterval) -> Self {
        Self {
            start,
            interval,
            end: None,
            recurrences: None,
        }
    }

    pub const fn with_end(start: DateTime, interval: DateInterval, end: DateTime) -> Self {
        Self {
            start,
            interval,
            end: Some(end),
            recurrences: None,
        }
    }

    pub const fn with_recurrences(start: DateTime, interval: DateInterval, recurrences: u32) -> Self {
        Self {
            start,
            interval,
            end: None,
            recurrences: Some(recurrences),
        }
    }

    #[inline]
    pub const fn start(&self) -> &DateTime {
        &self.start
    }

    #[inline]
    pub const fn interval(&self) -> &DateInterval {
        &self.interval
    }

    #[inline]
    pub const fn end(&self) -> Option<&DateTime> {
        self.end.as_ref()
    }

    #[inline]
    pub const fn recurrences(&self) -> Option<u32> {
        self.recurrences
    }
}

impl Object for DatePeriod {
    #[inline]
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    #[inline]
    fn kind(&self) -> ObjectKind {
        ObjectKind::Unsupported
    }

    #[inline]
    fn field_names(&self) -> &'static [&'static str] {
        &[]
    }

    #[inline]
    fn field(&self, _: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, _: &str, _: Value) -> Result<(), FieldError> {
        Err(FieldError::Immutable(Self::TYPE_NAME))
    }
}

impl ObjectType for DatePeriod {
    const TYPE_NAME: &'static str = "DatePeriod";

    fn type_meta() -> TypeMeta {
        TypeMeta::unsupported(Self::TYPE_NAME)
    }
}
