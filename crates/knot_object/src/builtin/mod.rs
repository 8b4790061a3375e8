//! Object types every [`TypeRegistry`](crate::TypeRegistry) knows.
//!
//! - Date and time value objects: [`DateTime`], [`DateTimeImmutable`],
//!   [`DateTimeZone`], [`DateInterval`]. They are rebuilt as a whole from their
//!   property map, never field by field.
//! - [`DatePeriod`]: known, but never serializable.
//! - [`FixedArray`]: a fixed-size list rebuilt with a size-then-fill protocol.

// -----------------------------------------------------------------------------
// Modules

mod fixed_array;
mod temporal;

// -----------------------------------------------------------------------------
// Exports

pub use fixed_array::FixedArray;
pub use temporal::{DATE_FORMAT, DateInterval, DatePeriod, DateTime, DateTimeImmutable, DateTimeZone, Zone};
