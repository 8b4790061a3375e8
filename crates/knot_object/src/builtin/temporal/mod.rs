// -----------------------------------------------------------------------------
// Modules

mod date_time;
mod interval;
mod period;
mod zone;

// -----------------------------------------------------------------------------
// Exports

pub use date_time::{DATE_FORMAT, DateTime, DateTimeImmutable};
pub use interval::DateInterval;
pub use period::DatePeriod;
pub use zone::{DateTimeZone, Zone};
