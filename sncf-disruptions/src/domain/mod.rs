//! Domain types for SNCF disruption tracking.
//!
//! These types enforce their invariants at construction time, so code
//! that receives them can trust their validity.

mod station;
mod time;

pub use station::{Direction, InvalidStation, StationRef};
pub use time::{FormatError, NavitiaTime, delay_minutes, format_time};
