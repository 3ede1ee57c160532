//! Wall-clock abstraction
//!
//! Services read "now" through [`Clock`] so tests can pin time.

mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
