//! wn-core: stable foundation for waternet.
//!
//! Contains:
//! - error (shared error types)
//! - numeric (float helpers + geometry tolerance)
//! - time (clock-time "HH:MM" value type)
//! - units (flow-unit and headloss-formula tables)
//! - color (value-to-color ramp interpolation)

pub mod color;
pub mod error;
pub mod numeric;
pub mod time;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use color::{ColorRamp, ColorStop};
pub use error::{WnError, WnResult};
pub use numeric::*;
pub use time::ClockTime;
pub use units::{FlowUnits, HeadlossFormula};
