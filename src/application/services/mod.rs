//! Application services
//!
//! Services depend on the record source boundary trait but are themselves
//! concrete structs, not traits.

mod census;

pub use census::{Census, CensusService};
