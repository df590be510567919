//! Shared component types and the simulation clock.
//!
//! These are plain data types consumed by the gameplay crates; all behavior
//! lives in `server_core`. Keeping them here lets config and tooling crates
//! speak the same vocabulary without pulling in the simulation.

pub mod components;
pub mod time;

pub use components::{Health, Team, Transform, Velocity};
pub use time::{SimTime, Ticks, TICK_HZ, TICK_SECONDS};
