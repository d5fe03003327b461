//! Frame driver for the Raika platform layer.
//!
//! This crate runs the loop that ties the other crates together:
//! - Event draining and input snapshots
//! - The per-tick game update with its sound chunk
//! - Presentation with stale-target rebuilds

pub mod driver;

pub use driver::{DriverState, FrameDriver};
