//! Core utilities for the Raika platform layer.
//!
//! This crate provides foundational types and utilities used across the workspace:
//! - Error types and result aliases
//! - Logging initialization
//! - Timer utilities
//! - Hardcoded platform constants

mod config;
mod error;
mod logging;
mod timer;

pub use config::PlatformConfig;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use timer::Timer;
