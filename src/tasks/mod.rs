//! Background Tasks Module
//!
//! Maintenance work that runs alongside request handling.
//!
//! # Tasks
//! - Janitor: sweeps expired cache entries after requests, at most once per
//!   interval

mod janitor;

pub use janitor::{Janitor, DEFAULT_SWEEP_INTERVAL};
