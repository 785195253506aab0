//! Utility library for reading the monitoring logs captured during fat-tree experiments.
//!
//! bwm-ng is run in `rate` mode with CSV output on every emulated switch. This crate turns those
//! logs into typed [`Sample`]s. The ping outputs recorded next to them can be read with the
//! [`ping`] module.

pub mod error;
pub mod ping;
pub mod reader;
pub mod record;

pub use error::BwmNgError;
pub use reader::{drop_last_second, read_samples, read_samples_from_reader, DEFAULT_DELIMITER};
pub use record::Sample;
