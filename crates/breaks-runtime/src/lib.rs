//! Drives `breaks-core` contexts from a master clock schedule.
//!
//! The core step functions trust their inputs; this crate is where pad values
//! from the outside world are checked, where stimulus scripts are parsed and
//! replayed, and where runs are recorded for comparison.

pub mod config;
pub mod driver;
pub mod error;
pub mod replay;
pub mod stimulus;

pub use config::{DriverConfig, TraceMode};
pub use driver::{Driver, Pads};
pub use error::RuntimeError;
pub use replay::{Divergence, ReplayLog};
pub use stimulus::{Script, StimulusFlags, StimulusRecord};
