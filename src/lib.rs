pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod optimizer;
pub mod problem;
pub mod telemetry;

pub use error::{AllocationError, Result};
