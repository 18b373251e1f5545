pub mod config;
pub mod error;
pub mod pricing;
pub mod sheet;
pub mod telemetry;
