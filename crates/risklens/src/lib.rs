pub mod assessment;
pub mod config;
pub mod error;
pub mod profile;
pub mod report;
pub mod telemetry;
