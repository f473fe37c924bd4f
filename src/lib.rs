pub mod config;
pub mod console;
pub mod error;
pub mod telemetry;
pub mod workflows;
