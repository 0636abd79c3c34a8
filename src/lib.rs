pub mod config;
pub mod errors;
pub mod inventory;
pub mod telemetry;
