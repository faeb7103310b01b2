pub mod config;
pub mod output;
pub mod property;
pub mod rank;
pub mod scoring;
pub mod store;
pub mod telemetry;
