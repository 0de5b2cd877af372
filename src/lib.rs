pub mod error;
pub mod journal;
pub mod market_data;
pub mod report;
pub mod settings;
pub mod telemetry;
