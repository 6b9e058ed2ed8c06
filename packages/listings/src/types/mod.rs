//! Data types for the listings pipeline.

pub mod config;
pub mod record;

pub use config::SourceConfig;
pub use record::{dedup_records, JobRecord};
