//! Host-facing building blocks: the query model, configuration, schema checks and formatting.

pub mod config;
pub mod error;
pub mod format;
pub mod query;
pub mod schema;
