//! Bedwatch domain logic.
//!
//! Everything in this crate is free of HTTP and SQL concerns: availability
//! parsing, ward aggregation, freshness evaluation, query validation and the
//! storage capability traits the service layer is written against.

pub mod availability;
pub mod backend;
pub mod error;
pub mod favorite;
pub mod freshness;
pub mod hospital;
pub mod memory;
pub mod query;
pub mod status;
pub mod types;
pub mod ward;
