//! Database row structs.
//!
//! Each submodule contains `FromRow` structs matching query results and the
//! conversions into the domain types of `bedwatch-core`.

pub mod favorite;
pub mod hospital_ward;
pub mod insight;
pub mod status;
