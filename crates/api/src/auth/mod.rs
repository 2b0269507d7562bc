//! Authentication primitives.
//!
//! Sessions are issued by an external identity provider; this service only
//! verifies the HS256 access tokens it receives.
//!
//! - [`jwt`] -- JWT access-token validation (and issuance for tooling/tests).

pub mod jwt;
