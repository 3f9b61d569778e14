//! HTTP middleware
//!
//! Request extractors that turn the Authorization header into a verified
//! caller identity.

pub mod auth;

pub use auth::{AuthUser, OptionalAuthUser};
