//! # tagtune-cache
//!
//! Process-local, in-memory state for Tagtune.
//!
//! This crate provides:
//! - A TTL response cache keyed by normalized page URL
//! - A fixed-window rate limiter keyed by client identity
//!
//! Neither structure persists anything or coordinates across processes.

pub mod rate_limit;
pub mod response;

pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use response::ResponseCache;
