//! # tagtune-core
//!
//! Core types, URL validation, and error handling for the Tagtune
//! metadata and lyrics extraction engine.

pub mod error;
pub mod fetch;
pub mod types;
pub mod validate;

pub use error::{Error, ErrorClass, HttpError, Result};
pub use fetch::PageFetcher;
pub use types::*;
pub use validate::validate_target;
