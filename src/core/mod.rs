//! Core error types shared by every kitpm module.
//!
//! - [`KitError`] - crate-wide error enum wrapping the module errors
//! - [`ErrorContext`] - user-facing wrapper with suggestion and details
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for display
//! - [`similar_names`] - typo suggestions for unknown component names

pub mod error;

pub use error::{ErrorContext, KitError, similar_names, user_friendly_error};
