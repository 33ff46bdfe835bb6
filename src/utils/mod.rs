//! Shared helpers.
//!
//! - [`fs`] - async, atomic file writes used by the installer and the merger

pub mod fs;

pub use fs::{atomic_write, ensure_dir, safe_write};
