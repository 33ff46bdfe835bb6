//! Test utilities for kitpm
//!
//! Helpers shared by unit tests and the integration suite:
//!
//! - [`init_test_logging`] - one-time tracing setup for tests
//! - [`StubTransport`] - in-memory registry serving canned items and counting
//!   requests per locator
//! - [`item_json`] / [`file_json`] - builders for registry payloads
//!
//! # Example
//!
//! ```rust,no_run
//! use kitpm_cli::test_utils::{StubTransport, file_json, item_json};
//!
//! let transport = StubTransport::new("https://registry.test/r").with_items(vec![
//!     item_json(
//!         "button",
//!         "registry:ui",
//!         &[],
//!         &[file_json("ui/button.tsx", "registry:ui", "export {}")],
//!     ),
//! ]);
//! let client = transport.client();
//! ```

mod registry;

pub use registry::{StubTransport, file_json, item_json};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`; without either, tests run
/// without a subscriber.
///
/// ```bash
/// RUST_LOG=kitpm_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
