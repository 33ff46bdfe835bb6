//! Integration test suite for kitpm
//!
//! End-to-end tests against a registry served over real HTTP by a local axum
//! server (see [`common::TestRegistry`]). Nothing leaves the machine.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **registry**: HTTP transport, status mapping and request deduplication
//! - **install**: installing into a temporary project, typed and untyped
//! - **cli**: the `kitpm` binary driven through assert_cmd

mod common;

mod cli;
mod install;
mod registry;
