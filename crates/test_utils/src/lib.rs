//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the rejection-lifecycle
//! test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `generators`: Property-based test data generators
//! - `telemetry`: One-time tracing initialization for tests

pub mod builders;
pub mod fixtures;
pub mod generators;
pub mod telemetry;

pub use builders::*;
pub use fixtures::*;
pub use generators::*;
pub use telemetry::*;
