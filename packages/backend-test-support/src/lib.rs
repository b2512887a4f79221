//! Shared test helpers for the checkers workspace.
//!
//! Integration test binaries and sibling packages pull logging setup from
//! here so every test process configures `tracing` the same way.

pub mod logging;
