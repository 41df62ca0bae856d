//! Test utilities shared across the flowbot workspace
//!
//! This crate provides common testing infrastructure including:
//! - XDG directory isolation ([`XdgTestGuard`])
//! - Single environment variable overrides ([`EnvVarGuard`])
//! - HOME directory isolation with a seeded `.netrc` ([`NetrcGuard`])
//!
//! The dead_code lint is disabled for this crate because test utilities may
//! not be used by all tests, and the compiler cannot detect usage across crate
//! boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod netrc;

// Re-export commonly used items
pub use env::{EnvVarGuard, XdgTestGuard};
pub use netrc::NetrcGuard;
