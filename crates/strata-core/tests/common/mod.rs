//! Common test utilities and helpers
//!
//! Shared infrastructure for the settings integration tests: an in-memory
//! store that counts its calls, and builders for a ready-to-use service.

#![allow(dead_code)]

pub mod fixtures;
pub mod store;

pub use fixtures::*;
pub use store::*;

// vim: ts=4
