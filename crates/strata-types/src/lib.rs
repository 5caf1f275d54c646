//! Shared types, collaborator traits, and core utilities for the Strata settings engine.
//!
//! This crate contains the foundational types that are shared between the
//! resolver crate and all adapter implementations. Keeping them in a separate
//! crate lets storage adapters compile without pulling in the resolver.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod cache_adapter;
pub mod error;
pub mod feature_gate;
pub mod prelude;
pub mod store_adapter;
pub mod types;

// vim: ts=4
