//! SwarmCart Core - Shared types and scoring library.
//!
//! This crate provides the types and pure functions used across all
//! SwarmCart components:
//!
//! - `server` - The collaborative cart service (REST + WebSocket)
//! - `integration-tests` - End-to-end scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure computation - no I/O, no
//! store access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere, including tests that never spin up a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the product record
//! - [`scoring`] - The scoring engine: composite product scores, best-value
//!   selection, and the cart optimization score

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod scoring;
pub mod types;

pub use types::*;
