//! Core library for the nosh nutrition tracker.
//!
//! Holds the daily nutrition ledger and the target-derivation engine: pure
//! target math in [`targets`], the per-day aggregate ledger in [`ledger`],
//! the durable key-value store abstraction in [`store`], and the
//! orchestrating [`engine::Engine`]. The recognition and estimation
//! collaborators are traits; the CLI crate provides the HTTP-backed
//! implementations.

pub mod analysis;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;
pub mod targets;
