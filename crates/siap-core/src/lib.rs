//! Core types and trait definitions for the SIAP-SPJ claim store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod claim;
pub mod error;
pub mod lenient;
pub mod stats;
pub mod store;
pub mod submission;

pub use error::{Error, Result};
