//! Shared types, store adapter trait, and core utilities for prefstore.
//!
//! This crate holds the foundational types shared by the contract crate, the
//! screen crate and every store adapter implementation.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod worker;

// vim: ts=4
