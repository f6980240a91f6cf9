//! prefstore keeps the configuration of an installation in namespaced,
//! single-row domains and shows it on a settings screen assembled from
//! pluggable providers.
//!
//! # Features
//!
//! - Typed access to the check-in, push messaging, auth and device profile domains
//! - Install time provisioning of default rows
//! - Storage behind a replaceable store adapter
//! - Settings screen reconciled from static and dynamic provider entries

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

// Re-export shared types and adapter traits from prefstore-types
pub use prefstore_types::address;
pub use prefstore_types::error;
pub use prefstore_types::store_adapter;
pub use prefstore_types::types;
pub use prefstore_types::worker;

// Feature crate re-exports
pub use prefstore_core::{contract, domain, identity, prefs};
pub use prefstore_ui as ui;

// Local modules
pub mod app;
pub mod prelude;
pub mod status;

pub use crate::app::{App, AppBuilder, AppBuilderOpts, AppState};
pub use crate::status::ServiceStatusProvider;

// vim: ts=4
