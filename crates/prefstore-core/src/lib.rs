//! Settings contract: typed, namespaced access to single-row configuration domains.
//!
//! Every domain lives behind an address derived from the installation
//! authority. Reads and writes go through a [`StoreAdapter`](prefstore_types::store_adapter::StoreAdapter)
//! with the calling identity cleared for the duration of the call.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod contract;
pub mod domain;
pub mod identity;
pub mod prefs;
pub mod prelude;

pub use contract::SettingsContract;
pub use domain::{resolve_address, ConfigDomain};
pub use identity::{without_calling_identity, CallingIdentity, NoIdentity, ThreadIdentity};

// vim: ts=4
