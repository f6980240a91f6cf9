//! Settings screen: entries from pluggable providers, reconciled into a
//! persistent list of displayed items.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod entry;
pub mod prelude;
pub mod provider;
pub mod reconciler;
pub mod scope;
pub mod screen;

pub use entry::{Group, IconRef, NavigationTarget, SettingsEntry};
pub use provider::{FrozenProviderRegistry, ProviderContext, ProviderRegistry, SettingsProvider};
pub use reconciler::{ProviderBatch, ReconcileReport, SettingsReconciler};
pub use scope::ScreenScope;
pub use screen::{DisplayedItem, ItemSlot, Navigator, Section, SettingsScreen};

// vim: ts=4
