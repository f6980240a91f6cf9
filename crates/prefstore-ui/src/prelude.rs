pub use prefstore_core::prelude::*;
pub use prefstore_types::error::PlacementError;

pub use crate::entry::{Group, SettingsEntry};

// vim: ts=4
