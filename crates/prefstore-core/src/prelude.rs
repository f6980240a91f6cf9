pub use prefstore_types::prelude::*;

pub use crate::contract::SettingsContract;
pub use crate::domain::ConfigDomain;

// vim: ts=4
