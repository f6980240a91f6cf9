pub use prefstore_ui::prelude::*;

pub use crate::app::{App, AppState, VERSION};

// vim: ts=4
