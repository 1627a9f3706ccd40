//! Page management commands

mod edit;
mod import_export;
mod list;

pub use edit::*;
pub use import_export::*;
pub use list::*;
