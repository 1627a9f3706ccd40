//! CLI command implementations

pub mod article_management;
pub mod config_gen;
mod helpers;
pub mod layout_tools;
pub mod page_management;
pub mod site;
