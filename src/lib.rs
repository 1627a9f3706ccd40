//! pagecraft - content backend for a block-based page builder
//!
//! Pages are stored as layout documents produced by a visual editor. The
//! editor's format changed over time, so every layout goes through the
//! normalizer before it is trusted: old documents are migrated, broken ones
//! repaired, and the result is always the canonical V2 structure.
//!
//! # Features
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `layout`: Layout detection, migration, normalization and editing
//! - `content`: Pages, articles, navigation and site settings
//! - `storage`: Storage backends (memory, JSON file)
//! - `services`: Business logic over a store
//! - `interfaces`: User interfaces (CLI)
//! - `config`: Configuration management
//! - `system`: Logging setup

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod content;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod layout;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
