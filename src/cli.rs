//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for pagecraft using clap's derive macros.

use clap::{Parser, Subcommand, ValueEnum};

use crate::content::ContentStatus;
use crate::services::ImportMode;

/// pagecraft - content backend for a block-based page builder
#[derive(Parser)]
#[command(name = "pagecraft")]
#[command(version)]
#[command(about = "Manage pages, layouts, articles, navigation and site settings", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Work with layout documents on disk (no storage needed)
    Layout {
        #[command(subcommand)]
        action: LayoutCommands,
    },

    /// Manage pages
    Page {
        #[command(subcommand)]
        action: PageCommands,
    },

    /// Manage blog articles
    Article {
        #[command(subcommand)]
        action: ArticleCommands,
    },

    /// Manage site navigation
    Nav {
        #[command(subcommand)]
        action: NavCommands,
    },

    /// Manage site settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Layout document commands
#[derive(Subcommand)]
pub enum LayoutCommands {
    /// Normalize a layout JSON file into the canonical format
    Normalize {
        /// Input file ("-" for stdin)
        file: String,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Only check; exit with an error if the file is not canonical
        #[arg(long)]
        check: bool,

        /// Print the issues found while normalizing
        #[arg(long)]
        report: bool,
    },

    /// Show the structure of a layout file
    Inspect {
        /// Input file ("-" for stdin)
        file: String,
    },
}

/// Page commands. `PAGE` accepts an id or a slug.
#[derive(Subcommand)]
pub enum PageCommands {
    /// List pages
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Filter by title or slug
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a page with its canonical layout
    Show {
        page: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a page
    Create {
        title: String,

        #[arg(long)]
        slug: Option<String>,

        /// Initial layout JSON file
        #[arg(long)]
        layout: Option<String>,
    },

    /// Replace a page's layout with the content of a JSON file
    SetLayout { page: String, file: String },

    /// Add a block with default content
    AddBlock {
        page: String,

        /// Block type (hero excluded)
        block_type: String,

        /// Target section id (default: last section)
        #[arg(long)]
        section: Option<String>,

        #[arg(long, default_value_t = 0)]
        column: u8,

        /// Row inside the column (default: append)
        #[arg(long)]
        row: Option<u32>,
    },

    /// Remove a block
    RemoveBlock { page: String, block_id: String },

    /// Publish a page
    Publish { page: String },

    /// Return a page to draft
    Unpublish { page: String },

    /// Delete a page
    Delete { page: String },

    /// Copy a page as a new draft
    Duplicate {
        page: String,

        /// Slug of the copy (default: <slug>-copy)
        #[arg(long)]
        slug: Option<String>,
    },

    /// Export pages to a JSON file
    Export {
        /// Output file path (default: stdout)
        file_path: Option<String>,
    },

    /// Import pages from a JSON file
    Import {
        file_path: String,

        /// What to do when a slug already exists
        #[arg(long, value_enum, default_value_t = ImportModeArg::Skip)]
        mode: ImportModeArg,
    },

    /// Rewrite every stored layout in canonical form
    Migrate {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Article commands. `ARTICLE` accepts an id or a slug.
#[derive(Subcommand)]
pub enum ArticleCommands {
    /// List articles (newest first)
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long)]
        tag: Option<String>,
    },

    /// Show an article
    Show {
        article: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an article
    Create {
        title: String,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long, default_value = "")]
        excerpt: String,

        /// File containing the article body (HTML)
        #[arg(long)]
        content_file: Option<String>,

        #[arg(long, default_value = "")]
        author: String,

        #[arg(long, default_value = "")]
        cover_image: String,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Publish an article
    Publish { article: String },

    /// Return an article to draft
    Unpublish { article: String },

    /// Delete an article
    Delete { article: String },
}

/// Navigation commands
#[derive(Subcommand)]
pub enum NavCommands {
    /// Show the navigation tree
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the navigation with the content of a JSON file
    Set { file_path: String },
}

/// Site settings commands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show site settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a single setting (value is parsed as JSON when possible)
    Set {
        /// Setting name (camelCase, e.g. siteName)
        key: String,

        value: String,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Draft,
    Published,
}

impl From<StatusArg> for ContentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => ContentStatus::Draft,
            StatusArg::Published => ContentStatus::Published,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImportModeArg {
    Skip,
    Overwrite,
    Error,
}

impl From<ImportModeArg> for ImportMode {
    fn from(arg: ImportModeArg) -> Self {
        match arg {
            ImportModeArg::Skip => ImportMode::Skip,
            ImportModeArg::Overwrite => ImportMode::Overwrite,
            ImportModeArg::Error => ImportMode::Error,
        }
    }
}
