//! CLI interface module
//!
//! This module provides command-line interface functionality for pagecraft.

pub mod commands;

use std::fmt;

use crate::cli::{
    ArticleCommands, Commands, ConfigCommands, LayoutCommands, NavCommands, PageCommands,
    SettingsCommands,
};
use crate::config::StaticConfig;
use crate::errors::PagecraftError;
use crate::services::ContentServices;
use commands::{article_management, config_gen, layout_tools, page_management, site};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<PagecraftError> for CliError {
    fn from(err: PagecraftError) -> Self {
        match err {
            PagecraftError::StorageOperation(_)
            | PagecraftError::StoragePluginNotFound(_)
            | PagecraftError::FileOperation(_) => CliError::StorageError(err.format_simple()),
            PagecraftError::Serialization(_) => CliError::ParseError(err.format_simple()),
            other => CliError::CommandError(format!("[{}] {}", other.code(), other.message())),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    // Layout tools work on files only, no storage needed
    if let Commands::Layout { action } = cmd {
        return match action {
            LayoutCommands::Normalize {
                file,
                output,
                check,
                report,
            } => layout_tools::normalize_file(config, &file, output, check, report),
            LayoutCommands::Inspect { file } => layout_tools::inspect_file(config, &file),
        };
    }

    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_gen::config_generate(output_path, force).await;
    }

    // Create services for commands that need storage
    let services = ContentServices::from_config(config)
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    match cmd {
        Commands::Page { action } => run_page_command(&services, action).await,
        Commands::Article { action } => run_article_command(&services, action).await,
        Commands::Nav { action } => match action {
            NavCommands::Show { json } => site::show_navigation(&services, json).await,
            NavCommands::Set { file_path } => site::set_navigation(&services, file_path).await,
        },
        Commands::Settings { action } => match action {
            SettingsCommands::Show { json } => site::show_settings(&services, json).await,
            SettingsCommands::Set { key, value } => {
                site::set_setting(&services, &key, &value).await
            }
        },
        Commands::Layout { .. } => unreachable!("handled above"),
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

async fn run_page_command(services: &ContentServices, action: PageCommands) -> Result<(), CliError> {
    use page_management as pm;

    match action {
        PageCommands::List {
            status,
            search,
            json,
        } => pm::list_pages(services, status.map(Into::into), search, json).await,
        PageCommands::Show { page, json } => pm::show_page(services, &page, json).await,
        PageCommands::Create {
            title,
            slug,
            layout,
        } => pm::create_page(services, title, slug, layout).await,
        PageCommands::SetLayout { page, file } => pm::set_layout(services, &page, &file).await,
        PageCommands::AddBlock {
            page,
            block_type,
            section,
            column,
            row,
        } => pm::add_block(services, &page, &block_type, section, column, row).await,
        PageCommands::RemoveBlock { page, block_id } => {
            pm::remove_block(services, &page, &block_id).await
        }
        PageCommands::Publish { page } => pm::publish_page(services, &page).await,
        PageCommands::Unpublish { page } => pm::unpublish_page(services, &page).await,
        PageCommands::Delete { page } => pm::delete_page(services, &page).await,
        PageCommands::Duplicate { page, slug } => pm::duplicate_page(services, &page, slug).await,
        PageCommands::Export { file_path } => pm::export_pages(services, file_path).await,
        PageCommands::Import { file_path, mode } => {
            pm::import_pages(services, file_path, mode.into()).await
        }
        PageCommands::Migrate { dry_run } => pm::migrate_layouts(services, dry_run).await,
    }
}

async fn run_article_command(
    services: &ContentServices,
    action: ArticleCommands,
) -> Result<(), CliError> {
    use article_management as am;

    match action {
        ArticleCommands::List { status, tag } => {
            am::list_articles(services, status.map(Into::into), tag).await
        }
        ArticleCommands::Show { article, json } => am::show_article(services, &article, json).await,
        ArticleCommands::Create {
            title,
            slug,
            excerpt,
            content_file,
            author,
            cover_image,
            tags,
        } => {
            am::create_article(
                services,
                am::NewArticleArgs {
                    title,
                    slug,
                    excerpt,
                    content_file,
                    author,
                    cover_image,
                    tags,
                },
            )
            .await
        }
        ArticleCommands::Publish { article } => am::publish_article(services, &article).await,
        ArticleCommands::Unpublish { article } => am::unpublish_article(services, &article).await,
        ArticleCommands::Delete { article } => am::delete_article(services, &article).await,
    }
}
