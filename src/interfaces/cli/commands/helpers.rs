//! Helper functions shared by CLI commands

use std::io::{self, Read};
use std::path::Path;

use colored::Colorize;
use serde_json::Value;

use crate::content::ContentStatus;
use crate::errors::PagecraftError;
use crate::interfaces::cli::CliError;
use crate::layout::LayoutIssue;
use crate::services::ContentServices;

/// Read a JSON document from a file, `-` reads stdin
pub fn read_json_input(path: &str) -> Result<Value, CliError> {
    let content = if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::CommandError(format!("Failed to read stdin: {}", e)))?;
        buf
    } else {
        if !Path::new(path).exists() {
            return Err(CliError::CommandError(format!("File not found: {}", path)));
        }
        std::fs::read_to_string(path)
            .map_err(|e| CliError::CommandError(format!("Failed to read '{}': {}", path, e)))?
    };

    serde_json::from_str(&content)
        .map_err(|e| CliError::ParseError(format!("Invalid JSON in '{}': {}", path, e)))
}

/// Write pretty JSON to a file, or stdout when no path is given
pub fn write_json_output(value: &Value, path: Option<&str>) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::ParseError(format!("Failed to serialize JSON: {}", e)))?;

    match path {
        Some(path) => std::fs::write(path, text + "\n").map_err(|e| {
            CliError::CommandError(format!("Failed to write '{}': {}", path, e))
        }),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

pub fn status_label(status: ContentStatus) -> colored::ColoredString {
    match status {
        ContentStatus::Published => "published".green(),
        ContentStatus::Draft => "draft".yellow(),
    }
}

/// Print layout issues, lossy ones highlighted
pub fn print_issues(issues: &[LayoutIssue]) {
    for issue in issues {
        let marker = if issue.kind.is_lossy() {
            "⚠".bold().yellow()
        } else {
            "ℹ".bold().blue()
        };
        let location = if issue.path.is_empty() {
            String::new()
        } else {
            format!("{} ", issue.path.dimmed())
        };
        eprintln!(
            "  {} {} {}{}",
            marker,
            issue.kind.code().cyan(),
            location,
            issue.message
        );
    }
}

/// Resolve a page given by id or slug to its id
pub async fn resolve_page_id(services: &ContentServices, key: &str) -> Result<String, CliError> {
    match services.pages.get_page(key).await {
        Ok(doc) => Ok(doc.page.id),
        Err(PagecraftError::NotFound(_)) => Ok(services.pages.get_page_by_slug(key).await?.page.id),
        Err(e) => Err(e.into()),
    }
}

/// Resolve an article given by id or slug to its id
pub async fn resolve_article_id(services: &ContentServices, key: &str) -> Result<String, CliError> {
    match services.articles.get_article(key).await {
        Ok(article) => Ok(article.id),
        Err(PagecraftError::NotFound(_)) => {
            Ok(services.articles.get_article_by_slug(key).await?.id)
        }
        Err(e) => Err(e.into()),
    }
}
