//! Import and export page commands

use colored::Colorize;

use super::super::helpers::{read_json_input, write_json_output};
use crate::interfaces::cli::CliError;
use crate::services::{ContentServices, ImportMode, parse_import_rows};

/// Default export file name with a timestamp
fn generate_export_filename() -> String {
    format!(
        "pages_export_{}.json",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    )
}

pub async fn export_pages(
    services: &ContentServices,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let pages = services.pages.export_pages().await?;

    if pages.is_empty() {
        println!("{} No pages to export", "ℹ".bold().blue());
        return Ok(());
    }

    let value = serde_json::to_value(&pages)
        .map_err(|e| CliError::ParseError(format!("Failed to serialize pages: {}", e)))?;
    let output_path = file_path.unwrap_or_else(generate_export_filename);
    write_json_output(&value, Some(&output_path))?;

    println!(
        "{} Exported {} pages to: {}",
        "✓".bold().green(),
        pages.len().to_string().green(),
        output_path.cyan()
    );
    Ok(())
}

pub async fn import_pages(
    services: &ContentServices,
    file_path: String,
    mode: ImportMode,
) -> Result<(), CliError> {
    let doc = read_json_input(&file_path)?;
    let rows = parse_import_rows(&doc)?;

    if rows.is_empty() {
        println!("{} Import file is empty", "ℹ".bold().blue());
        return Ok(());
    }

    let result = services.pages.import_pages(rows, mode).await?;

    for error in &result.errors {
        let location = error
            .row_num
            .map(|n| format!("row {}: ", n))
            .unwrap_or_default();
        println!(
            "{} {}{} - {}",
            "✗".bold().red(),
            location.dimmed(),
            error.slug.cyan(),
            error.message
        );
    }
    if !result.errors.is_empty() {
        println!();
    }
    println!(
        "{} Success: {}, skipped: {}, failed: {}",
        "ℹ".bold().blue(),
        result.success.to_string().green(),
        result.skipped.to_string().yellow(),
        result.failed.to_string().red()
    );

    if result.failed > 0 && mode == ImportMode::Error {
        return Err(CliError::CommandError(format!(
            "{} pages could not be imported",
            result.failed
        )));
    }
    Ok(())
}
