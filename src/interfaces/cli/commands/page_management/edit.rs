//! Create, edit and lifecycle page commands

use colored::Colorize;

use super::super::helpers::{print_issues, read_json_input, resolve_page_id};
use crate::interfaces::cli::CliError;
use crate::layout::BlockType;
use crate::services::{ContentServices, CreatePageRequest};

pub async fn create_page(
    services: &ContentServices,
    title: String,
    slug: Option<String>,
    layout_file: Option<String>,
) -> Result<(), CliError> {
    let layout = layout_file.as_deref().map(read_json_input).transpose()?;

    let doc = services
        .pages
        .create_page(CreatePageRequest {
            slug,
            title,
            layout,
            seo: None,
        })
        .await?;

    println!(
        "{} Created page: {} {}",
        "✓".bold().green(),
        doc.page.slug.cyan(),
        format!("({})", doc.page.id).dimmed()
    );
    if layout_file.is_some() && !doc.issues.is_empty() {
        println!(
            "{} Layout was normalized with {} issues:",
            "ℹ".bold().blue(),
            doc.issues.len()
        );
        print_issues(&doc.issues);
    }
    Ok(())
}

pub async fn set_layout(services: &ContentServices, key: &str, file: &str) -> Result<(), CliError> {
    let id = resolve_page_id(services, key).await?;
    let layout = read_json_input(file)?;
    let result = services.pages.save_layout(&id, &layout).await?;

    println!(
        "{} Layout saved for {} ({} sections, {} blocks)",
        "✓".bold().green(),
        result.page.slug.cyan(),
        result.layout.sections.len(),
        result.layout.block_count()
    );
    if !result.issues.is_empty() {
        println!(
            "{} Normalized from {} with {} issues:",
            "ℹ".bold().blue(),
            result.source_version,
            result.issues.len()
        );
        print_issues(&result.issues);
    }
    Ok(())
}

pub async fn add_block(
    services: &ContentServices,
    key: &str,
    block_type: &str,
    section: Option<String>,
    column: u8,
    row: Option<u32>,
) -> Result<(), CliError> {
    let block_type = BlockType::parse_loose(block_type)
        .ok_or_else(|| CliError::CommandError(format!("Unknown block type: {}", block_type)))?;
    let id = resolve_page_id(services, key).await?;

    let (block_id, page) = services
        .pages
        .edit_layout(&id, |editor| {
            let section_id = match section {
                Some(section) => section,
                None => editor
                    .layout()
                    .sections
                    .last()
                    .map(|s| s.id.clone())
                    .unwrap_or_default(),
            };
            editor.add_block(&section_id, column, block_type, row)
        })
        .await?;

    println!(
        "{} Added {} block {} to {}",
        "✓".bold().green(),
        block_type.as_str().blue(),
        block_id.cyan(),
        page.slug.cyan()
    );
    Ok(())
}

pub async fn remove_block(
    services: &ContentServices,
    key: &str,
    block_id: &str,
) -> Result<(), CliError> {
    let id = resolve_page_id(services, key).await?;
    let (_, page) = services
        .pages
        .edit_layout(&id, |editor| editor.remove_block(block_id))
        .await?;

    println!(
        "{} Removed block {} from {}",
        "✓".bold().green(),
        block_id.cyan(),
        page.slug.cyan()
    );
    Ok(())
}

pub async fn publish_page(services: &ContentServices, key: &str) -> Result<(), CliError> {
    let id = resolve_page_id(services, key).await?;
    let page = services.pages.publish_page(&id).await?;
    println!("{} Published: {}", "✓".bold().green(), page.slug.cyan());
    Ok(())
}

pub async fn unpublish_page(services: &ContentServices, key: &str) -> Result<(), CliError> {
    let id = resolve_page_id(services, key).await?;
    let page = services.pages.unpublish_page(&id).await?;
    println!(
        "{} Moved back to draft: {}",
        "✓".bold().green(),
        page.slug.cyan()
    );
    Ok(())
}

pub async fn delete_page(services: &ContentServices, key: &str) -> Result<(), CliError> {
    let id = resolve_page_id(services, key).await?;
    services.pages.delete_page(&id).await?;
    println!("{} Deleted page: {}", "✓".bold().green(), key.cyan());
    Ok(())
}

pub async fn duplicate_page(
    services: &ContentServices,
    key: &str,
    slug: Option<String>,
) -> Result<(), CliError> {
    let id = resolve_page_id(services, key).await?;
    let copy = services.pages.duplicate_page(&id, slug).await?;
    println!(
        "{} Duplicated {} as {} (draft)",
        "✓".bold().green(),
        key.cyan(),
        copy.slug.cyan()
    );
    Ok(())
}

pub async fn migrate_layouts(services: &ContentServices, dry_run: bool) -> Result<(), CliError> {
    let report = services.pages.migrate_all_layouts(dry_run).await?;

    for failure in &report.failures {
        println!(
            "{} {}: {}",
            "✗".bold().red(),
            failure.slug.cyan(),
            failure.message
        );
    }

    let verb = if dry_run { "Would migrate" } else { "Migrated" };
    println!(
        "{} {} {} of {} pages ({} unchanged, {} failed, {} issues)",
        "✓".bold().green(),
        verb,
        report.migrated.to_string().green(),
        report.total,
        report.unchanged,
        report.failed,
        report.issues
    );
    if dry_run && report.migrated > 0 {
        println!("{} Dry run, nothing was written", "ℹ".bold().blue());
    }
    Ok(())
}
