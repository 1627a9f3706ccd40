//! List and show page commands

use colored::Colorize;

use super::super::helpers::{print_issues, resolve_page_id, status_label, write_json_output};
use crate::content::ContentStatus;
use crate::interfaces::cli::CliError;
use crate::services::{ContentServices, PageFilter};

pub async fn list_pages(
    services: &ContentServices,
    status: Option<ContentStatus>,
    search: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let pages = services
        .pages
        .list_pages(&PageFilter { status, search })
        .await?;

    if json {
        let value = serde_json::to_value(&pages)
            .map_err(|e| CliError::ParseError(format!("Failed to serialize pages: {}", e)))?;
        return write_json_output(&value, None);
    }

    if pages.is_empty() {
        println!("{} No pages found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Page list:".bold().green());
    println!();
    let mut outdated = 0;
    for page in &pages {
        let mut info_parts = vec![
            format!("{} {}", page.slug.cyan(), page.title),
            format!("[{}]", status_label(page.status)),
            format!("(updated: {})", page.updated_at.format("%Y-%m-%d %H:%M:%S UTC"))
                .dimmed()
                .to_string(),
        ];
        match page.layout_version {
            None => info_parts.push("(unsupported layout)".red().to_string()),
            Some(_) if page.needs_migration => {
                outdated += 1;
                info_parts.push("(needs migration)".yellow().to_string());
            }
            Some(_) => {}
        }
        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} pages",
        "ℹ".bold().blue(),
        pages.len().to_string().green()
    );
    if outdated > 0 {
        println!(
            "{} {} pages use an outdated layout, run `page migrate` to rewrite them",
            "⚠".bold().yellow(),
            outdated
        );
    }
    Ok(())
}

pub async fn show_page(services: &ContentServices, key: &str, json: bool) -> Result<(), CliError> {
    let id = resolve_page_id(services, key).await?;
    let doc = services.pages.get_page(&id).await?;

    if json {
        let value = serde_json::to_value(&doc.page)
            .map_err(|e| CliError::ParseError(format!("Failed to serialize page: {}", e)))?;
        return write_json_output(&value, None);
    }

    let page = &doc.page;
    println!("{} {}", page.title.bold(), format!("/{}", page.slug).cyan());
    println!("  {} {}", "id:".dimmed(), page.id);
    println!("  {} {}", "status:".dimmed(), status_label(page.status));
    println!(
        "  {} {}",
        "created:".dimmed(),
        page.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(published_at) = page.published_at {
        println!(
            "  {} {}",
            "published:".dimmed(),
            published_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if !page.seo.title.is_empty() {
        println!("  {} {}", "seo title:".dimmed(), page.seo.title);
    }
    println!(
        "  {} {} sections, {} blocks",
        "layout:".dimmed(),
        doc.layout.sections.len(),
        doc.layout.block_count()
    );
    for section in &doc.layout.sections {
        let types: Vec<String> = section
            .blocks
            .iter()
            .map(|b| format!("{}#{}", b.block_type.as_str(), b.id))
            .collect();
        println!("    {} {}", section.id.cyan(), types.join(", ").dimmed());
    }

    if doc.needs_migration() {
        println!();
        println!(
            "{} Stored layout is {} and differs from the canonical form:",
            "⚠".bold().yellow(),
            doc.source_version
        );
        print_issues(&doc.issues);
    }
    Ok(())
}
