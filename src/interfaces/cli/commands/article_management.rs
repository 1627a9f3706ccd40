//! Article commands

use colored::Colorize;

use super::helpers::{resolve_article_id, status_label, write_json_output};
use crate::content::ContentStatus;
use crate::interfaces::cli::CliError;
use crate::services::{ArticleFilter, ContentServices, CreateArticleRequest};

/// Arguments of `article create`
pub struct NewArticleArgs {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content_file: Option<String>,
    pub author: String,
    pub cover_image: String,
    pub tags: Vec<String>,
}

pub async fn list_articles(
    services: &ContentServices,
    status: Option<ContentStatus>,
    tag: Option<String>,
) -> Result<(), CliError> {
    let articles = services
        .articles
        .list_articles(&ArticleFilter { status, tag })
        .await?;

    if articles.is_empty() {
        println!("{} No articles found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Article list:".bold().green());
    println!();
    for article in &articles {
        let mut info_parts = vec![
            format!("{} {}", article.slug.cyan(), article.title),
            format!("[{}]", status_label(article.status)),
        ];
        if let Some(published_at) = article.published_at {
            info_parts.push(
                format!("({})", published_at.format("%Y-%m-%d"))
                    .dimmed()
                    .to_string(),
            );
        }
        if !article.tags.is_empty() {
            info_parts.push(
                format!("#{}", article.tags.join(" #"))
                    .dimmed()
                    .cyan()
                    .to_string(),
            );
        }
        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} articles",
        "ℹ".bold().blue(),
        articles.len().to_string().green()
    );
    Ok(())
}

pub async fn show_article(
    services: &ContentServices,
    key: &str,
    json: bool,
) -> Result<(), CliError> {
    let id = resolve_article_id(services, key).await?;
    let article = services.articles.get_article(&id).await?;

    if json {
        let value = serde_json::to_value(&article)
            .map_err(|e| CliError::ParseError(format!("Failed to serialize article: {}", e)))?;
        return write_json_output(&value, None);
    }

    println!("{} {}", article.title.bold(), format!("/{}", article.slug).cyan());
    println!("  {} {}", "id:".dimmed(), article.id);
    println!("  {} {}", "status:".dimmed(), status_label(article.status));
    if !article.author.is_empty() {
        println!("  {} {}", "author:".dimmed(), article.author);
    }
    if !article.tags.is_empty() {
        println!("  {} {}", "tags:".dimmed(), article.tags.join(", "));
    }
    if !article.excerpt.is_empty() {
        println!();
        println!("  {}", article.excerpt.italic());
    }
    println!();
    println!("{}", article.content);
    Ok(())
}

pub async fn create_article(
    services: &ContentServices,
    args: NewArticleArgs,
) -> Result<(), CliError> {
    let content = match args.content_file.as_deref() {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::CommandError(format!("Failed to read '{}': {}", path, e)))?,
        None => String::new(),
    };

    let article = services
        .articles
        .create_article(CreateArticleRequest {
            slug: args.slug,
            title: args.title,
            excerpt: args.excerpt,
            content,
            cover_image: args.cover_image,
            author: args.author,
            tags: args.tags,
        })
        .await?;

    println!(
        "{} Created article: {} {}",
        "✓".bold().green(),
        article.slug.cyan(),
        format!("({})", article.id).dimmed()
    );
    Ok(())
}

pub async fn publish_article(services: &ContentServices, key: &str) -> Result<(), CliError> {
    let id = resolve_article_id(services, key).await?;
    let article = services.articles.publish_article(&id).await?;
    println!("{} Published: {}", "✓".bold().green(), article.slug.cyan());
    Ok(())
}

pub async fn unpublish_article(services: &ContentServices, key: &str) -> Result<(), CliError> {
    let id = resolve_article_id(services, key).await?;
    let article = services.articles.unpublish_article(&id).await?;
    println!(
        "{} Moved back to draft: {}",
        "✓".bold().green(),
        article.slug.cyan()
    );
    Ok(())
}

pub async fn delete_article(services: &ContentServices, key: &str) -> Result<(), CliError> {
    let id = resolve_article_id(services, key).await?;
    services.articles.delete_article(&id).await?;
    println!("{} Deleted article: {}", "✓".bold().green(), key.cyan());
    Ok(())
}
