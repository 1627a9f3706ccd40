//! Navigation and site settings commands

use colored::Colorize;
use serde_json::{Value, json};

use super::helpers::{read_json_input, write_json_output};
use crate::content::{NavItem, Navigation};
use crate::interfaces::cli::CliError;
use crate::services::ContentServices;

fn print_nav_items(items: &[NavItem], indent: usize) {
    for item in items {
        let mut parts = vec![format!("{} -> {}", item.label.bold(), item.url.blue().underline())];
        if item.open_in_new_tab {
            parts.push("↗".to_string());
        }
        parts.push(format!("({})", item.id).dimmed().to_string());
        println!("{}{}", "  ".repeat(indent), parts.join(" "));
        print_nav_items(&item.children, indent + 1);
    }
}

pub async fn show_navigation(services: &ContentServices, json: bool) -> Result<(), CliError> {
    let navigation = services.navigation.get_navigation().await?;

    if json {
        let value = serde_json::to_value(&navigation)
            .map_err(|e| CliError::ParseError(format!("Failed to serialize navigation: {}", e)))?;
        return write_json_output(&value, None);
    }

    if navigation.items.is_empty() {
        println!("{} Navigation is empty", "ℹ".bold().blue());
        return Ok(());
    }
    println!("{}", "Navigation:".bold().green());
    print_nav_items(&navigation.items, 1);
    Ok(())
}

pub async fn set_navigation(services: &ContentServices, file_path: String) -> Result<(), CliError> {
    let doc = read_json_input(&file_path)?;
    // 接受 {"items": [...]} 或者直接是数组
    let doc = match doc {
        Value::Array(items) => json!({ "items": items }),
        other => other,
    };
    let navigation: Navigation = serde_json::from_value(doc)
        .map_err(|e| CliError::ParseError(format!("Invalid navigation: {}", e)))?;

    let saved = services.navigation.replace_navigation(navigation).await?;
    println!(
        "{} Navigation saved ({} items)",
        "✓".bold().green(),
        saved.item_count().to_string().green()
    );
    Ok(())
}

pub async fn show_settings(services: &ContentServices, json: bool) -> Result<(), CliError> {
    let settings = services.settings.get_settings().await?;
    let value = serde_json::to_value(&settings)
        .map_err(|e| CliError::ParseError(format!("Failed to serialize settings: {}", e)))?;

    if json {
        return write_json_output(&value, None);
    }

    println!("{}", "Site settings:".bold().green());
    if let Value::Object(map) = value {
        for (key, value) in map {
            let shown = match value {
                Value::String(s) if s.is_empty() => "(empty)".dimmed().to_string(),
                Value::String(s) => s,
                other => other.to_string(),
            };
            println!("  {} {}", format!("{}:", key).cyan(), shown);
        }
    }
    Ok(())
}

/// Parse a CLI value as JSON when it is valid JSON, otherwise as a plain string
fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub async fn set_setting(services: &ContentServices, key: &str, raw: &str) -> Result<(), CliError> {
    let patch = json!({ key: parse_setting_value(raw) });
    services.settings.update_settings(&patch).await?;
    println!("{} Updated setting: {}", "✓".bold().green(), key.cyan());
    Ok(())
}
