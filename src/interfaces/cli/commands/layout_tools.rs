//! Layout file commands: normalize and inspect
//!
//! These run without touching storage.

use colored::Colorize;

use super::helpers::{print_issues, read_json_input, write_json_output};
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::layout::{NormalizeOptions, NormalizeOutcome, normalize_layout_with};

fn normalize_input(
    config: &StaticConfig,
    file: &str,
) -> Result<(serde_json::Value, NormalizeOutcome), CliError> {
    let doc = read_json_input(file)?;
    let outcome = normalize_layout_with(&doc, &NormalizeOptions::from(&config.layout))?;
    Ok((doc, outcome))
}

/// `layout normalize <FILE> [-o OUT] [--check] [--report]`
pub fn normalize_file(
    config: &StaticConfig,
    file: &str,
    output: Option<String>,
    check: bool,
    report: bool,
) -> Result<(), CliError> {
    let (doc, outcome) = normalize_input(config, file)?;

    if report || check {
        print_issues(&outcome.issues);
    }

    if check {
        if outcome.changed(&doc) {
            return Err(CliError::CommandError(format!(
                "{} is not canonical ({} issues, source format {})",
                file,
                outcome.issues.len(),
                outcome.source_version
            )));
        }
        eprintln!("{} {} is canonical", "✓".bold().green(), file.cyan());
        return Ok(());
    }

    write_json_output(&outcome.layout.to_value(), output.as_deref())?;

    if let Some(path) = output {
        eprintln!(
            "{} Normalized {} -> {} ({} issues)",
            "✓".bold().green(),
            file.cyan(),
            path.cyan(),
            outcome.issues.len()
        );
    }
    if outcome.is_lossy() {
        eprintln!(
            "{} Some content was dropped, run with --report for details",
            "⚠".bold().yellow()
        );
    }
    Ok(())
}

/// `layout inspect <FILE>`
pub fn inspect_file(config: &StaticConfig, file: &str) -> Result<(), CliError> {
    let (_, outcome) = normalize_input(config, file)?;
    let layout = &outcome.layout;

    println!("{}", "Layout structure:".bold().green());
    println!(
        "  {} {}  {} {}  {} {}",
        "source:".dimmed(),
        outcome.source_version.to_string().cyan(),
        "sections:".dimmed(),
        layout.sections.len(),
        "blocks:".dimmed(),
        layout.block_count()
    );
    println!();

    for section in &layout.sections {
        println!(
            "  {} {}",
            section.id.cyan().bold(),
            format!("({} columns)", section.columns).dimmed()
        );
        for column in 0..section.columns {
            for block in section.column_blocks(column) {
                let mut parts = vec![format!(
                    "[{}:{}] {} {}",
                    block.column,
                    block.row_index,
                    block.block_type.as_str().blue(),
                    block.id
                )];
                if block.col_span > 1 {
                    parts.push(format!("span {}", block.col_span).dimmed().to_string());
                }
                if block.is_locked {
                    parts.push("🔒".to_string());
                }
                if !block.visible {
                    parts.push("(hidden)".dimmed().yellow().to_string());
                }
                println!("    {}", parts.join(" "));
            }
        }
    }

    if !outcome.issues.is_empty() {
        println!();
        println!(
            "{} {} issues found while normalizing",
            "ℹ".bold().blue(),
            outcome.issues.len().to_string().yellow()
        );
        print_issues(&outcome.issues);
    }
    Ok(())
}
