//! 布局编辑操作
//!
//! 管理后台对布局做的每一次修改都通过 [`LayoutEditor`] 完成。每个操作
//! 完成后都会重新规范化，所以任何一步之后布局都满足全部不变量。

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::ids::next_free_id;
use super::normalize::{NormalizeOptions, normalize_layout_with};
use super::report::{IssueLog, LayoutIssue, child_path, index_path};
use super::sanitize::{default_block_data, sanitize_block_data, sanitize_section_settings};
use super::types::{Block, BlockType, MAX_COLUMNS, MIN_COLUMNS, PageLayout, Section, renumber_rows};
use crate::errors::{PagecraftError, Result};

#[derive(Debug, Clone)]
pub struct LayoutEditor {
    layout: PageLayout,
    options: NormalizeOptions,
}

impl LayoutEditor {
    /// Wrap an already normalized layout
    pub fn new(layout: PageLayout, options: NormalizeOptions) -> Self {
        Self { layout, options }
    }

    /// Normalize a raw document and start editing it
    pub fn from_value(doc: &Value, options: NormalizeOptions) -> Result<(Self, Vec<LayoutIssue>)> {
        let outcome = normalize_layout_with(doc, &options)?;
        Ok((Self::new(outcome.layout, options), outcome.issues))
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn into_layout(self) -> PageLayout {
        self.layout
    }

    // ============================================================
    // Section 操作
    // ============================================================

    /// Insert a new empty section and return its id.
    ///
    /// Index 0 belongs to the hero section, so the index is clamped to
    /// `1..=len`; `None` appends.
    pub fn add_section(&mut self, columns: u8, index: Option<usize>) -> Result<String> {
        validate_columns(columns)?;
        if self.layout.sections.len() >= self.options.max_sections {
            return Err(PagecraftError::layout_operation(format!(
                "page already has the maximum of {} sections",
                self.options.max_sections
            )));
        }

        let len = self.layout.sections.len();
        let index = index.unwrap_or(len).clamp(1.min(len), len);
        let id = next_free_id("section", |id| self.layout.find_section(id).is_some());

        self.layout.sections.insert(
            index,
            Section {
                id: id.clone(),
                columns,
                settings: sanitize_section_settings(None, "", &mut IssueLog::default()),
                blocks: Vec::new(),
            },
        );
        self.renormalize()?;

        debug!("Added section '{}' at index {}", id, index);
        Ok(id)
    }

    pub fn remove_section(&mut self, section_id: &str) -> Result<()> {
        let index = self.section_index(section_id)?;
        if self.layout.sections[index].blocks.iter().any(Block::is_hero) {
            return Err(PagecraftError::layout_locked(format!(
                "section '{}' holds the hero block and cannot be removed",
                section_id
            )));
        }

        self.layout.sections.remove(index);
        self.renormalize()?;
        debug!("Removed section '{}'", section_id);
        Ok(())
    }

    /// Change the column count; blocks of removed columns move to the new last column
    pub fn set_section_columns(&mut self, section_id: &str, columns: u8) -> Result<()> {
        validate_columns(columns)?;
        let index = self.section_index(section_id)?;
        let section = &mut self.layout.sections[index];

        let last = columns - 1;
        let base = section.column_blocks(last).count() as u32;
        let mut moved = 0u32;
        for block in section.blocks.iter_mut() {
            if block.column > last {
                block.column = last;
                block.row_index = base + moved;
                moved += 1;
            }
            block.col_span = block.col_span.min(columns - block.column).max(1);
        }
        section.columns = columns;
        renumber_rows(&mut section.blocks);

        self.renormalize()?;
        debug!(
            "Section '{}' now has {} column(s), {} block(s) moved",
            section_id, columns, moved
        );
        Ok(())
    }

    /// Update a section's settings (merged over the current ones)
    pub fn update_section_settings(
        &mut self,
        section_id: &str,
        settings: &Value,
    ) -> Result<Vec<LayoutIssue>> {
        let index = self.section_index(section_id)?;
        let patch = settings
            .as_object()
            .ok_or_else(|| PagecraftError::validation("section settings must be an object"))?;

        let section = &mut self.layout.sections[index];
        let merged = merge(&section.settings, patch);
        let mut issues = IssueLog::default();
        section.settings = sanitize_section_settings(
            Some(&merged),
            &child_path(&index_path("sections", index), "settings"),
            &mut issues,
        );

        self.renormalize()?;
        Ok(issues.into_vec())
    }

    // ============================================================
    // Block 操作
    // ============================================================

    /// Insert a block with default data and return its id.
    ///
    /// `row = None` appends to the column.
    pub fn add_block(
        &mut self,
        section_id: &str,
        column: u8,
        block_type: BlockType,
        row: Option<u32>,
    ) -> Result<String> {
        if block_type == BlockType::Hero {
            return Err(PagecraftError::layout_operation(
                "a page has exactly one hero block",
            ));
        }

        let index = self.section_index(section_id)?;
        self.check_target(index, column)?;
        self.check_capacity(index)?;

        let id = next_free_id(block_type.as_str(), |id| self.layout.find_block(id).is_some());
        let block = Block {
            id: id.clone(),
            block_type,
            column,
            row_index: 0,
            col_span: 1,
            visible: true,
            is_locked: false,
            data: default_block_data(block_type),
        };
        insert_at_row(&mut self.layout.sections[index], block, index == 0, row);
        self.renormalize()?;

        debug!("Added {} block '{}' to section '{}'", block_type, id, section_id);
        Ok(id)
    }

    /// Move a block to `(section, column, row)`; the hero cannot move
    pub fn move_block(
        &mut self,
        block_id: &str,
        section_id: &str,
        column: u8,
        row: u32,
    ) -> Result<()> {
        let (source, position) = self.block_position(block_id)?;
        self.ensure_unlocked(source, position, "moved")?;

        let target = self.section_index(section_id)?;
        self.check_target(target, column)?;
        if target != source {
            self.check_capacity(target)?;
        }

        let mut block = self.layout.sections[source].blocks.remove(position);
        renumber_rows(&mut self.layout.sections[source].blocks);

        block.column = column;
        block.col_span = block
            .col_span
            .min(self.layout.sections[target].columns - column)
            .max(1);
        insert_at_row(&mut self.layout.sections[target], block, target == 0, Some(row));
        self.renormalize()?;

        debug!(
            "Moved block '{}' to section '{}' column {} row {}",
            block_id, section_id, column, row
        );
        Ok(())
    }

    pub fn remove_block(&mut self, block_id: &str) -> Result<()> {
        let (section, position) = self.block_position(block_id)?;
        self.ensure_unlocked(section, position, "removed")?;

        self.layout.sections[section].blocks.remove(position);
        self.renormalize()?;
        debug!("Removed block '{}'", block_id);
        Ok(())
    }

    /// Merge `patch` over the block's data and sanitize the result.
    /// Returns what the sanitizer had to fix.
    pub fn update_block_data(&mut self, block_id: &str, patch: &Value) -> Result<Vec<LayoutIssue>> {
        let (si, bi) = self.block_position(block_id)?;
        let patch = patch
            .as_object()
            .ok_or_else(|| PagecraftError::validation("block data must be an object"))?;

        let block = &mut self.layout.sections[si].blocks[bi];
        let merged = merge(&block.data, patch);
        let path = child_path(
            &index_path(&child_path(&index_path("sections", si), "blocks"), bi),
            "data",
        );
        let mut issues = IssueLog::default();
        block.data = sanitize_block_data(block.block_type, Some(&merged), &path, &mut issues);

        self.renormalize()?;
        let issues = issues.into_vec();
        trace!("Updated data of block '{}' ({} issue(s))", block_id, issues.len());
        Ok(issues)
    }

    /// Resize a block horizontally
    pub fn set_block_col_span(&mut self, block_id: &str, col_span: u8) -> Result<()> {
        let (si, bi) = self.block_position(block_id)?;
        self.ensure_unlocked(si, bi, "resized")?;

        let section = &mut self.layout.sections[si];
        let available = section.columns - section.blocks[bi].column;
        if col_span == 0 || col_span > available {
            return Err(PagecraftError::validation(format!(
                "colSpan must be between 1 and {}",
                available
            )));
        }
        section.blocks[bi].col_span = col_span;
        self.renormalize()
    }

    /// Show or hide a block; the hero is always visible
    pub fn set_block_visibility(&mut self, block_id: &str, visible: bool) -> Result<()> {
        let (si, bi) = self.block_position(block_id)?;
        if !visible {
            self.ensure_unlocked(si, bi, "hidden")?;
        }
        self.layout.sections[si].blocks[bi].visible = visible;
        self.renormalize()
    }

    // ============================================================
    // 内部工具
    // ============================================================

    fn renormalize(&mut self) -> Result<()> {
        let outcome = normalize_layout_with(&self.layout.to_value(), &self.options)?;
        if !outcome.is_clean() {
            debug!(
                "Re-normalization after edit reported {} issue(s)",
                outcome.issues.len()
            );
        }
        self.layout = outcome.layout;
        Ok(())
    }

    fn section_index(&self, section_id: &str) -> Result<usize> {
        self.layout
            .find_section(section_id)
            .ok_or_else(|| PagecraftError::not_found(format!("section '{}' not found", section_id)))
    }

    fn block_position(&self, block_id: &str) -> Result<(usize, usize)> {
        self.layout
            .find_block(block_id)
            .ok_or_else(|| PagecraftError::not_found(format!("block '{}' not found", block_id)))
    }

    fn ensure_unlocked(&self, section: usize, position: usize, action: &str) -> Result<()> {
        let block = &self.layout.sections[section].blocks[position];
        if block.is_locked {
            return Err(PagecraftError::layout_locked(format!(
                "block '{}' is locked and cannot be {}",
                block.id, action
            )));
        }
        Ok(())
    }

    fn check_target(&self, section: usize, column: u8) -> Result<()> {
        let columns = self.layout.sections[section].columns;
        if column >= columns {
            return Err(PagecraftError::validation(format!(
                "column {} does not exist, section '{}' has {} column(s)",
                column, self.layout.sections[section].id, columns
            )));
        }
        Ok(())
    }

    fn check_capacity(&self, section: usize) -> Result<()> {
        if self.layout.sections[section].blocks.len() >= self.options.max_blocks_per_section {
            return Err(PagecraftError::layout_operation(format!(
                "section '{}' already has the maximum of {} blocks",
                self.layout.sections[section].id, self.options.max_blocks_per_section
            )));
        }
        Ok(())
    }
}

fn validate_columns(columns: u8) -> Result<()> {
    if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
        return Err(PagecraftError::validation(format!(
            "columns must be between {} and {}",
            MIN_COLUMNS, MAX_COLUMNS
        )));
    }
    Ok(())
}

/// Insert `block` into its column at `row` (append when `None`), shifting
/// the rows below. Row 0 of column 0 in the hero section stays with the hero.
fn insert_at_row(section: &mut Section, mut block: Block, hero_section: bool, row: Option<u32>) {
    let column = block.column;
    let count = section.column_blocks(column).count() as u32;
    let first_free = u32::from(hero_section && column == 0);
    let row = row.unwrap_or(count).clamp(first_free.min(count), count);

    for other in section.blocks.iter_mut() {
        if other.column == column && other.row_index >= row {
            other.row_index += 1;
        }
    }
    block.row_index = row;
    section.blocks.push(block);
    renumber_rows(&mut section.blocks);
}

fn merge(current: &Map<String, Value>, patch: &Map<String, Value>) -> Value {
    let mut merged = current.clone();
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}
