//! 布局规范化
//!
//! 任意历史格式的布局文档（V1、V2、残缺的 V2）都会被转换为规范的 V2
//! [`PageLayout`]。内容问题不会导致失败，而是被修正并记录为 [`LayoutIssue`]；
//! 只有无法理解的未来版本会返回错误。
//!
//! 规范化是确定性的且幂等：对输出再次规范化得到完全相同的布局，且没有 issue。

use serde_json::Value;
use tracing::debug;

use super::coerce::{coerce_bool, coerce_i64, coerce_id};
use super::detect::detect_version;
use super::hero::enforce_hero;
use super::ids::{IdAllocator, LayoutIds};
use super::migration::migrate_v1;
use super::report::{IssueKind, IssueLog, LayoutIssue, child_path, index_path};
use super::sanitize::{sanitize_block_data, sanitize_section_settings};
use super::types::{
    Block, BlockType, CURRENT_LAYOUT_VERSION, LayoutVersion, MAX_COLUMNS, MIN_COLUMNS,
    PageLayout, Section,
};
use crate::config::LayoutConfig;
use crate::errors::Result;

/// 规范化参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub max_sections: usize,
    pub max_blocks_per_section: usize,
    /// 自动插入 hero 时使用的标题
    pub default_hero_title: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl From<&LayoutConfig> for NormalizeOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            max_sections: config.max_sections.max(1),
            max_blocks_per_section: config.max_blocks_per_section.max(1),
            default_hero_title: config.default_hero_title.clone(),
        }
    }
}

impl NormalizeOptions {
    /// 从全局配置读取
    pub fn from_config() -> Self {
        Self::from(&crate::config::get_config().layout)
    }
}

/// 规范化结果
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub layout: PageLayout,
    pub issues: Vec<LayoutIssue>,
    pub source_version: LayoutVersion,
}

impl NormalizeOutcome {
    /// Whether the canonical form differs from `original`
    pub fn changed(&self, original: &Value) -> bool {
        self.layout.to_value() != *original
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any editor content was discarded
    pub fn is_lossy(&self) -> bool {
        self.issues.iter().any(|issue| issue.kind.is_lossy())
    }
}

/// Normalize with the options from the global config
pub fn normalize_layout(doc: &Value) -> Result<NormalizeOutcome> {
    normalize_layout_with(doc, &NormalizeOptions::from_config())
}

/// Normalize a raw layout document into the canonical V2 form
pub fn normalize_layout_with(doc: &Value, options: &NormalizeOptions) -> Result<NormalizeOutcome> {
    let mut issues = IssueLog::default();
    let source_version = detect_version(doc, &mut issues)?;

    let migrated;
    let doc = match source_version {
        LayoutVersion::V1 => {
            migrated = migrate_v1(doc, &mut issues);
            &migrated
        }
        LayoutVersion::V2 | LayoutVersion::Empty => doc,
    };

    let raw_sections: &[Value] = doc
        .get("sections")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut ids = reserve_ids(raw_sections);
    let mut hero_seen = false;
    let mut layout = PageLayout {
        version: CURRENT_LAYOUT_VERSION,
        sections: Vec::with_capacity(raw_sections.len()),
    };

    for (index, raw) in raw_sections.iter().enumerate() {
        let path = index_path("sections", index);
        if !raw.is_object() {
            issues.push(&path, IssueKind::SectionDropped, "section is not an object");
            continue;
        }
        if layout.sections.len() >= options.max_sections {
            issues.push(
                &path,
                IssueKind::SectionLimitExceeded,
                format!("page already has {} sections", options.max_sections),
            );
            continue;
        }
        let section = normalize_section(
            raw,
            &path,
            &mut ids,
            options,
            &mut hero_seen,
            &mut issues,
        );
        layout.sections.push(section);
    }

    enforce_hero(&mut layout, &mut ids, options, &mut issues);

    let issues = issues.into_vec();
    if !issues.is_empty() {
        debug!(
            "Normalized {} layout with {} issue(s)",
            source_version,
            issues.len()
        );
    }

    Ok(NormalizeOutcome {
        layout,
        issues,
        source_version,
    })
}

/// 先收集输入中出现的全部 id，生成新 id 时避开它们
fn reserve_ids(raw_sections: &[Value]) -> LayoutIds {
    let section_ids = raw_sections
        .iter()
        .filter_map(|s| coerce_id(s.get("id")))
        .collect::<Vec<_>>();

    let block_ids = raw_sections
        .iter()
        .filter_map(|s| s.get("blocks").and_then(Value::as_array))
        .flatten()
        .filter_map(|b| coerce_id(b.get("id")))
        .collect::<Vec<_>>();

    LayoutIds {
        sections: IdAllocator::new(section_ids),
        blocks: IdAllocator::new(block_ids),
    }
}

fn normalize_section(
    raw: &Value,
    path: &str,
    ids: &mut LayoutIds,
    options: &NormalizeOptions,
    hero_seen: &mut bool,
    issues: &mut IssueLog,
) -> Section {
    let candidate = coerce_id(raw.get("id"));
    let had_id = candidate.is_some();
    let (id, regenerated) = ids.sections.claim(candidate, "section");
    if regenerated && had_id {
        issues.push(
            &child_path(path, "id"),
            IssueKind::IdRegenerated,
            format!("duplicate section id replaced with '{}'", id),
        );
    }

    let raw_blocks: &[Value] = raw
        .get("blocks")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let columns = section_columns(raw, raw_blocks, path, issues);
    let settings = sanitize_section_settings(raw.get("settings"), &child_path(path, "settings"), issues);

    // (row hint, 输入位置, block)
    let mut placed: Vec<(i64, usize, Block)> = Vec::with_capacity(raw_blocks.len());
    // 文档顺序中的第一个 hero 不占用 block 配额
    let mut counted = 0usize;

    for (position, raw_block) in raw_blocks.iter().enumerate() {
        let block_path = index_path(&child_path(path, "blocks"), position);
        let Some(block_type) = block_type_of(raw_block, &block_path, issues) else {
            continue;
        };
        if block_type == BlockType::Hero {
            if *hero_seen {
                issues.push(
                    &block_path,
                    IssueKind::DuplicateHeroRemoved,
                    "page already has a hero block",
                );
                continue;
            }
            *hero_seen = true;
        } else if counted >= options.max_blocks_per_section {
            issues.push(
                &block_path,
                IssueKind::BlockLimitExceeded,
                format!(
                    "section already has {} blocks",
                    options.max_blocks_per_section
                ),
            );
            continue;
        } else {
            counted += 1;
        }

        let row_hint = coerce_i64(raw_block.get("rowIndex"))
            .map(|r| r.max(0))
            .unwrap_or(i64::MAX);
        let block = normalize_block(raw_block, block_type, columns, &block_path, ids, issues);
        placed.push((row_hint, position, block));
    }

    placed.sort_by_key(|(hint, position, block)| (block.column, *hint, *position));

    let mut next_row = [0u32; MAX_COLUMNS as usize];
    let blocks = placed
        .into_iter()
        .map(|(_, _, mut block)| {
            let column = usize::from(block.column);
            block.row_index = next_row[column];
            next_row[column] += 1;
            block
        })
        .collect();

    Section {
        id,
        columns,
        settings,
        blocks,
    }
}

/// Column count of a section; a missing count is inferred from the blocks
fn section_columns(raw: &Value, raw_blocks: &[Value], path: &str, issues: &mut IssueLog) -> u8 {
    let declared = coerce_i64(raw.get("columns"));
    let requested = declared.unwrap_or_else(|| {
        raw_blocks
            .iter()
            .filter_map(|b| coerce_i64(b.get("column")))
            .max()
            .map(|c| c.saturating_add(1))
            .unwrap_or(1)
            .clamp(i64::from(MIN_COLUMNS), i64::from(MAX_COLUMNS))
    });

    let clamped = requested.clamp(i64::from(MIN_COLUMNS), i64::from(MAX_COLUMNS));
    if clamped != requested {
        issues.push(
            &child_path(path, "columns"),
            IssueKind::ColumnsClamped,
            format!("{} columns clamped to {}", requested, clamped),
        );
    }
    // clamp 之后一定落在 u8 范围内
    u8::try_from(clamped).unwrap_or(MIN_COLUMNS)
}

fn block_type_of(raw: &Value, path: &str, issues: &mut IssueLog) -> Option<BlockType> {
    if !raw.is_object() {
        issues.push(path, IssueKind::BlockDropped, "block is not an object");
        return None;
    }

    let name = raw.get("type").and_then(Value::as_str).unwrap_or_default();
    let block_type = BlockType::parse_loose(name);
    if block_type.is_none() {
        issues.push(
            &child_path(path, "type"),
            IssueKind::UnknownBlockType,
            format!("unknown block type '{}'", name),
        );
    }
    block_type
}

fn normalize_block(
    raw: &Value,
    block_type: BlockType,
    columns: u8,
    path: &str,
    ids: &mut LayoutIds,
    issues: &mut IssueLog,
) -> Block {
    let candidate = coerce_id(raw.get("id"));
    let had_id = candidate.is_some();
    let (id, regenerated) = ids.blocks.claim(candidate, block_type.as_str());
    if regenerated && had_id {
        issues.push(
            &child_path(path, "id"),
            IssueKind::IdRegenerated,
            format!("duplicate block id replaced with '{}'", id),
        );
    }

    let column = block_column(raw, columns, path, issues);
    let col_span = block_col_span(raw, columns - column, path, issues);

    let is_hero = block_type == BlockType::Hero;
    let locked = coerce_bool(raw.get("isLocked")).unwrap_or(false);
    if locked && !is_hero {
        issues.push(
            &child_path(path, "isLocked"),
            IssueKind::LockCleared,
            "only the hero block can be locked",
        );
    }

    let data = sanitize_block_data(block_type, raw.get("data"), &child_path(path, "data"), issues);

    Block {
        id,
        block_type,
        column,
        row_index: 0,
        col_span,
        visible: coerce_bool(raw.get("visible")).unwrap_or(true),
        is_locked: is_hero,
        data,
    }
}

fn block_column(raw: &Value, columns: u8, path: &str, issues: &mut IssueLog) -> u8 {
    let requested = coerce_i64(raw.get("column")).unwrap_or(0);
    let last = i64::from(columns - 1);
    let column = requested.clamp(0, last);
    if column != requested {
        issues.push(
            &child_path(path, "column"),
            IssueKind::ColumnReassigned,
            format!("column {} moved to column {}", requested, column),
        );
    }
    u8::try_from(column).unwrap_or(0)
}

fn block_col_span(raw: &Value, available: u8, path: &str, issues: &mut IssueLog) -> u8 {
    let requested = coerce_i64(raw.get("colSpan")).unwrap_or(1);
    let span = requested.clamp(1, i64::from(available));
    if span != requested {
        issues.push(
            &child_path(path, "colSpan"),
            IssueKind::ColSpanClamped,
            format!("colSpan {} clamped to {}", requested, span),
        );
    }
    u8::try_from(span).unwrap_or(1)
}

/// Whether `doc` is already in canonical form
pub fn is_canonical(doc: &Value, options: &NormalizeOptions) -> Result<bool> {
    let outcome = normalize_layout_with(doc, options)?;
    Ok(outcome.is_clean() && !outcome.changed(doc))
}

/// Parse a stored layout that is expected to be canonical, normalizing if not
pub fn layout_from_value(doc: &Value, options: &NormalizeOptions) -> Result<PageLayout> {
    if let Ok(layout) = serde_json::from_value::<PageLayout>(doc.clone())
        && layout.version == CURRENT_LAYOUT_VERSION
        && is_canonical(doc, options)?
    {
        return Ok(layout);
    }
    Ok(normalize_layout_with(doc, options)?.layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(doc: Value) -> NormalizeOutcome {
        normalize_layout_with(&doc, &NormalizeOptions::default()).unwrap()
    }

    fn kinds(outcome: &NormalizeOutcome) -> Vec<IssueKind> {
        outcome.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_rows_follow_hints_then_input_order() {
        let outcome = normalize(json!({"sections": [{
            "id": "s", "columns": 2,
            "blocks": [
                {"id": "hero", "type": "hero"},
                {"id": "c", "type": "text", "column": 1},
                {"id": "b", "type": "text", "rowIndex": 7},
                {"id": "a", "type": "text", "rowIndex": 2},
            ]
        }]}));

        let order: Vec<(&str, u8, u32)> = outcome
            .layout
            .blocks()
            .map(|b| (b.id.as_str(), b.column, b.row_index))
            .collect();
        assert_eq!(
            order,
            vec![("hero", 0, 0), ("a", 0, 1), ("b", 0, 2), ("c", 1, 0)]
        );
    }

    #[test]
    fn test_columns_inferred_and_clamped() {
        let outcome = normalize(json!({"sections": [
            {"id": "a", "blocks": [{"type": "hero"}, {"type": "text", "column": 1}]},
            {"id": "b", "columns": 9, "blocks": []}
        ]}));
        assert_eq!(outcome.layout.sections[0].columns, 2);
        assert_eq!(outcome.layout.sections[1].columns, 3);
        assert_eq!(kinds(&outcome), vec![IssueKind::ColumnsClamped]);
    }

    #[test]
    fn test_block_geometry_clamped() {
        let outcome = normalize(json!({"sections": [{
            "id": "s", "columns": 2,
            "blocks": [
                {"id": "hero", "type": "hero", "colSpan": 2},
                {"id": "x", "type": "text", "column": 5, "colSpan": 3, "isLocked": true}
            ]
        }]}));
        let block = &outcome.layout.sections[0].blocks[1];
        assert_eq!((block.column, block.col_span, block.is_locked), (1, 1, false));
        assert_eq!(
            kinds(&outcome),
            vec![
                IssueKind::ColumnReassigned,
                IssueKind::ColSpanClamped,
                IssueKind::LockCleared
            ]
        );
    }

    #[test]
    fn test_missing_and_duplicate_ids() {
        let outcome = normalize(json!({"sections": [{
            "id": "s",
            "blocks": [
                {"id": "hero", "type": "hero"},
                {"type": "text"},
                {"id": "text-1", "type": "text"},
                {"id": "text-1", "type": "text"},
                {"id": 42, "type": "image"}
            ]
        }]}));
        let ids: Vec<&str> = outcome.layout.blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "text-2", "text-1", "text-3", "42"]);
        assert_eq!(kinds(&outcome), vec![IssueKind::IdRegenerated]);
    }

    #[test]
    fn test_invalid_blocks_and_sections_dropped() {
        let outcome = normalize(json!({"sections": [
            {"id": "s", "blocks": [{"type": "hero"}, 7, {"type": "marquee"}]},
            "junk"
        ]}));
        assert_eq!(outcome.layout.sections.len(), 1);
        assert_eq!(outcome.layout.block_count(), 1);
        assert_eq!(
            kinds(&outcome),
            vec![
                IssueKind::BlockDropped,
                IssueKind::UnknownBlockType,
                IssueKind::SectionDropped
            ]
        );
        assert!(outcome.is_lossy());
    }

    #[test]
    fn test_limits() {
        let options = NormalizeOptions {
            max_sections: 2,
            max_blocks_per_section: 2,
            ..NormalizeOptions::default()
        };
        let doc = json!({"sections": [
            {"id": "a", "blocks": [{"type": "hero"}, {"type": "text"}, {"type": "text"}]},
            {"id": "b"},
            {"id": "c"}
        ]});
        let outcome = normalize_layout_with(&doc, &options).unwrap();
        assert_eq!(outcome.layout.sections.len(), 2);
        assert_eq!(outcome.layout.sections[0].blocks.len(), 2);
        // hero 不占配额，多出来的 block 在 hero 归位后才被丢弃
        assert_eq!(
            kinds(&outcome),
            vec![IssueKind::SectionLimitExceeded, IssueKind::BlockLimitExceeded]
        );
    }

    #[test]
    fn test_empty_document_gets_hero_section() {
        let outcome = normalize(Value::Null);
        assert_eq!(outcome.source_version, LayoutVersion::Empty);
        assert_eq!(outcome.layout.sections.len(), 1);
        assert_eq!(outcome.layout.sections[0].id, "section-1");
        let hero = outcome.layout.hero().unwrap();
        assert_eq!(hero.id, "hero");
        assert_eq!(hero.data["title"], json!("Welcome"));
        assert_eq!(kinds(&outcome), vec![IssueKind::HeroInserted]);
    }

    #[test]
    fn test_output_is_idempotent() {
        let messy = json!({
            "version": 1,
            "hero": {"title": "  Hello  ", "overlayOpacity": 3},
            "columns": [
                {"blocks": [
                    {"type": "paragraph", "props": {"content": "<p>x</p>"}, "order": 4},
                    {"id": "dup", "type": "btn", "props": {"url": "javascript:alert(1)"}}
                ]},
                [{"id": "dup", "type": "cards", "span": 3, "hidden": true,
                  "data": {"items": [{"title": "A"}, {}]}}],
                [], []
            ]
        });
        let first = normalize(messy.clone());
        assert!(!first.is_clean());
        assert!(first.changed(&messy));

        let canonical = first.layout.to_value();
        let second = normalize(canonical.clone());
        assert!(second.is_clean(), "{:?}", second.issues);
        assert_eq!(second.layout, first.layout);
        assert!(!second.changed(&canonical));
        assert_eq!(second.source_version, LayoutVersion::V2);
    }

    #[test]
    fn test_future_version_is_error() {
        let err = normalize_layout_with(&json!({"version": 3}), &NormalizeOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), "E020");
    }

    #[test]
    fn test_layout_from_value() {
        let options = NormalizeOptions::default();
        let canonical = normalize(json!({"sections": []})).layout;
        let parsed = layout_from_value(&canonical.to_value(), &options).unwrap();
        assert_eq!(parsed, canonical);

        let from_v1 = layout_from_value(&json!({"columns": [[{"type": "text"}]]}), &options).unwrap();
        assert_eq!(from_v1.block_count(), 2);
    }
}
