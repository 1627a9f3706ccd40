//! V1 → V2 布局迁移
//!
//! V1 是扁平的列列表：
//!
//! ```json
//! { "version": 1, "hero": { ... }, "columns": [ { "blocks": [ ... ] }, [ ... ] ] }
//! ```
//!
//! 迁移结果是一个 V2 形状的文档（单个 section，block 带上 `column`），
//! 之后的列数限制、id、数据清洗都交给规范化流程统一处理。

use serde_json::{Map, Value, json};

use super::coerce::coerce_bool;
use super::report::{IssueKind, IssueLog, index_path};
use super::types::CURRENT_LAYOUT_VERSION;

/// 旧字段 → 新字段
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("props", "data"),
    ("order", "rowIndex"),
    ("locked", "isLocked"),
    ("span", "colSpan"),
];

/// Migrate a V1 document into a V2-shaped document
pub(crate) fn migrate_v1(doc: &Value, issues: &mut IssueLog) -> Value {
    let columns = v1_columns(doc, issues);
    let column_count = columns.len();

    let mut blocks: Vec<Value> = Vec::new();

    if let Some(hero) = doc.get("hero").filter(|h| h.is_object()) {
        blocks.push(json!({
            "id": "hero",
            "type": "hero",
            "column": 0,
            "rowIndex": 0,
            "data": hero,
        }));
    }

    for (column, column_blocks) in columns.into_iter().enumerate() {
        for block in column_blocks {
            blocks.push(migrate_block(block, column));
        }
    }

    issues.push(
        "",
        IssueKind::MigratedV1,
        format!(
            "migrated V1 layout with {} column(s) to version {}",
            column_count, CURRENT_LAYOUT_VERSION
        ),
    );

    let sections = if column_count == 0 && blocks.is_empty() {
        Vec::new()
    } else {
        vec![json!({
            "id": "section-1",
            "columns": column_count.max(1),
            "blocks": blocks,
        })]
    };

    json!({
        "version": CURRENT_LAYOUT_VERSION,
        "sections": sections,
    })
}

/// Collect the V1 column lists from any of the accepted V1 shapes
fn v1_columns<'a>(doc: &'a Value, issues: &mut IssueLog) -> Vec<Vec<&'a Value>> {
    match doc {
        Value::Array(items) => {
            // 顶层数组：元素是 block 则视为单列，否则视为列列表
            if items.first().is_some_and(looks_like_block) {
                vec![items.iter().collect()]
            } else {
                collect_columns(items, "", issues)
            }
        }
        Value::Object(map) => {
            if let Some(Value::Array(columns)) = map.get("columns") {
                collect_columns(columns, "columns", issues)
            } else if let Some(Value::Array(blocks)) = map.get("blocks") {
                vec![blocks.iter().collect()]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

fn collect_columns<'a>(
    columns: &'a [Value],
    path: &str,
    issues: &mut IssueLog,
) -> Vec<Vec<&'a Value>> {
    columns
        .iter()
        .enumerate()
        .filter_map(|(i, column)| match column {
            Value::Array(blocks) => Some(blocks.iter().collect()),
            Value::Object(_) if looks_like_block(column) => {
                issues.push(
                    &index_path(path, i),
                    IssueKind::BlockDropped,
                    "V1 block found where a column was expected",
                );
                None
            }
            Value::Object(map) => Some(
                map.get("blocks")
                    .and_then(Value::as_array)
                    .map(|blocks| blocks.iter().collect())
                    .unwrap_or_default(),
            ),
            _ => {
                issues.push(
                    &index_path(path, i),
                    IssueKind::BlockDropped,
                    "V1 column is neither a list nor an object",
                );
                None
            }
        })
        .collect()
}

fn looks_like_block(value: &Value) -> bool {
    value.get("type").is_some()
}

fn migrate_block(block: &Value, column: usize) -> Value {
    let Value::Object(source) = block else {
        // 非对象交给规范化流程丢弃并记录
        return block.clone();
    };

    let mut migrated: Map<String, Value> = source.clone();

    for (old, new) in LEGACY_KEYS {
        if let Some(value) = migrated.remove(*old)
            && !migrated.contains_key(*new)
        {
            migrated.insert((*new).to_string(), value);
        }
    }

    // hidden 可能是 "true" / 1 之类的写法，读不出布尔值的直接丢弃
    if let Some(hidden) = migrated.remove("hidden")
        && !migrated.contains_key("visible")
        && let Some(hidden) = coerce_bool(Some(&hidden))
    {
        migrated.insert("visible".to_string(), Value::Bool(!hidden));
    }

    migrated.insert("column".to_string(), Value::from(column));
    Value::Object(migrated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrate(doc: Value) -> Value {
        migrate_v1(&doc, &mut IssueLog::default())
    }

    #[test]
    fn test_columns_become_one_section() {
        let v2 = migrate(json!({
            "version": 1,
            "columns": [
                {"blocks": [{"id": "a", "type": "text"}]},
                [{"id": "b", "type": "image"}, {"id": "c", "type": "button"}]
            ]
        }));

        assert_eq!(v2["version"], json!(2));
        let section = &v2["sections"][0];
        assert_eq!(section["columns"], json!(2));
        let blocks = section["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0]["column"], json!(0));
        assert_eq!(blocks[2]["column"], json!(1));
    }

    #[test]
    fn test_legacy_keys_renamed() {
        let v2 = migrate(json!({"blocks": [
            {"id": "a", "type": "text", "props": {"content": "hi"}, "order": 3,
             "hidden": true, "locked": false, "span": 2}
        ]}));
        let block = &v2["sections"][0]["blocks"][0];
        assert_eq!(block["data"], json!({"content": "hi"}));
        assert_eq!(block["rowIndex"], json!(3));
        assert_eq!(block["visible"], json!(false));
        assert_eq!(block["isLocked"], json!(false));
        assert_eq!(block["colSpan"], json!(2));
        assert!(block.get("props").is_none());
        assert!(block.get("hidden").is_none());
    }

    #[test]
    fn test_new_keys_win_over_legacy() {
        let v2 = migrate(json!({"blocks": [
            {"type": "text", "data": {"content": "new"}, "props": {"content": "old"}}
        ]}));
        assert_eq!(v2["sections"][0]["blocks"][0]["data"]["content"], json!("new"));
    }

    #[test]
    fn test_page_level_hero_becomes_first_block() {
        let v2 = migrate(json!({
            "hero": {"title": "Hi"},
            "columns": [[{"type": "text"}]]
        }));
        let blocks = v2["sections"][0]["blocks"].as_array().unwrap();
        assert_eq!(blocks[0]["type"], json!("hero"));
        assert_eq!(blocks[0]["data"]["title"], json!("Hi"));
        assert_eq!(blocks[1]["type"], json!("text"));
    }

    #[test]
    fn test_loose_hidden_values_are_inverted() {
        let v2 = migrate(json!({"blocks": [
            {"id": "a", "type": "text", "hidden": "true"},
            {"id": "b", "type": "text", "hidden": 1},
            {"id": "c", "type": "text", "hidden": "no"},
            {"id": "d", "type": "text", "hidden": "maybe"},
        ]}));
        let blocks = v2["sections"][0]["blocks"].as_array().unwrap();
        assert_eq!(blocks[0]["visible"], json!(false));
        assert_eq!(blocks[1]["visible"], json!(false));
        assert_eq!(blocks[2]["visible"], json!(true));
        assert!(blocks[3].get("visible").is_none());
        assert!(blocks[3].get("hidden").is_none());
    }

    #[test]
    fn test_block_among_columns_reported() {
        let mut issues = IssueLog::default();
        let v2 = migrate_v1(
            &json!([[{"id": "a", "type": "text"}], {"id": "b", "type": "image"}]),
            &mut issues,
        );
        assert_eq!(v2["sections"][0]["columns"], json!(1));
        assert_eq!(v2["sections"][0]["blocks"].as_array().unwrap().len(), 1);
        let issues = issues.into_vec();
        assert_eq!(issues[0].kind, IssueKind::BlockDropped);
        assert_eq!(issues[0].path, "[1]");
    }

    #[test]
    fn test_bare_arrays() {
        let single = migrate(json!([{"type": "text"}, {"type": "image"}]));
        assert_eq!(single["sections"][0]["columns"], json!(1));
        assert_eq!(single["sections"][0]["blocks"].as_array().unwrap().len(), 2);

        let multi = migrate(json!([[{"type": "text"}], [], [{"type": "image"}]]));
        assert_eq!(multi["sections"][0]["columns"], json!(3));
        assert_eq!(multi["sections"][0]["blocks"][1]["column"], json!(2));
    }

    #[test]
    fn test_empty_v1_has_no_sections() {
        let v2 = migrate(json!({"columns": []}));
        assert_eq!(v2["sections"], json!([]));
    }

    #[test]
    fn test_invalid_column_reported() {
        let mut issues = IssueLog::default();
        let v2 = migrate_v1(&json!({"columns": [[{"type": "text"}], 42]}), &mut issues);
        assert_eq!(v2["sections"][0]["columns"], json!(1));
        let kinds: Vec<IssueKind> = issues.into_vec().into_iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::BlockDropped, IssueKind::MigratedV1]);
    }
}
