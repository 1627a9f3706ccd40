//! Block 数据清洗
//!
//! 按 [`definitions`] 中的字段表把任意 JSON 收敛为该类型的规范数据：
//! 去掉未知字段、补默认值、类型转换、URL 校验、长度与数值范围限制。

pub mod definitions;

use std::collections::HashSet;

use serde_json::{Map, Number, Value};

use super::BlockType;
use super::coerce::{coerce_bool, coerce_f64, coerce_i64, coerce_string};
use super::report::{IssueKind, IssueLog, child_path, index_path};
use crate::utils::{UrlKind, slugify, slugify_with, validate_url};

pub use definitions::{SECTION_SETTINGS_FIELDS, fields_for};

/// 字段类型
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// 单行文本，去除首尾空白
    Text { max: usize },
    /// 富文本（HTML），原样保留
    RichText { max: usize },
    Link,
    Media,
    Bool,
    Integer { min: i64, max: i64 },
    Number { min: f64, max: f64 },
    Choice(&'static [&'static str]),
    /// `#rgb` / `#rrggbb`
    Color,
    StringList { max_items: usize, max_len: usize },
    List {
        fields: &'static [FieldSpec],
        max_items: usize,
    },
}

/// 字段默认值
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    Bool(bool),
    Int(i64),
    Num(f64),
    EmptyList,
}

impl DefaultValue {
    pub fn to_value(&self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String((*s).to_string()),
            DefaultValue::Bool(b) => Value::Bool(*b),
            DefaultValue::Int(i) => Value::from(*i),
            DefaultValue::Num(f) => number_value(*f),
            DefaultValue::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// 字段定义
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: DefaultValue,
}

/// Default `data` for a freshly inserted block
pub fn default_block_data(block_type: BlockType) -> Map<String, Value> {
    fields_for(block_type)
        .iter()
        .map(|spec| (spec.name.to_string(), spec.default.to_value()))
        .collect()
}

/// Sanitize the `data` payload of a block of `block_type`
pub(crate) fn sanitize_block_data(
    block_type: BlockType,
    raw: Option<&Value>,
    path: &str,
    issues: &mut IssueLog,
) -> Map<String, Value> {
    let mut data = sanitize_fields(fields_for(block_type), raw, path, issues);
    if block_type == BlockType::Form {
        finalize_form_fields(&mut data, path, issues);
    }
    data
}

/// Sanitize a section's `settings` object
pub(crate) fn sanitize_section_settings(
    raw: Option<&Value>,
    path: &str,
    issues: &mut IssueLog,
) -> Map<String, Value> {
    let mut settings = sanitize_fields(SECTION_SETTINGS_FIELDS, raw, path, issues);
    if let Some(Value::String(anchor)) = settings.get_mut("anchor") {
        *anchor = slugify(anchor);
    }
    settings
}

fn sanitize_fields(
    fields: &[FieldSpec],
    raw: Option<&Value>,
    path: &str,
    issues: &mut IssueLog,
) -> Map<String, Value> {
    let object = raw.and_then(Value::as_object);
    fields
        .iter()
        .map(|spec| {
            let field_path = child_path(path, spec.name);
            let value = sanitize_value(
                spec,
                object.and_then(|o| o.get(spec.name)),
                &field_path,
                issues,
            );
            (spec.name.to_string(), value)
        })
        .collect()
}

fn sanitize_value(
    spec: &FieldSpec,
    raw: Option<&Value>,
    path: &str,
    issues: &mut IssueLog,
) -> Value {
    match spec.kind {
        FieldKind::Text { max } => match coerce_string(raw) {
            Some(s) => Value::String(truncate_text(s.trim(), max, true, path, issues)),
            None => spec.default.to_value(),
        },
        FieldKind::RichText { max } => match coerce_string(raw) {
            Some(s) => Value::String(truncate_text(&s, max, false, path, issues)),
            None => spec.default.to_value(),
        },
        FieldKind::Link => sanitize_url(spec, raw, UrlKind::Link, path, issues),
        FieldKind::Media => sanitize_url(spec, raw, UrlKind::Media, path, issues),
        FieldKind::Bool => coerce_bool(raw)
            .map(Value::Bool)
            .unwrap_or_else(|| spec.default.to_value()),
        FieldKind::Integer { min, max } => match coerce_i64(raw) {
            Some(i) => {
                let clamped = i.clamp(min, max);
                if clamped != i {
                    issues.push(
                        path,
                        IssueKind::ValueClamped,
                        format!("{} clamped to {}", i, clamped),
                    );
                }
                Value::from(clamped)
            }
            None => spec.default.to_value(),
        },
        FieldKind::Number { min, max } => match coerce_f64(raw) {
            Some(f) => {
                let clamped = f.clamp(min, max);
                if clamped != f {
                    issues.push(
                        path,
                        IssueKind::ValueClamped,
                        format!("{} clamped to {}", f, clamped),
                    );
                }
                number_value(clamped)
            }
            None => spec.default.to_value(),
        },
        FieldKind::Choice(options) => match coerce_string(raw) {
            Some(s) => {
                let normalized = s.trim().to_lowercase();
                if let Some(option) = options.iter().find(|o| **o == normalized) {
                    Value::String((*option).to_string())
                } else {
                    if !normalized.is_empty() {
                        issues.push(
                            path,
                            IssueKind::InvalidChoice,
                            format!("'{}' is not one of {}", s.trim(), options.join(", ")),
                        );
                    }
                    spec.default.to_value()
                }
            }
            None => spec.default.to_value(),
        },
        FieldKind::Color => match coerce_string(raw) {
            Some(s) => {
                let normalized = s.trim().to_lowercase();
                if normalized.is_empty() || is_hex_color(&normalized) {
                    Value::String(normalized)
                } else {
                    issues.push(
                        path,
                        IssueKind::InvalidColor,
                        format!("'{}' is not a #rgb or #rrggbb color", s.trim()),
                    );
                    spec.default.to_value()
                }
            }
            None => spec.default.to_value(),
        },
        FieldKind::StringList { max_items, max_len } => {
            let Some(items) = raw.and_then(Value::as_array) else {
                return spec.default.to_value();
            };
            let mut out: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    let s = coerce_string(Some(item))?;
                    let s = truncate_text(s.trim(), max_len, true, &index_path(path, i), issues);
                    (!s.is_empty()).then_some(Value::String(s))
                })
                .collect();
            truncate_list(&mut out, max_items, path, issues);
            Value::Array(out)
        }
        FieldKind::List { fields, max_items } => {
            let Some(items) = raw.and_then(Value::as_array) else {
                return spec.default.to_value();
            };
            let mut out = Vec::with_capacity(items.len().min(max_items));
            for (i, item) in items.iter().enumerate() {
                let item_path = index_path(path, i);
                if !item.is_object() {
                    issues.push(&item_path, IssueKind::ItemDropped, "list item is not an object");
                    continue;
                }
                let sanitized = sanitize_fields(fields, Some(item), &item_path, issues);
                if is_blank_item(fields, &sanitized) {
                    issues.push(&item_path, IssueKind::ItemDropped, "list item has no content");
                    continue;
                }
                out.push(Value::Object(sanitized));
            }
            truncate_list(&mut out, max_items, path, issues);
            Value::Array(out)
        }
    }
}

fn sanitize_url(
    spec: &FieldSpec,
    raw: Option<&Value>,
    kind: UrlKind,
    path: &str,
    issues: &mut IssueLog,
) -> Value {
    let Some(s) = coerce_string(raw) else {
        return spec.default.to_value();
    };
    let url = s.trim();
    if url.is_empty() {
        return spec.default.to_value();
    }
    match validate_url(url, kind) {
        Ok(()) => Value::String(url.to_string()),
        Err(e) => {
            issues.push(path, IssueKind::InvalidUrl, format!("removed '{}': {}", url, e));
            spec.default.to_value()
        }
    }
}

fn truncate_text(s: &str, max: usize, trim: bool, path: &str, issues: &mut IssueLog) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    issues.push(
        path,
        IssueKind::TextTruncated,
        format!("text truncated to {} characters", max),
    );
    let truncated: String = s.chars().take(max).collect();
    if trim {
        truncated.trim_end().to_string()
    } else {
        truncated
    }
}

fn truncate_list(items: &mut Vec<Value>, max: usize, path: &str, issues: &mut IssueLog) {
    if items.len() > max {
        issues.push(
            path,
            IssueKind::ListTruncated,
            format!("{} items truncated to {}", items.len(), max),
        );
        items.truncate(max);
    }
}

/// An item is blank when all of its text and URL fields are empty
fn is_blank_item(fields: &[FieldSpec], item: &Map<String, Value>) -> bool {
    fields
        .iter()
        .filter(|spec| {
            matches!(
                spec.kind,
                FieldKind::Text { .. } | FieldKind::RichText { .. } | FieldKind::Link | FieldKind::Media
            )
        })
        .all(|spec| {
            item.get(spec.name)
                .and_then(Value::as_str)
                .is_none_or(|s| s.is_empty() || s == "#")
        })
}

fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn number_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Form 字段后处理：字段名规范化与去重，非 select 字段清空 options
fn finalize_form_fields(data: &mut Map<String, Value>, path: &str, issues: &mut IssueLog) {
    let Some(Value::Array(fields)) = data.get_mut("fields") else {
        return;
    };
    let fields_path = child_path(path, "fields");

    let mut used: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(fields.len());

    for (i, field) in fields.drain(..).enumerate() {
        let Value::Object(mut field) = field else {
            continue;
        };
        let field_path = index_path(&fields_path, i);
        let name = field.get("name").and_then(Value::as_str).unwrap_or("").to_string();
        let label = field.get("label").and_then(Value::as_str).unwrap_or("").to_string();

        if name.is_empty() && label.is_empty() {
            issues.push(&field_path, IssueKind::ItemDropped, "form field has no name or label");
            continue;
        }

        let mut base = slugify_with(if name.is_empty() { &label } else { &name }, '_');
        if base.is_empty() {
            base = format!("field_{}", kept.len() + 1);
        }
        let unique = unique_field_name(&base, &used);
        if !name.is_empty() && unique != name {
            issues.push(
                &child_path(&field_path, "name"),
                IssueKind::FieldRenamed,
                format!("'{}' renamed to '{}'", name, unique),
            );
        }
        used.insert(unique.clone());
        field.insert("name".to_string(), Value::String(unique));

        if field.get("type").and_then(Value::as_str) != Some("select") {
            field.insert("options".to_string(), Value::Array(Vec::new()));
        }
        kept.push(Value::Object(field));
    }

    *fields = kept;
}

fn unique_field_name(base: &str, used: &HashSet<String>) -> String {
    let max = definitions::FORM_FIELD_NAME_MAX;
    let fit = |s: &str, room: usize| -> String {
        s.chars().take(room).collect::<String>().trim_end_matches('_').to_string()
    };

    let first = fit(base, max);
    if !used.contains(&first) {
        return first;
    }
    (2u32..)
        .map(|n| {
            let suffix = format!("_{}", n);
            format!("{}{}", fit(base, max - suffix.len()), suffix)
        })
        .find(|candidate| !used.contains(candidate))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitize(block_type: BlockType, raw: Value) -> (Map<String, Value>, Vec<IssueKind>) {
        let mut issues = IssueLog::default();
        let data = sanitize_block_data(block_type, Some(&raw), "data", &mut issues);
        (data, issues.into_vec().into_iter().map(|i| i.kind).collect())
    }

    #[test]
    fn test_unknown_fields_dropped_and_defaults_filled() {
        let (data, issues) = sanitize(BlockType::Button, json!({"label": "Go", "onclick": "x()"}));
        assert_eq!(data.get("label"), Some(&json!("Go")));
        assert_eq!(data.get("url"), Some(&json!("#")));
        assert_eq!(data.get("variant"), Some(&json!("primary")));
        assert!(data.get("onclick").is_none());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_dangerous_url_removed() {
        let (data, issues) = sanitize(
            BlockType::Button,
            json!({"label": "Go", "url": "javascript:alert(1)"}),
        );
        assert_eq!(data.get("url"), Some(&json!("#")));
        assert_eq!(issues, vec![IssueKind::InvalidUrl]);
    }

    #[test]
    fn test_numbers_coerced_and_clamped() {
        let (data, issues) = sanitize(BlockType::Spacer, json!({"height": "900"}));
        assert_eq!(data.get("height"), Some(&json!(400)));
        assert_eq!(issues, vec![IssueKind::ValueClamped]);

        let (data, _) = sanitize(BlockType::Hero, json!({"overlayOpacity": 1.7}));
        assert_eq!(data.get("overlayOpacity"), Some(&json!(1.0)));
    }

    #[test]
    fn test_choice_and_color() {
        let (data, issues) = sanitize(
            BlockType::Cta,
            json!({"style": "CARD", "background": "#ABC"}),
        );
        assert_eq!(data.get("style"), Some(&json!("card")));
        assert_eq!(data.get("background"), Some(&json!("#abc")));
        assert!(issues.is_empty());

        let (data, issues) = sanitize(
            BlockType::Cta,
            json!({"style": "wobbly", "background": "red"}),
        );
        assert_eq!(data.get("style"), Some(&json!("banner")));
        assert_eq!(data.get("background"), Some(&json!("")));
        assert_eq!(issues, vec![IssueKind::InvalidColor, IssueKind::InvalidChoice]);
    }

    #[test]
    fn test_text_truncated_and_trimmed() {
        let long = format!("{}   tail", "a".repeat(197));
        let (data, issues) = sanitize(BlockType::Hero, json!({"title": long}));
        let title = data.get("title").and_then(Value::as_str).unwrap();
        assert_eq!(title, "a".repeat(197));
        assert_eq!(issues, vec![IssueKind::TextTruncated]);
    }

    #[test]
    fn test_rich_text_kept_verbatim() {
        let (data, _) = sanitize(BlockType::Text, json!({"content": "  <p>Hi</p>\n"}));
        assert_eq!(data.get("content"), Some(&json!("  <p>Hi</p>\n")));
    }

    #[test]
    fn test_list_items_sanitized_blank_dropped_and_truncated() {
        let mut items: Vec<Value> = (0..14).map(|i| json!({"title": format!("Card {}", i)})).collect();
        items.insert(1, json!({"title": "   "}));
        items.insert(2, json!("not an object"));

        let (data, issues) = sanitize(BlockType::Cards, json!({"items": items}));
        let items = data.get("items").and_then(Value::as_array).unwrap();
        assert_eq!(items.len(), 12);
        assert_eq!(items[0].get("title"), Some(&json!("Card 0")));
        assert_eq!(items[1].get("title"), Some(&json!("Card 1")));
        assert_eq!(items[0].get("linkText"), Some(&json!("")));
        assert_eq!(
            issues,
            vec![IssueKind::ItemDropped, IssueKind::ItemDropped, IssueKind::ListTruncated]
        );
    }

    #[test]
    fn test_form_fields_renamed_and_deduplicated() {
        let (data, issues) = sanitize(
            BlockType::Form,
            json!({"fields": [
                {"name": "Email Address", "type": "email", "options": ["a"]},
                {"label": "Email address"},
                {"placeholder": "orphan"},
                {"name": "topic", "type": "select", "options": ["Sales", "", "Support"]},
            ]}),
        );
        let fields = data.get("fields").and_then(Value::as_array).unwrap();
        let names: Vec<&str> = fields
            .iter()
            .map(|f| f.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(names, vec!["email_address", "email_address_2", "topic"]);
        assert_eq!(fields[0].get("options"), Some(&json!([])));
        assert_eq!(fields[2].get("options"), Some(&json!(["Sales", "Support"])));
        assert_eq!(issues, vec![IssueKind::FieldRenamed, IssueKind::ItemDropped]);
    }

    #[test]
    fn test_sanitized_data_is_stable() {
        let (first, _) = sanitize(
            BlockType::Form,
            json!({"title": "  Contact  ", "fields": [{"name": "a"}, {"name": "a"}, {"label": "B c"}]}),
        );
        let (second, issues) = sanitize(BlockType::Form, Value::Object(first.clone()));
        assert_eq!(first, second);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_section_settings_anchor_slugified() {
        let mut issues = IssueLog::default();
        let settings = sanitize_section_settings(
            Some(&json!({"anchor": "Our Team!", "padding": "LG"})),
            "settings",
            &mut issues,
        );
        assert_eq!(settings.get("anchor"), Some(&json!("our-team")));
        assert_eq!(settings.get("padding"), Some(&json!("lg")));
        assert_eq!(settings.get("fullWidth"), Some(&json!(false)));
    }

    #[test]
    fn test_default_block_data() {
        let data = default_block_data(BlockType::Video);
        assert_eq!(data.get("controls"), Some(&json!(true)));
        assert_eq!(data.len(), 5);
    }
}
