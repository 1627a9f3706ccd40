//! 布局文档版本识别
//!
//! 版本由文档结构决定（`sections` → V2，`columns`/`blocks`/顶层数组 → V1），
//! `version` 字段只用于拒绝比当前更新的文档，避免把未来格式静默降级。

use serde_json::Value;

use super::coerce::coerce_i64;
use super::report::{IssueKind, IssueLog};
use super::types::{CURRENT_LAYOUT_VERSION, LayoutVersion};
use crate::errors::{PagecraftError, Result};

/// Classify a raw layout document
pub(crate) fn detect_version(doc: &Value, issues: &mut IssueLog) -> Result<LayoutVersion> {
    if let Some(declared) = doc.get("version").and_then(|v| coerce_i64(Some(v)))
        && declared > i64::from(CURRENT_LAYOUT_VERSION)
    {
        return Err(PagecraftError::unsupported_layout_version(format!(
            "layout version {} is newer than the supported version {}",
            declared, CURRENT_LAYOUT_VERSION
        )));
    }

    let version = match doc {
        Value::Null => LayoutVersion::Empty,
        Value::Array(_) => LayoutVersion::V1,
        Value::Object(map) => {
            if map.get("sections").is_some_and(Value::is_array) {
                LayoutVersion::V2
            } else if map.get("columns").is_some_and(Value::is_array)
                || map.get("blocks").is_some_and(Value::is_array)
            {
                LayoutVersion::V1
            } else {
                if !map.is_empty() {
                    issues.push(
                        "",
                        IssueKind::MalformedDocument,
                        "document has neither sections nor columns",
                    );
                }
                LayoutVersion::Empty
            }
        }
        _ => {
            issues.push(
                "",
                IssueKind::MalformedDocument,
                "layout document must be an object",
            );
            LayoutVersion::Empty
        }
    };

    Ok(version)
}

/// Classify without collecting issues (for listings and diagnostics)
pub fn detect_layout_version(doc: &Value) -> Result<LayoutVersion> {
    detect_version(doc, &mut IssueLog::default())
}
