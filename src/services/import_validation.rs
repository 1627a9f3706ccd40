//! 页面导入项验证逻辑
//!
//! 导入文件中的每一行先被宽松地反序列化为 [`ImportPageRaw`]，
//! 再经过这里统一验证和转换，布局在此处完成规范化。

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::content::{ContentStatus, SeoMeta, validate_slug, validate_title};
use crate::errors::PagecraftError;
use crate::layout::{NormalizeOptions, PageLayout, normalize_layout_with};

/// 原始导入项（字符串日期，未规范化的布局）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportPageRaw {
    pub slug: String,
    pub title: String,
    pub status: Option<String>,
    pub layout: Value,
    pub seo: Option<SeoMeta>,
    pub created_at: Option<String>,
    pub published_at: Option<String>,
    /// 导入文件中的位置（1-based）
    #[serde(skip)]
    pub row_num: Option<usize>,
}

/// 验证通过的导入项
#[derive(Debug, Clone)]
pub struct ImportPageItem {
    pub slug: String,
    pub title: String,
    pub status: ContentStatus,
    pub layout: PageLayout,
    /// 规范化过程中修正的问题数
    pub layout_issues: usize,
    pub seo: SeoMeta,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub row_num: Option<usize>,
}

/// 单行验证错误
#[derive(Debug, Clone)]
pub struct ImportRowError {
    pub slug: String,
    pub error: PagecraftError,
    pub row_num: Option<usize>,
}

/// 验证并转换单个导入行
///
/// 验证顺序：
/// 1. slug 格式
/// 2. 标题
/// 3. 状态（缺省为 draft）
/// 4. SEO 字段
/// 5. 布局规范化（只有无法识别的版本会失败）
/// 6. 日期解析（created_at 失败 fallback 到 now，published_at 失败忽略）
pub fn validate_import_row(
    raw: ImportPageRaw,
    options: &NormalizeOptions,
) -> Result<ImportPageItem, ImportRowError> {
    let row_num = raw.row_num;
    let fail = |slug: &str, error: PagecraftError| ImportRowError {
        slug: slug.to_string(),
        error,
        row_num,
    };

    let slug = raw.slug.trim().to_string();
    validate_slug(&slug).map_err(|e| fail(&slug, e))?;
    validate_title(&raw.title).map_err(|e| fail(&slug, e))?;

    let status = match raw.status.as_deref().map(str::trim) {
        None | Some("") => ContentStatus::Draft,
        Some(s) => s.parse::<ContentStatus>().map_err(|_| {
            fail(
                &slug,
                PagecraftError::validation(format!("Invalid status '{}'", s)),
            )
        })?,
    };

    let seo = raw.seo.unwrap_or_default();
    seo.validate().map_err(|e| fail(&slug, e))?;

    let outcome = normalize_layout_with(&raw.layout, options).map_err(|e| fail(&slug, e))?;

    let created_at = match raw.created_at.as_deref() {
        Some(s) if !s.is_empty() => parse_timestamp(s).unwrap_or_else(|| {
            warn!(
                "Import: invalid createdAt '{}' for page '{}', using now",
                s, slug
            );
            Utc::now()
        }),
        _ => Utc::now(),
    };

    let published_at = raw
        .published_at
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(parse_timestamp);

    Ok(ImportPageItem {
        title: raw.title.trim().to_string(),
        slug,
        status,
        layout_issues: outcome.issues.len(),
        layout: outcome.layout,
        seo,
        created_at,
        published_at,
        row_num,
    })
}

/// 批量验证导入行，返回 (成功项, 失败项)
pub fn validate_import_rows(
    rows: Vec<ImportPageRaw>,
    options: &NormalizeOptions,
) -> (Vec<ImportPageItem>, Vec<ImportRowError>) {
    let mut valid = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for raw in rows {
        match validate_import_row(raw, options) {
            Ok(item) => valid.push(item),
            Err(e) => errors.push(e),
        }
    }

    (valid, errors)
}

/// Parse import rows from a JSON array, numbering them from 1
pub fn parse_import_rows(doc: &Value) -> Result<Vec<ImportPageRaw>, PagecraftError> {
    let rows = doc
        .as_array()
        .or_else(|| doc.get("pages").and_then(Value::as_array))
        .ok_or_else(|| {
            PagecraftError::validation("import file must be a JSON array of pages")
        })?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut raw: ImportPageRaw = serde_json::from_value(row.clone()).map_err(|e| {
                PagecraftError::serialization(format!("row {}: {}", i + 1, e))
            })?;
            raw.row_num = Some(i + 1);
            Ok(raw)
        })
        .collect()
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_raw(slug: &str, title: &str) -> ImportPageRaw {
        ImportPageRaw {
            slug: slug.to_string(),
            title: title.to_string(),
            layout: json!({"sections": []}),
            created_at: Some("2025-01-01T00:00:00Z".to_string()),
            ..ImportPageRaw::default()
        }
    }

    fn validate(raw: ImportPageRaw) -> Result<ImportPageItem, ImportRowError> {
        validate_import_row(raw, &NormalizeOptions::default())
    }

    #[test]
    fn test_valid_row() {
        let item = validate(make_raw("about", "About")).unwrap();
        assert_eq!(item.slug, "about");
        assert_eq!(item.status, ContentStatus::Draft);
        assert_eq!(item.created_at.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert!(item.layout.hero().is_some());
        assert_eq!(item.layout_issues, 1);
    }

    #[test]
    fn test_invalid_slug() {
        let err = validate(make_raw("About Us", "About")).unwrap_err();
        assert_eq!(err.error.code(), "E004");
        assert_eq!(err.slug, "About Us");
    }

    #[test]
    fn test_invalid_status() {
        let mut raw = make_raw("about", "About");
        raw.status = Some("archived".to_string());
        assert!(validate(raw).is_err());

        let mut raw = make_raw("about", "About");
        raw.status = Some("Published".to_string());
        assert_eq!(validate(raw).unwrap().status, ContentStatus::Published);
    }

    #[test]
    fn test_future_layout_version_fails_row() {
        let mut raw = make_raw("about", "About");
        raw.layout = json!({"version": 5, "sections": []});
        let err = validate(raw).unwrap_err();
        assert_eq!(err.error.code(), "E020");
    }

    #[test]
    fn test_invalid_created_at_fallback() {
        let mut raw = make_raw("about", "About");
        raw.created_at = Some("not-a-date".to_string());
        assert!(validate(raw).is_ok());
    }

    #[test]
    fn test_batch_validation_keeps_row_numbers() {
        let rows = parse_import_rows(&json!([
            {"slug": "good", "title": "Good"},
            {"slug": "", "title": "Empty slug"},
            {"slug": "no-title", "title": ""},
            {"slug": "also-good", "title": "Also good", "layout": {"columns": [[]]}}
        ]))
        .unwrap();

        let (valid, errors) = validate_import_rows(rows, &NormalizeOptions::default());
        assert_eq!(valid.len(), 2);
        assert_eq!(errors.len(), 2);
        assert_eq!(valid[1].row_num, Some(4));
        assert_eq!(errors[0].row_num, Some(2));
        assert_eq!(errors[1].row_num, Some(3));
    }

    #[test]
    fn test_parse_rows_accepts_export_wrapper() {
        let rows = parse_import_rows(&json!({"pages": [{"slug": "a", "title": "A"}]})).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(parse_import_rows(&json!("nope")).is_err());
    }
}
