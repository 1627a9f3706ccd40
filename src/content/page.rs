use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ContentStatus, SeoMeta, validate_slug, validate_title};
use crate::errors::Result;

/// 页面记录
///
/// `layout` 按存储原样保存，可能仍是旧格式；读取时由 `PageService` 规范化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub layout: Value,
    #[serde(default)]
    pub seo: SeoMeta,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Page {
    /// A new draft page with a fresh id
    pub fn new(slug: impl Into<String>, title: impl Into<String>, layout: Value) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: slug.into(),
            title: title.into(),
            status: ContentStatus::Draft,
            layout,
            seo: SeoMeta::default(),
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    pub fn validate(&self) -> Result<()> {
        validate_slug(&self.slug)?;
        validate_title(&self.title)?;
        self.seo.validate()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
