use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentStatus, check_length, check_optional_url, validate_slug, validate_title};
use crate::errors::{PagecraftError, Result};
use crate::utils::{UrlKind, slugify};

pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 50;

/// 博客文章
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// 富文本 HTML，渲染由前端负责
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: slug.into(),
            title: title.into(),
            excerpt: String::new(),
            content: String::new(),
            cover_image: String::new(),
            author: String::new(),
            tags: Vec::new(),
            status: ContentStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = slugify(tag);
        self.tags.iter().any(|t| *t == tag)
    }

    pub fn validate(&self) -> Result<()> {
        validate_slug(&self.slug)?;
        validate_title(&self.title)?;
        check_length("excerpt", &self.excerpt, 1000)?;
        check_length("content", &self.content, 200_000)?;
        check_length("author", &self.author, 200)?;
        check_optional_url("coverImage", &self.cover_image, UrlKind::Media)?;

        if self.tags.len() > MAX_TAGS {
            return Err(PagecraftError::validation(format!(
                "too many tags ({}, max {})",
                self.tags.len(),
                MAX_TAGS
            )));
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// 标签规范化：slug 化、去空、去重（保留首次出现的顺序）、截断长度
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let mut tag = slugify(tag.as_ref());
        if tag.len() > MAX_TAG_LENGTH {
            tag.truncate(MAX_TAG_LENGTH);
            tag = tag.trim_end_matches('-').to_string();
        }
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
