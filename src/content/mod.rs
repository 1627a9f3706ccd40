//! 内容实体：页面、文章、导航、站点设置
//!
//! 实体只负责自身字段的校验；跨记录的约束（slug 唯一等）由 services 处理。

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::errors::{PagecraftError, Result};
use crate::utils::{UrlKind, is_valid_slug, validate_url};

pub mod article;
pub mod navigation;
pub mod page;
pub mod settings;

pub use article::{Article, normalize_tags};
pub use navigation::{MAX_NAV_DEPTH, MAX_NAV_ITEMS, NavItem, Navigation};
pub use page::Page;
pub use settings::SiteSettings;

pub const MAX_TITLE_LENGTH: usize = 200;

/// 发布状态
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

/// SEO 元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub og_image: String,
}

impl SeoMeta {
    pub fn validate(&self) -> Result<()> {
        check_length("seo.title", &self.title, MAX_TITLE_LENGTH)?;
        check_length("seo.description", &self.description, 500)?;
        check_optional_url("seo.ogImage", &self.og_image, UrlKind::Media)
    }
}

pub(crate) fn validate_slug(slug: &str) -> Result<()> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(PagecraftError::validation(format!(
            "Invalid slug '{}': use lowercase letters, digits and single hyphens (max 120 characters)",
            slug
        )))
    }
}

pub(crate) fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PagecraftError::validation("title cannot be empty"));
    }
    check_length("title", title, MAX_TITLE_LENGTH)
}

pub(crate) fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(PagecraftError::validation(format!(
            "{} is too long ({} characters, max {})",
            field, len, max
        )));
    }
    Ok(())
}

/// Empty is allowed; anything else must be a valid URL of `kind`
pub(crate) fn check_optional_url(field: &str, value: &str, kind: UrlKind) -> Result<()> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_url(value, kind)
        .map_err(|e| PagecraftError::validation(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("Published".parse::<ContentStatus>().unwrap(), ContentStatus::Published);
        assert_eq!(ContentStatus::Draft.to_string(), "draft");
        assert!("archived".parse::<ContentStatus>().is_err());
    }

    #[test]
    fn test_seo_validation() {
        let mut seo = SeoMeta::default();
        assert!(seo.validate().is_ok());
        seo.og_image = "javascript:alert(1)".to_string();
        assert_eq!(seo.validate().unwrap_err().code(), "E004");
    }

    #[test]
    fn test_title_rules() {
        assert!(validate_title("About").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }
}
