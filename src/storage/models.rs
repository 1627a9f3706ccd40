use serde::{Deserialize, Serialize};

use crate::content::{Article, Navigation, Page, SiteSettings};

/// 快照文件格式版本
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// 全部内容的序列化形式（file 后端的文件内容，也用于导出）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSnapshot {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub navigation: Option<Navigation>,
    #[serde(default)]
    pub settings: Option<SiteSettings>,
}

fn default_format_version() -> u32 {
    SNAPSHOT_FORMAT_VERSION
}

impl ContentSnapshot {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
            && self.articles.is_empty()
            && self.navigation.is_none()
            && self.settings.is_none()
    }
}
