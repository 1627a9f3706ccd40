//! 内容存储抽象
//!
//! 所有后端都实现 [`ContentStore`]。页面布局按原样保存（`serde_json::Value`），
//! 所以存储中可能存在旧格式的布局，读取时由服务层规范化。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StorageConfig;
use crate::content::{Article, Navigation, Page, SiteSettings};
use crate::errors::{PagecraftError, Result};

pub mod file;
pub mod memory;
pub mod models;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{ContentSnapshot, SNAPSHOT_FORMAT_VERSION};

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_page(&self, id: &str) -> Result<Option<Page>>;
    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>>;
    /// 按创建时间排序
    async fn list_pages(&self) -> Result<Vec<Page>>;
    /// 插入或覆盖（按 id）
    async fn put_page(&self, page: Page) -> Result<()>;
    /// 返回是否真的删除了记录
    async fn delete_page(&self, id: &str) -> Result<bool>;

    async fn get_article(&self, id: &str) -> Result<Option<Article>>;
    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>>;
    async fn list_articles(&self) -> Result<Vec<Article>>;
    async fn put_article(&self, article: Article) -> Result<()>;
    async fn delete_article(&self, id: &str) -> Result<bool>;

    async fn get_navigation(&self) -> Result<Option<Navigation>>;
    async fn put_navigation(&self, navigation: Navigation) -> Result<()>;

    async fn get_settings(&self) -> Result<Option<SiteSettings>>;
    async fn put_settings(&self, settings: SiteSettings) -> Result<()>;

    /// 从持久化介质重新加载
    async fn reload(&self) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn ContentStore>> {
        let store: Arc<dyn ContentStore> = match config.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "file" => Arc::new(FileStore::open(&config.data_file)?),
            other => {
                return Err(PagecraftError::storage_plugin_not_found(format!(
                    "Unknown storage backend: '{}'",
                    other
                )));
            }
        };

        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}
