use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::ContentStore;
use super::models::{ContentSnapshot, SNAPSHOT_FORMAT_VERSION};
use crate::content::{Article, Navigation, Page, SiteSettings};
use crate::errors::Result;

/// 纯内存后端，也是 file 后端的索引
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: DashMap<String, Page>,
    articles: DashMap<String, Article>,
    navigation: RwLock<Option<Navigation>>,
    settings: RwLock<Option<SiteSettings>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ContentSnapshot) -> Self {
        let store = Self::new();
        store.replace_with(snapshot);
        store
    }

    /// 用快照内容整体替换当前数据
    pub fn replace_with(&self, snapshot: ContentSnapshot) {
        self.pages.clear();
        for page in snapshot.pages {
            self.pages.insert(page.id.clone(), page);
        }
        self.articles.clear();
        for article in snapshot.articles {
            self.articles.insert(article.id.clone(), article);
        }
        *self.navigation.write() = snapshot.navigation;
        *self.settings.write() = snapshot.settings;
    }

    pub fn snapshot(&self) -> ContentSnapshot {
        ContentSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            pages: self.sorted_pages(),
            articles: self.sorted_articles(),
            navigation: self.navigation.read().clone(),
            settings: self.settings.read().clone(),
        }
    }

    fn sorted_pages(&self) -> Vec<Page> {
        let mut pages: Vec<Page> = self.pages.iter().map(|e| e.value().clone()).collect();
        pages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.slug.cmp(&b.slug)));
        pages
    }

    fn sorted_articles(&self) -> Vec<Article> {
        let mut articles: Vec<Article> = self.articles.iter().map(|e| e.value().clone()).collect();
        articles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.slug.cmp(&b.slug)));
        articles
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get_page(&self, id: &str) -> Result<Option<Page>> {
        Ok(self.pages.get(id).map(|e| e.value().clone()))
    }

    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        Ok(self
            .pages
            .iter()
            .find(|e| e.value().slug == slug)
            .map(|e| e.value().clone()))
    }

    async fn list_pages(&self) -> Result<Vec<Page>> {
        Ok(self.sorted_pages())
    }

    async fn put_page(&self, page: Page) -> Result<()> {
        self.pages.insert(page.id.clone(), page);
        Ok(())
    }

    async fn delete_page(&self, id: &str) -> Result<bool> {
        Ok(self.pages.remove(id).is_some())
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        Ok(self.articles.get(id).map(|e| e.value().clone()))
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        Ok(self
            .articles
            .iter()
            .find(|e| e.value().slug == slug)
            .map(|e| e.value().clone()))
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        Ok(self.sorted_articles())
    }

    async fn put_article(&self, article: Article) -> Result<()> {
        self.articles.insert(article.id.clone(), article);
        Ok(())
    }

    async fn delete_article(&self, id: &str) -> Result<bool> {
        Ok(self.articles.remove(id).is_some())
    }

    async fn get_navigation(&self) -> Result<Option<Navigation>> {
        Ok(self.navigation.read().clone())
    }

    async fn put_navigation(&self, navigation: Navigation) -> Result<()> {
        *self.navigation.write() = Some(navigation);
        Ok(())
    }

    async fn get_settings(&self) -> Result<Option<SiteSettings>> {
        Ok(self.settings.read().clone())
    }

    async fn put_settings(&self, settings: SiteSettings) -> Result<()> {
        *self.settings.write() = Some(settings);
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_page_round_trip() {
        let store = MemoryStore::new();
        let page = Page::new("about", "About", Value::Null);
        store.put_page(page.clone()).await.unwrap();

        assert_eq!(store.get_page(&page.id).await.unwrap(), Some(page.clone()));
        assert_eq!(
            store.get_page_by_slug("about").await.unwrap().map(|p| p.id),
            Some(page.id.clone())
        );
        assert!(store.delete_page(&page.id).await.unwrap());
        assert!(!store.delete_page(&page.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let store = MemoryStore::new();
        store.put_article(Article::new("hello", "Hello")).await.unwrap();
        store.put_settings(SiteSettings::default()).await.unwrap();

        let copy = MemoryStore::from_snapshot(store.snapshot());
        assert_eq!(copy.list_articles().await.unwrap().len(), 1);
        assert!(copy.get_settings().await.unwrap().is_some());
        assert!(copy.get_navigation().await.unwrap().is_none());
    }
}
