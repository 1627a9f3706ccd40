//! JSON 快照文件后端
//!
//! 全部内容保存在一个 JSON 文件里，内存中保留一份索引。每次写操作
//! 先把修改后的完整快照写入临时文件并 rename 覆盖，成功之后才更新索引，
//! 写盘失败时索引保持不变。

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::ContentStore;
use super::memory::MemoryStore;
use super::models::{ContentSnapshot, SNAPSHOT_FORMAT_VERSION};
use crate::content::{Article, Navigation, Page, SiteSettings};
use crate::errors::{PagecraftError, Result};

pub struct FileStore {
    path: PathBuf,
    index: MemoryStore,
    // 串行化快照写入
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the snapshot file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = load_snapshot(&path)?;
        info!(
            "FileStore loaded {} page(s) and {} article(s) from {}",
            snapshot.pages.len(),
            snapshot.articles.len(),
            path.display()
        );

        Ok(Self {
            path,
            index: MemoryStore::from_snapshot(snapshot),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the index with `edit` applied. Callers hold `write_lock` and
    /// update the index only after this succeeds.
    fn persist_with(&self, edit: impl FnOnce(&mut ContentSnapshot)) -> Result<()> {
        let mut snapshot = self.index.snapshot();
        edit(&mut snapshot);
        write_snapshot(&self.path, &snapshot).inspect_err(|e| {
            error!("Failed to write {}: {}", self.path.display(), e);
        })
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> &str) {
    match items.iter().position(|existing| id(existing) == id(&item)) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

fn load_snapshot(path: &Path) -> Result<ContentSnapshot> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} does not exist yet, starting empty", path.display());
            return Ok(ContentSnapshot::default());
        }
        Err(e) => {
            return Err(PagecraftError::file_operation(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    if content.trim().is_empty() {
        return Ok(ContentSnapshot::default());
    }

    let snapshot: ContentSnapshot = serde_json::from_str(&content).map_err(|e| {
        PagecraftError::serialization(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
        return Err(PagecraftError::storage_operation(format!(
            "{} was written by a newer version (format {})",
            path.display(),
            snapshot.format_version
        )));
    }
    Ok(snapshot)
}

fn write_snapshot(path: &Path, snapshot: &ContentSnapshot) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[async_trait]
impl ContentStore for FileStore {
    async fn get_page(&self, id: &str) -> Result<Option<Page>> {
        self.index.get_page(id).await
    }

    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        self.index.get_page_by_slug(slug).await
    }

    async fn list_pages(&self) -> Result<Vec<Page>> {
        self.index.list_pages().await
    }

    async fn put_page(&self, page: Page) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.persist_with(|snapshot| upsert(&mut snapshot.pages, page.clone(), |p| &p.id))?;
        self.index.put_page(page).await
    }

    async fn delete_page(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self.index.get_page(id).await?.is_none() {
            return Ok(false);
        }
        self.persist_with(|snapshot| snapshot.pages.retain(|p| p.id != id))?;
        self.index.delete_page(id).await
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        self.index.get_article(id).await
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        self.index.get_article_by_slug(slug).await
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        self.index.list_articles().await
    }

    async fn put_article(&self, article: Article) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.persist_with(|snapshot| {
            upsert(&mut snapshot.articles, article.clone(), |a| &a.id)
        })?;
        self.index.put_article(article).await
    }

    async fn delete_article(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self.index.get_article(id).await?.is_none() {
            return Ok(false);
        }
        self.persist_with(|snapshot| snapshot.articles.retain(|a| a.id != id))?;
        self.index.delete_article(id).await
    }

    async fn get_navigation(&self) -> Result<Option<Navigation>> {
        self.index.get_navigation().await
    }

    async fn put_navigation(&self, navigation: Navigation) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.persist_with(|snapshot| snapshot.navigation = Some(navigation.clone()))?;
        self.index.put_navigation(navigation).await
    }

    async fn get_settings(&self) -> Result<Option<SiteSettings>> {
        self.index.get_settings().await
    }

    async fn put_settings(&self, settings: SiteSettings) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.persist_with(|snapshot| snapshot.settings = Some(settings.clone()))?;
        self.index.put_settings(settings).await
    }

    async fn reload(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let snapshot = load_snapshot(&self.path)?;
        self.index.replace_with(snapshot);
        info!("FileStore reloaded from {}", self.path.display());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_starts_empty_and_is_created_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("content.json");

        let store = FileStore::open(&path).unwrap();
        assert!(store.list_pages().await.unwrap().is_empty());
        assert!(!path.exists());

        store
            .put_page(Page::new("home", "Home", json!({"sections": []})))
            .await
            .unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("data").join("content.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");

        let page = Page::new("home", "Home", json!({"columns": [[]]}));
        {
            let store = FileStore::open(&path).unwrap();
            store.put_page(page.clone()).await.unwrap();
            store.put_navigation(Navigation::default()).await.unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        let loaded = reopened.get_page(&page.id).await.unwrap().unwrap();
        // 布局按原样保存
        assert_eq!(loaded.layout, json!({"columns": [[]]}));
        assert!(reopened.get_navigation().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_index_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let store = FileStore::open(data_dir.join("content.json")).unwrap();

        let home = Page::new("home", "Home", json!({"sections": []}));
        store.put_page(home.clone()).await.unwrap();

        // 数据目录被替换成普通文件，之后的写入都会失败
        fs::remove_dir_all(&data_dir).unwrap();
        fs::write(&data_dir, "").unwrap();

        let about = Page::new("about", "About", json!({"sections": []}));
        assert!(store.put_page(about.clone()).await.is_err());
        assert!(store.get_page(&about.id).await.unwrap().is_none());

        let mut renamed = home.clone();
        renamed.title = "Renamed".to_string();
        assert!(store.put_page(renamed).await.is_err());
        assert!(store.delete_page(&home.id).await.is_err());
        let kept = store.get_page(&home.id).await.unwrap().unwrap();
        assert_eq!(kept.title, "Home");

        assert!(store.put_settings(SiteSettings::default()).await.is_err());
        assert!(store.get_settings().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let store = FileStore::open(&path).unwrap();
        store.put_article(Article::new("a", "A")).await.unwrap();

        fs::write(&path, r#"{"formatVersion": 1, "pages": [], "articles": []}"#).unwrap();
        store.reload().await.unwrap();
        assert!(store.list_articles().await.unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_and_future_files_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(PagecraftError::Serialization(_))
        ));

        fs::write(&path, r#"{"formatVersion": 99}"#).unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(PagecraftError::StorageOperation(_))
        ));
    }
}
