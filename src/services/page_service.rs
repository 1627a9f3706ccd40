//! Page management service
//!
//! Layouts are normalized on write (`save_layout`) and on read
//! (`get_page`): a page stored by an older editor is returned in the
//! canonical form even before it has been rewritten.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::import_validation::{ImportPageRaw, validate_import_rows};
use crate::content::{ContentStatus, Page, SeoMeta};
use crate::errors::{PagecraftError, Result};
use crate::layout::{
    LayoutEditor, LayoutIssue, LayoutVersion, NormalizeOptions, NormalizeOutcome, PageLayout,
    detect_layout_version, is_canonical, normalize_layout_with,
};
use crate::storage::ContentStore;
use crate::utils::slugify;

// ============ Request/Response DTOs ============

/// Request to create a new page
#[derive(Debug, Clone, Default)]
pub struct CreatePageRequest {
    /// Slug (optional, derived from the title if not provided)
    pub slug: Option<String>,
    pub title: String,
    /// Initial layout in any supported format (None = empty page with a hero)
    pub layout: Option<Value>,
    pub seo: Option<SeoMeta>,
}

/// Request to update page metadata (None = keep existing)
#[derive(Debug, Clone, Default)]
pub struct UpdatePageRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub seo: Option<SeoMeta>,
}

/// A page with its layout in canonical form
#[derive(Debug, Clone)]
pub struct PageDocument {
    /// `page.layout` holds the canonical layout as JSON
    pub page: Page,
    pub layout: PageLayout,
    /// What normalization had to fix in the stored layout
    pub issues: Vec<LayoutIssue>,
    pub source_version: LayoutVersion,
}

impl PageDocument {
    /// Whether the stored layout still needs to be rewritten
    pub fn needs_migration(&self) -> bool {
        !self.issues.is_empty() || self.source_version != LayoutVersion::V2
    }
}

/// Result of saving a layout
#[derive(Debug, Clone)]
pub struct SaveLayoutResult {
    pub page: Page,
    pub layout: PageLayout,
    pub issues: Vec<LayoutIssue>,
    pub source_version: LayoutVersion,
}

/// What the public site receives for a published page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPage {
    pub slug: String,
    pub title: String,
    pub seo: SeoMeta,
    pub layout: PageLayout,
    pub published_at: Option<DateTime<Utc>>,
}

/// Page list filter
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    pub status: Option<ContentStatus>,
    /// Case-insensitive match on title or slug
    pub search: Option<String>,
}

impl PageFilter {
    fn matches(&self, page: &Page) -> bool {
        if let Some(status) = self.status
            && page.status != status
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                page.title.to_lowercase().contains(&needle) || page.slug.contains(&needle)
            }
            _ => true,
        }
    }
}

/// Row of a page listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub status: ContentStatus,
    pub updated_at: DateTime<Utc>,
    /// None when the stored layout has an unsupported version
    pub layout_version: Option<LayoutVersion>,
    pub needs_migration: bool,
}

/// Result of `migrate_all_layouts`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub total: usize,
    pub migrated: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Normalization issues across all migrated pages
    pub issues: usize,
    pub failures: Vec<MigrationFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationFailure {
    pub slug: String,
    pub message: String,
}

/// Import conflict resolution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Skip pages whose slug already exists
    #[default]
    Skip,
    /// Overwrite existing pages (id and createdAt are kept)
    Overwrite,
    /// Report existing pages as errors
    Error,
}

impl ImportMode {
    pub fn from_overwrite_flag(overwrite: bool) -> Self {
        if overwrite {
            ImportMode::Overwrite
        } else {
            ImportMode::Skip
        }
    }
}

/// Result of import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportError>,
}

/// Single import error
#[derive(Debug, Clone)]
pub struct ImportError {
    pub slug: String,
    pub row_num: Option<usize>,
    pub message: String,
}

// ============ PageService Implementation ============

/// Service for page operations
pub struct PageService {
    store: Arc<dyn ContentStore>,
    options: NormalizeOptions,
}

impl PageService {
    pub fn new(store: Arc<dyn ContentStore>, options: NormalizeOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    fn normalize(&self, layout: &Value) -> Result<NormalizeOutcome> {
        normalize_layout_with(layout, &self.options)
    }

    async fn load(&self, id: &str) -> Result<Page> {
        self.store
            .get_page(id)
            .await?
            .ok_or_else(|| PagecraftError::not_found(format!("Page '{}' not found", id)))
    }

    async fn load_by_slug(&self, slug: &str) -> Result<Page> {
        self.store
            .get_page_by_slug(slug)
            .await?
            .ok_or_else(|| PagecraftError::not_found(format!("Page '{}' not found", slug)))
    }

    /// Fail if `slug` belongs to a page other than `except_id`
    async fn ensure_slug_free(&self, slug: &str, except_id: Option<&str>) -> Result<()> {
        if let Some(existing) = self.store.get_page_by_slug(slug).await?
            && Some(existing.id.as_str()) != except_id
        {
            return Err(PagecraftError::conflict(format!(
                "Slug '{}' is already used by another page",
                slug
            )));
        }
        Ok(())
    }

    /// `base`, or `base-2`, `base-3`, ... whichever is free
    async fn free_slug(&self, base: &str) -> Result<String> {
        let taken: HashSet<String> = self
            .store
            .list_pages()
            .await?
            .into_iter()
            .map(|p| p.slug)
            .collect();

        if !taken.contains(base) {
            return Ok(base.to_string());
        }
        Ok((2u32..)
            .map(|k| format!("{}-{}", base, k))
            .find(|s| !taken.contains(s))
            .unwrap_or_else(|| base.to_string()))
    }

    fn document(&self, mut page: Page) -> Result<PageDocument> {
        let outcome = self.normalize(&page.layout)?;
        page.layout = outcome.layout.to_value();
        Ok(PageDocument {
            page,
            layout: outcome.layout,
            issues: outcome.issues,
            source_version: outcome.source_version,
        })
    }

    // ============ CRUD Operations ============

    pub async fn create_page(&self, req: CreatePageRequest) -> Result<PageDocument> {
        let slug = match req.slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(slug) => {
                self.ensure_slug_free(&slug, None).await?;
                slug
            }
            None => {
                let base = slugify(&req.title);
                if base.is_empty() {
                    return Err(PagecraftError::validation(
                        "Cannot derive a slug from the title, please provide one",
                    ));
                }
                self.free_slug(&base).await?
            }
        };

        let outcome = self.normalize(&req.layout.unwrap_or(Value::Null))?;
        let mut page = Page::new(slug, req.title.trim(), outcome.layout.to_value());
        if let Some(seo) = req.seo {
            page.seo = seo;
        }
        page.validate()?;

        self.store.put_page(page.clone()).await?;
        info!("PageService: created page '{}' ({})", page.slug, page.id);

        Ok(PageDocument {
            page,
            layout: outcome.layout,
            issues: outcome.issues,
            source_version: outcome.source_version,
        })
    }

    /// Update title, slug or SEO metadata
    pub async fn update_page(&self, id: &str, req: UpdatePageRequest) -> Result<Page> {
        let mut page = self.load(id).await?;

        if let Some(slug) = req.slug {
            let slug = slug.trim().to_string();
            if slug != page.slug {
                self.ensure_slug_free(&slug, Some(id)).await?;
                page.slug = slug;
            }
        }
        if let Some(title) = req.title {
            page.title = title.trim().to_string();
        }
        if let Some(seo) = req.seo {
            page.seo = seo;
        }
        page.validate()?;
        page.touch();

        self.store.put_page(page.clone()).await?;
        info!("PageService: updated page '{}'", page.slug);
        Ok(page)
    }

    /// Normalize and store a layout coming from the editor
    pub async fn save_layout(&self, id: &str, layout: &Value) -> Result<SaveLayoutResult> {
        let mut page = self.load(id).await?;
        let outcome = self.normalize(layout)?;

        page.layout = outcome.layout.to_value();
        page.touch();
        self.store.put_page(page.clone()).await?;

        if outcome.is_lossy() {
            warn!(
                "PageService: layout of '{}' saved with {} issue(s), some content was dropped",
                page.slug,
                outcome.issues.len()
            );
        } else {
            info!(
                "PageService: layout of '{}' saved ({} block(s), {} issue(s))",
                page.slug,
                outcome.layout.block_count(),
                outcome.issues.len()
            );
        }

        Ok(SaveLayoutResult {
            page,
            layout: outcome.layout,
            issues: outcome.issues,
            source_version: outcome.source_version,
        })
    }

    /// Apply editor operations to a page's layout and store the result
    pub async fn edit_layout<T, F>(&self, id: &str, edit: F) -> Result<(T, Page)>
    where
        F: FnOnce(&mut LayoutEditor) -> Result<T>,
    {
        let mut page = self.load(id).await?;
        let (mut editor, _) = LayoutEditor::from_value(&page.layout, self.options.clone())?;
        let value = edit(&mut editor)?;

        page.layout = editor.into_layout().to_value();
        page.touch();
        self.store.put_page(page.clone()).await?;
        Ok((value, page))
    }

    pub async fn get_page(&self, id: &str) -> Result<PageDocument> {
        let page = self.load(id).await?;
        self.document(page)
    }

    pub async fn get_page_by_slug(&self, slug: &str) -> Result<PageDocument> {
        let page = self.load_by_slug(slug).await?;
        self.document(page)
    }

    /// Published page for the public site, hidden blocks removed
    pub async fn get_public_page(&self, slug: &str) -> Result<PublicPage> {
        let page = self.load_by_slug(slug).await?;
        if !page.is_published() {
            return Err(PagecraftError::not_found(format!("Page '{}' not found", slug)));
        }

        let doc = self.document(page)?;
        Ok(PublicPage {
            slug: doc.page.slug,
            title: doc.page.title,
            seo: doc.page.seo,
            layout: doc.layout.public_view(),
            published_at: doc.page.published_at,
        })
    }

    pub async fn list_pages(&self, filter: &PageFilter) -> Result<Vec<PageSummary>> {
        let pages = self.store.list_pages().await?;
        Ok(pages
            .into_iter()
            .filter(|p| filter.matches(p))
            .map(|page| {
                let layout_version = detect_layout_version(&page.layout).ok();
                let needs_migration = !is_canonical(&page.layout, &self.options).unwrap_or(false);
                PageSummary {
                    id: page.id,
                    slug: page.slug,
                    title: page.title,
                    status: page.status,
                    updated_at: page.updated_at,
                    layout_version,
                    needs_migration,
                }
            })
            .collect())
    }

    /// Publish a page; the stored layout is rewritten in canonical form
    pub async fn publish_page(&self, id: &str) -> Result<Page> {
        let mut page = self.load(id).await?;
        let outcome = self.normalize(&page.layout)?;

        page.layout = outcome.layout.to_value();
        page.status = ContentStatus::Published;
        page.published_at = Some(Utc::now());
        page.touch();

        self.store.put_page(page.clone()).await?;
        info!("PageService: published '{}'", page.slug);
        Ok(page)
    }

    pub async fn unpublish_page(&self, id: &str) -> Result<Page> {
        let mut page = self.load(id).await?;
        page.status = ContentStatus::Draft;
        page.touch();

        self.store.put_page(page.clone()).await?;
        info!("PageService: unpublished '{}'", page.slug);
        Ok(page)
    }

    pub async fn delete_page(&self, id: &str) -> Result<()> {
        if !self.store.delete_page(id).await? {
            return Err(PagecraftError::not_found(format!("Page '{}' not found", id)));
        }
        info!("PageService: deleted page '{}'", id);
        Ok(())
    }

    /// Copy a page as a new draft
    pub async fn duplicate_page(&self, id: &str, new_slug: Option<String>) -> Result<Page> {
        let source = self.get_page(id).await?;

        let slug = match new_slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(slug) => {
                self.ensure_slug_free(&slug, None).await?;
                slug
            }
            None => self.free_slug(&format!("{}-copy", source.page.slug)).await?,
        };

        let mut copy = Page::new(
            slug,
            format!("{} (copy)", source.page.title),
            source.page.layout,
        );
        copy.seo = source.page.seo;
        if copy.validate().is_err() {
            // 标题加后缀后可能超长，退回原标题
            copy.title = source.page.title;
        }
        copy.validate()?;

        self.store.put_page(copy.clone()).await?;
        info!(
            "PageService: duplicated '{}' as '{}'",
            source.page.slug, copy.slug
        );
        Ok(copy)
    }

    // ============ Migration / Import / Export ============

    /// Rewrite every stored layout in canonical form
    pub async fn migrate_all_layouts(&self, dry_run: bool) -> Result<MigrationReport> {
        let pages = self.store.list_pages().await?;
        let mut report = MigrationReport {
            total: pages.len(),
            ..MigrationReport::default()
        };

        for mut page in pages {
            let outcome = match self.normalize(&page.layout) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("PageService: cannot migrate '{}': {}", page.slug, e);
                    report.failed += 1;
                    report.failures.push(MigrationFailure {
                        slug: page.slug,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if !outcome.changed(&page.layout) {
                report.unchanged += 1;
                continue;
            }

            report.migrated += 1;
            report.issues += outcome.issues.len();
            if dry_run {
                continue;
            }

            page.layout = outcome.layout.to_value();
            page.touch();
            if let Err(e) = self.store.put_page(page.clone()).await {
                report.migrated -= 1;
                report.failed += 1;
                report.failures.push(MigrationFailure {
                    slug: page.slug,
                    message: e.to_string(),
                });
            }
        }

        info!(
            "PageService: {} layout(s) migrated, {} unchanged, {} failed{}",
            report.migrated,
            report.unchanged,
            report.failed,
            if dry_run { " (dry run)" } else { "" }
        );
        Ok(report)
    }

    /// Export all pages with canonical layouts
    pub async fn export_pages(&self) -> Result<Vec<Page>> {
        let pages = self.store.list_pages().await?;
        let mut exported = Vec::with_capacity(pages.len());
        for page in pages {
            match self.document(page.clone()) {
                Ok(doc) => exported.push(doc.page),
                Err(e) => {
                    // 无法规范化的布局原样导出
                    warn!("PageService: exporting '{}' as stored: {}", page.slug, e);
                    exported.push(page);
                }
            }
        }
        info!("PageService: exported {} pages", exported.len());
        Ok(exported)
    }

    /// Import pages, resolving slug conflicts according to `mode`
    pub async fn import_pages(
        &self,
        rows: Vec<ImportPageRaw>,
        mode: ImportMode,
    ) -> Result<ImportResult> {
        let mut result = ImportResult::default();

        // Step 1: 逐行验证
        let (valid, invalid) = validate_import_rows(rows, &self.options);
        for e in invalid {
            result.failed += 1;
            result.errors.push(ImportError {
                slug: e.slug,
                row_num: e.row_num,
                message: e.error.to_string(),
            });
        }

        // Step 2: 处理冲突并写入
        let mut processed: HashSet<String> = HashSet::new();
        for item in valid {
            let existing = self.store.get_page_by_slug(&item.slug).await?;
            let seen_in_batch = processed.contains(&item.slug);

            if existing.is_some() || seen_in_batch {
                match mode {
                    ImportMode::Skip => {
                        result.skipped += 1;
                        continue;
                    }
                    ImportMode::Error => {
                        result.failed += 1;
                        result.errors.push(ImportError {
                            slug: item.slug,
                            row_num: item.row_num,
                            message: "Already exists".to_string(),
                        });
                        continue;
                    }
                    ImportMode::Overwrite => {
                        // 继续处理
                    }
                }
            }

            let mut page = Page::new(item.slug.clone(), item.title, item.layout.to_value());
            page.status = item.status;
            page.seo = item.seo;
            page.created_at = item.created_at;
            page.published_at = match item.status {
                ContentStatus::Published => item.published_at.or(Some(page.updated_at)),
                ContentStatus::Draft => item.published_at,
            };
            if let Some(existing) = existing {
                page.id = existing.id;
                page.created_at = existing.created_at;
            }

            if let Err(e) = self.store.put_page(page).await {
                result.failed += 1;
                result.errors.push(ImportError {
                    slug: item.slug,
                    row_num: item.row_num,
                    message: format!("Failed to save: {}", e),
                });
                continue;
            }

            processed.insert(item.slug);
            result.success += 1;
        }

        info!(
            "PageService: imported {} pages, {} skipped, {} failed",
            result.success, result.skipped, result.failed
        );
        Ok(result)
    }
}
