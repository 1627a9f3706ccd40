//! Article (blog post) service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::content::{Article, ContentStatus, normalize_tags};
use crate::errors::{PagecraftError, Result};
use crate::storage::ContentStore;
use crate::utils::slugify;

/// Request to create an article
#[derive(Debug, Clone, Default)]
pub struct CreateArticleRequest {
    /// Slug (optional, derived from the title if not provided)
    pub slug: Option<String>,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: String,
    pub author: String,
    pub tags: Vec<String>,
}

/// Request to update an article (None = keep existing)
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Article list filter
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub status: Option<ContentStatus>,
    pub tag: Option<String>,
}

impl ArticleFilter {
    fn matches(&self, article: &Article) -> bool {
        self.status.is_none_or(|s| article.status == s)
            && self.tag.as_deref().is_none_or(|t| article.has_tag(t))
    }
}

pub struct ArticleService {
    store: Arc<dyn ContentStore>,
}

impl ArticleService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    async fn load(&self, id: &str) -> Result<Article> {
        self.store
            .get_article(id)
            .await?
            .ok_or_else(|| PagecraftError::not_found(format!("Article '{}' not found", id)))
    }

    async fn ensure_slug_free(&self, slug: &str, except_id: Option<&str>) -> Result<()> {
        if let Some(existing) = self.store.get_article_by_slug(slug).await?
            && Some(existing.id.as_str()) != except_id
        {
            return Err(PagecraftError::conflict(format!(
                "Slug '{}' is already used by another article",
                slug
            )));
        }
        Ok(())
    }

    pub async fn create_article(&self, req: CreateArticleRequest) -> Result<Article> {
        let slug = req
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&req.title));
        self.ensure_slug_free(&slug, None).await?;

        let mut article = Article::new(slug, req.title.trim());
        article.excerpt = req.excerpt.trim().to_string();
        article.content = req.content;
        article.cover_image = req.cover_image.trim().to_string();
        article.author = req.author.trim().to_string();
        article.tags = normalize_tags(&req.tags);
        article.validate()?;

        self.store.put_article(article.clone()).await?;
        info!("ArticleService: created '{}' ({})", article.slug, article.id);
        Ok(article)
    }

    pub async fn update_article(&self, id: &str, req: UpdateArticleRequest) -> Result<Article> {
        let mut article = self.load(id).await?;

        if let Some(slug) = req.slug {
            let slug = slug.trim().to_string();
            if slug != article.slug {
                self.ensure_slug_free(&slug, Some(id)).await?;
                article.slug = slug;
            }
        }
        if let Some(title) = req.title {
            article.title = title.trim().to_string();
        }
        if let Some(excerpt) = req.excerpt {
            article.excerpt = excerpt.trim().to_string();
        }
        if let Some(content) = req.content {
            article.content = content;
        }
        if let Some(cover_image) = req.cover_image {
            article.cover_image = cover_image.trim().to_string();
        }
        if let Some(author) = req.author {
            article.author = author.trim().to_string();
        }
        if let Some(tags) = req.tags {
            article.tags = normalize_tags(&tags);
        }
        article.validate()?;
        article.touch();

        self.store.put_article(article.clone()).await?;
        info!("ArticleService: updated '{}'", article.slug);
        Ok(article)
    }

    pub async fn get_article(&self, id: &str) -> Result<Article> {
        self.load(id).await
    }

    pub async fn get_article_by_slug(&self, slug: &str) -> Result<Article> {
        self.store
            .get_article_by_slug(slug)
            .await?
            .ok_or_else(|| PagecraftError::not_found(format!("Article '{}' not found", slug)))
    }

    /// Published article for the public site
    pub async fn get_published_article(&self, slug: &str) -> Result<Article> {
        let article = self.get_article_by_slug(slug).await?;
        if !article.is_published() {
            return Err(PagecraftError::not_found(format!("Article '{}' not found", slug)));
        }
        Ok(article)
    }

    /// Newest first (publication date, then creation date)
    pub async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self
            .store
            .list_articles()
            .await?
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        articles.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(articles)
    }

    pub async fn publish_article(&self, id: &str) -> Result<Article> {
        let mut article = self.load(id).await?;
        article.status = ContentStatus::Published;
        // 重新发布不改变首次发布时间
        if article.published_at.is_none() {
            article.published_at = Some(Utc::now());
        }
        article.touch();

        self.store.put_article(article.clone()).await?;
        info!("ArticleService: published '{}'", article.slug);
        Ok(article)
    }

    pub async fn unpublish_article(&self, id: &str) -> Result<Article> {
        let mut article = self.load(id).await?;
        article.status = ContentStatus::Draft;
        article.touch();

        self.store.put_article(article.clone()).await?;
        info!("ArticleService: unpublished '{}'", article.slug);
        Ok(article)
    }

    pub async fn delete_article(&self, id: &str) -> Result<()> {
        if !self.store.delete_article(id).await? {
            return Err(PagecraftError::not_found(format!("Article '{}' not found", id)));
        }
        info!("ArticleService: deleted '{}'", id);
        Ok(())
    }
}
