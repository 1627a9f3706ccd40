//! Service layer for business logic
//!
//! The CLI (and any embedding application) goes through these services;
//! they own validation, slug uniqueness and layout normalization.

mod article_service;
pub mod import_validation;
mod navigation_service;
mod page_service;
mod settings_service;

use std::sync::Arc;

pub use article_service::*;
pub use import_validation::{ImportPageItem, ImportPageRaw, ImportRowError, parse_import_rows};
pub use navigation_service::NavigationService;
pub use page_service::*;
pub use settings_service::SettingsService;

use crate::config::StaticConfig;
use crate::errors::Result;
use crate::layout::NormalizeOptions;
use crate::storage::{ContentStore, StorageFactory};

/// All services over one store
pub struct ContentServices {
    pub store: Arc<dyn ContentStore>,
    pub pages: PageService,
    pub articles: ArticleService,
    pub navigation: NavigationService,
    pub settings: SettingsService,
}

impl ContentServices {
    pub fn new(store: Arc<dyn ContentStore>, options: NormalizeOptions) -> Self {
        Self {
            pages: PageService::new(store.clone(), options),
            articles: ArticleService::new(store.clone()),
            navigation: NavigationService::new(store.clone()),
            settings: SettingsService::new(store.clone()),
            store,
        }
    }

    /// Build the store and services from a loaded configuration
    pub fn from_config(config: &StaticConfig) -> Result<Self> {
        let store = StorageFactory::create(&config.storage)?;
        Ok(Self::new(store, NormalizeOptions::from(&config.layout)))
    }
}
