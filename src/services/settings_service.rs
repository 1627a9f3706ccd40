use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::content::SiteSettings;
use crate::errors::{PagecraftError, Result};
use crate::storage::ContentStore;

pub struct SettingsService {
    store: Arc<dyn ContentStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Stored settings, or the defaults when nothing was saved yet
    pub async fn get_settings(&self) -> Result<SiteSettings> {
        Ok(self.store.get_settings().await?.unwrap_or_default())
    }

    pub async fn replace_settings(&self, settings: SiteSettings) -> Result<SiteSettings> {
        settings.validate()?;
        self.store.put_settings(settings.clone()).await?;
        info!("SettingsService: site settings saved");
        Ok(settings)
    }

    /// Merge a JSON object over the current settings (top-level keys, camelCase)
    pub async fn update_settings(&self, patch: &Value) -> Result<SiteSettings> {
        let patch = patch
            .as_object()
            .ok_or_else(|| PagecraftError::validation("settings patch must be an object"))?;

        let current = self.get_settings().await?;
        let mut merged = serde_json::to_value(&current)?;
        if let Value::Object(map) = &mut merged {
            for (key, value) in patch {
                if !map.contains_key(key) {
                    return Err(PagecraftError::validation(format!(
                        "Unknown setting '{}'",
                        key
                    )));
                }
                map.insert(key.clone(), value.clone());
            }
        }

        let updated: SiteSettings = serde_json::from_value(merged)
            .map_err(|e| PagecraftError::validation(format!("Invalid settings: {}", e)))?;
        self.replace_settings(updated).await
    }
}
