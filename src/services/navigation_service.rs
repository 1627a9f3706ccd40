use std::sync::Arc;

use tracing::info;

use crate::content::Navigation;
use crate::errors::Result;
use crate::storage::ContentStore;

pub struct NavigationService {
    store: Arc<dyn ContentStore>,
}

impl NavigationService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Stored navigation, or an empty one
    pub async fn get_navigation(&self) -> Result<Navigation> {
        Ok(self.store.get_navigation().await?.unwrap_or_default())
    }

    /// Replace the whole navigation tree
    pub async fn replace_navigation(&self, mut navigation: Navigation) -> Result<Navigation> {
        navigation.assign_ids();
        navigation.validate()?;

        self.store.put_navigation(navigation.clone()).await?;
        info!(
            "NavigationService: saved navigation with {} item(s)",
            navigation.item_count()
        );
        Ok(navigation)
    }
}
