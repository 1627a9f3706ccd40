use serde::{Deserialize, Serialize};

use super::check_length;
use crate::errors::{PagecraftError, Result};
use crate::utils::{UrlKind, validate_url};

/// 顶级菜单 + 一级子菜单
pub const MAX_NAV_DEPTH: usize = 2;
pub const MAX_NAV_ITEMS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    #[serde(default)]
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub open_in_new_tab: bool,
    #[serde(default)]
    pub children: Vec<NavItem>,
}

/// 站点导航
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    #[serde(default)]
    pub items: Vec<NavItem>,
}

impl Navigation {
    pub fn item_count(&self) -> usize {
        fn count(items: &[NavItem]) -> usize {
            items.iter().map(|i| 1 + count(&i.children)).sum()
        }
        count(&self.items)
    }

    pub fn depth(&self) -> usize {
        fn depth(items: &[NavItem]) -> usize {
            items
                .iter()
                .map(|i| 1 + depth(&i.children))
                .max()
                .unwrap_or(0)
        }
        depth(&self.items)
    }

    pub fn validate(&self) -> Result<()> {
        let depth = self.depth();
        if depth > MAX_NAV_DEPTH {
            return Err(PagecraftError::validation(format!(
                "navigation is {} levels deep, max {}",
                depth, MAX_NAV_DEPTH
            )));
        }

        let count = self.item_count();
        if count > MAX_NAV_ITEMS {
            return Err(PagecraftError::validation(format!(
                "navigation has {} items, max {}",
                count, MAX_NAV_ITEMS
            )));
        }

        fn check(items: &[NavItem], path: &str) -> Result<()> {
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                if item.label.trim().is_empty() {
                    return Err(PagecraftError::validation(format!(
                        "{}: label cannot be empty",
                        item_path
                    )));
                }
                check_length(&item_path, &item.label, 100)?;
                validate_url(&item.url, UrlKind::Link).map_err(|e| {
                    PagecraftError::validation(format!("{}.url: {}", item_path, e))
                })?;
                check(&item.children, &format!("{}.children", item_path))?;
            }
            Ok(())
        }
        check(&self.items, "items")
    }

    /// Trim labels/urls and give every item a unique id (`nav-{k}` for missing
    /// or duplicate ones). Returns how many ids were assigned.
    pub fn assign_ids(&mut self) -> usize {
        fn walk(items: &mut [NavItem], f: &mut impl FnMut(&mut NavItem)) {
            for item in items {
                f(item);
                walk(&mut item.children, f);
            }
        }

        let mut seen = std::collections::HashSet::new();
        let mut taken = std::collections::HashSet::new();
        walk(&mut self.items, &mut |item| {
            taken.insert(item.id.trim().to_string());
        });

        let mut assigned = 0;
        let mut next = 1u32;
        walk(&mut self.items, &mut |item| {
            item.label = item.label.trim().to_string();
            item.url = item.url.trim().to_string();
            let id = item.id.trim().to_string();
            if !id.is_empty() && seen.insert(id.clone()) {
                item.id = id;
                return;
            }
            loop {
                let candidate = format!("nav-{}", next);
                next += 1;
                if !taken.contains(&candidate) && seen.insert(candidate.clone()) {
                    item.id = candidate;
                    break;
                }
            }
            assigned += 1;
        });

        if assigned > 0 {
            tracing::debug!("Navigation: assigned {} item id(s)", assigned);
        }
        assigned
    }
}
