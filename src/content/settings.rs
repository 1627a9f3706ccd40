use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{SeoMeta, check_length, check_optional_url};
use crate::errors::{PagecraftError, Result};
use crate::utils::{UrlKind, is_plausible_email, validate_url};

/// 站点设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub tagline: String,
    pub logo_url: String,
    pub favicon_url: String,
    pub contact_email: String,
    pub footer_text: String,
    /// 社交网络名 → 主页地址
    pub social_links: BTreeMap<String, String>,
    pub default_seo: SeoMeta,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "My Site".to_string(),
            tagline: String::new(),
            logo_url: String::new(),
            favicon_url: String::new(),
            contact_email: String::new(),
            footer_text: String::new(),
            social_links: BTreeMap::new(),
            default_seo: SeoMeta::default(),
        }
    }
}

impl SiteSettings {
    pub fn validate(&self) -> Result<()> {
        if self.site_name.trim().is_empty() {
            return Err(PagecraftError::validation("siteName cannot be empty"));
        }
        check_length("siteName", &self.site_name, 200)?;
        check_length("tagline", &self.tagline, 300)?;
        check_length("footerText", &self.footer_text, 2000)?;
        check_optional_url("logoUrl", &self.logo_url, UrlKind::Media)?;
        check_optional_url("faviconUrl", &self.favicon_url, UrlKind::Media)?;

        if !self.contact_email.is_empty() && !is_plausible_email(&self.contact_email) {
            return Err(PagecraftError::validation(format!(
                "contactEmail '{}' is not a valid e-mail address",
                self.contact_email
            )));
        }

        for (network, url) in &self.social_links {
            if network.trim().is_empty() {
                return Err(PagecraftError::validation("social link name cannot be empty"));
            }
            // 社交链接必须是外部绝对地址
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PagecraftError::validation(format!(
                    "socialLinks.{}: must be an absolute http(s) URL",
                    network
                )));
            }
            validate_url(url, UrlKind::Link).map_err(|e| {
                PagecraftError::validation(format!("socialLinks.{}: {}", network, e))
            })?;
        }

        self.default_seo.validate()
    }
}
