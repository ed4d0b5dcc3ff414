//! # Branding
//!
//! The title, subtitle and optional banner image shown by `/start`. Staff edit
//! them in the datastore. Loads go through a [`TtlCache`] like the menu, and
//! [`BrandingProvider::invalidate`] is the hook admin tools call after an edit.
//! A failing source falls back to [`Branding::default`].

use crate::menu::TtlCache;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BrandingError {
    #[error("Branding source unavailable: {0}")]
    Unavailable(String),
    #[error("Branding data malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub title: String,
    pub subtitle: String,
    /// Empty when there is no banner.
    pub image_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: "🍧 Welcome to Acai Supper Bot!".to_string(),
            subtitle: "I help you order delicious acai bowls for delivery or pickup.".to_string(),
            image_url: String::new(),
        }
    }
}

impl Branding {
    pub fn banner(&self) -> Option<&str> {
        let url = self.image_url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// Blank fields take the built-in value.
    fn filled(mut self) -> Self {
        let fallback = Self::default();
        if self.title.trim().is_empty() {
            self.title = fallback.title;
        }
        if self.subtitle.trim().is_empty() {
            self.subtitle = fallback.subtitle;
        }
        self
    }
}

#[async_trait]
pub trait BrandingSource: Send + Sync {
    async fn branding(&self) -> Result<Branding, BrandingError>;
}

pub struct StaticBranding(pub Branding);

#[async_trait]
impl BrandingSource for StaticBranding {
    async fn branding(&self) -> Result<Branding, BrandingError> {
        Ok(self.0.clone())
    }
}

/// `branding.json` in the data directory.
pub struct JsonBrandingFile {
    path: PathBuf,
}

impl JsonBrandingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BrandingSource for JsonBrandingFile {
    async fn branding(&self) -> Result<Branding, BrandingError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| BrandingError::Unavailable(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&raw).map_err(|e| BrandingError::Malformed(e.to_string()))
    }
}

pub struct BrandingProvider {
    source: Arc<dyn BrandingSource>,
    cache: TtlCache<Branding>,
}

impl BrandingProvider {
    pub fn new(source: Arc<dyn BrandingSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    /// Never fails; a broken source yields the built-in branding, which is
    /// not cached so the next call retries the source.
    pub async fn load(&self, force_refresh: bool) -> Branding {
        let loaded = self
            .cache
            .get_or_load(force_refresh, || async {
                self.source.branding().await.map(Branding::filled)
            })
            .await;
        match loaded {
            Ok(branding) => {
                debug!(has_banner = branding.banner().is_some(), "Branding loaded");
                branding
            }
            Err(e) => {
                warn!(error = %e, "Branding source failed, using built-in branding");
                Branding::default()
            }
        }
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}
