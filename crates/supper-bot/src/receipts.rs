//! # Payment Receipts
//!
//! Proof-of-payment images go to a remote [`ImageStore`] when one is
//! configured and to the local receipt directory otherwise, or when the remote
//! store fails. [`ReceiptArchive::archive`] always yields a reference the order
//! record can carry.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Image store unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to write receipt: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can keep an image and hand back where it put it.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(
        &self,
        identifier: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// Writes `{dir}/{identifier}.{ext}` and returns that path.
pub struct LocalReceiptStore {
    dir: PathBuf,
}

impl LocalReceiptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn extension(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

#[async_trait]
impl ImageStore for LocalReceiptStore {
    async fn store(
        &self,
        identifier: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self
            .dir
            .join(format!("{identifier}.{}", extension(content_type)));
        tokio::fs::write(&path, bytes).await?;
        Ok(path.display().to_string())
    }
}

pub struct ReceiptArchive {
    primary: Option<Arc<dyn ImageStore>>,
    fallback: LocalReceiptStore,
}

impl ReceiptArchive {
    pub fn new(primary: Option<Arc<dyn ImageStore>>, fallback: LocalReceiptStore) -> Self {
        Self { primary, fallback }
    }

    /// Stores the receipt and returns a non-empty reference to it.
    ///
    /// If even the local write fails, the reference is the path the receipt
    /// should have had, so staff can still reconcile the order by id.
    pub async fn archive(&self, order_id: &str, bytes: &[u8], content_type: &str) -> String {
        if let Some(primary) = &self.primary {
            match primary.store(order_id, bytes, content_type).await {
                Ok(reference) if !reference.trim().is_empty() => {
                    info!(%order_id, %reference, "Receipt uploaded");
                    return reference;
                }
                Ok(_) => warn!(%order_id, "Image store returned an empty reference"),
                Err(e) => warn!(%order_id, error = %e, "Receipt upload failed, keeping it locally"),
            }
        }

        match self.fallback.store(order_id, bytes, content_type).await {
            Ok(path) => {
                info!(%order_id, %path, "Receipt saved locally");
                path
            }
            Err(e) => {
                let path = self
                    .fallback
                    .dir
                    .join(format!("{order_id}.{}", extension(content_type)));
                warn!(%order_id, error = %e, "Receipt could not be saved");
                path.display().to_string()
            }
        }
    }
}
