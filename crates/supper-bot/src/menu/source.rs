//! Where menu groups come from.

use super::MenuError;
use crate::model::MenuGroup;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

/// A backend holding the live menu.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn menu_groups(&self) -> Result<Vec<MenuGroup>, MenuError>;
}

/// A fixed menu, mostly for tests and demos.
pub struct StaticMenu(pub Vec<MenuGroup>);

#[async_trait]
impl MenuSource for StaticMenu {
    async fn menu_groups(&self) -> Result<Vec<MenuGroup>, MenuError> {
        Ok(self.0.clone())
    }
}

/// `menu.json`: either a bare list of groups or `{"groups": [...]}`.
pub struct JsonMenuFile {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MenuDocument {
    Wrapped { groups: Vec<MenuGroup> },
    Bare(Vec<MenuGroup>),
}

impl JsonMenuFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MenuSource for JsonMenuFile {
    async fn menu_groups(&self) -> Result<Vec<MenuGroup>, MenuError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| MenuError::Unavailable(format!("{}: {e}", self.path.display())))?;
        let document: MenuDocument =
            serde_json::from_str(&raw).map_err(|e| MenuError::Malformed(e.to_string()))?;
        Ok(match document {
            MenuDocument::Wrapped { groups } | MenuDocument::Bare(groups) => groups,
        })
    }
}
