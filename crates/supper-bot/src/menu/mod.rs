//! # Menu Provider
//!
//! Loads the ordered option groups customers pick from. The live source is
//! always tried first; when it fails the built-in menu is served, so loading
//! never fails the caller. Results are kept in a [`TtlCache`] that admin tools
//! clear through [`MenuProvider::invalidate`] after editing the menu.
//!
//! Group 0 is the priced group ([`PRICED_GROUP`]); prices on any other group
//! are dropped while sanitizing.

pub mod cache;
pub mod source;

pub use cache::TtlCache;
pub use source::{JsonMenuFile, MenuSource, StaticMenu};

use crate::model::{MenuGroup, MenuOption, PRICED_GROUP};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu source unavailable: {0}")]
    Unavailable(String),
    #[error("Menu data malformed: {0}")]
    Malformed(String),
}

pub struct MenuProvider {
    source: Arc<dyn MenuSource>,
    cache: TtlCache<Vec<MenuGroup>>,
}

impl MenuProvider {
    pub fn new(source: Arc<dyn MenuSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    /// Sanitized menu groups, never empty.
    pub async fn load(&self, force_refresh: bool) -> Vec<MenuGroup> {
        let loaded = self
            .cache
            .get_or_load(force_refresh, || async {
                self.source.menu_groups().await.map(sanitize)
            })
            .await;

        match loaded {
            Ok(groups) => {
                debug!(groups = groups.len(), force_refresh, "Menu loaded");
                groups
            }
            Err(e) => {
                warn!(error = %e, "Menu source failed, serving built-in menu");
                sanitize(default_menu())
            }
        }
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}

/// Drops blank options and empty groups, fills missing ids and titles, clamps
/// negative prices to zero and strips prices outside the priced group. An
/// empty result becomes a single-option menu.
pub fn sanitize(groups: Vec<MenuGroup>) -> Vec<MenuGroup> {
    let cleaned: Vec<MenuGroup> = groups
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut group)| {
            group.options.retain(|option| !option.is_blank());
            group.options = group
                .options
                .into_iter()
                .map(|option| {
                    if option.price() < 0.0 {
                        warn!(
                            group = %group.title,
                            option = option.name(),
                            price = option.price(),
                            "Negative price clamped to zero"
                        );
                    }
                    option.without_negative_price()
                })
                .collect();
            if group.options.is_empty() {
                return None;
            }
            if group.id.trim().is_empty() {
                group.id = format!("group_{index}");
            }
            if group.title.trim().is_empty() {
                group.title = format!("Option Group {}", index + 1);
            }
            Some(group)
        })
        .enumerate()
        .map(|(position, mut group)| {
            if position != PRICED_GROUP {
                group.options = group.options.into_iter().map(MenuOption::into_label).collect();
            }
            group
        })
        .collect();

    if cleaned.is_empty() {
        warn!("Menu has no usable groups, substituting minimal menu");
        return vec![MenuGroup::new(
            "flavor",
            "Menu Flavors",
            vec![MenuOption::priced("Classic Acai", 8.0)],
        )];
    }
    cleaned
}

/// The menu served when the live source cannot be read.
pub fn default_menu() -> Vec<MenuGroup> {
    vec![
        MenuGroup::new(
            "flavor",
            "Menu Flavors",
            vec![
                MenuOption::priced("Classic Acai", 8.0),
                MenuOption::priced("Protein Acai", 9.0),
                MenuOption::priced("Vegan Acai", 8.5),
            ],
        ),
        MenuGroup::new(
            "sauce",
            "Sauce Options",
            ["Honey", "Peanut Butter", "Nutella", "No Sauce"]
                .into_iter()
                .map(MenuOption::label)
                .collect(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Broken;

    #[async_trait]
    impl MenuSource for Broken {
        async fn menu_groups(&self) -> Result<Vec<MenuGroup>, MenuError> {
            Err(MenuError::Unavailable("connection refused".to_string()))
        }
    }

    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MenuSource for Counting {
        async fn menu_groups(&self) -> Result<Vec<MenuGroup>, MenuError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![MenuGroup::new(
                "flavor",
                "Bowls",
                vec![MenuOption::priced(format!("Bowl v{call}"), 7.0)],
            )])
        }
    }

    #[test]
    fn sanitize_drops_empty_groups_and_extra_prices() {
        let groups = vec![
            MenuGroup::new("empty", "Nothing", vec![MenuOption::label("  ")]),
            MenuGroup::new("", "", vec![MenuOption::priced("Classic", 8.0)]),
            MenuGroup::new("sauce", "Sauce", vec![MenuOption::priced("Honey", 1.0)]),
        ];

        let cleaned = sanitize(groups);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].id, "group_1");
        assert_eq!(cleaned[0].title, "Option Group 2");
        assert_eq!(cleaned[0].options[0].price(), 8.0);
        assert_eq!(cleaned[1].options[0], MenuOption::label("Honey"));
    }

    #[test]
    fn sanitize_clamps_negative_prices() {
        let cleaned = sanitize(vec![MenuGroup::new(
            "flavor",
            "Bowls",
            vec![MenuOption::priced("Mango Bowl", -2.5), MenuOption::priced("Classic", 8.0)],
        )]);

        assert_eq!(cleaned[0].options[0], MenuOption::priced("Mango Bowl", 0.0));
        assert_eq!(cleaned[0].options[0].button_text(), "Mango Bowl");
        assert_eq!(cleaned[0].options[1].price(), 8.0);
    }

    #[test]
    fn sanitize_substitutes_minimal_menu() {
        let cleaned = sanitize(vec![MenuGroup::new("x", "X", vec![])]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].options, vec![MenuOption::priced("Classic Acai", 8.0)]);
    }

    #[tokio::test]
    async fn failing_source_serves_default_menu() {
        let provider = MenuProvider::new(Arc::new(Broken), Duration::from_secs(60));
        let groups = provider.load(true).await;
        assert_eq!(groups, default_menu());
    }

    #[tokio::test]
    async fn cache_holds_until_refresh_or_invalidate() {
        let provider = MenuProvider::new(
            Arc::new(Counting {
                calls: AtomicUsize::new(0),
            }),
            Duration::from_secs(60),
        );

        let first = provider.load(false).await;
        assert_eq!(provider.load(false).await, first);
        assert_eq!(provider.load(true).await[0].options[0].name(), "Bowl v1");

        provider.invalidate().await;
        assert_eq!(provider.load(false).await[0].options[0].name(), "Bowl v2");
    }
}
