//! Front page shortcuts.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

/// A tile on the front page linking to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    pub id: String,
    pub title: String,
    pub url: String,
    pub login_required: bool,
}

/// Shortcut registry shared by all modules.
#[derive(Debug, Clone, Default)]
pub struct Frontpage {
    inner: Arc<DashMap<String, Shortcut>>,
}

impl Frontpage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the shortcut for `id`.
    pub fn add_shortcut(&self, id: &str, title: &str, url: &str, login_required: bool) {
        self.inner.insert(
            id.to_string(),
            Shortcut {
                id: id.to_string(),
                title: title.to_string(),
                url: url.to_string(),
                login_required,
            },
        );
        tracing::debug!(id, url, "Shortcut added");
    }

    /// Remove the shortcut for `id`, if any.
    pub fn remove_shortcut(&self, id: &str) {
        if self.inner.remove(id).is_some() {
            tracing::debug!(id, "Shortcut removed");
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    /// All shortcuts, sorted by id.
    pub fn shortcuts(&self) -> Vec<Shortcut> {
        let mut all: Vec<Shortcut> = self.inner.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}
