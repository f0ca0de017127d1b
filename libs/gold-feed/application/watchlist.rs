//! Favorite instruments and interface preferences, persisted per user.

use std::sync::Arc;

use crate::infrastructure::store::StateStore;

pub const WATCHLIST_KEY: &str = "gold_watchlist";
pub const THEME_KEY: &str = "altin-masasi-theme";

/// The set of instrument ids the user has starred.
pub struct Watchlist {
    store: Arc<StateStore>,
    favorites: Vec<String>,
}

impl Watchlist {
    pub fn load(store: Arc<StateStore>) -> Self {
        let favorites = store.get_json(WATCHLIST_KEY).unwrap_or_default();
        Self { store, favorites }
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.favorites.iter().any(|id| id == asset_id)
    }

    /// Adds the id if absent, removes it if present. Returns whether
    /// the id is a favorite afterwards.
    pub fn toggle(&mut self, asset_id: &str) -> bool {
        let now_favorite = if self.contains(asset_id) {
            self.favorites.retain(|id| id != asset_id);
            false
        } else {
            self.favorites.push(asset_id.to_string());
            true
        };
        self.persist();
        now_favorite
    }

    pub fn clear(&mut self) {
        self.favorites.clear();
        self.persist();
    }

    fn persist(&self) {
        self.store.set_json(WATCHLIST_KEY, &self.favorites);
    }
}

/// The stored theme choice, if the user ever picked one.
pub fn theme_preference(store: &StateStore) -> Option<String> {
    store.get_raw(THEME_KEY)
}

pub fn set_theme_preference(store: &StateStore, theme: &str) {
    store.set_raw(THEME_KEY, theme);
}
