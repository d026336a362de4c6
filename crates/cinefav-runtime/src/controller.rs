//! The application controller.
//!
//! Owns every piece of client state and reconciles the debounced query, the
//! location, the search results and the favorites list. It never performs
//! I/O itself: `update()` mutates state and returns the [`Effect`]s the
//! session must run, whose outcomes come back as further [`Message`]s.

use cinefav_core::location::Location;
use cinefav_core::models::{MovieItem, MoviePage, PageState};
use cinefav_core::recent::RecentSearches;

// ── Settings ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub favorites_page_size: u32,
    pub recent_limit: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            favorites_page_size: 15,
            recent_limit: 5,
        }
    }
}

// ── Messages & effects ───────────────────────────────────────────

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The location changed from outside (deep link, history navigation).
    Navigated(Location),
    /// The search input changed.
    QueryEdited(String),
    /// The debounce window elapsed with this value.
    QuerySettled(String),
    /// A recent-search chip was selected.
    RecentSelected(String),
    SearchLoaded {
        seq: u64,
        result: Result<MoviePage, String>,
    },
    FavoritesLoaded {
        seq: u64,
        page: u32,
        result: Result<MoviePage, String>,
    },
    ToggleFavorite(MovieItem),
    FavoriteToggled {
        change: FavoriteChange,
        result: Result<(), String>,
    },
    SearchPageRequested(u32),
    FavoritesPageRequested(u32),
}

/// Side effects requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Feed the debounce timer.
    Debounce(String),
    Search {
        seq: u64,
        query: String,
        page: u32,
    },
    LoadFavorites {
        seq: u64,
        page: u32,
        limit: u32,
    },
    AddFavorite(MovieItem),
    RemoveFavorite(MovieItem),
    /// Mirror the new location outward.
    UpdateLocation(Location),
    Notify(Notification),
}

/// Which way a favorite toggle went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteChange {
    Added(MovieItem),
    Removed(MovieItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl FavoriteChange {
    pub fn item(&self) -> &MovieItem {
        match self {
            Self::Added(item) | Self::Removed(item) => item,
        }
    }

    fn notification(&self) -> Notification {
        match self {
            Self::Added(_) => Notification {
                kind: NotificationKind::Added,
                message: "Added to favorites!".into(),
            },
            Self::Removed(_) => Notification {
                kind: NotificationKind::Removed,
                message: "Removed from favorites".into(),
            },
        }
    }
}

// ── View state ───────────────────────────────────────────────────

/// Read-only copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub location: Location,
    pub query: String,
    pub debounced_query: String,
    pub search: PageState,
    pub search_loading: bool,
    pub favorites: PageState,
    pub favorites_loading: bool,
    pub recent: Vec<String>,
}

impl ViewState {
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }
}

// ── Controller ───────────────────────────────────────────────────

pub struct Controller {
    settings: ControllerSettings,
    location: Location,
    query: String,
    debounced: String,
    search: PageState,
    search_loading: bool,
    search_seq: u64,
    /// `(debounced query, page)` of the last search cycle started.
    search_key: Option<(String, u32)>,
    favorites: PageState,
    favorites_loading: bool,
    favorites_seq: u64,
    recent: RecentSearches,
}

impl Controller {
    /// Build the controller at `location` and return the start-up effects.
    pub fn new(settings: ControllerSettings, location: Location) -> (Self, Vec<Effect>) {
        let mut controller = Self {
            settings,
            location: Location::default(),
            query: String::new(),
            debounced: String::new(),
            search: PageState::default(),
            search_loading: false,
            search_seq: 0,
            search_key: None,
            favorites: PageState::default(),
            favorites_loading: false,
            favorites_seq: 0,
            recent: RecentSearches::new(settings.recent_limit),
        };

        let mut effects = Vec::new();
        controller.location = location;
        controller.apply_location(&mut effects);
        controller.load_favorites(1, &mut effects);
        (controller, effects)
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            Message::Navigated(location) => {
                if location != self.location {
                    self.location = location;
                    self.apply_location(&mut effects);
                }
            }
            Message::QueryEdited(text) => self.set_query(text, &mut effects),
            Message::QuerySettled(value) => self.settle_query(value, &mut effects),
            Message::RecentSelected(text) => {
                self.set_query(text.clone(), &mut effects);
                self.navigate(Location::new(text, 1), &mut effects);
            }
            Message::SearchLoaded { seq, result } => {
                if seq != self.search_seq {
                    tracing::debug!(seq, latest = self.search_seq, "discarding stale search response");
                    return effects;
                }
                self.search_loading = false;
                match result {
                    Ok(page) => {
                        self.search.items = page.items;
                        self.search.total_pages = page.total_pages.max(1);
                    }
                    Err(e) => {
                        tracing::warn!("search failed: {e}");
                        self.search.reset();
                    }
                }
            }
            Message::FavoritesLoaded { seq, page, result } => {
                if seq != self.favorites_seq {
                    tracing::debug!(seq, latest = self.favorites_seq, "discarding stale favorites response");
                    return effects;
                }
                self.favorites_loading = false;
                match result {
                    Ok(loaded) => {
                        self.favorites.items = loaded.items;
                        self.favorites.total_pages = loaded.total_pages.max(1);
                        self.favorites.current_page = page.min(self.favorites.total_pages);
                        if page > self.favorites.total_pages {
                            // The list shrank under the cursor, e.g. the last
                            // item of the last page was removed.
                            tracing::debug!(page, total = self.favorites.total_pages, "favorites page out of range, reloading last page");
                            self.load_favorites(self.favorites.total_pages, &mut effects);
                        }
                    }
                    Err(e) => {
                        // Counts and cursor stay as they were.
                        tracing::warn!("loading favorites failed: {e}");
                        self.favorites.items.clear();
                    }
                }
            }
            Message::ToggleFavorite(item) => {
                if self.is_favorite(&item.id) {
                    effects.push(Effect::RemoveFavorite(item));
                } else {
                    effects.push(Effect::AddFavorite(item));
                }
            }
            Message::FavoriteToggled { change, result } => {
                match result {
                    Ok(()) => effects.push(Effect::Notify(change.notification())),
                    Err(e) => tracing::warn!(id = %change.item().id, "favorite toggle failed: {e}"),
                }
                self.load_favorites(self.favorites.current_page, &mut effects);
            }
            Message::SearchPageRequested(page) => {
                if self.search.in_range(page) {
                    self.navigate(Location::new(self.debounced.clone(), page), &mut effects);
                } else {
                    tracing::debug!(page, total = self.search.total_pages, "ignoring out-of-range search page");
                }
            }
            Message::FavoritesPageRequested(page) => {
                if self.favorites.in_range(page) {
                    self.load_favorites(page, &mut effects);
                } else {
                    tracing::debug!(page, total = self.favorites.total_pages, "ignoring out-of-range favorites page");
                }
            }
        }
        effects
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Membership is derived from the favorites list on every call.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced
    }

    pub fn search(&self) -> &PageState {
        &self.search
    }

    pub fn favorites(&self) -> &PageState {
        &self.favorites
    }

    pub fn is_search_loading(&self) -> bool {
        self.search_loading
    }

    pub fn is_favorites_loading(&self) -> bool {
        self.favorites_loading
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn snapshot(&self) -> ViewState {
        ViewState {
            location: self.location.clone(),
            query: self.query.clone(),
            debounced_query: self.debounced.clone(),
            search: self.search.clone(),
            search_loading: self.search_loading,
            favorites: self.favorites.clone(),
            favorites_loading: self.favorites_loading,
            recent: self.recent.entries().to_vec(),
        }
    }

    // ── Transitions ──────────────────────────────────────────────

    fn set_query(&mut self, text: String, effects: &mut Vec<Effect>) {
        if text != self.query {
            self.query = text.clone();
            effects.push(Effect::Debounce(text));
        }
    }

    fn settle_query(&mut self, value: String, effects: &mut Vec<Effect>) {
        if value == self.debounced {
            return;
        }
        self.debounced = value;
        self.recent.record(&self.debounced);

        // A query that differs from the location's starts over at page 1.
        if self.debounced != self.location.q {
            self.navigate(Location::new(self.debounced.clone(), 1), effects);
        } else {
            self.sync_search(effects);
        }
    }

    /// Write a new location; equal locations are a no-op.
    fn navigate(&mut self, location: Location, effects: &mut Vec<Effect>) {
        if location == self.location {
            return;
        }
        self.location = location.clone();
        effects.push(Effect::UpdateLocation(location));
        self.apply_location(effects);
    }

    /// Copy `q` and `page` from the location into local state.
    fn apply_location(&mut self, effects: &mut Vec<Effect>) {
        let Location { q, page } = self.location.clone();
        self.set_query(q, effects);
        self.search.current_page = page.max(1);
        self.sync_search(effects);
    }

    /// Start a search cycle when `(debounced query, page)` changed.
    fn sync_search(&mut self, effects: &mut Vec<Effect>) {
        let key = (self.debounced.clone(), self.search.current_page);
        if self.search_key.as_ref() == Some(&key) {
            return;
        }
        self.search_key = Some(key);
        // Any response still in flight is now stale.
        self.search_seq += 1;

        if self.debounced.is_empty() {
            self.search.reset();
            self.search_loading = false;
            return;
        }

        self.search_loading = true;
        effects.push(Effect::Search {
            seq: self.search_seq,
            query: self.debounced.clone(),
            page: self.search.current_page,
        });
    }

    fn load_favorites(&mut self, page: u32, effects: &mut Vec<Effect>) {
        self.favorites_seq += 1;
        self.favorites_loading = true;
        effects.push(Effect::LoadFavorites {
            seq: self.favorites_seq,
            page,
            limit: self.settings.favorites_page_size,
        });
    }
}
