//! Poster availability: each URL is checked once and the outcome cached.
//!
//! A card shows the poster URL only after a successful check. Anything that
//! fails to load falls back to the placeholder.

use std::collections::HashMap;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use cinefav_core::models::MovieItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterState {
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Default)]
pub struct PosterCache {
    states: HashMap<String, PosterState>,
}

impl PosterCache {
    pub fn get(&self, url: &str) -> Option<PosterState> {
        self.states.get(url).copied()
    }

    /// State for an item's poster, `None` when it has no usable URL.
    pub fn state_for(&self, item: &MovieItem) -> Option<PosterState> {
        item.poster_url().map(|url| self.get(url).unwrap_or(PosterState::Loading))
    }

    /// Mark every poster not seen before as loading and return their URLs.
    pub fn request<'a>(&mut self, items: impl IntoIterator<Item = &'a MovieItem>) -> Vec<String> {
        let mut pending = Vec::new();
        for url in items.into_iter().filter_map(MovieItem::poster_url) {
            if !self.states.contains_key(url) {
                self.states.insert(url.to_string(), PosterState::Loading);
                pending.push(url.to_string());
            }
        }
        pending
    }

    pub fn resolve(&mut self, url: String, loaded: bool) {
        let state = if loaded {
            PosterState::Loaded
        } else {
            PosterState::Failed
        };
        self.states.insert(url, state);
    }
}

/// Check that `url` answers with an image.
pub async fn check(http: &Client, url: &str) -> bool {
    match http.head(url).send().await {
        Ok(resp) if resp.status().is_success() => resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(true, |ct| ct.starts_with("image/")),
        Ok(resp) => {
            tracing::debug!(url, status = %resp.status(), "poster unavailable");
            false
        }
        Err(e) => {
            tracing::debug!(url, "poster check failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, poster: Option<&str>) -> MovieItem {
        MovieItem {
            id: id.into(),
            title: "Batman".into(),
            year: "1989".into(),
            poster: poster.map(str::to_string),
            kind: "movie".into(),
        }
    }

    #[test]
    fn test_request_skips_missing_and_known_posters() {
        let items = [
            item("a", Some("https://img/a.jpg")),
            item("b", Some("N/A")),
            item("c", None),
            item("d", Some("https://img/a.jpg")),
        ];
        let mut cache = PosterCache::default();

        assert_eq!(cache.request(&items), vec!["https://img/a.jpg".to_string()]);
        assert!(cache.request(&items).is_empty());
        assert_eq!(cache.get("https://img/a.jpg"), Some(PosterState::Loading));
    }

    #[test]
    fn test_state_for_item() {
        let mut cache = PosterCache::default();
        let with_poster = item("a", Some("https://img/a.jpg"));

        assert_eq!(cache.state_for(&item("b", Some(""))), None);
        assert_eq!(cache.state_for(&with_poster), Some(PosterState::Loading));

        cache.resolve("https://img/a.jpg".into(), false);
        assert_eq!(cache.state_for(&with_poster), Some(PosterState::Failed));

        cache.resolve("https://img/a.jpg".into(), true);
        assert_eq!(cache.state_for(&with_poster), Some(PosterState::Loaded));
    }
}
