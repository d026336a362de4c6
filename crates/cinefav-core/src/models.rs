use serde::Serialize;

/// Poster value the upstream provider uses when it has no image.
pub const POSTER_UNAVAILABLE: &str = "N/A";

/// A movie as the rest of the client sees it, after boundary normalization.
///
/// Search results and favorites share this shape. The serialized form is the
/// body the favorites endpoint expects on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieItem {
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl MovieItem {
    /// Poster URL worth loading, or `None` when the placeholder should be shown.
    pub fn poster_url(&self) -> Option<&str> {
        self.poster
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != POSTER_UNAVAILABLE)
    }
}

/// One page of results as returned by either endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoviePage {
    pub items: Vec<MovieItem>,
    pub total_pages: u32,
}

/// Pagination cursor plus the items on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub items: Vec<MovieItem>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            items: Vec::new(),
        }
    }
}

impl PageState {
    /// Whether `page` is a valid navigation target.
    pub fn in_range(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Drop items and total, keeping the cursor.
    pub fn reset(&mut self) {
        self.items.clear();
        self.total_pages = 1;
    }
}
