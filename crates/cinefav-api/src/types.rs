use serde::Deserialize;

use cinefav_core::models::MoviePage;
use cinefav_core::normalize;

// ── Response body ────────────────────────────────────────────────

/// `{ results, totalPages }`, shared by search and favorites listing.
///
/// Items stay as raw JSON here and go through [`normalize`] on conversion.
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
    #[serde(default, rename = "totalPages")]
    pub total_pages: Option<serde_json::Value>,
}

impl ListResponse {
    pub fn into_page(self) -> MoviePage {
        normalize::normalize_page(self.results.as_deref(), self.total_pages.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_response() {
        let json = r#"{
            "results": [
                { "id": "tt1", "title": "Batman", "year": "1989", "poster": "N/A", "type": "movie" },
                { "imdbID": "tt2", "Title": "Batman Returns", "Year": "1992", "Poster": "https://img.example/2.jpg", "Type": "movie" }
            ],
            "totalPages": 3
        }"#;

        let page = serde_json::from_str::<ListResponse>(json).unwrap().into_page();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].poster_url(), None);
        assert_eq!(page.items[1].id, "tt2");
        assert_eq!(page.items[1].title, "Batman Returns");
        assert_eq!(page.items[1].poster_url(), Some("https://img.example/2.jpg"));
    }

    #[test]
    fn test_missing_fields_default() {
        let page = serde_json::from_str::<ListResponse>("{}").unwrap().into_page();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        let page = serde_json::from_str::<ListResponse>(r#"{"results": null, "totalPages": 0}"#)
            .unwrap()
            .into_page();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
