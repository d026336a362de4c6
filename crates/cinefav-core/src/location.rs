//! The URL-style mirror of the search state (`?q=...&page=...`).
//!
//! Only the search query and search page live here. Favorites pagination is
//! never part of the location.

use std::fmt;

use url::form_urlencoded;
use url::Url;

/// Navigation state: the `q` and `page` query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub q: String,
    pub page: u32,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            q: String::new(),
            page: 1,
        }
    }
}

impl Location {
    pub fn new(q: impl Into<String>, page: u32) -> Self {
        Self {
            q: q.into(),
            page: page.max(1),
        }
    }

    /// Read a location from a full URL, a `?`-prefixed query string, or a
    /// bare `key=value&...` string.
    ///
    /// Missing `q` is empty; missing, unparsable or zero `page` is 1.
    pub fn from_query(input: &str) -> Self {
        let input = input.trim();
        let query = if input.contains("://") {
            Url::parse(input)
                .ok()
                .and_then(|url| url.query().map(str::to_string))
                .unwrap_or_default()
        } else {
            input.trim_start_matches('?').to_string()
        };

        let mut q = None;
        let mut page = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" if q.is_none() => q = Some(value.into_owned()),
                "page" if page.is_none() => page = Some(value.trim().parse::<u32>().unwrap_or(1)),
                _ => {}
            }
        }

        Self::new(q.unwrap_or_default(), page.unwrap_or(1))
    }

    /// Serialize as `?q=...&page=...`.
    pub fn to_query_string(&self) -> String {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair("q", &self.q)
            .append_pair("page", &self.page.to_string())
            .finish();
        format!("?{encoded}")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
