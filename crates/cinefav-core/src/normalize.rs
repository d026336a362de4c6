//! Boundary normalization for items coming from the movie API.
//!
//! The upstream provider is inconsistent about key casing (`Title` vs
//! `title`, `imdbID` vs `id`). Every normalized field has an ordered list of
//! accepted source keys; the first key holding a usable value wins. This runs
//! once where responses enter the client, so nothing downstream has to know
//! about the alternates.

use serde_json::{Map, Value};

use crate::models::{MovieItem, MoviePage};

const ID_SOURCES: &[&str] = &["id", "imdbID"];
const TITLE_SOURCES: &[&str] = &["title", "Title"];
const YEAR_SOURCES: &[&str] = &["year", "Year"];
const POSTER_SOURCES: &[&str] = &["poster", "Poster"];
const TYPE_SOURCES: &[&str] = &["type", "Type"];

/// Normalize one raw item. Returns `None` when no id can be resolved.
pub fn normalize_item(raw: &Value) -> Option<MovieItem> {
    let obj = raw.as_object()?;
    let id = first_usable(obj, ID_SOURCES)?;

    Some(MovieItem {
        id,
        title: first_usable(obj, TITLE_SOURCES).unwrap_or_default(),
        year: first_usable(obj, YEAR_SOURCES).unwrap_or_default(),
        poster: first_usable(obj, POSTER_SOURCES),
        kind: first_usable(obj, TYPE_SOURCES).unwrap_or_default(),
    })
}

/// Normalize a list of raw items, dropping the ones without an id.
pub fn normalize_items(raw: &[Value]) -> Vec<MovieItem> {
    raw.iter()
        .filter_map(|value| {
            let item = normalize_item(value);
            if item.is_none() {
                tracing::debug!(item = %value, "dropping result without an id");
            }
            item
        })
        .collect()
}

/// Normalize a `totalPages` value. Anything absent, zero or unparsable is 1.
pub fn normalize_total_pages(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .map(|n| n.min(u64::from(u32::MAX)) as u32)
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Build a page from the `results` / `totalPages` pair of a response body.
pub fn normalize_page(results: Option<&[Value]>, total_pages: Option<&Value>) -> MoviePage {
    MoviePage {
        items: results.map(normalize_items).unwrap_or_default(),
        total_pages: normalize_total_pages(total_pages),
    }
}

fn first_usable(obj: &Map<String, Value>, sources: &[&str]) -> Option<String> {
    sources.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
