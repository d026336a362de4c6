//! Service interfaces the runtime talks to.
//!
//! The HTTP clients implement these; tests substitute in-memory fakes.

use std::future::Future;

use cinefav_core::models::{MovieItem, MoviePage};

/// Remote movie search.
pub trait MovieSearch: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of results for `query`.
    fn search(
        &self,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<MoviePage, Self::Error>> + Send;
}

/// Remote favorites list, scoped to the current user.
pub trait FavoritesStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of favorites, `limit` items per page.
    fn list(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<MoviePage, Self::Error>> + Send;

    /// Store `item` as a favorite.
    fn add(&self, item: &MovieItem) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove the favorite with the given id.
    fn remove(&self, id: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
