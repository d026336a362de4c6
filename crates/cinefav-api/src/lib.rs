//! HTTP clients for the movie search and favorites endpoints.

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{http_client, FavoritesClient, SearchClient};
pub use error::ApiError;
pub use traits::{FavoritesStore, MovieSearch};
