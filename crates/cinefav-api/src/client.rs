use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use cinefav_core::identity::IdentityProvider;
use cinefav_core::models::{MovieItem, MoviePage};

use crate::error::ApiError;
use crate::traits::{FavoritesStore, MovieSearch};
use crate::types::ListResponse;

/// Build the shared HTTP client. `None` leaves timeouts to the transport.
pub fn http_client(timeout: Option<Duration>) -> Result<Client, ApiError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

fn parse_base(base_url: &str) -> Result<Url, ApiError> {
    let url = Url::parse(base_url).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::Url(format!("{base_url}: not a base URL")));
    }
    Ok(url)
}

/// Append path segments to the API base, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Url(format!("{base}: not a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Api {
            status,
            message: body,
        })
    }
}

async fn read_page(resp: reqwest::Response) -> Result<MoviePage, ApiError> {
    let resp = check_response(resp).await?;
    let body: ListResponse = resp
        .json()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))?;
    Ok(body.into_page())
}

// ── Search ───────────────────────────────────────────────────────

/// Client for `GET /movies/search`.
pub struct SearchClient {
    base: Url,
    http: Client,
}

impl SearchClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, ApiError> {
        Ok(Self {
            base: parse_base(base_url)?,
            http,
        })
    }
}

impl MovieSearch for SearchClient {
    type Error = ApiError;

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, ApiError> {
        let url = endpoint(&self.base, &["movies", "search"])?;
        tracing::debug!(query, page, "searching movies");

        let resp = self
            .http
            .get(url)
            .query(&[("q", query), ("page", &page.to_string())])
            .send()
            .await?;

        read_page(resp).await
    }
}

// ── Favorites ────────────────────────────────────────────────────

/// Client for the `/movies/favorites` endpoints.
///
/// Every call is scoped with the `userId` from the injected identity provider.
pub struct FavoritesClient {
    base: Url,
    http: Client,
    identity: Arc<dyn IdentityProvider>,
}

impl FavoritesClient {
    pub fn new(
        base_url: &str,
        http: Client,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base: parse_base(base_url)?,
            http,
            identity,
        })
    }
}

impl FavoritesStore for FavoritesClient {
    type Error = ApiError;

    async fn list(&self, page: u32, limit: u32) -> Result<MoviePage, ApiError> {
        let user_id = self.identity.user_id()?;
        let url = endpoint(&self.base, &["movies", "favorites"])?;
        tracing::debug!(page, limit, "listing favorites");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("userId", user_id.as_str()),
                ("page", &page.to_string()),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        read_page(resp).await
    }

    async fn add(&self, item: &MovieItem) -> Result<(), ApiError> {
        let user_id = self.identity.user_id()?;
        let url = endpoint(&self.base, &["movies", "favorites"])?;
        tracing::debug!(id = %item.id, "adding favorite");

        let resp = self
            .http
            .post(url)
            .query(&[("userId", user_id.as_str())])
            .json(item)
            .send()
            .await?;

        check_response(resp).await?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), ApiError> {
        let user_id = self.identity.user_id()?;
        let url = endpoint(&self.base, &["movies", "favorites", id])?;
        tracing::debug!(id, "removing favorite");

        let resp = self
            .http
            .delete(url)
            .query(&[("userId", user_id.as_str())])
            .send()
            .await?;

        check_response(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let base = parse_base("http://localhost:4000/api").unwrap();
        let url = endpoint(&base, &["movies", "search"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/movies/search");

        let base = parse_base("http://localhost:4000/api/").unwrap();
        let url = endpoint(&base, &["movies", "favorites", "tt 1/x"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/api/movies/favorites/tt%201%2Fx"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(parse_base("mailto:a@b.c"), Err(ApiError::Url(_))));
        assert!(matches!(parse_base("not a url"), Err(ApiError::Url(_))));
    }
}
