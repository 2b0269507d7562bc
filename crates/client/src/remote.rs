//! Remote side of the client: the favorites and ward-search contracts, and
//! their HTTP implementation over the `/api/v1` REST API.

use std::collections::HashSet;

use async_trait::async_trait;
use bedwatch_core::favorite::FavoriteWithStats;
use bedwatch_core::query::MAX_LIMIT;
use bedwatch_core::ward::WardAggregate;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

/// Errors from a remote favorites or search call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// The pair already exists (`409 CONFLICT`).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The pair or ward does not exist (`404 NOT_FOUND`).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx answer.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request never got an answer (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl RemoteError {
    /// Message suitable for a user-facing notice.
    ///
    /// The server's own message when it sent one, the error text otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Conflict(message) | Self::NotFound(message) => message.clone(),
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Per-user favorite membership held by the server.
#[async_trait]
pub trait FavoritesRemote: Send + Sync {
    /// Create the favorite. An existing one is [`RemoteError::Conflict`].
    async fn add_favorite(&self, ward_name: &str) -> Result<(), RemoteError>;

    /// Delete the favorite. A missing one is [`RemoteError::NotFound`].
    async fn remove_favorite(&self, ward_name: &str) -> Result<(), RemoteError>;

    /// Every ward the user has favorited.
    async fn favorite_ward_names(&self) -> Result<HashSet<String>, RemoteError>;
}

/// Source of ward aggregates for a search text.
#[async_trait]
pub trait WardSource: Send + Sync {
    /// Wards whose name contains `search`, or all wards when `None`.
    async fn search_wards(&self, search: Option<&str>) -> Result<Vec<WardAggregate>, RemoteError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
    meta: ListMeta,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    total: i64,
}

/// HTTP client for one authenticated user session.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl std::fmt::Debug for HttpRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemote")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpRemote {
    /// Create a client for the API at `base_url`, e.g. `http://host:3000`.
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_client(reqwest::Client::new(), base_url, access_token)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        access_token: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url).map_err(|e| RemoteError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url,
            access_token: access_token.into(),
        })
    }

    /// `{base}/api/v1/{segments...}` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    /// Map a non-2xx response to a [`RemoteError`], passing 2xx through.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        Err(match status {
            StatusCode::CONFLICT => RemoteError::Conflict(message),
            StatusCode::NOT_FOUND => RemoteError::NotFound(message),
            other => RemoteError::Server {
                status: other.as_u16(),
                message,
            },
        })
    }

    async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<ListEnvelope<T>, RemoteError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }
}

#[async_trait]
impl FavoritesRemote for HttpRemote {
    async fn add_favorite(&self, ward_name: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(&["users", "me", "favorites"])?;
        let body = serde_json::json!({ "ward_name": ward_name });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn remove_favorite(&self, ward_name: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(&["users", "me", "favorites", "by-ward", ward_name])?;

        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn favorite_ward_names(&self) -> Result<HashSet<String>, RemoteError> {
        let url = self.endpoint(&["users", "me", "favorites"])?;
        let mut names = HashSet::new();
        let mut offset: i64 = 0;

        loop {
            let query = [("limit", MAX_LIMIT.to_string()), ("offset", offset.to_string())];
            let page: ListEnvelope<FavoriteWithStats> = self.get_page(url.clone(), &query).await?;
            let fetched = page.data.len() as i64;
            names.extend(page.data.into_iter().map(|f| f.ward_name));
            offset += fetched;
            if fetched == 0 || offset >= page.meta.total {
                break;
            }
        }

        tracing::debug!(count = names.len(), "Loaded favorite wards");
        Ok(names)
    }
}

#[async_trait]
impl WardSource for HttpRemote {
    async fn search_wards(&self, search: Option<&str>) -> Result<Vec<WardAggregate>, RemoteError> {
        let url = self.endpoint(&["wards"])?;
        let mut query = vec![("limit", MAX_LIMIT.to_string())];
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }

        let page: ListEnvelope<WardAggregate> = self.get_page(url, &query).await?;
        Ok(page.data)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn endpoint_encodes_ward_names() {
        let remote = HttpRemote::new("http://localhost:3000/", "token").unwrap();
        let url = remote
            .endpoint(&["users", "me", "favorites", "by-ward", "Chirurgia ogólna/dziecięca"])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/v1/users/me/favorites/by-ward/\
             Chirurgia%20og%C3%B3lna%2Fdzieci%C4%99ca"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let remote = HttpRemote::new("https://example.org/bedwatch", "token").unwrap();
        let url = remote.endpoint(&["wards"]).unwrap();

        assert_eq!(url.as_str(), "https://example.org/bedwatch/api/v1/wards");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert_matches!(HttpRemote::new("not a url", "t"), Err(RemoteError::InvalidUrl(_)));
        assert_matches!(
            HttpRemote::new("mailto:ops@example.org", "t"),
            Err(RemoteError::InvalidUrl(_))
        );
    }

    #[test]
    fn user_message_prefers_server_text() {
        assert_eq!(
            RemoteError::Conflict("Ward 'X' is already in favorites".into()).user_message(),
            "Ward 'X' is already in favorites"
        );
        assert_eq!(
            RemoteError::Transport("timed out".into()).user_message(),
            "HTTP request failed: timed out"
        );
    }
}
