//! Pure Hike REST API client.
//!
//! A minimal client for the Hike social backend. Covers post CRUD, the
//! pre-signed upload handshake, auth, friends and profile endpoints. No
//! workflow logic lives here: sequencing several calls into one user action
//! is the job of the application crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use hike_api::{HikeClient, CreatePostRequest};
//!
//! let client = HikeClient::new("http://localhost:5000")?;
//!
//! let post = client.create_post(&CreatePostRequest {
//!     user_id: "65f0c0ffee".into(),
//!     title: "Trip".into(),
//!     content: "Fun".into(),
//!     images: vec![],
//! }).await?;
//!
//! let posts = client.fetch_posts("65f0c0ffee").await?;
//! ```

pub mod auth;
pub mod error;
pub mod friends;
pub mod posts;
pub mod profile;
pub mod types;
pub mod uploads;

pub use error::{HikeApiError, Result};
pub use types::*;
pub use uploads::object_url;

use reqwest::{Client, Response};
use std::time::Duration;

/// Hike REST API client.
#[derive(Debug, Clone)]
pub struct HikeClient {
    http_client: Client,
    base_url: String,
}

impl HikeClient {
    /// Create a client against the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Create a client whose every request is bounded by `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Self::with_http_client(http_client, base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(http_client: Client, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| HikeApiError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http_client
    }

    /// Join path segments onto the base URL, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }
}

/// Turn a non-2xx response into `HikeApiError::Api`, keeping the body.
pub(crate) async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(HikeApiError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp)
}

/// Decode a JSON body, mapping decode failures to `HikeApiError::Parse`.
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| HikeApiError::Parse(format!("Failed to deserialize response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments_and_trims_base() {
        let client = HikeClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.endpoint(&["post", "getURL"]),
            "http://localhost:5000/post/getURL"
        );
        assert_eq!(
            client.endpoint(&["post", "a b/c"]),
            "http://localhost:5000/post/a%20b%2Fc"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = HikeClient::new("not a url").unwrap_err();
        assert!(matches!(err, HikeApiError::Config(_)));
    }
}
