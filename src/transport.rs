//! Sending request documents to the gateway.
//!
//! The core only needs "POST this body, give me the reply bytes". The
//! [`Transport`] trait is that seam; [`HttpTransport`] is the reqwest-backed
//! implementation used by default.

use crate::errors::{MonerisError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use url::Url;

/// Content type of every request document.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Performs the network call for a request.
///
/// Implementations apply their own timeout and retry policy; the core adds
/// none. A non-2xx reply or a network failure is returned as an error and
/// surfaced to the caller unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `body` to `url` and returns the raw reply body.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        headers: HeaderMap,
        body: String,
    ) -> Result<Vec<u8>>;
}

/// [`Transport`] over a shared `reqwest::Client`.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Wraps an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &Url,
        headers: HeaderMap,
        body: String,
    ) -> Result<Vec<u8>> {
        let response = self
            .client
            .request(method, url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "gateway replied");

        if !status.is_success() {
            return Err(MonerisError::UnexpectedStatus(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Headers sent with every request document.
pub fn xml_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
    headers
}
