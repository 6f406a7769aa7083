//! HTTP access to the dashboard backend.
//!
//! [`Api`] owns an [`HttpClient`] and the versioned base URL. Every method
//! checks the status code and decodes JSON, so callers only deal with
//! [`ApiError`].

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{ApiError, ApiResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct Api<C> {
    client: C,
    base_url: Url,
}

impl<C: HttpClient> Api<C> {
    /// `base_url` is the versioned root, e.g. `https://host/api/v1`.
    pub fn new(client: C, base_url: &str) -> ApiResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` under the base URL and appends `query` in order.
    pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> ApiResult<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        let url = self.endpoint(path, query)?;
        let req = Request::new(Method::GET, url);
        let (url, body) = self.execute(req).await?;
        decode(&url, &body)
    }

    /// POST or PUT `body` as JSON and decode the reply. An empty reply body
    /// decodes as JSON `null`.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, &[])?;
        let payload = serde_json::to_vec(body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: format!("request body could not be encoded: {e}"),
        })?;
        let mut req = Request::new(method, url);
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *req.body_mut() = Some(payload.into());
        let (url, body) = self.execute(req).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return decode(&url, b"null");
        }
        decode(&url, &body)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.endpoint(path, &[])?;
        self.execute(Request::new(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn execute(&self, mut req: Request) -> ApiResult<(String, Vec<u8>)> {
        req.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        let method = req.method().clone();
        let url = req.url().to_string();
        debug!(%method, url = %url, "Sending request");

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;
        debug!(
            %method,
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            "Response received"
        );
        Ok((url, body.to_vec()))
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
