use crate::error::{ApiError, ApiResult};
use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that attaches `Authorization: Bearer <token>` to
/// every request.
///
/// The token is handed in by the caller once per session. Nothing in this crate
/// reads it from ambient state, so tests can construct clients with any token.
pub struct ApiKey<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    pub fn bearer(inner: C, token: &str) -> ApiResult<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ApiError::InvalidHeader {
                name: AUTHORIZATION.to_string(),
            }
        })?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}
