//! HTTP client for the POS backend.
//!
//! One `ApiClient` is shared by every resource module below; each module adds
//! an `impl ApiClient` block with that resource's endpoints and, where the
//! cashier session needs it, the matching port implementation.

pub mod branches;
pub mod catalog;
pub mod customers;
pub mod orders;
pub mod payments;
pub mod profiles;
pub mod reports;
pub mod users;

use crate::domain::model::Envelope;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PosError, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            config.auth_token().map(str::to_string),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Adds `?branch_id=` only when a branch is set.
    pub(crate) fn branch_scoped(&self, path: &str, branch_id: Option<&str>) -> RequestBuilder {
        let builder = self.request(Method::GET, path);
        match branch_id {
            Some(id) if !id.is_empty() => builder.query(&[("branch_id", id)]),
            _ => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("{} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        tracing::warn!("API error {}: {}", status.as_u16(), message);
        Err(PosError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Sends the request and returns the envelope's `data`.
    pub(crate) async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let envelope: Envelope<T> = self.envelope(builder).await?;
        Ok(envelope.data)
    }

    pub(crate) async fn envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Envelope<T>> {
        let body = self.execute(builder).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Raw response body, for endpoints whose shape the client does not own.
    pub(crate) async fn json(&self, builder: RequestBuilder) -> Result<Value> {
        let body = self.execute(builder).await?.bytes().await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// For mutations whose response body is not needed.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<()> {
        self.execute(builder).await?;
        Ok(())
    }
}

/// Reads an id that may be a string or a number.
pub(crate) fn id_at(body: &Value, pointer: &str) -> Option<String> {
    match body.pointer(pointer)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joining_ignores_extra_slashes() {
        let client = ApiClient::new("http://pos.local/api/", None, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://pos.local/api");
        assert_eq!(
            client.url("/orders/find-all"),
            "http://pos.local/api/orders/find-all"
        );
    }

    #[test]
    fn test_id_at_reads_strings_and_numbers() {
        let body = json!({"data": {"id": 42}, "order": {"id": "o-7"}});
        assert_eq!(id_at(&body, "/data/id"), Some("42".to_string()));
        assert_eq!(id_at(&body, "/order/id"), Some("o-7".to_string()));
        assert_eq!(id_at(&body, "/data/order/id"), None);
    }
}
