//! reqwest-backed client for the dashboard REST API.
//!
//! The bearer token is held as a [`SecretString`] and wrapped in a
//! sensitive header value, so it never shows up in `Debug` output or in
//! reqwest's request logging.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ApiError, CollectionBackend, Payload};
use crate::config::Config;
use crate::error::{InterEdError, Result};
use crate::types::EntityId;

/// Default total request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpBackend {
    client: Client,
    base: Url,
    token: Option<SecretString>,
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base", &self.base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpBackend {
    /// Create a backend for the API rooted at `base_url`.
    ///
    /// A path prefix on the base is kept: `https://host/admin` serves
    /// `https://host/admin/api/{collection}`.
    pub fn new(base_url: &str, token: Option<SecretString>, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(InterEdError::Config(format!(
                "api.url must be an http(s) URL, got '{base_url}'"
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base,
            token,
        })
    }

    /// Build a backend from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.api_url().ok_or_else(|| {
            InterEdError::Config(
                "API URL not configured. Set INTERED_API_URL or run: intered config set api.url <url>"
                    .to_string(),
            )
        })?;
        let timeout = config
            .api_timeout_secs()
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self::new(&url, config.api_token().map(SecretString::from), timeout)
    }

    /// URL of a collection, or of one record when `id` is given
    pub fn endpoint(&self, collection: &str, id: Option<EntityId>) -> Result<Url> {
        let path = match id {
            Some(id) => format!("api/{collection}/{id}"),
            None => format!("api/{collection}"),
        };
        Ok(self.base.join(&path)?)
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| InterEdError::Config("api.token contains invalid characters".into()))?;
            value.set_sensitive(true);
            builder = builder.header(header::AUTHORIZATION, value);
        }

        Ok(builder)
    }

    /// Send a request and turn non-2xx responses into classified errors
    async fn send(
        &self,
        method: Method,
        collection: &str,
        id: Option<EntityId>,
        body: Option<&Payload>,
    ) -> Result<Response> {
        let url = self.endpoint(collection, id)?;
        debug!(%method, %url, "api request");

        let mut builder = self.request(method.clone(), url)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(%method, collection, status = status.as_u16(), "api response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status, &body).into_error(collection, id))
    }
}

#[async_trait]
impl CollectionBackend for HttpBackend {
    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let response = self.send(Method::GET, collection, None, None).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, collection: &str, id: EntityId) -> Result<Value> {
        let response = self.send(Method::GET, collection, Some(id), None).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, collection: &str, payload: &Payload) -> Result<Value> {
        let response = self
            .send(Method::POST, collection, None, Some(payload))
            .await?;
        Ok(response.json().await?)
    }

    async fn update(&self, collection: &str, id: EntityId, payload: &Payload) -> Result<Value> {
        let response = self
            .send(Method::PUT, collection, Some(id), Some(payload))
            .await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, collection: &str, id: EntityId) -> Result<()> {
        self.send(Method::DELETE, collection, Some(id), None).await?;
        Ok(())
    }
}
