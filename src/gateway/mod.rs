//! HTTP gateway for the theme-management API.
//!
//! A stateless wrapper translating domain operations into authenticated
//! HTTP calls. No business logic about which files to sync lives here;
//! the gateway's contract is typed: every non-2xx response becomes an
//! [`Error::Api`] with whatever detail the body carried, so callers decide
//! whether to abort or record-and-continue.
//!
//! Rate limiting (HTTP 429) is retried uniformly across all operations
//! with bounded exponential backoff. Multipart bodies are rebuilt from
//! owned bytes on every attempt so a retry carries the identical payload.

mod types;

pub use types::{Template, TemplatePayload, Theme, ThemeList};

use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};

use crate::error::{Error, Result};

/// Maximum attempts per request (1 initial + 2 retries on 429).
const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between 429 retries.
const BACKOFF_BASE: Duration = Duration::from_millis(250);

/// Interface to the theme-management API.
///
/// This is the seam the reconciler and pull engine are written against;
/// tests substitute a recording fake.
pub trait ThemeApi: Send + Sync {
    /// List all themes on the store.
    fn list_themes(&self) -> impl Future<Output = Result<Vec<Theme>>> + Send;

    /// Create a theme by name.
    fn create_theme(&self, name: &str) -> impl Future<Output = Result<Theme>> + Send;

    /// List every template of a theme.
    ///
    /// A theme id unknown to the store resolves to [`Error::ThemeNotFound`].
    fn list_templates(&self, theme_id: u64) -> impl Future<Output = Result<Vec<Template>>> + Send;

    /// Fetch a single template by name.
    fn get_template(
        &self,
        theme_id: u64,
        name: &str,
    ) -> impl Future<Output = Result<Template>> + Send;

    /// Create or update one template.
    fn upload_template(
        &self,
        theme_id: u64,
        name: &str,
        payload: &TemplatePayload,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete one template by name.
    fn delete_template(
        &self,
        theme_id: u64,
        name: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Unauthenticated GET of a media asset body.
    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// HTTP client for one store.
pub struct Gateway {
    client: reqwest::Client,
    store: String,
    apikey: String,
}

impl Gateway {
    /// Create a gateway for a store URL and API key.
    #[must_use]
    pub fn new(store: &str, apikey: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            store: store.trim_end_matches('/').to_string(),
            apikey: apikey.to_string(),
        }
    }

    fn themes_url(&self) -> String {
        format!("{}/api/admin/themes/", self.store)
    }

    fn templates_url(&self, theme_id: u64) -> String {
        format!("{}/api/admin/themes/{theme_id}/templates/", self.store)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("Token {}", self.apikey))
    }

    /// Send a request, retrying on 429 with exponential backoff.
    ///
    /// `build` constructs a fresh request per attempt; reqwest bodies
    /// (multipart in particular) are consumed on send.
    async fn send_with_retry<F>(&self, operation: &str, build: F) -> Result<reqwest::Response>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = build().send().await?;
            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }
            if attempt >= MAX_ATTEMPTS {
                return Err(Error::RateLimited {
                    operation: operation.to_string(),
                    attempts: attempt,
                });
            }
            let delay = backoff_delay(attempt);
            tracing::warn!(
                "{operation} rate limited (attempt {attempt}/{MAX_ATTEMPTS}), \
                 retrying in {}ms",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Convert a non-2xx response into a typed API error.
    async fn check_status(operation: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("application/json"));

        let detail = if is_json {
            match response.json::<serde_json::Value>().await {
                Ok(body) => error_detail(&body),
                Err(_) => String::new(),
            }
        } else {
            String::new()
        };

        Err(Error::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            detail,
        })
    }
}

/// Delay before the next attempt: 250ms, 500ms, 1s, ...
fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE * 2u32.saturating_pow(attempt - 1)
}

/// Build a human-readable detail string from a validation-error body.
///
/// Standard shape: an object whose values are lists of per-field error
/// strings. Each field contributes `"field": msg msg`; fields are joined
/// by spaces and the whole thing prefixed with ` -> `. Bodies that are
/// not objects, or empty objects, yield an empty string.
#[must_use]
pub fn error_detail(body: &serde_json::Value) -> String {
    let Some(map) = body.as_object() else {
        return String::new();
    };

    let mut parts = Vec::new();
    for (field, value) in map {
        match value {
            serde_json::Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                parts.push(format!("\"{field}\": {joined}"));
            }
            serde_json::Value::String(s) => parts.push(format!("\"{field}\": {s}")),
            _ => {}
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" -> {}", parts.join(" "))
    }
}

impl ThemeApi for Gateway {
    async fn list_themes(&self) -> Result<Vec<Theme>> {
        let operation = format!("Listing themes on {}", self.store);
        let url = self.themes_url();
        let response = self
            .send_with_retry(&operation, || self.authed(self.client.get(&url)))
            .await?;
        let response = Self::check_status(&operation, response).await?;
        let list: ThemeList = response.json().await?;
        Ok(list.results)
    }

    async fn create_theme(&self, name: &str) -> Result<Theme> {
        let operation = format!("Theme \"{name}\" creation");
        let url = self.themes_url();
        let response = self
            .send_with_retry(&operation, || {
                self.authed(self.client.post(&url).form(&[("name", name)]))
            })
            .await?;
        let response = Self::check_status(&operation, response).await?;
        Ok(response.json().await?)
    }

    async fn list_templates(&self, theme_id: u64) -> Result<Vec<Template>> {
        let operation = format!("Downloading templates from theme id #{theme_id}");
        let url = self.templates_url(theme_id);
        let response = self
            .send_with_retry(&operation, || self.authed(self.client.get(&url)))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::ThemeNotFound { theme_id });
        }
        let response = Self::check_status(&operation, response).await?;

        // The endpoint answers non-list JSON (e.g. {"detail": "not found"})
        // for ids it does not know. That is a terminal "nothing to do"
        // state, not a malformed response.
        let body: serde_json::Value = response.json().await?;
        if body.is_array() {
            Ok(serde_json::from_value(body)?)
        } else {
            Err(Error::ThemeNotFound { theme_id })
        }
    }

    async fn get_template(&self, theme_id: u64, name: &str) -> Result<Template> {
        let operation = format!("Downloading {name} from theme id #{theme_id}");
        let url = format!("{}?name={name}", self.templates_url(theme_id));
        let response = self
            .send_with_retry(&operation, || self.authed(self.client.get(&url)))
            .await?;
        let response = Self::check_status(&operation, response).await?;
        Ok(response.json().await?)
    }

    async fn upload_template(
        &self,
        theme_id: u64,
        name: &str,
        payload: &TemplatePayload,
    ) -> Result<()> {
        let operation = format!("Uploading {name} to theme id #{theme_id}");
        let url = self.templates_url(theme_id);

        let response = match payload {
            TemplatePayload::Text(content) => {
                self.send_with_retry(&operation, || {
                    self.authed(
                        self.client
                            .post(&url)
                            .form(&[("name", name), ("content", content)]),
                    )
                })
                .await?
            }
            TemplatePayload::Media(bytes) => {
                self.send_with_retry(&operation, || {
                    let part = Part::bytes(bytes.clone()).file_name(name.to_string());
                    let form = Form::new()
                        .text("name", name.to_string())
                        .text("content", String::new())
                        .part("file", part);
                    self.authed(self.client.post(&url).multipart(form))
                })
                .await?
            }
        };

        Self::check_status(&operation, response).await?;
        Ok(())
    }

    async fn delete_template(&self, theme_id: u64, name: &str) -> Result<()> {
        let operation = format!("Deleting {name} from theme id #{theme_id}");
        let url = format!("{}?name={name}", self.templates_url(theme_id));
        let response = self
            .send_with_retry(&operation, || self.authed(self.client.delete(&url)))
            .await?;
        Self::check_status(&operation, response).await?;
        Ok(())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let operation = format!("Downloading {url}");
        let response = self
            .send_with_retry(&operation, || self.client.get(url))
            .await?;
        let response = Self::check_status(&operation, response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
