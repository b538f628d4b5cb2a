//! HTTP client for the vendors' public catalog JSON endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ScraperError;

/// Thin JSON GET client shared by every vendor source.
///
/// Only HTTP 200 is accepted. 429 ("maximum request limit") and every other
/// status surface as typed errors and are never retried here.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Issues `GET {base_url}/{path}/?{query}` and deserializes the body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] — `base_url` + `path` is not a valid URL.
    /// - [`ScraperError::RateLimited`] — HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] — any status other than 200.
    /// - [`ScraperError::Http`] — network or TLS failure.
    /// - [`ScraperError::Deserialize`] — body is not the expected JSON shape.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        base_url: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ScraperError> {
        let url = Self::endpoint_url(base_url, path, query)?;
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(%url, "maximum request limit reached; wait a couple of seconds before retrying");
            return Err(ScraperError::RateLimited { url });
        }

        if status != reqwest::StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("response from {url}"),
            source: e,
        })
    }

    /// Builds the endpoint URL. Vendor endpoints expect a trailing slash on
    /// the path, so one is always appended.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if the joined URL cannot be parsed.
    fn endpoint_url(
        base_url: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, ScraperError> {
        let joined = format!(
            "{}/{}/",
            base_url.trim_end_matches('/'),
            path.trim_matches('/')
        );
        let mut url = reqwest::Url::parse(&joined).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
