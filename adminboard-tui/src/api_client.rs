//! REST client for the admin API.

use crate::config::{AdminConfig, AuthConfig};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    Url(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// Error body shape returned by Spring-style backends.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    message: String,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &AdminConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let auth_header = build_auth_headers(&config.auth)?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Absolute URL for `path`, with `segment` appended as one escaped path
    /// segment when given.
    pub fn url(&self, path: &str, segment: Option<&str>) -> Result<Url, ApiClientError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiClientError::Url(e.to_string()))?;
        if let Some(segment) = segment {
            url.path_segments_mut()
                .map_err(|_| ApiClientError::Url(format!("{} cannot take a path segment", path)))?
                .pop_if_empty()
                .push(segment);
        }
        Ok(url)
    }

    pub async fn get_json<T, Q>(&self, url: Url, query: Option<&Q>) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let mut request = self.client.get(url).headers(self.auth_header.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;
        let body = self.checked_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send `body` with `method` and discard the response payload.
    pub async fn send_json<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<(), ApiClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        let mut request = self
            .client
            .request(method, url)
            .headers(self.auth_header.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.checked_body(response).await?;
        Ok(())
    }

    async fn checked_body(&self, response: reqwest::Response) -> Result<String, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(text);
        }
        Err(ApiClientError::InvalidResponse(describe_failure(status, &text)))
    }
}

fn describe_failure(status: StatusCode, text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            error: Some(error),
            message,
        }) => format!("{}: {}", error, message),
        Ok(ErrorBody { message, .. }) => message,
        Err(_) => format!("HTTP {}: {}", status.as_u16(), text),
    }
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &auth.bearer_token {
        let value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}
