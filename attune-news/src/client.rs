//! Reqwest-backed client for the article search endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::error::NewsError;
use crate::types::{GetArticlesRequest, GetArticlesResponse, RawArticle};

/// Default search endpoint
pub const DEFAULT_BASE_URL: &str = "https://newsapi.ai/api/v1/article/getArticles";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "NEWSAPI_AI_KEY";

/// Port for issuing article searches
///
/// The session depends on this trait, not on the concrete client, so tests
/// can substitute a canned implementation.
#[async_trait]
pub trait ArticleSearch: Send + Sync {
    /// Execute one search and return the raw results
    async fn search(&self, request: &GetArticlesRequest) -> Result<Vec<RawArticle>, NewsError>;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    /// API key sent in the request body
    pub api_key: String,
    /// Endpoint URL
    pub base_url: String,
}

impl NewsApiConfig {
    /// Create a configuration for the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the API key from the environment
    pub fn from_env() -> Result<Self, NewsError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| NewsError::InvalidRequest(format!("{API_KEY_ENV} is not set")))?;
        Ok(Self::new(api_key))
    }
}

/// Article search client
pub struct NewsApiClient {
    client: Client,
    config: NewsApiConfig,
}

/// Request body as sent on the wire: the query plus the API key
#[derive(Serialize)]
struct SignedRequest<'a> {
    #[serde(rename = "apiKey")]
    api_key: &'a str,
    #[serde(flatten)]
    request: &'a GetArticlesRequest,
}

impl NewsApiClient {
    /// Create a new client
    pub fn new(config: NewsApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ArticleSearch for NewsApiClient {
    #[instrument(skip(self, request), fields(count = request.count))]
    async fn search(&self, request: &GetArticlesRequest) -> Result<Vec<RawArticle>, NewsError> {
        let body = SignedRequest {
            api_key: &self.config.api_key,
            request,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_builder() {
                    NewsError::InvalidRequest(err.to_string())
                } else {
                    NewsError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| NewsError::Transport(err.to_string()))?;

        // The API reports failures both as non-200 statuses and as error
        // messages inside a 200 body; surface either verbatim.
        if !status.is_success() {
            let message = extract_error_message(&bytes).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(NewsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        if let Some(message) = extract_error_message(&bytes) {
            return Err(NewsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: GetArticlesResponse = serde_json::from_slice(&bytes).map_err(|err| {
            error!(
                line = err.line(),
                column = err.column(),
                "search response did not match the expected shape: {err}"
            );
            NewsError::Parse(err.to_string())
        })?;

        info!(
            results = decoded.articles.results.len(),
            "received search results"
        );
        Ok(decoded.articles.results)
    }
}

/// Pull an error message out of a response body, if one is present
///
/// Checks the top-level `error` field first, then `message`.
fn extract_error_message(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    let object = value.as_object()?;
    object
        .get("error")
        .or_else(|| object.get("message"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}
