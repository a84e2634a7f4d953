//! Wire types for the `getArticles` search endpoint

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Request
// ============================================================================

/// Search request body for the article endpoint
///
/// Built by [`crate::query::build_request`]; opaque to everything downstream
/// of the search client. The API key is not part of the request, the client
/// injects it at send time.
#[derive(Debug, Clone, Serialize)]
pub struct GetArticlesRequest {
    /// API action, always "getArticles"
    pub action: String,
    /// Result shape, always "articles"
    #[serde(rename = "resultType")]
    pub result_type: String,
    /// Content kinds to search, always ["news"]
    #[serde(rename = "dataType")]
    pub data_type: Vec<String>,
    /// Language filter, always "eng"
    pub lang: String,
    /// Sort order, always "relevance"
    #[serde(rename = "articlesSortBy")]
    pub sort_by: String,
    /// Number of results to request
    #[serde(rename = "articlesCount")]
    pub count: usize,
    /// Result page, always 1 (the pool is fetched in one shot)
    #[serde(rename = "articlesPage")]
    pub page: usize,
    /// Minimum sentiment score
    #[serde(rename = "sentimentMin")]
    pub sentiment_min: f64,
    /// Maximum sentiment score
    #[serde(rename = "sentimentMax")]
    pub sentiment_max: f64,
    /// Category filter; omitted entirely when no topics are selected
    #[serde(rename = "categoryUri", skip_serializing_if = "Option::is_none")]
    pub category_uri: Option<Vec<String>>,
    /// Keywords that must not appear in matching articles
    #[serde(rename = "ignoreKeyword", skip_serializing_if = "Option::is_none")]
    pub ignore_keyword: Option<Vec<String>>,
    /// Where exclusion keywords are matched; "body,title" when present
    #[serde(rename = "ignoreKeywordLoc", skip_serializing_if = "Option::is_none")]
    pub ignore_keyword_loc: Option<String>,
    /// Ask the API to annotate each result with its categories
    #[serde(rename = "includeArticleCategories")]
    pub include_article_categories: bool,
    /// Restrict to the top sources by rank percentile
    #[serde(rename = "startSourceRankPercentile")]
    pub start_source_rank_percentile: u32,
    /// Duplicate handling, always "skipDuplicates"
    #[serde(rename = "isDuplicateFilter")]
    pub is_duplicate_filter: String,
}

// ============================================================================
// Response
// ============================================================================

/// Top-level search response
#[derive(Debug, Deserialize)]
pub struct GetArticlesResponse {
    /// Result container
    pub articles: ArticleResults,
    /// Total number of matching articles on the backend
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<u64>,
}

/// Paged result container
#[derive(Debug, Deserialize)]
pub struct ArticleResults {
    /// Raw search results
    pub results: Vec<RawArticle>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(rename = "currentPage", default)]
    pub current_page: Option<u32>,
}

/// A single raw search result
///
/// Every field except `uri` is optional on the wire; the normalizer decides
/// which results are usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    /// Backend identifier for the article
    #[serde(default)]
    pub uri: String,
    /// Canonical article URL
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Full article body
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub authors: Option<Vec<RawAuthor>>,
    /// Article image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Publication timestamp (ISO-8601)
    #[serde(rename = "dateTimePub", default)]
    pub date_time_pub: Option<String>,
    /// Sentiment, sent either as a bare score or as a score/label object
    #[serde(default, deserialize_with = "deserialize_sentiment")]
    pub sentiment: Option<RawSentiment>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<RawCategory>>,
}

/// Source descriptor on a raw result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "dataType", default)]
    pub data_type: Option<String>,
}

/// Author descriptor on a raw result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Sentiment annotation on a raw result
#[derive(Debug, Clone, PartialEq)]
pub struct RawSentiment {
    pub score: Option<f64>,
    pub label: Option<String>,
}

impl RawSentiment {
    /// Lenient conversion from whatever the API sent
    ///
    /// Accepts a bare number or a `{score, label}` object; anything else
    /// (null, strings, arrays, empty objects) is "no sentiment", never an
    /// error.
    fn from_value(value: Value) -> Option<RawSentiment> {
        match value {
            Value::Number(number) => number.as_f64().map(|score| RawSentiment {
                score: Some(score),
                label: None,
            }),
            Value::Object(object) => {
                let score = object.get("score").and_then(Value::as_f64);
                let label = object
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                if score.is_none() && label.is_none() {
                    None
                } else {
                    Some(RawSentiment { score, label })
                }
            }
            _ => None,
        }
    }
}

fn deserialize_sentiment<'de, D>(deserializer: D) -> Result<Option<RawSentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(RawSentiment::from_value))
}

/// Category descriptor on a raw result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}
