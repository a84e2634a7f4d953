//! Article search boundary for the Attune session engine
//!
//! This crate owns everything that touches the remote search API:
//! - the wire request/response types for the `getArticles` endpoint
//! - the query builder that turns a [`attune_core::PreferenceSet`] into a request
//! - the normalizer that converts raw results into [`attune_core::Article`]s
//! - the post-fetch content length filter
//! - the `ArticleSearch` port and its reqwest-backed implementation

pub mod client;
pub mod error;
pub mod normalize;
pub mod query;
pub mod types;

pub use client::{ArticleSearch, NewsApiClient, NewsApiConfig};
pub use error::NewsError;
pub use normalize::{filter_by_length, normalize, word_count};
pub use query::build_request;
pub use types::{GetArticlesRequest, RawArticle, RawAuthor, RawCategory, RawSentiment, RawSource};
