//! Normalized article model

use serde::{Deserialize, Serialize};

/// Source of a news article
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    /// Source identifier as reported by the search backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name of the source (e.g., "Reuters", "The Guardian")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A normalized news article
///
/// The article's identity is its canonical source URL: two fetches of the
/// same URL collide to the same `id`. Construction goes through the
/// normalizer, which only admits raw results carrying a usable image and a
/// named first author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Stable identifier (the canonical article URL)
    pub id: String,
    /// Source information
    pub source: ArticleSource,
    /// First listed author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Article title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short excerpt (first 200 characters of the body)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Canonical article URL
    pub url: String,
    /// Article image URL (http/https, always present)
    pub image_url: String,
    /// Publication timestamp, ISO-8601 by convention, opaque to the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Full article body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Inferred category display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Session-local bookmark flag, independent of the persisted bookmark set
    #[serde(default)]
    pub bookmarked: bool,
}

impl Article {
    /// Title with a display fallback
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Article")
    }

    /// Author with a display fallback
    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown Author")
    }

    /// Source name with a display fallback
    pub fn display_source(&self) -> &str {
        self.source.name.as_deref().unwrap_or("Unknown Source")
    }
}
