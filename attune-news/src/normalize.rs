//! Conversion of raw search results into normalized articles

use attune_core::{Article, ArticleSource, WordRange};
use url::Url;

use crate::types::{RawArticle, RawCategory};

/// How many characters of the body become the short description
const DESCRIPTION_CHARS: usize = 200;

/// Category identifiers the backend uses, mapped to display names
const CATEGORY_DISPLAY: [(&str, &str); 6] = [
    ("news/Technology", "Technology"),
    ("news/Business", "Business"),
    ("news/Politics", "Politics"),
    ("news/Health", "Health"),
    ("news/Sports", "Sports"),
    ("news/Science", "Science"),
];

/// Convert one raw result into an [`Article`], or drop it
///
/// A result is dropped when it has no canonical URL or identifier, no image
/// with an http/https scheme, or no named first author. Dropping is silent;
/// the caller counts rejects if it cares.
pub fn normalize(raw: RawArticle, fallback_category: Option<&str>) -> Option<Article> {
    let url = raw
        .url
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| raw.uri.clone());
    if url.is_empty() {
        return None;
    }

    let image_url = raw
        .image
        .as_deref()
        .filter(|image| has_web_scheme(image))?
        .to_string();

    let author = raw
        .authors
        .as_ref()
        .and_then(|authors| authors.first())
        .and_then(|author| author.name.as_deref())
        .filter(|name| !name.is_empty())?
        .to_string();

    let category = resolve_category(raw.categories.as_deref(), fallback_category);
    let description: Option<String> = raw
        .body
        .as_ref()
        .map(|body| body.chars().take(DESCRIPTION_CHARS).collect());
    let source = ArticleSource {
        id: raw.source.as_ref().and_then(|s| s.uri.clone()),
        name: raw.source.as_ref().and_then(|s| s.title.clone()),
    };

    Some(Article {
        id: url.clone(),
        source,
        author: Some(author),
        title: raw.title,
        description,
        url,
        image_url,
        published_at: raw.date_time_pub,
        content: raw.body,
        category,
        bookmarked: false,
    })
}

/// An image is usable only when it parses as an http or https URL
fn has_web_scheme(image: &str) -> bool {
    Url::parse(image)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Resolve the article category
///
/// Order: first raw category whose identifier is in the fixed table, then
/// the label of the first raw category (reduced to its trailing segment for
/// "namespace/Name" style labels), then the caller's fallback.
fn resolve_category(
    categories: Option<&[RawCategory]>,
    fallback_category: Option<&str>,
) -> Option<String> {
    if let Some(categories) = categories {
        for category in categories {
            if let Some(uri) = category.uri.as_deref() {
                if let Some((_, display)) = CATEGORY_DISPLAY.iter().find(|(known, _)| *known == uri)
                {
                    return Some(display.to_string());
                }
            }
        }
        if let Some(label) = categories.first().and_then(|c| c.label.as_deref()) {
            let tail = label.rsplit('/').next().unwrap_or(label);
            if !tail.is_empty() {
                return Some(tail.to_string());
            }
        }
    }
    fallback_category.map(str::to_owned)
}

/// Count whitespace-delimited words, locale-naive
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep only articles whose word count falls inside the range
///
/// Passes everything through unchanged when no range applies. The count is
/// taken over the content, falling back to the description, else zero.
pub fn filter_by_length(articles: Vec<Article>, range: Option<&WordRange>) -> Vec<Article> {
    let Some(range) = range else {
        return articles;
    };
    articles
        .into_iter()
        .filter(|article| {
            let text = article
                .content
                .as_deref()
                .or(article.description.as_deref())
                .unwrap_or("");
            let words = word_count(text);
            words >= range.min && range.max.is_none_or(|max| words <= max)
        })
        .collect()
}
