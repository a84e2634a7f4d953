//! Translation from user preferences to a search request

use attune_core::PreferenceSet;

use crate::types::GetArticlesRequest;

/// Build the search request for a set of preferences
///
/// Pure and total: every preference set maps to a valid request. Category
/// and keyword filters are omitted outright (not sent empty) when nothing
/// contributes to them.
pub fn build_request(preferences: &PreferenceSet) -> GetArticlesRequest {
    let (sentiment_min, sentiment_max) = preferences.sentiment_range();
    let category_uris = preferences.category_uris();
    let keywords = preferences.exclusion_keywords();
    let has_keywords = !keywords.is_empty();

    GetArticlesRequest {
        action: "getArticles".to_string(),
        result_type: "articles".to_string(),
        data_type: vec!["news".to_string()],
        lang: "eng".to_string(),
        sort_by: "relevance".to_string(),
        count: preferences.article_count,
        page: 1,
        sentiment_min,
        sentiment_max,
        category_uri: if category_uris.is_empty() {
            None
        } else {
            Some(category_uris)
        },
        ignore_keyword: if has_keywords { Some(keywords) } else { None },
        ignore_keyword_loc: has_keywords.then(|| "body,title".to_string()),
        include_article_categories: true,
        start_source_rank_percentile: 90,
        is_duplicate_filter: "skipDuplicates".to_string(),
    }
}
