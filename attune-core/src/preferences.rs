//! User preference model and the fixed lookup tables that translate it
//! into search parameters.
//!
//! Moods, topics, exclusions and time budgets are closed enumerations; the
//! emoji-decorated labels the UI shows live in the presentation layer, not
//! here. The `SurpriseMe` and `NoFilters` members are sentinels: their
//! presence anywhere in a selection overrides the sibling members.

use serde::{Deserialize, Serialize};

/// Sentiment range applied when no mood filter is in effect
pub const FULL_SENTIMENT_RANGE: (f64, f64) = (-1.0, 1.0);

/// Reader mood, mapped to a sentiment score range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Neutral,
    Anxious,
    Curious,
    Tired,
}

impl Mood {
    /// Sentiment (min, max) filter for this mood
    pub fn sentiment_range(self) -> (f64, f64) {
        match self {
            Mood::Happy => (0.4, 1.0),
            Mood::Neutral => (-0.4, 0.4),
            Mood::Anxious => (-0.1, 0.5),
            Mood::Curious => (-0.5, 1.0),
            Mood::Tired => (0.0, 0.7),
        }
    }
}

/// Topic of interest, mapped to a backend category identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Technology,
    Politics,
    WorldNews,
    ArtsCulture,
    Health,
    Sports,
    /// Sentinel: suppress category filtering entirely
    SurpriseMe,
}

impl Topic {
    /// Backend category identifier, None for the sentinel
    pub fn category_uri(self) -> Option<&'static str> {
        match self {
            Topic::Technology => Some("news/Technology"),
            Topic::Politics => Some("news/Politics"),
            Topic::WorldNews => Some("news/World"),
            Topic::ArtsCulture => Some("news/Arts_and_Entertainment"),
            Topic::Health => Some("news/Health"),
            Topic::Sports => Some("news/Sports"),
            Topic::SurpriseMe => None,
        }
    }

    /// Human-readable name, used as the category fallback for articles the
    /// backend did not categorize
    pub fn display_name(self) -> Option<&'static str> {
        match self {
            Topic::Technology => Some("Technology"),
            Topic::Politics => Some("Politics"),
            Topic::WorldNews => Some("World news"),
            Topic::ArtsCulture => Some("Arts & Culture"),
            Topic::Health => Some("Health"),
            Topic::Sports => Some("Sports"),
            Topic::SurpriseMe => None,
        }
    }
}

/// Topic the reader wants to skip, expanded to a keyword blocklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    HealthDisease,
    Politics,
    Crime,
    CelebrityGossip,
    /// Sentinel: clear all exclusions
    NoFilters,
}

impl Exclusion {
    /// Fixed disjunction of 15 synonyms for this exclusion, None for the
    /// sentinel. Individual keywords are separated by " OR ".
    pub fn keyword_phrase(self) -> Option<&'static str> {
        match self {
            Exclusion::HealthDisease => Some(
                "disease OR illness OR cancer OR virus OR epidemic OR pandemic OR outbreak \
                 OR infection OR diagnosis OR hospital OR surgery OR tumor OR vaccine \
                 OR symptom OR mortality",
            ),
            Exclusion::Politics => Some(
                "politics OR election OR senate OR congress OR parliament OR president \
                 OR campaign OR legislation OR policy OR government OR minister OR ballot \
                 OR referendum OR partisan OR lawmaker",
            ),
            Exclusion::Crime => Some(
                "crime OR murder OR robbery OR assault OR theft OR shooting OR homicide \
                 OR kidnapping OR fraud OR arrest OR trial OR sentencing OR burglary \
                 OR violence OR stabbing",
            ),
            Exclusion::CelebrityGossip => Some(
                "celebrity OR gossip OR scandal OR divorce OR romance OR paparazzi \
                 OR influencer OR reality show OR hollywood OR red carpet OR breakup \
                 OR affair OR feud OR viral OR tabloid",
            ),
            Exclusion::NoFilters => None,
        }
    }
}

/// Inclusive word-count range derived from a time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRange {
    pub min: usize,
    /// None means unbounded (long reads only require the minimum)
    pub max: Option<usize>,
}

/// Available reading time, mapped to a word-count range at 225 wpm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBudget {
    /// Under 2 minutes
    Quick,
    /// 5-10 minutes
    Medium,
    /// 10+ minutes
    Long,
    /// Just browsing, no length filter
    NoRush,
}

impl TimeBudget {
    /// Word-count range for this budget, None when no filter applies
    pub fn word_range(self) -> Option<WordRange> {
        match self {
            TimeBudget::Quick => Some(WordRange {
                min: 0,
                max: Some(450),
            }),
            TimeBudget::Medium => Some(WordRange {
                min: 450,
                max: Some(2250),
            }),
            TimeBudget::Long => Some(WordRange {
                min: 2250,
                max: None,
            }),
            TimeBudget::NoRush => None,
        }
    }
}

/// Structured user choices for one recommendation session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSet {
    /// Current mood, None when unset
    pub mood: Option<Mood>,
    /// Topics of interest, possibly empty or containing the sentinel
    pub topics: Vec<Topic>,
    /// Topics to skip, possibly empty or containing the sentinel
    pub exclusions: Vec<Exclusion>,
    /// Available reading time, None when unset
    pub time_budget: Option<TimeBudget>,
    /// How many results one search requests from the backend
    pub article_count: usize,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            mood: None,
            topics: Vec::new(),
            exclusions: Vec::new(),
            time_budget: None,
            article_count: 100,
        }
    }
}

impl PreferenceSet {
    /// Sentiment (min, max) for the selected mood; the full range when unset
    pub fn sentiment_range(&self) -> (f64, f64) {
        self.mood
            .map(Mood::sentiment_range)
            .unwrap_or(FULL_SENTIMENT_RANGE)
    }

    /// Category identifiers for the selected topics
    ///
    /// The `SurpriseMe` sentinel overrides every other selection and yields
    /// an empty list, which downstream code treats as "no category filter".
    pub fn category_uris(&self) -> Vec<String> {
        if self.topics.contains(&Topic::SurpriseMe) {
            return Vec::new();
        }
        let mut uris: Vec<String> = Vec::new();
        for topic in &self.topics {
            if let Some(uri) = topic.category_uri() {
                if !uris.iter().any(|u| u == uri) {
                    uris.push(uri.to_string());
                }
            }
        }
        uris
    }

    /// Flattened list of individual exclusion keywords
    ///
    /// The `NoFilters` sentinel overrides every other selection and clears
    /// the list.
    pub fn exclusion_keywords(&self) -> Vec<String> {
        if self.exclusions.contains(&Exclusion::NoFilters) {
            return Vec::new();
        }
        self.exclusions
            .iter()
            .filter_map(|exclusion| exclusion.keyword_phrase())
            .flat_map(|phrase| phrase.split(" OR "))
            .map(|keyword| keyword.trim().to_string())
            .collect()
    }

    /// Word-count range for the selected time budget
    pub fn word_range(&self) -> Option<WordRange> {
        self.time_budget.and_then(TimeBudget::word_range)
    }

    /// Category name assigned to articles the backend left uncategorized,
    /// taken from the first non-sentinel topic
    pub fn fallback_category(&self) -> Option<&'static str> {
        self.topics
            .iter()
            .find(|topic| **topic != Topic::SurpriseMe)
            .and_then(|topic| topic.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_mood_yields_full_range() {
        let preferences = PreferenceSet::default();
        assert_eq!(preferences.sentiment_range(), (-1.0, 1.0));
    }

    #[test]
    fn test_mood_table() {
        assert_eq!(Mood::Happy.sentiment_range(), (0.4, 1.0));
        assert_eq!(Mood::Neutral.sentiment_range(), (-0.4, 0.4));
        assert_eq!(Mood::Anxious.sentiment_range(), (-0.1, 0.5));
        assert_eq!(Mood::Curious.sentiment_range(), (-0.5, 1.0));
        assert_eq!(Mood::Tired.sentiment_range(), (0.0, 0.7));
    }

    #[test]
    fn test_surprise_me_overrides_other_topics() {
        let preferences = PreferenceSet {
            topics: vec![Topic::Technology, Topic::SurpriseMe, Topic::Health],
            ..PreferenceSet::default()
        };
        assert!(preferences.category_uris().is_empty());
    }

    #[test]
    fn test_category_uris_deduplicated() {
        let preferences = PreferenceSet {
            topics: vec![Topic::Health, Topic::Health, Topic::Sports],
            ..PreferenceSet::default()
        };
        assert_eq!(
            preferences.category_uris(),
            vec!["news/Health".to_string(), "news/Sports".to_string()]
        );
    }

    #[test]
    fn test_no_filters_overrides_other_exclusions() {
        let preferences = PreferenceSet {
            exclusions: vec![Exclusion::Crime, Exclusion::NoFilters],
            ..PreferenceSet::default()
        };
        assert!(preferences.exclusion_keywords().is_empty());
    }

    #[test]
    fn test_each_exclusion_expands_to_fifteen_keywords() {
        for exclusion in [
            Exclusion::HealthDisease,
            Exclusion::Politics,
            Exclusion::Crime,
            Exclusion::CelebrityGossip,
        ] {
            let preferences = PreferenceSet {
                exclusions: vec![exclusion],
                ..PreferenceSet::default()
            };
            let keywords = preferences.exclusion_keywords();
            assert_eq!(keywords.len(), 15, "{exclusion:?}");
            assert!(keywords.iter().all(|k| !k.is_empty() && !k.contains(" OR ")));
        }
    }

    #[test]
    fn test_word_ranges() {
        assert_eq!(
            TimeBudget::Quick.word_range(),
            Some(WordRange {
                min: 0,
                max: Some(450)
            })
        );
        assert_eq!(
            TimeBudget::Long.word_range(),
            Some(WordRange {
                min: 2250,
                max: None
            })
        );
        assert_eq!(TimeBudget::NoRush.word_range(), None);
    }

    #[test]
    fn test_fallback_category_skips_sentinel() {
        let preferences = PreferenceSet {
            topics: vec![Topic::SurpriseMe, Topic::ArtsCulture],
            ..PreferenceSet::default()
        };
        assert_eq!(preferences.fallback_category(), Some("Arts & Culture"));

        let surprise_only = PreferenceSet {
            topics: vec![Topic::SurpriseMe],
            ..PreferenceSet::default()
        };
        assert_eq!(surprise_only.fallback_category(), None);
    }

    #[test]
    fn test_default_article_count() {
        assert_eq!(PreferenceSet::default().article_count, 100);
    }

    #[test]
    fn test_preferences_deserialize_with_missing_fields() {
        let preferences: PreferenceSet =
            serde_json::from_str(r#"{"mood": "curious", "topics": ["world_news"]}"#).unwrap();
        assert_eq!(preferences.mood, Some(Mood::Curious));
        assert_eq!(preferences.topics, vec![Topic::WorldNews]);
        assert_eq!(preferences.article_count, 100);
    }
}
