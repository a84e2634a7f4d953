//! Core types for the Attune news session engine
//!
//! This crate defines the shared data structures used across the engine:
//! the normalized article model and the user preference model that drives
//! every search.

pub mod article;
pub mod preferences;

pub use article::{Article, ArticleSource};
pub use preferences::{
    Exclusion, Mood, PreferenceSet, TimeBudget, Topic, WordRange, FULL_SENTIMENT_RANGE,
};
