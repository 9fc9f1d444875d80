//! Category detection cascade
//!
//! Four tiers of decreasing precision, tried in order:
//!
//! | Tier | Evidence              | Confidence                |
//! |------|-----------------------|---------------------------|
//! | 1    | fuzzy keyword (best)  | high if exact, else medium |
//! | 2    | exact keywords        | high                      |
//! | 3    | category patterns     | medium                    |
//! | 4    | partial keywords      | low (terms of 3+ chars)   |
//!
//! A tier runs only while nothing has been found yet. Merging is
//! insert-if-absent: a category keeps the confidence of the tier that first
//! reported it.

use crate::backend::{KeywordMatchType, SearchBackend};
use crate::categories::Category;
use crate::error::Result;
use crate::settings::DetectorSettings;
use crate::types::{CategoryMatch, Confidence};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// A category proposed by one tier
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGuess {
    pub category: String,
    pub confidence: Confidence,
}

impl CategoryGuess {
    fn new(category: String, confidence: Confidence) -> Self {
        Self {
            category,
            confidence,
        }
    }
}

/// One tier of the cascade
#[async_trait]
pub trait CategoryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this tier should run for `term` at all
    fn applies_to(&self, _term: &str) -> bool {
        true
    }

    async fn attempt(&self, backend: &dyn SearchBackend, term: &str) -> Result<Vec<CategoryGuess>>;
}

// ============================================================================
// Tiers
// ============================================================================

pub struct FuzzyKeywordTier;

#[async_trait]
impl CategoryStrategy for FuzzyKeywordTier {
    fn name(&self) -> &'static str {
        "fuzzy-keyword"
    }

    async fn attempt(&self, backend: &dyn SearchBackend, term: &str) -> Result<Vec<CategoryGuess>> {
        let best = backend.match_category_keyword_fuzzy(term).await?;
        Ok(best
            .map(|hit| {
                let confidence = match hit.match_type {
                    KeywordMatchType::Exact => Confidence::High,
                    KeywordMatchType::Fuzzy => Confidence::Medium,
                };
                CategoryGuess::new(hit.category, confidence)
            })
            .into_iter()
            .collect())
    }
}

pub struct ExactKeywordTier;

#[async_trait]
impl CategoryStrategy for ExactKeywordTier {
    fn name(&self) -> &'static str {
        "exact-keyword"
    }

    async fn attempt(&self, backend: &dyn SearchBackend, term: &str) -> Result<Vec<CategoryGuess>> {
        let hits = backend.match_category_keywords_exact(term).await?;
        Ok(hits
            .into_iter()
            .map(|h| CategoryGuess::new(h.category, Confidence::High))
            .collect())
    }
}

pub struct PatternTier;

#[async_trait]
impl CategoryStrategy for PatternTier {
    fn name(&self) -> &'static str {
        "pattern"
    }

    async fn attempt(&self, backend: &dyn SearchBackend, term: &str) -> Result<Vec<CategoryGuess>> {
        let hits = backend.match_category_patterns(term).await?;
        Ok(hits
            .into_iter()
            .map(|h| CategoryGuess::new(h.category, Confidence::Medium))
            .collect())
    }
}

pub struct PartialTier {
    pub min_len: usize,
}

#[async_trait]
impl CategoryStrategy for PartialTier {
    fn name(&self) -> &'static str {
        "partial"
    }

    fn applies_to(&self, term: &str) -> bool {
        term.chars().count() >= self.min_len
    }

    async fn attempt(&self, backend: &dyn SearchBackend, term: &str) -> Result<Vec<CategoryGuess>> {
        let hits = backend.match_category_partial(term).await?;
        Ok(hits
            .into_iter()
            .map(|h| CategoryGuess::new(h.category, Confidence::Low))
            .collect())
    }
}

// ============================================================================
// Detector
// ============================================================================

/// Add each guess whose category is not yet present. Existing entries keep
/// their confidence; unknown category keys are skipped.
pub fn merge_absent(found: &mut Vec<(Category, Confidence)>, guesses: Vec<CategoryGuess>) {
    for guess in guesses {
        let Some(category) = Category::from_key(&guess.category) else {
            warn!("Ignoring unknown category {:?}", guess.category);
            continue;
        };
        if !found.iter().any(|(c, _)| *c == category) {
            found.push((category, guess.confidence));
        }
    }
}

pub struct CategoryDetector {
    backend: Arc<dyn SearchBackend>,
    strategies: Vec<Box<dyn CategoryStrategy>>,
}

impl CategoryDetector {
    /// The standard four-tier cascade
    pub fn new(backend: Arc<dyn SearchBackend>, settings: &DetectorSettings) -> Self {
        Self::with_strategies(
            backend,
            vec![
                Box::new(FuzzyKeywordTier),
                Box::new(ExactKeywordTier),
                Box::new(PatternTier),
                Box::new(PartialTier {
                    min_len: settings.partial_match_min_len,
                }),
            ],
        )
    }

    pub fn with_strategies(
        backend: Arc<dyn SearchBackend>,
        strategies: Vec<Box<dyn CategoryStrategy>>,
    ) -> Self {
        Self {
            backend,
            strategies,
        }
    }

    /// Categories for an already-normalized term. A failing tier counts as
    /// finding nothing.
    pub async fn detect(&self, term: &str) -> Vec<CategoryMatch> {
        let mut found: Vec<(Category, Confidence)> = Vec::new();

        for strategy in &self.strategies {
            if !found.is_empty() {
                break;
            }
            if !strategy.applies_to(term) {
                debug!("Tier {} skipped for {:?}", strategy.name(), term);
                continue;
            }

            match strategy.attempt(self.backend.as_ref(), term).await {
                Ok(guesses) => {
                    debug!(
                        "Tier {} proposed {} categories for {:?}",
                        strategy.name(),
                        guesses.len(),
                        term
                    );
                    merge_absent(&mut found, guesses);
                }
                Err(e) => warn!("Tier {} failed for {:?}: {}", strategy.name(), term, e),
            }
        }

        found
            .into_iter()
            .map(|(category, confidence)| CategoryMatch::new(category, confidence))
            .collect()
    }
}
