//! Keyword suggestion matcher
//!
//! Two keyword-level lookups: autocomplete suggestions for the live search
//! box, and category keywords that look like solution names not yet in the
//! store. The latter are surfaced as `suggested` candidates.

use crate::backend::{KeywordSolutionHit, SearchBackend};
use crate::categories::Category;
use crate::filter::GenericFilter;
use crate::normalize::slugify;
use crate::types::{CandidateSolution, KeywordMatch, MatchType};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct KeywordSuggestionMatcher {
    backend: Arc<dyn SearchBackend>,
    filter: Arc<GenericFilter>,
    score_floor: f64,
}

/// A likely-solution keyword that survived filtering
#[derive(Debug, Clone, PartialEq)]
pub struct LikelySolution {
    pub name: String,
    pub category: Category,
}

impl KeywordSuggestionMatcher {
    pub fn new(backend: Arc<dyn SearchBackend>, filter: Arc<GenericFilter>, score_floor: f64) -> Self {
        Self {
            backend,
            filter,
            score_floor,
        }
    }

    /// Autocomplete suggestions scoring strictly above the floor. Keywords
    /// that are bare generic terms are dropped like any other candidate.
    pub async fn keyword_matches(&self, term: &str) -> Vec<KeywordMatch> {
        let hits = match self.backend.search_keywords_autocomplete(term).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Keyword autocomplete failed for {:?}: {}", term, e);
                return Vec::new();
            }
        };

        let mut seen: HashSet<String> = HashSet::new();
        hits.into_iter()
            .filter(|hit| hit.match_score > self.score_floor)
            .filter(|hit| match self.filter.rejection(&hit.keyword, term) {
                Some(rejection) => {
                    debug!("Dropping autocomplete {:?}: {}", hit.keyword, rejection);
                    false
                }
                None => true,
            })
            .filter_map(|hit| {
                let category = Category::from_key(&hit.category)?;
                seen.insert(hit.keyword.to_lowercase()).then(|| KeywordMatch {
                    category_display_name: category.display_name().to_string(),
                    keyword: hit.keyword,
                    category,
                    match_score: hit.match_score,
                })
            })
            .collect()
    }

    /// Keywords flagged as likely solution names that pass the generic filter
    pub async fn likely_solutions(&self, term: &str) -> Vec<LikelySolution> {
        let hits = match self.backend.search_keywords_as_solutions(term).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Keyword-as-solution search failed for {:?}: {}", term, e);
                return Vec::new();
            }
        };

        let total = hits.len();
        let likely: Vec<LikelySolution> = hits
            .into_iter()
            .filter(|hit| hit.is_likely_solution)
            .filter_map(|hit| self.accept(hit, term))
            .collect();
        debug!(
            "Keyword-as-solution search for {:?}: {} hits, {} likely",
            term,
            total,
            likely.len()
        );
        likely
    }

    fn accept(&self, hit: KeywordSolutionHit, term: &str) -> Option<LikelySolution> {
        if let Some(rejection) = self.filter.rejection(&hit.solution_name, term) {
            debug!("Dropping keyword {:?}: {}", hit.solution_name, rejection);
            return None;
        }
        let category = Category::from_key(&hit.category)?;
        Some(LikelySolution {
            name: hit.solution_name,
            category,
        })
    }
}

/// Turn likely-solution keywords into `suggested` candidates, skipping any
/// whose name case-insensitively equals an existing title or an earlier keyword.
pub fn suggested_candidates(
    likely: Vec<LikelySolution>,
    existing: &[CandidateSolution],
) -> Vec<CandidateSolution> {
    let mut taken: HashSet<String> = existing.iter().map(|c| c.title.to_lowercase()).collect();

    likely
        .into_iter()
        .filter(|l| taken.insert(l.name.to_lowercase()))
        .map(|l| CandidateSolution {
            id: format!("keyword:{}:{}", l.category.key(), slugify(&l.name)),
            category_display_name: l.category.display_name().to_string(),
            title: l.name,
            category: l.category,
            match_type: MatchType::Suggested,
            match_score: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Contract, StubBackend};
    use crate::rules::RuleSet;

    fn matcher(stub: StubBackend) -> KeywordSuggestionMatcher {
        let filter = Arc::new(GenericFilter::new(&RuleSet::default()).unwrap());
        KeywordSuggestionMatcher::new(Arc::new(stub), filter, 0.5)
    }

    fn existing(title: &str) -> CandidateSolution {
        CandidateSolution {
            id: "s1".to_string(),
            title: title.to_string(),
            category: Category::SupplementsVitamins,
            category_display_name: "Supplements & Vitamins".to_string(),
            match_type: MatchType::Exact,
            match_score: Some(1.0),
        }
    }

    #[tokio::test]
    async fn test_keyword_matches_require_score_above_floor() {
        let m = matcher(
            StubBackend::new()
                .with_autocomplete("sleep app", "apps_software", 0.8)
                .with_autocomplete("sleep", "sleep", 0.5)
                .with_autocomplete("sleepytime tea", "natural_remedies", 0.51),
        );
        let matches = m.keyword_matches("sleep").await;
        let keywords: Vec<&str> = matches.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["sleep app", "sleepytime tea"]);
        assert_eq!(matches[0].category_display_name, "Apps & Software");
    }

    #[tokio::test]
    async fn test_keyword_matches_drop_unknown_categories_and_duplicates() {
        let m = matcher(
            StubBackend::new()
                .with_autocomplete("tarot", "divination", 0.9)
                .with_autocomplete("Sleep App", "apps_software", 0.9)
                .with_autocomplete("sleep app", "apps_software", 0.8),
        );
        let matches = m.keyword_matches("sleep").await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].keyword, "Sleep App");
    }

    #[tokio::test]
    async fn test_keyword_matches_drop_generic_terms() {
        let m = matcher(
            StubBackend::new()
                .with_autocomplete("therapy", "therapists_counselors", 0.9)
                .with_autocomplete("supplements", "supplements_vitamins", 0.9)
                .with_autocomplete("sleep app", "apps_software", 0.9),
        );
        let matches = m.keyword_matches("therapy").await;
        let keywords: Vec<&str> = matches.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["sleep app"]);
    }

    #[tokio::test]
    async fn test_keyword_failure_is_empty() {
        let m = matcher(
            StubBackend::new()
                .with_autocomplete("sleep app", "apps_software", 0.8)
                .failing(Contract::Autocomplete),
        );
        assert!(m.keyword_matches("sleep").await.is_empty());
    }

    #[tokio::test]
    async fn test_likely_solutions_filtered() {
        let m = matcher(
            StubBackend::new()
                .with_keyword_solution("Ashwagandha KSM-66", "supplements_vitamins", true)
                .with_keyword_solution("supplements", "supplements_vitamins", true)
                .with_keyword_solution("insomnia", "sleep", false)
                .with_keyword_solution("Reiki level 2", "energy_work", true),
        );
        let likely = m.likely_solutions("ashwagandha").await;
        assert_eq!(
            likely,
            vec![LikelySolution {
                name: "Ashwagandha KSM-66".to_string(),
                category: Category::SupplementsVitamins,
            }]
        );
    }

    #[test]
    fn test_suggested_candidates_skip_existing_titles() {
        let likely = vec![
            LikelySolution {
                name: "melatonin".to_string(),
                category: Category::SupplementsVitamins,
            },
            LikelySolution {
                name: "Magnesium Glycinate".to_string(),
                category: Category::SupplementsVitamins,
            },
            LikelySolution {
                name: "magnesium glycinate".to_string(),
                category: Category::SupplementsVitamins,
            },
        ];
        let suggestions = suggested_candidates(likely, &[existing("Melatonin")]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "Magnesium Glycinate");
        assert_eq!(suggestions[0].match_type, MatchType::Suggested);
        assert_eq!(suggestions[0].match_score, None);
        assert_eq!(
            suggestions[0].id,
            "keyword:supplements_vitamins:magnesium-glycinate"
        );
    }
}
