//! Detection pipeline
//!
//! `detect_from_input` normalizes the input, then runs the existing-solution
//! match, the category cascade, keyword autocomplete, and the
//! keyword-as-solution lookup concurrently. Each branch degrades to an empty
//! result on backend failure, so a request always yields a well-formed
//! [`DetectionResult`].

use crate::backend::SearchBackend;
use crate::cascade::CategoryDetector;
use crate::error::Result;
use crate::filter::GenericFilter;
use crate::keywords::{suggested_candidates, KeywordSuggestionMatcher};
use crate::matcher::ExistingSolutionMatcher;
use crate::normalize::normalize;
use crate::rank::aggregate;
use crate::rules::RuleSet;
use crate::settings::DetectorSettings;
use crate::specificity::{SpecificityCheck, SpecificityScorer, ValidationReport};
use crate::types::DetectionResult;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SolutionDetector {
    solutions: ExistingSolutionMatcher,
    categories: CategoryDetector,
    keywords: KeywordSuggestionMatcher,
    scorer: SpecificityScorer,
}

impl SolutionDetector {
    /// Built-in rules and default settings
    pub fn with_defaults(backend: Arc<dyn SearchBackend>) -> Result<Self> {
        Self::new(backend, &RuleSet::default(), &DetectorSettings::default())
    }

    pub fn new(
        backend: Arc<dyn SearchBackend>,
        rules: &RuleSet,
        settings: &DetectorSettings,
    ) -> Result<Self> {
        let filter = Arc::new(GenericFilter::new(rules)?);
        debug!("Compiled rules version {}", filter.version());

        Ok(Self {
            solutions: ExistingSolutionMatcher::new(backend.clone(), filter.clone()),
            categories: CategoryDetector::new(backend.clone(), settings),
            keywords: KeywordSuggestionMatcher::new(
                backend,
                filter.clone(),
                settings.keyword_score_floor,
            ),
            scorer: SpecificityScorer::new(rules, filter),
        })
    }

    /// Full classification of free-text input. Never fails; blank input
    /// returns an empty result without touching the backend.
    pub async fn detect_from_input(&self, text: &str) -> DetectionResult {
        let search_term = text.trim();
        let term = normalize(text);
        if term.is_empty() {
            debug!("Blank input, skipping detection");
            return DetectionResult::empty(search_term);
        }

        let (existing, categories, keyword_matches, likely) = tokio::join!(
            self.solutions.find_normalized(&term),
            self.categories.detect(&term),
            self.keywords.keyword_matches(&term),
            self.keywords.likely_solutions(&term),
        );

        let suggested = suggested_candidates(likely, &existing);
        let solutions = aggregate(existing, suggested, &term);

        info!(
            "Detected {:?}: {} solutions, {} categories, {} keywords",
            term,
            solutions.len(),
            categories.len(),
            keyword_matches.len()
        );

        DetectionResult {
            solutions,
            categories,
            search_term: search_term.to_string(),
            keyword_matches,
        }
    }

    pub fn check_specificity(&self, name: &str) -> SpecificityCheck {
        self.scorer.check_specificity(name)
    }

    pub fn validate_solutions<S: AsRef<str> + Sync>(&self, names: &[S]) -> ValidationReport {
        self.scorer.validate_solutions(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Contract, KeywordMatchType, StubBackend};
    use crate::categories::Category;
    use crate::types::{Confidence, MatchType};

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let stub = Arc::new(StubBackend::new().with_solution("1", "Melatonin", "sleep", 1.0));
        let detector = SolutionDetector::with_defaults(stub.clone()).unwrap();
        let result = detector.detect_from_input("").await;
        assert_eq!(result, DetectionResult::empty(""));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_backend_receives_normalized_term() {
        let stub = Arc::new(StubBackend::new());
        let detector = SolutionDetector::with_defaults(stub.clone()).unwrap();
        let result = detector.detect_from_input("  Melatonin   Gummies ").await;
        assert_eq!(result.search_term, "Melatonin   Gummies");
        assert!(stub
            .calls()
            .iter()
            .all(|(_, term)| term == "melatonin gummies"));
    }

    #[tokio::test]
    async fn test_search_term_is_trimmed_input() {
        let detector = SolutionDetector::with_defaults(Arc::new(StubBackend::new())).unwrap();
        let result = detector.detect_from_input("  Melatonin \n").await;
        assert_eq!(result.search_term, "Melatonin");
    }

    #[tokio::test]
    async fn test_merges_all_branches() {
        let stub = Arc::new(
            StubBackend::new()
                .with_solution("s1", "Melatonin", "supplements_vitamins", 1.0)
                .with_fuzzy_keyword("sleep", KeywordMatchType::Fuzzy)
                .with_autocomplete("melatonin", "supplements_vitamins", 0.9)
                .with_keyword_solution("melatonin", "supplements_vitamins", true)
                .with_keyword_solution("Melatonin spray 1mg", "supplements_vitamins", true),
        );
        let detector = SolutionDetector::with_defaults(stub).unwrap();
        let result = detector.detect_from_input("melatonin").await;

        let titles: Vec<&str> = result.solutions.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Melatonin", "Melatonin spray 1mg"]);
        assert_eq!(result.solutions[1].match_type, MatchType::Suggested);
        assert_eq!(result.categories[0].category, Category::Sleep);
        assert_eq!(result.categories[0].confidence, Confidence::Medium);
        assert_eq!(result.keyword_matches.len(), 1);
    }

    #[tokio::test]
    async fn test_total_backend_failure_is_well_formed() {
        let stub = Arc::new(
            StubBackend::new()
                .with_solution("s1", "Melatonin", "supplements_vitamins", 1.0)
                .failing(Contract::SolutionSearch)
                .failing(Contract::FuzzyKeyword)
                .failing(Contract::ExactKeyword)
                .failing(Contract::Pattern)
                .failing(Contract::Partial)
                .failing(Contract::KeywordSolutions)
                .failing(Contract::Autocomplete),
        );
        let detector = SolutionDetector::with_defaults(stub).unwrap();
        let result = detector.detect_from_input("Melatonin").await;
        assert!(result.is_empty());
        assert_eq!(result.search_term, "Melatonin");
    }

    #[test]
    fn test_specificity_passthrough() {
        let detector = SolutionDetector::with_defaults(Arc::new(StubBackend::new())).unwrap();
        assert!(detector.check_specificity("Couch to 5K running app").is_acceptable());
        let report = detector.validate_solutions(&["therapy"]);
        assert_eq!(report.stats.invalid, 1);
    }
}
