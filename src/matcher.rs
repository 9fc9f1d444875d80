//! Existing-solution matcher
//!
//! Looks up stored solutions for a term, drops generic titles and hits with
//! unknown categories, classifies exact vs partial, and orders the survivors.

use crate::backend::{SearchBackend, SolutionHit};
use crate::categories::Category;
use crate::filter::GenericFilter;
use crate::normalize::normalize;
use crate::rank::compare_scores;
use crate::types::{CandidateSolution, MatchType};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ExistingSolutionMatcher {
    backend: Arc<dyn SearchBackend>,
    filter: Arc<GenericFilter>,
}

impl ExistingSolutionMatcher {
    pub fn new(backend: Arc<dyn SearchBackend>, filter: Arc<GenericFilter>) -> Self {
        Self { backend, filter }
    }

    /// Known solutions matching raw input. Backend failures yield an empty list.
    pub async fn find_matches(&self, input: &str) -> Vec<CandidateSolution> {
        let term = normalize(input);
        if term.is_empty() {
            return Vec::new();
        }
        self.find_normalized(&term).await
    }

    pub(crate) async fn find_normalized(&self, term: &str) -> Vec<CandidateSolution> {
        let hits = match self.backend.search_solutions_fuzzy(term).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Solution search failed for {:?}: {}", term, e);
                return Vec::new();
            }
        };

        let total = hits.len();
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<CandidateSolution> = hits
            .into_iter()
            .filter(|hit| seen.insert(hit.id.clone()))
            .filter_map(|hit| self.to_candidate(hit, term))
            .collect();

        sort_candidates(&mut candidates);
        debug!(
            "Solution search for {:?}: {} hits, {} kept",
            term,
            total,
            candidates.len()
        );
        candidates
    }

    fn to_candidate(&self, hit: SolutionHit, term: &str) -> Option<CandidateSolution> {
        if let Some(rejection) = self.filter.rejection(&hit.title, term) {
            debug!("Dropping {:?}: {}", hit.title, rejection);
            return None;
        }

        let Some(category) = Category::from_key(&hit.category) else {
            warn!("Dropping {:?}: unknown category {:?}", hit.title, hit.category);
            return None;
        };

        let match_type = if hit.match_score >= 1.0 || normalize(&hit.title) == term {
            MatchType::Exact
        } else {
            MatchType::Partial
        };

        Some(CandidateSolution {
            id: hit.id,
            title: hit.title,
            category,
            category_display_name: category.display_name().to_string(),
            match_type,
            match_score: Some(hit.match_score),
        })
    }
}

fn exact_rank(candidate: &CandidateSolution) -> u8 {
    match candidate.match_type {
        MatchType::Exact => 0,
        _ => 1,
    }
}

/// Score descending, then exact before partial, then shorter title first.
pub fn compare_candidates(a: &CandidateSolution, b: &CandidateSolution) -> Ordering {
    compare_scores(a.match_score, b.match_score)
        .then_with(|| exact_rank(a).cmp(&exact_rank(b)))
        .then_with(|| a.title.chars().count().cmp(&b.title.chars().count()))
}

pub fn sort_candidates(candidates: &mut [CandidateSolution]) {
    candidates.sort_by(compare_candidates);
}
