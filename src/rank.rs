//! Result aggregation and ranking
//!
//! Stored matches and keyword-derived suggestions are merged into one list,
//! deduplicated by id, and ordered by relevance to the query:
//!
//! 1. title equals the query (case-insensitive)
//! 2. title starts with the query
//! 3. query appears at a word boundary (after a space or hyphen)
//! 4. higher match score; scored entries ahead of unscored ones
//! 5. alphabetical title
//!
//! Step 4 deviates from a plain "compare only when both are scored" rule: a
//! scored entry always sorts ahead of an unscored one in the same tier. The
//! plain rule is not transitive once scored and unscored entries mix, and
//! `sort_by` may panic on a comparator that is not a total order. So stored
//! matches precede keyword suggestions of equal relevance.

use crate::types::CandidateSolution;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Higher score first; any score outranks none.
pub(crate) fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn relevance_tier(title: &str, query: &str) -> u8 {
    if title == query {
        0
    } else if title.starts_with(query) {
        1
    } else if title.contains(&format!(" {}", query)) || title.contains(&format!("-{}", query)) {
        2
    } else {
        3
    }
}

/// Sort candidates in place by relevance to `query`.
pub fn rank_candidates(candidates: &mut [CandidateSolution], query: &str) {
    let query = query.trim().to_lowercase();
    candidates.sort_by(|a, b| {
        let (la, lb) = (a.title.to_lowercase(), b.title.to_lowercase());
        relevance_tier(&la, &query)
            .cmp(&relevance_tier(&lb, &query))
            .then_with(|| compare_scores(a.match_score, b.match_score))
            .then_with(|| la.cmp(&lb))
    });
}

/// Merge stored matches with suggestions, drop repeated ids, and rank.
pub fn aggregate(
    existing: Vec<CandidateSolution>,
    suggested: Vec<CandidateSolution>,
    query: &str,
) -> Vec<CandidateSolution> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<CandidateSolution> = existing
        .into_iter()
        .chain(suggested)
        .filter(|c| seen.insert(c.id.clone()))
        .collect();
    rank_candidates(&mut merged, query);
    merged
}
