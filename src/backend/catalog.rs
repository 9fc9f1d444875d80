//! In-memory catalog backend
//!
//! Serves every [`SearchBackend`] contract from a JSON catalog file using
//! simple deterministic scoring:
//!
//! - exact: 1.0
//! - prefix: 0.8
//! - word-boundary containment: 0.7
//! - substring: 0.6
//! - token overlap: up to 0.5

use super::{
    CategoryHit, CategoryKeywordHit, KeywordHit, KeywordMatchType, KeywordSolutionHit,
    SearchBackend, SolutionHit,
};
use crate::error::{ClassifierError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog file name
const CATALOG_FILE: &str = "catalog.json";

/// Config directory name under the home directory
const CONFIG_DIR: &str = ".solution-classifier";

/// Solution hits below this similarity are not returned
const SOLUTION_SCORE_FLOOR: f64 = 0.3;

/// Fuzzy keyword matches below this similarity are ignored
const KEYWORD_SCORE_FLOOR: f64 = 0.6;

const MAX_SOLUTION_HITS: usize = 20;
const MAX_AUTOCOMPLETE_HITS: usize = 10;

// ============================================================================
// Catalog Format
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub generated: String,

    #[serde(default)]
    pub solutions: Vec<CatalogSolution>,

    /// Category keywords, some of which double as solution names
    #[serde(default)]
    pub keywords: Vec<CatalogKeyword>,

    #[serde(default)]
    pub patterns: Vec<CatalogPattern>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSolution {
    pub id: String,
    pub title: String,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogKeyword {
    pub keyword: String,
    pub category: String,
    #[serde(default)]
    pub is_likely_solution: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPattern {
    pub pattern: String,
    pub category: String,
}

// ============================================================================
// Backend
// ============================================================================

pub struct CatalogBackend {
    solutions: Vec<CatalogSolution>,
    keywords: Vec<CatalogKeyword>,
    patterns: Vec<(Regex, String)>,
}

/// `~/.solution-classifier/catalog.json`
pub fn default_catalog_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ClassifierError::NoHomeDir)?;
    Ok(home.join(CONFIG_DIR).join(CATALOG_FILE))
}

impl CatalogBackend {
    pub fn new(catalog: Catalog) -> Result<Self> {
        let patterns = catalog
            .patterns
            .into_iter()
            .map(|p| {
                Regex::new(&format!("(?i){}", p.pattern))
                    .map(|re| (re, p.category.clone()))
                    .map_err(|e| ClassifierError::InvalidPattern {
                        pattern: p.pattern.clone(),
                        source: e,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let keywords = catalog
            .keywords
            .into_iter()
            .map(|k| CatalogKeyword {
                keyword: k.keyword.trim().to_lowercase(),
                ..k
            })
            .collect();

        Ok(Self {
            solutions: catalog.solutions,
            keywords,
            patterns,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ClassifierError::CatalogNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ClassifierError::CatalogRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let catalog: Catalog = serde_json::from_str(&content)
            .map_err(|e| ClassifierError::CatalogParse(e.to_string()))?;

        Self::new(catalog)
    }

    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }

    /// Keywords scored against `term`, with the term-contains-keyword case
    /// counted as a word-boundary hit.
    fn scored_keywords<'a>(&'a self, term: &'a str) -> impl Iterator<Item = (&'a CatalogKeyword, f64)> {
        self.keywords.iter().map(move |k| {
            let mut score = similarity(term, &k.keyword);
            if score < 0.7 && contains_word(term, &k.keyword) {
                score = 0.7;
            }
            (k, score)
        })
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    !needle.is_empty()
        && haystack.match_indices(needle).any(|(i, _)| {
            let before_ok = haystack[..i]
                .chars()
                .next_back()
                .map_or(true, |c| c == ' ' || c == '-');
            let after_ok = haystack[i + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            before_ok && after_ok
        })
}

/// Similarity of `text` to an already-normalized `term`
pub(crate) fn similarity(term: &str, text: &str) -> f64 {
    let text = text.to_lowercase();
    if term.is_empty() {
        return 0.0;
    }
    if text == term {
        return 1.0;
    }
    if text.starts_with(term) {
        return 0.8;
    }
    if text.contains(&format!(" {}", term)) || text.contains(&format!("-{}", term)) {
        return 0.7;
    }
    if text.contains(term) {
        return 0.6;
    }

    let words: Vec<&str> = text.split(|c: char| c == ' ' || c == '-').collect();
    let tokens: Vec<&str> = term.split(' ').collect();
    let shared = tokens.iter().filter(|t| words.contains(*t)).count();
    0.5 * shared as f64 / tokens.len() as f64
}

fn dedup_categories(categories: impl Iterator<Item = String>) -> Vec<CategoryHit> {
    let mut seen: Vec<String> = Vec::new();
    for category in categories {
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen.into_iter().map(|category| CategoryHit { category }).collect()
}

#[async_trait]
impl SearchBackend for CatalogBackend {
    async fn search_solutions_fuzzy(&self, term: &str) -> Result<Vec<SolutionHit>> {
        let mut hits: Vec<SolutionHit> = self
            .solutions
            .iter()
            .map(|s| (s, similarity(term, &s.title)))
            .filter(|(_, score)| *score >= SOLUTION_SCORE_FLOOR)
            .map(|(s, score)| SolutionHit {
                id: s.id.clone(),
                title: s.title.clone(),
                category: s.category.clone(),
                match_score: score,
            })
            .collect();
        hits.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        hits.truncate(MAX_SOLUTION_HITS);
        Ok(hits)
    }

    async fn match_category_keyword_fuzzy(
        &self,
        term: &str,
    ) -> Result<Option<CategoryKeywordHit>> {
        let mut best: Option<(&CatalogKeyword, f64)> = None;
        for (keyword, score) in self.scored_keywords(term) {
            if score >= KEYWORD_SCORE_FLOOR && best.map_or(true, |(_, s)| score > s) {
                best = Some((keyword, score));
            }
        }
        Ok(best.map(|(k, score)| CategoryKeywordHit {
            category: k.category.clone(),
            match_type: if score >= 1.0 {
                KeywordMatchType::Exact
            } else {
                KeywordMatchType::Fuzzy
            },
        }))
    }

    async fn match_category_keywords_exact(&self, term: &str) -> Result<Vec<CategoryHit>> {
        Ok(dedup_categories(
            self.keywords
                .iter()
                .filter(|k| k.keyword == term)
                .map(|k| k.category.clone()),
        ))
    }

    async fn match_category_patterns(&self, term: &str) -> Result<Vec<CategoryHit>> {
        Ok(dedup_categories(
            self.patterns
                .iter()
                .filter(|(re, _)| re.is_match(term))
                .map(|(_, category)| category.clone()),
        ))
    }

    async fn match_category_partial(&self, term: &str) -> Result<Vec<CategoryHit>> {
        Ok(dedup_categories(
            self.keywords
                .iter()
                .filter(|k| k.keyword.contains(term) || term.contains(k.keyword.as_str()))
                .map(|k| k.category.clone()),
        ))
    }

    async fn search_keywords_as_solutions(&self, term: &str) -> Result<Vec<KeywordSolutionHit>> {
        Ok(self
            .keywords
            .iter()
            .filter(|k| similarity(term, &k.keyword) >= KEYWORD_SCORE_FLOOR)
            .map(|k| KeywordSolutionHit {
                solution_name: k.keyword.clone(),
                category: k.category.clone(),
                is_likely_solution: k.is_likely_solution,
            })
            .collect())
    }

    async fn search_keywords_autocomplete(&self, term: &str) -> Result<Vec<KeywordHit>> {
        let mut hits: Vec<KeywordHit> = self
            .scored_keywords(term)
            .filter(|(_, score)| *score > 0.0)
            .map(|(k, score)| KeywordHit {
                keyword: k.keyword.clone(),
                category: k.category.clone(),
                match_score: score,
            })
            .collect();
        hits.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        hits.truncate(MAX_AUTOCOMPLETE_HITS);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "version": "1",
        "solutions": [
            {"id": "s1", "title": "Melatonin", "category": "supplements_vitamins"},
            {"id": "s2", "title": "Melatonin Gummies 5mg", "category": "supplements_vitamins"},
            {"id": "s3", "title": "Calm", "category": "apps_software"}
        ],
        "keywords": [
            {"keyword": "Melatonin", "category": "supplements_vitamins", "is_likely_solution": true},
            {"keyword": "sleep app", "category": "apps_software"},
            {"keyword": "sleep", "category": "sleep"}
        ],
        "patterns": [
            {"pattern": "\\bmg\\b", "category": "supplements_vitamins"},
            {"pattern": "\\bapp\\b", "category": "apps_software"}
        ]
    }"#;

    fn backend() -> CatalogBackend {
        CatalogBackend::new(serde_json::from_str(CATALOG).unwrap()).unwrap()
    }

    #[test]
    fn test_similarity_tiers() {
        assert_eq!(similarity("melatonin", "Melatonin"), 1.0);
        assert_eq!(similarity("mela", "Melatonin"), 0.8);
        assert_eq!(similarity("gummies", "Melatonin Gummies"), 0.7);
        assert_eq!(similarity("tonin", "Melatonin"), 0.6);
        assert_eq!(similarity("nightly gummies", "Melatonin Gummies"), 0.25);
        assert_eq!(similarity("", "Melatonin"), 0.0);
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("i take melatonin nightly", "melatonin"));
        assert!(!contains_word("melatonins", "melatonin"));
        assert!(!contains_word("supermelatonin", "melatonin"));
    }

    #[tokio::test]
    async fn test_search_solutions_sorted_by_score() {
        let hits = backend().search_solutions_fuzzy("melatonin").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "s1");
        assert_eq!(hits[0].match_score, 1.0);
        assert_eq!(hits[1].match_score, 0.8);
    }

    #[tokio::test]
    async fn test_fuzzy_keyword_match_types() {
        let b = backend();
        let exact = b.match_category_keyword_fuzzy("melatonin").await.unwrap().unwrap();
        assert_eq!(exact.match_type, KeywordMatchType::Exact);
        assert_eq!(exact.category, "supplements_vitamins");

        let fuzzy = b
            .match_category_keyword_fuzzy("i take melatonin nightly")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fuzzy.match_type, KeywordMatchType::Fuzzy);

        assert!(b.match_category_keyword_fuzzy("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exact_pattern_and_partial_matches() {
        let b = backend();
        let exact = b.match_category_keywords_exact("sleep").await.unwrap();
        assert_eq!(exact, vec![CategoryHit { category: "sleep".to_string() }]);

        let patterns = b.match_category_patterns("magnesium 400 mg").await.unwrap();
        assert_eq!(patterns[0].category, "supplements_vitamins");

        let partial = b.match_category_partial("sle").await.unwrap();
        assert_eq!(partial.len(), 2);
    }

    #[tokio::test]
    async fn test_keyword_searches() {
        let b = backend();
        let as_solutions = b.search_keywords_as_solutions("melatonin").await.unwrap();
        assert_eq!(as_solutions.len(), 1);
        assert!(as_solutions[0].is_likely_solution);

        let auto = b.search_keywords_autocomplete("sleep").await.unwrap();
        assert_eq!(auto[0].keyword, "sleep");
        assert_eq!(auto[0].match_score, 1.0);
        assert_eq!(auto[1].keyword, "sleep app");
    }

    #[test]
    fn test_load_missing_catalog() {
        let err = CatalogBackend::load(Path::new("/nonexistent/catalog.json"))
            .err()
            .unwrap();
        assert!(matches!(err, ClassifierError::CatalogNotFound(_)));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let b = CatalogBackend::load(file.path()).unwrap();
        assert_eq!(b.solution_count(), 3);
    }

    #[test]
    fn test_invalid_catalog_pattern() {
        let catalog: Catalog = serde_json::from_str(
            r#"{"patterns": [{"pattern": "(oops", "category": "sleep"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            CatalogBackend::new(catalog),
            Err(ClassifierError::InvalidPattern { .. })
        ));
    }
}
