//! Search backend abstraction
//!
//! Fuzzy matching, indexing, and storage live behind [`SearchBackend`]; the
//! classifier only consumes these query contracts. [`CatalogBackend`] is an
//! in-memory implementation loaded from a JSON catalog; [`StubBackend`] serves
//! scripted responses to tests.

mod catalog;
mod stub;

pub use catalog::{default_catalog_path, Catalog, CatalogBackend};
pub use stub::{Contract, StubBackend};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Hit Types
// ============================================================================

/// A stored solution returned by fuzzy search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionHit {
    pub id: String,
    pub title: String,
    pub category: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMatchType {
    Exact,
    Fuzzy,
}

/// Best category for a term by fuzzy keyword match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywordHit {
    pub category: String,
    pub match_type: KeywordMatchType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryHit {
    pub category: String,
}

/// A category keyword that may itself be a solution name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSolutionHit {
    pub solution_name: String,
    pub category: String,
    pub is_likely_solution: bool,
}

/// Autocomplete suggestion at keyword level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub keyword: String,
    pub category: String,
    pub match_score: f64,
}

// ============================================================================
// SearchBackend
// ============================================================================

/// Query contracts consumed by the classifier. Every method takes the
/// normalized term.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Known solutions fuzzily matching the term
    async fn search_solutions_fuzzy(&self, term: &str) -> Result<Vec<SolutionHit>>;

    /// Single best category by fuzzy keyword match
    async fn match_category_keyword_fuzzy(&self, term: &str)
        -> Result<Option<CategoryKeywordHit>>;

    /// Categories whose keywords equal the term
    async fn match_category_keywords_exact(&self, term: &str) -> Result<Vec<CategoryHit>>;

    /// Categories whose patterns match the term
    async fn match_category_patterns(&self, term: &str) -> Result<Vec<CategoryHit>>;

    /// Categories whose keywords partially overlap the term
    async fn match_category_partial(&self, term: &str) -> Result<Vec<CategoryHit>>;

    /// Keywords that may be solution names not yet stored
    async fn search_keywords_as_solutions(&self, term: &str) -> Result<Vec<KeywordSolutionHit>>;

    /// Keyword-level autocomplete
    async fn search_keywords_autocomplete(&self, term: &str) -> Result<Vec<KeywordHit>>;
}
