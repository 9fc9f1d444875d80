//! Scripted backend for tests
//!
//! Each contract returns a canned response configured up front. Contracts can
//! be switched to fail, and every call is recorded so tests can assert which
//! collaborators a request touched.

use super::{
    CategoryHit, CategoryKeywordHit, KeywordHit, KeywordMatchType, KeywordSolutionHit,
    SearchBackend, SolutionHit,
};
use crate::error::{ClassifierError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// One query contract of [`SearchBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contract {
    SolutionSearch,
    FuzzyKeyword,
    ExactKeyword,
    Pattern,
    Partial,
    KeywordSolutions,
    Autocomplete,
}

#[derive(Debug, Default)]
pub struct StubBackend {
    solutions: Vec<SolutionHit>,
    fuzzy_keyword: Option<CategoryKeywordHit>,
    exact_keywords: Vec<CategoryHit>,
    patterns: Vec<CategoryHit>,
    partial: Vec<CategoryHit>,
    keyword_solutions: Vec<KeywordSolutionHit>,
    autocomplete: Vec<KeywordHit>,
    failing: HashSet<Contract>,
    calls: Mutex<Vec<(Contract, String)>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solution(mut self, id: &str, title: &str, category: &str, score: f64) -> Self {
        self.solutions.push(SolutionHit {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            match_score: score,
        });
        self
    }

    pub fn with_fuzzy_keyword(mut self, category: &str, match_type: KeywordMatchType) -> Self {
        self.fuzzy_keyword = Some(CategoryKeywordHit {
            category: category.to_string(),
            match_type,
        });
        self
    }

    pub fn with_exact_keyword(mut self, category: &str) -> Self {
        self.exact_keywords.push(hit(category));
        self
    }

    pub fn with_pattern(mut self, category: &str) -> Self {
        self.patterns.push(hit(category));
        self
    }

    pub fn with_partial(mut self, category: &str) -> Self {
        self.partial.push(hit(category));
        self
    }

    pub fn with_keyword_solution(mut self, name: &str, category: &str, likely: bool) -> Self {
        self.keyword_solutions.push(KeywordSolutionHit {
            solution_name: name.to_string(),
            category: category.to_string(),
            is_likely_solution: likely,
        });
        self
    }

    pub fn with_autocomplete(mut self, keyword: &str, category: &str, score: f64) -> Self {
        self.autocomplete.push(KeywordHit {
            keyword: keyword.to_string(),
            category: category.to_string(),
            match_score: score,
        });
        self
    }

    /// Make `contract` return `BackendUnavailable`
    pub fn failing(mut self, contract: Contract) -> Self {
        self.failing.insert(contract);
        self
    }

    /// Contracts called so far, with the term each received
    pub fn calls(&self) -> Vec<(Contract, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn was_called(&self, contract: Contract) -> bool {
        self.calls().iter().any(|(c, _)| *c == contract)
    }

    fn answer<T: Clone>(&self, contract: Contract, term: &str, value: &T) -> Result<T> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((contract, term.to_string()));
        }
        if self.failing.contains(&contract) {
            return Err(ClassifierError::BackendUnavailable(format!(
                "{:?} scripted to fail",
                contract
            )));
        }
        Ok(value.clone())
    }
}

fn hit(category: &str) -> CategoryHit {
    CategoryHit {
        category: category.to_string(),
    }
}

#[async_trait]
impl SearchBackend for StubBackend {
    async fn search_solutions_fuzzy(&self, term: &str) -> Result<Vec<SolutionHit>> {
        self.answer(Contract::SolutionSearch, term, &self.solutions)
    }

    async fn match_category_keyword_fuzzy(
        &self,
        term: &str,
    ) -> Result<Option<CategoryKeywordHit>> {
        self.answer(Contract::FuzzyKeyword, term, &self.fuzzy_keyword)
    }

    async fn match_category_keywords_exact(&self, term: &str) -> Result<Vec<CategoryHit>> {
        self.answer(Contract::ExactKeyword, term, &self.exact_keywords)
    }

    async fn match_category_patterns(&self, term: &str) -> Result<Vec<CategoryHit>> {
        self.answer(Contract::Pattern, term, &self.patterns)
    }

    async fn match_category_partial(&self, term: &str) -> Result<Vec<CategoryHit>> {
        self.answer(Contract::Partial, term, &self.partial)
    }

    async fn search_keywords_as_solutions(&self, term: &str) -> Result<Vec<KeywordSolutionHit>> {
        self.answer(Contract::KeywordSolutions, term, &self.keyword_solutions)
    }

    async fn search_keywords_autocomplete(&self, term: &str) -> Result<Vec<KeywordHit>> {
        self.answer(Contract::Autocomplete, term, &self.autocomplete)
    }
}
