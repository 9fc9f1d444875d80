//! Generic / category-pattern filter
//!
//! Decides whether a candidate title names a specific solution or merely a
//! category ("sleep medications", "therapy"). Checks run in a fixed order:
//!
//! 1. exact blocklist
//! 2. broad-query special case ("vitamin" query rejects every *vitamin* title)
//! 3. allowed exceptions ("Vitamin D", "B12", "Omega-3") accept outright
//! 4. category suffix/prefix patterns
//! 5. therapy titles need a specific indicator
//! 6. single generic words, after de-pluralization

use crate::error::{ClassifierError, Result};
use crate::rules::RuleSet;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

lazy_static! {
    static ref RE_THERAPY: Regex = Regex::new(r"(?i)therap(y|ies|ist)").unwrap();
    static ref RE_DIGIT_OR_HYPHEN: Regex = Regex::new(r"[0-9-]").unwrap();
    static ref RE_CAMEL_CASE: Regex = Regex::new(r"[a-z][A-Z]").unwrap();
    static ref RE_TRADEMARK: Regex = Regex::new(r"[®™]").unwrap();
}

/// Why a title was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Rejection {
    Empty,
    GenericTerm,
    BroadQuery(String),
    CategoryPattern(String),
    UnqualifiedTherapy,
    SingleWordGeneric,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Empty => write!(f, "title is empty"),
            Rejection::GenericTerm => write!(f, "title is a generic term"),
            Rejection::BroadQuery(term) => {
                write!(f, "query {:?} is too broad to surface this title", term)
            }
            Rejection::CategoryPattern(pattern) => {
                write!(f, "title matches category pattern {}", pattern)
            }
            Rejection::UnqualifiedTherapy => {
                write!(f, "therapy title lacks a specific brand, number, or mark")
            }
            Rejection::SingleWordGeneric => write!(f, "title is a single generic word"),
        }
    }
}

/// Compiled, immutable form of a [`RuleSet`].
#[derive(Debug)]
pub struct GenericFilter {
    version: String,
    generic_terms: HashSet<String>,
    single_word_generics: HashSet<String>,
    broad_query_terms: Vec<String>,
    suffix_patterns: Vec<Regex>,
    allowed_exceptions: Vec<Regex>,
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(&format!("(?i){}", p)).map_err(|e| ClassifierError::InvalidPattern {
                pattern: p.clone(),
                source: e,
            })
        })
        .collect()
}

/// "therapies" -> "therapy", "supplements" -> "supplement"
fn singular(word: &str) -> &str {
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        &word[..word.len() - 1]
    } else {
        word
    }
}

impl GenericFilter {
    pub fn new(rules: &RuleSet) -> Result<Self> {
        Ok(Self {
            version: rules.version.clone(),
            generic_terms: rules.generic_terms.iter().cloned().collect(),
            single_word_generics: rules.single_word_generics.iter().cloned().collect(),
            broad_query_terms: rules.broad_query_terms.clone(),
            suffix_patterns: compile_all(&rules.category_suffix_patterns)?,
            allowed_exceptions: compile_all(&rules.allowed_exceptions)?,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Exact blocklist membership of an already-lowercased string.
    pub fn is_generic_term(&self, lower: &str) -> bool {
        self.generic_terms.contains(lower)
    }

    pub fn accepts(&self, title: &str, search_term: &str) -> bool {
        self.rejection(title, search_term).is_none()
    }

    /// First rule that rejects `title` for a query of `search_term` (already
    /// normalized), or `None` if the title is an acceptable specific name.
    pub fn rejection(&self, title: &str, search_term: &str) -> Option<Rejection> {
        let trimmed = title.trim();
        let lower = trimmed.to_lowercase();

        if lower.is_empty() {
            return Some(Rejection::Empty);
        }

        if self.generic_terms.contains(&lower) {
            return Some(Rejection::GenericTerm);
        }

        if let Some(broad) = self
            .broad_query_terms
            .iter()
            .find(|t| search_term == t.as_str())
        {
            // every broad query term is matched on its stem ("vitamins" -> "vitamin")
            if lower.contains(singular(broad)) {
                return Some(Rejection::BroadQuery(broad.clone()));
            }
        }

        if self.allowed_exceptions.iter().any(|re| re.is_match(&lower)) {
            return None;
        }

        if let Some(re) = self.suffix_patterns.iter().find(|re| re.is_match(&lower)) {
            return Some(Rejection::CategoryPattern(
                re.as_str().trim_start_matches("(?i)").to_string(),
            ));
        }

        if RE_THERAPY.is_match(trimmed) && !has_specific_indicator(trimmed) {
            return Some(Rejection::UnqualifiedTherapy);
        }

        if !lower.contains(' ') && !lower.contains('-') {
            let word = lower.trim_end_matches(|c: char| !c.is_alphanumeric());
            let stem = word.strip_suffix("ies").map(|s| format!("{}y", s));
            let single = stem.as_deref().unwrap_or_else(|| singular(word));
            if self.single_word_generics.contains(word) || self.single_word_generics.contains(single)
            {
                return Some(Rejection::SingleWordGeneric);
            }
        }

        None
    }
}

/// A digit or hyphen, CamelCase brand spelling, or a registered/trademark glyph.
fn has_specific_indicator(title: &str) -> bool {
    RE_DIGIT_OR_HYPHEN.is_match(title)
        || RE_CAMEL_CASE.is_match(title)
        || RE_TRADEMARK.is_match(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> GenericFilter {
        GenericFilter::new(&RuleSet::default()).unwrap()
    }

    #[test]
    fn test_blocklist_rejects_exact_terms() {
        let f = filter();
        assert_eq!(f.rejection("Therapy", "therapy"), Some(Rejection::GenericTerm));
        assert_eq!(f.rejection(" CBT ", "cbt"), Some(Rejection::GenericTerm));
        assert_eq!(f.rejection("", "x"), Some(Rejection::Empty));
    }

    #[test]
    fn test_therapy_alone_rejected_for_any_query() {
        let f = filter();
        for query in ["therapy", "anxiety", "", "talk"] {
            assert!(!f.accepts("Therapy", query));
        }
    }

    #[test]
    fn test_allowed_exception_beats_suffix_pattern() {
        let f = filter();
        assert!(f.accepts("Vitamin D", "vitamin d"));
        assert!(f.accepts("B12", "b12"));
        assert!(f.accepts("Omega-3", "omega"));
        assert!(f.accepts("Vitamin D3 supplements", "vitamin d"));
    }

    #[test]
    fn test_broad_vitamin_query_rejects_all_vitamin_titles() {
        let f = filter();
        for query in ["vitamin", "vitamins"] {
            assert_eq!(
                f.rejection("Vitamin D", query),
                Some(Rejection::BroadQuery(query.to_string()))
            );
            assert!(!f.accepts("Nature Made Vitamin B12", query));
            assert!(!f.accepts("Multivitamin Gummies", query));
        }
        // titles without the stem are unaffected
        assert!(f.accepts("Omega-3", "vitamin"));
    }

    #[test]
    fn test_category_suffix_patterns() {
        let f = filter();
        let rejected = [
            "Sleep medications",
            "Anxiety drugs",
            "Herbal supplements",
            "Magnesium supplementation",
            "Cognitive behavioral treatments",
            "Grief counseling",
            "Couples counseling sessions",
            "Core exercises",
            "Home workouts",
            "Natural remedies",
            "General anxiety plan",
            "Standard care",
            "Breathing strategy",
            "Elimination protocol",
            "Retinol serum",
            "Anti-inflammatory diet",
            "Non stimulant",
            "Painkiller (non-opioid)",
        ];
        for title in rejected {
            assert!(
                matches!(f.rejection(title, "q"), Some(Rejection::CategoryPattern(_))),
                "{} should match a category pattern",
                title
            );
        }
    }

    #[test]
    fn test_therapy_requires_specific_indicator() {
        let f = filter();
        assert_eq!(
            f.rejection("Online therapist chat", "q"),
            Some(Rejection::UnqualifiedTherapy)
        );
        assert!(f.accepts("BetterHelp therapist chat", "q"));
        assert!(f.accepts("Talkspace® therapy plan", "q"));
        assert!(f.accepts("12-week therapy course", "q"));
    }

    #[test]
    fn test_single_word_generics_depluralized() {
        let f = filter();
        assert_eq!(f.rejection("Pilates", "q"), Some(Rejection::SingleWordGeneric));
        assert_eq!(f.rejection("Fastings", "q"), Some(Rejection::SingleWordGeneric));
        assert_eq!(f.rejection("Remedies!", "q"), Some(Rejection::SingleWordGeneric));
        assert!(f.accepts("Headspace", "q"));
    }

    #[test]
    fn test_specific_names_pass() {
        let f = filter();
        for title in [
            "Nature Made Vitamin D3 2000 IU",
            "Couch to 5K running app",
            "Melatonin 3mg",
            "Wim Hof breathing",
        ] {
            assert!(f.accepts(title, &title.to_lowercase()), "{} should pass", title);
        }
    }

    #[test]
    fn test_invalid_pattern_fails_construction() {
        let rules = RuleSet {
            category_suffix_patterns: vec!["(unclosed".to_string()],
            ..RuleSet::default()
        };
        let err = GenericFilter::new(&rules).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidPattern { .. }));
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("supplements"), "supplement");
        assert_eq!(singular("stress"), "stress");
        assert_eq!(singular("yes"), "yes");
    }
}
