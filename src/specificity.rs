//! Specificity scoring for proposed solution names
//!
//! Gates *new* names before they are accepted into the catalog. A name must be
//! specific (not a generic term, carries at least one concrete signal, sane
//! length), googleable (proper noun, number, or author), and must pass the
//! generic filter applied to itself.

use crate::filter::GenericFilter;
use crate::normalize::normalize;
use crate::rules::RuleSet;
use chrono::Utc;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Names shorter than this are never specific
const MIN_NAME_CHARS: usize = 5;

/// Names with more words than this read as descriptions, not names
const MAX_NAME_WORDS: usize = 10;

lazy_static! {
    static ref RE_DIGIT: Regex = Regex::new(r"\d").unwrap();
    static ref RE_APP: Regex = Regex::new(r"(?i)\bapp\b").unwrap();
    static ref RE_AUTHORSHIP: Regex = Regex::new(r"\bby [A-Z]").unwrap();
    static ref RE_PROTOCOL: Regex = Regex::new(
        r"(?i)\b\d+\s*-\s*\d+\b|\b\d+\s*x\s*\d+\b|\b\d+\s*(minute|hour|day|week)s?\b"
    )
    .unwrap();
}

// ============================================================================
// Output Types
// ============================================================================

/// The five concrete-naming signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificityIndicators {
    pub has_digit: bool,
    pub has_proper_noun: bool,
    pub has_brand: bool,
    pub has_authorship: bool,
    pub has_protocol: bool,
}

impl SpecificityIndicators {
    pub fn score(&self) -> u8 {
        [
            self.has_digit,
            self.has_proper_noun,
            self.has_brand,
            self.has_authorship,
            self.has_protocol,
        ]
        .iter()
        .filter(|&&b| b)
        .count() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificityCheck {
    pub is_specific: bool,
    pub is_googleable: bool,
    pub passes_filters: bool,
    pub specificity_score: u8,
    pub indicators: SpecificityIndicators,
    pub failure_reasons: Vec<String>,
}

impl SpecificityCheck {
    /// Final verdict: specific, googleable, and passes the generic filter.
    pub fn is_acceptable(&self) -> bool {
        self.is_specific && self.is_googleable && self.passes_filters
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidSolution {
    pub name: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Fraction of names accepted (0.0 to 1.0)
    pub pass_rate: f64,
    pub rules_version: String,
    pub checked_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: Vec<String>,
    pub invalid: Vec<InvalidSolution>,
    pub stats: ValidationStats,
}

// ============================================================================
// Indicators
// ============================================================================

/// A capitalized letter that is not just the sentence's leading capital:
/// any later word starting uppercase, or an uppercase letter inside a word.
fn has_proper_noun(name: &str) -> bool {
    name.split_whitespace().enumerate().any(|(i, word)| {
        let mut chars = word.chars();
        let first_upper = chars.next().is_some_and(char::is_uppercase);
        let inner_upper = chars.any(char::is_uppercase);
        inner_upper || (i > 0 && first_upper)
    })
}

pub fn indicators(name: &str) -> SpecificityIndicators {
    let has_proper_noun = has_proper_noun(name);
    SpecificityIndicators {
        has_digit: RE_DIGIT.is_match(name),
        has_proper_noun,
        has_brand: has_proper_noun || RE_APP.is_match(name),
        has_authorship: RE_AUTHORSHIP.is_match(name),
        has_protocol: RE_PROTOCOL.is_match(name),
    }
}

// ============================================================================
// Scorer
// ============================================================================

pub struct SpecificityScorer {
    filter: Arc<GenericFilter>,
    blocked: HashSet<String>,
    rules_version: String,
}

impl SpecificityScorer {
    pub fn new(rules: &RuleSet, filter: Arc<GenericFilter>) -> Self {
        let blocked = rules
            .generic_terms
            .iter()
            .cloned()
            .chain(rules.templated_generics())
            .collect();
        Self {
            filter,
            blocked,
            rules_version: rules.version.clone(),
        }
    }

    pub fn check_specificity(&self, name: &str) -> SpecificityCheck {
        let trimmed = name.trim();
        let normalized = normalize(trimmed);
        let mut failure_reasons = Vec::new();
        let mut is_specific = true;

        if self.blocked.contains(&normalized) {
            is_specific = false;
            failure_reasons.push(format!("\"{}\" is a generic term", trimmed));
        }

        let indicators = indicators(trimmed);
        let specificity_score = indicators.score();
        if specificity_score == 0 {
            is_specific = false;
            failure_reasons
                .push("no digit, proper noun, brand, author, or protocol found".to_string());
        }

        let is_googleable =
            indicators.has_proper_noun || indicators.has_digit || indicators.has_authorship;
        if !is_googleable {
            failure_reasons.push("not googleable without a proper noun, number, or author".to_string());
        }

        if trimmed.chars().count() < MIN_NAME_CHARS {
            is_specific = false;
            failure_reasons.push(format!("shorter than {} characters", MIN_NAME_CHARS));
        }

        let words = trimmed.split(' ').filter(|w| !w.is_empty()).count();
        if words > MAX_NAME_WORDS {
            is_specific = false;
            failure_reasons.push(format!("more than {} words ({})", MAX_NAME_WORDS, words));
        }

        let passes_filters = match self.filter.rejection(trimmed, &normalized) {
            Some(rejection) => {
                failure_reasons.push(format!("fails generic filter: {}", rejection));
                false
            }
            None => true,
        };

        debug!(
            "Specificity of {:?}: score {} specific={} googleable={} filters={}",
            trimmed, specificity_score, is_specific, is_googleable, passes_filters
        );

        SpecificityCheck {
            is_specific,
            is_googleable,
            passes_filters,
            specificity_score,
            indicators,
            failure_reasons,
        }
    }

    /// Batch gate for admin tooling. Blank names are skipped; order is kept.
    pub fn validate_solutions<S: AsRef<str> + Sync>(&self, names: &[S]) -> ValidationReport {
        let checked: Vec<(String, SpecificityCheck)> = names
            .par_iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .map(|n| (n.to_string(), self.check_specificity(n)))
            .collect();

        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for (name, check) in checked {
            if check.is_acceptable() {
                valid.push(name);
            } else {
                invalid.push(InvalidSolution {
                    name,
                    reasons: check.failure_reasons,
                });
            }
        }

        let total = valid.len() + invalid.len();
        let pass_rate = if total == 0 {
            0.0
        } else {
            valid.len() as f64 / total as f64
        };

        info!(
            "Validated {} names: {} valid, {} invalid",
            total,
            valid.len(),
            invalid.len()
        );

        ValidationReport {
            stats: ValidationStats {
                total,
                valid: valid.len(),
                invalid: invalid.len(),
                pass_rate,
                rules_version: self.rules_version.clone(),
                checked_at: Utc::now().to_rfc3339(),
            },
            valid,
            invalid,
        }
    }
}
