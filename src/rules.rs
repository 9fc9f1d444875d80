//! Generic-term and category-pattern rule tables
//!
//! The built-in tables are the default, versioned rule set. Operators may ship
//! a JSON file overriding any subset of the tables; fields absent from the file
//! keep their built-in values.

use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Version of the built-in rule tables
pub const BUILTIN_RULES_VERSION: &str = "2024.11";

// ============================================================================
// Built-in Tables
// ============================================================================

/// Exact-match blocklist: category or modality names, never specific solutions
const GENERIC_TERMS: &[&str] = &[
    "therapy",
    "therapies",
    "therapist",
    "medication",
    "medications",
    "medicine",
    "medicines",
    "supplement",
    "supplements",
    "vitamin",
    "vitamins",
    "exercise",
    "exercises",
    "workout",
    "workouts",
    "meditation",
    "mindfulness",
    "yoga",
    "diet",
    "dieting",
    "counseling",
    "counselling",
    "treatment",
    "treatments",
    "remedy",
    "remedies",
    "psychotherapy",
    "talk therapy",
    "group therapy",
    "physical therapy",
    "cbt",
    "cognitive behavioral therapy",
    "dbt",
    "dialectical behavior therapy",
    "emdr",
    "antidepressant",
    "antidepressants",
    "ssri",
    "ssris",
    "painkillers",
    "probiotics",
    "journaling",
    "breathing exercises",
    "support group",
    "self care",
    "self-care",
];

/// Bare single words that are never a solution name on their own
const SINGLE_WORD_GENERICS: &[&str] = &[
    "therapy",
    "therapist",
    "medication",
    "medicine",
    "supplement",
    "vitamin",
    "exercise",
    "workout",
    "meditation",
    "yoga",
    "pilates",
    "mindfulness",
    "diet",
    "treatment",
    "remedy",
    "counseling",
    "journaling",
    "running",
    "walking",
    "stretching",
    "breathing",
    "fasting",
    "sleep",
    "app",
];

/// Titles matching any of these are category names rather than solutions
const CATEGORY_SUFFIX_PATTERNS: &[&str] = &[
    r"\b(medications|medicines|drugs)$",
    r"\b(supplements|vitamins|supplementation)$",
    r"\b(therapy|therapies|treatments)$",
    r"\bcounseling$",
    r"^\w+ counseling\b",
    r"\b(exercises|workouts|programs)$",
    r"\b(remedies|solutions)$",
    r"^(general|generic|common|typical|standard)\b",
    r"\b(strategy|strategies|approach|approaches|method|methods)$",
    r"\bprotocols?$",
    r"\bserums?$",
    r"^(anti|non)[- ]",
    r"\((non|anti)[- ]?[^)]*\)",
];

/// Legitimately short names that override the suffix patterns
const ALLOWED_EXCEPTIONS: &[&str] = &[
    r"^vitamin [a-k]\d{0,2}\b",
    r"^b-?\d{1,2}\b",
    r"^omega[- ]?\d{1,2}\b",
];

/// Bare queries too broad to surface any candidate containing them
const BROAD_QUERY_TERMS: &[&str] = &["vitamin", "vitamins"];

/// Templated wrappers around a generic term (`{}` is the term)
const GENERIC_TEMPLATES: &[&str] = &["try {}", "{} practice", "{} exercises", "{} techniques"];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// RuleSet
// ============================================================================

/// Read-only configuration consumed by the generic filter and specificity scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub version: String,
    pub generic_terms: Vec<String>,
    pub single_word_generics: Vec<String>,
    pub category_suffix_patterns: Vec<String>,
    pub allowed_exceptions: Vec<String>,
    pub broad_query_terms: Vec<String>,
    pub generic_templates: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            version: BUILTIN_RULES_VERSION.to_string(),
            generic_terms: owned(GENERIC_TERMS),
            single_word_generics: owned(SINGLE_WORD_GENERICS),
            category_suffix_patterns: owned(CATEGORY_SUFFIX_PATTERNS),
            allowed_exceptions: owned(ALLOWED_EXCEPTIONS),
            broad_query_terms: owned(BROAD_QUERY_TERMS),
            generic_templates: owned(GENERIC_TEMPLATES),
        }
    }
}

impl RuleSet {
    /// Load a rule override file. Missing fields keep their built-in values.
    pub fn from_file(path: &Path) -> Result<RuleSet> {
        let content = fs::read_to_string(path).map_err(|e| ClassifierError::RulesRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<RuleSet> {
        let mut rules: RuleSet =
            serde_json::from_str(content).map_err(|e| ClassifierError::RulesParse(e.to_string()))?;
        rules.lowercase_terms();
        Ok(rules)
    }

    fn lowercase_terms(&mut self) {
        for list in [
            &mut self.generic_terms,
            &mut self.single_word_generics,
            &mut self.broad_query_terms,
        ] {
            for term in list.iter_mut() {
                *term = term.trim().to_lowercase();
            }
        }
    }

    /// Expand the templated forms of every generic term, lowercased.
    pub fn templated_generics(&self) -> Vec<String> {
        self.generic_templates
            .iter()
            .flat_map(|template| {
                self.generic_terms
                    .iter()
                    .map(move |term| template.replace("{}", term))
            })
            .collect()
    }
}
