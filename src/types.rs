//! Output types of a detection request

use crate::categories::Category;
use serde::Serialize;

/// How strongly a category assignment is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Exact keyword evidence
    High,
    /// Fuzzy keyword or pattern evidence
    Medium,
    /// Partial keyword overlap only
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// How a candidate solution relates to the literal query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Partial,
    /// Derived from a keyword, not a stored solution
    Suggested,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSolution {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub category_display_name: String,
    pub match_type: MatchType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMatch {
    pub category: Category,
    pub confidence: Confidence,
    pub display_name: String,
    pub description: String,
}

impl CategoryMatch {
    pub fn new(category: Category, confidence: Confidence) -> Self {
        Self {
            category,
            confidence,
            display_name: category.display_name().to_string(),
            description: category.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub keyword: String,
    pub category: Category,
    pub category_display_name: String,
    pub match_score: f64,
}

/// The complete output of one classification request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub solutions: Vec<CandidateSolution>,
    pub categories: Vec<CategoryMatch>,
    /// The caller's input with surrounding whitespace trimmed. Inner spacing
    /// and case are kept; backends see the normalized form instead.
    pub search_term: String,
    pub keyword_matches: Vec<KeywordMatch>,
}

impl DetectionResult {
    pub fn empty(search_term: &str) -> Self {
        Self {
            search_term: search_term.to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty() && self.categories.is_empty() && self.keyword_matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_serializes_camel_case() {
        let json = serde_json::to_value(DetectionResult::empty("")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "solutions": [],
                "categories": [],
                "searchTerm": "",
                "keywordMatches": []
            })
        );
    }

    #[test]
    fn test_category_match_decorated_from_registry() {
        let m = CategoryMatch::new(Category::Sleep, Confidence::Low);
        assert_eq!(m.display_name, "Sleep");
        assert_eq!(m.confidence.as_str(), "low");
    }

    #[test]
    fn test_candidate_omits_missing_score() {
        let candidate = CandidateSolution {
            id: "keyword:sleep:melatonin".to_string(),
            title: "melatonin".to_string(),
            category: Category::Sleep,
            category_display_name: "Sleep".to_string(),
            match_type: MatchType::Suggested,
            match_score: None,
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert!(json.get("matchScore").is_none());
        assert_eq!(json["matchType"], "suggested");
    }
}
