//! Solution Classifier - recognize and route "what helped" free text
//!
//! Given a free-text description of something that helped with a goal:
//! - finds already-known solutions it names (filtered against generic terms)
//! - assigns categories through a four-tier, confidence-decreasing cascade
//! - suggests keyword-level completions and likely new solution names
//! - ranks everything into one deduplicated list
//!
//! Separately, [`specificity`] gates proposed new solution names before they
//! are accepted into the catalog.
//!
//! Search itself is delegated to a [`backend::SearchBackend`]; the classifier
//! holds no state between requests and is safe to call concurrently.

pub mod backend;
pub mod cascade;
pub mod categories;
pub mod detector;
pub mod error;
pub mod filter;
pub mod keywords;
pub mod matcher;
pub mod normalize;
pub mod rank;
pub mod rules;
pub mod settings;
pub mod specificity;
pub mod types;

pub use categories::{get_categories_by_group, get_category_info, Category, CategoryGroup, CategoryInfo};
pub use detector::SolutionDetector;
pub use error::{ClassifierError, Result};
pub use rules::RuleSet;
pub use settings::DetectorSettings;
pub use specificity::{SpecificityCheck, ValidationReport};
pub use types::{CandidateSolution, CategoryMatch, Confidence, DetectionResult, KeywordMatch, MatchType};
