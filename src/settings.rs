//! Request-time tuning knobs

/// Thresholds applied while assembling a detection result
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorSettings {
    /// Keyword suggestions must score strictly above this
    pub keyword_score_floor: f64,
    /// Partial category matching only runs for terms at least this long
    pub partial_match_min_len: usize,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            keyword_score_floor: 0.5,
            partial_match_min_len: 3,
        }
    }
}
