//! Result Presenter — segments returned analysis text for display.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Display emphasis for a match score. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrength {
    Strong,   // ≥ 80
    Moderate, // 60 – 79
    Weak,     // < 60
}

impl MatchStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => MatchStrength::Strong,
            60..=79 => MatchStrength::Moderate,
            _ => MatchStrength::Weak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub match_score: u8,
    pub strength: MatchStrength,
    pub segments: Vec<String>,
    pub analysis_text: String,
}

fn list_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"[0-9]+\)").expect("list marker pattern is valid"))
}

/// Splits analysis text on numbered-list markers like `1)` and `2)`.
///
/// Fragments are trimmed at the ends only and empty ones are dropped.
/// Order is preserved.
pub fn format(analysis_text: &str) -> Vec<String> {
    list_marker()
        .split(analysis_text)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(String::from)
        .collect()
}

pub fn present(match_score: u8, analysis_text: &str) -> AnalysisReport {
    AnalysisReport {
        match_score,
        strength: MatchStrength::from_score(match_score),
        segments: format(analysis_text),
        analysis_text: analysis_text.to_string(),
    }
}
