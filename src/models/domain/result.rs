use serde::{Deserialize, Serialize};

/// Locally computed summary shown right after finalize. Provisional: the
/// submission backend stores the authoritative score.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptResult {
    pub correct_count: usize,
    pub total_count: usize,
    pub percentage: f64,
    pub passed: bool,
    pub question_results: Vec<QuestionResult>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    /// `None` when the question was left unanswered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,
    pub correct: bool,
}
