use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::domain::result::AttemptResult;

/// The user's recorded choice for one question. At most one per question id;
/// a newer selection replaces the older one.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub question_id: String,
    pub option_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum AttemptPhase {
    /// Answering and navigation are open; the countdown is running.
    Ready,
    /// Finalize is in flight; no further mutation, no second submission.
    Submitting,
    /// Finalize failed. Answers are intact and finalize may be re-invoked;
    /// there is no way back to `Ready`.
    SubmissionFailed,
    Finished,
}

impl AttemptPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptPhase::Ready)
    }
}

/// Read-model handed to the rendering shell. Everything the page needs to
/// draw one frame of the attempt.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptSnapshot {
    pub attempt_id: String,
    pub test_id: String,
    pub current_index: usize,
    pub answered_count: usize,
    pub question_count: usize,
    /// Answers in test question order.
    pub answers: Vec<Answer>,
    pub remaining: Duration,
    pub phase: AttemptPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AttemptResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_terminality() {
        assert!(!AttemptPhase::Ready.is_terminal());
        assert!(AttemptPhase::Submitting.is_terminal());
        assert!(AttemptPhase::SubmissionFailed.is_terminal());
        assert!(AttemptPhase::Finished.is_terminal());
    }

    #[test]
    fn test_snapshot_serializes_without_result_until_finished() {
        let snapshot = AttemptSnapshot {
            attempt_id: "attempt-1".to_string(),
            test_id: "test-1".to_string(),
            current_index: 0,
            answered_count: 1,
            question_count: 3,
            answers: vec![Answer {
                question_id: "q-1".to_string(),
                option_id: "o-1".to_string(),
            }],
            remaining: Duration::from_secs(30),
            phase: AttemptPhase::Ready,
            result: None,
        };

        let json = serde_json::to_string(&snapshot).expect("snapshot should serialize");
        assert!(!json.contains("\"result\""));

        let parsed: AttemptSnapshot =
            serde_json::from_str(&json).expect("snapshot should deserialize");
        assert_eq!(parsed, snapshot);
    }
}
