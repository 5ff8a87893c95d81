use serde::{Deserialize, Serialize};
use validator::Validate;

/// Submission payload. Only answered questions appear; the backend treats
/// absent questions as incorrect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(length(min = 1))]
    pub test_id: String,

    #[validate(nested)]
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnswerInput {
    #[validate(length(min = 1))]
    pub question_id: String,

    #[validate(length(min = 1))]
    pub option_id: String,
}
