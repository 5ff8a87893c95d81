use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::{
    errors::AppError,
    models::domain::{Question, QuestionOption, Test},
};

/// Test definition as the academic backend returns it. Durations travel as
/// whole minutes on the wire.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct TestDto {
    #[validate(length(min = 1))]
    pub id: String,

    #[validate(length(min = 1))]
    pub course_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub duration_minutes: u32,

    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,

    #[validate(length(min = 1), nested)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct QuestionDto {
    #[validate(length(min = 1))]
    pub id: String,

    #[validate(length(min = 1))]
    pub prompt: String,

    #[validate(length(min = 2), nested)]
    pub options: Vec<OptionDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct OptionDto {
    #[validate(length(min = 1))]
    pub id: String,

    pub text: String,

    pub correct: bool,
}

/// Acknowledgement from the submission endpoint. The backend may mint its
/// own attempt id; callers keep it for later reconciliation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionAck {
    #[serde(default)]
    pub attempt_id: Option<String>,
}

impl TryFrom<TestDto> for Test {
    type Error = AppError;

    fn try_from(dto: TestDto) -> Result<Self, Self::Error> {
        dto.validate()?;

        Ok(Test {
            id: dto.id,
            course_id: dto.course_id,
            title: dto.title,
            description: dto.description,
            duration: Duration::from_secs(u64::from(dto.duration_minutes) * 60),
            scheduled_for: dto.scheduled_for,
            questions: dto.questions.into_iter().map(Question::from).collect(),
        })
    }
}

impl From<QuestionDto> for Question {
    fn from(dto: QuestionDto) -> Self {
        Question {
            id: dto.id,
            prompt: dto.prompt,
            options: dto.options.into_iter().map(QuestionOption::from).collect(),
        }
    }
}

impl From<OptionDto> for QuestionOption {
    fn from(dto: OptionDto) -> Self {
        QuestionOption {
            id: dto.id,
            text: dto.text,
            correct: dto.correct,
        }
    }
}
