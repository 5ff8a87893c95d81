use std::collections::HashMap;

use crate::models::domain::{AttemptResult, QuestionResult, Test};

pub struct ScoringService;

impl ScoringService {
    /// Grade an answer set against the test definition. Unanswered questions
    /// and selections of unknown options count as incorrect. The outcome is
    /// provisional feedback; the submission backend keeps the score of
    /// record.
    pub fn score(test: &Test, answers: &HashMap<String, String>) -> AttemptResult {
        let mut correct_count = 0;
        let mut question_results = Vec::with_capacity(test.question_count());

        for question in &test.questions {
            let selected = answers.get(&question.id);
            let correct = selected
                .and_then(|option_id| question.option(option_id))
                .map(|option| option.correct)
                .unwrap_or(false);

            if correct {
                correct_count += 1;
            }

            question_results.push(QuestionResult {
                question_id: question.id.clone(),
                selected_option_id: selected.cloned(),
                correct,
            });
        }

        let total_count = test.question_count();
        let percentage = if total_count == 0 {
            0.0
        } else {
            correct_count as f64 * 100.0 / total_count as f64
        };

        AttemptResult {
            correct_count,
            total_count,
            percentage,
            // Integer form of percentage >= 50, exact at the boundary.
            passed: correct_count * 2 >= total_count && total_count > 0,
            question_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Question, QuestionOption};
    use std::time::Duration;

    fn option(id: &str, correct: bool) -> QuestionOption {
        QuestionOption {
            id: id.to_string(),
            text: format!("Option {}", id),
            correct,
        }
    }

    fn make_test(question_count: usize) -> Test {
        let questions = (1..=question_count)
            .map(|n| Question {
                id: format!("q-{}", n),
                prompt: format!("Question {}", n),
                options: vec![
                    option(&format!("q-{}-right", n), true),
                    option(&format!("q-{}-wrong", n), false),
                ],
            })
            .collect();

        Test {
            id: "test-1".to_string(),
            course_id: "course-1".to_string(),
            title: "Scored test".to_string(),
            description: None,
            duration: Duration::from_secs(60),
            scheduled_for: None,
            questions,
        }
    }

    #[test]
    fn test_unanswered_questions_count_incorrect() {
        let test = make_test(3);
        let mut answers = HashMap::new();
        answers.insert("q-1".to_string(), "q-1-right".to_string());
        answers.insert("q-2".to_string(), "q-2-wrong".to_string());

        let result = ScoringService::score(&test, &answers);

        assert_eq!(result.correct_count, 1);
        assert_eq!(result.total_count, 3);
        assert!((result.percentage - 100.0 / 3.0).abs() < 1e-9);
        assert!(!result.passed);

        let q3 = &result.question_results[2];
        assert_eq!(q3.question_id, "q-3");
        assert!(q3.selected_option_id.is_none());
        assert!(!q3.correct);
    }

    #[test]
    fn test_unknown_option_selection_counts_incorrect() {
        let test = make_test(1);
        let mut answers = HashMap::new();
        answers.insert("q-1".to_string(), "no-such-option".to_string());

        let result = ScoringService::score(&test, &answers);

        assert_eq!(result.correct_count, 0);
        assert_eq!(result.question_results[0].selected_option_id.as_deref(), Some("no-such-option"));
    }

    #[test]
    fn test_exactly_half_correct_passes() {
        let test = make_test(2);
        let mut answers = HashMap::new();
        answers.insert("q-1".to_string(), "q-1-right".to_string());
        answers.insert("q-2".to_string(), "q-2-wrong".to_string());

        let result = ScoringService::score(&test, &answers);

        assert_eq!(result.percentage, 50.0);
        assert!(result.passed);
    }

    #[test]
    fn test_empty_answer_set_scores_zero() {
        let test = make_test(2);
        let result = ScoringService::score(&test, &HashMap::new());

        assert_eq!(result.correct_count, 0);
        assert!(!result.passed);
        assert_eq!(result.question_results.len(), 2);
    }
}
