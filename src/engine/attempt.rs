use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    engine::{confirm::SubmitConfirmation, timer::AttemptTimer},
    errors::{AppError, AppResult},
    models::{
        domain::{Answer, AttemptPhase, AttemptResult, AttemptSnapshot, Test},
        dto::{AnswerInput, SubmitAttemptRequest},
    },
    repositories::SubmissionService,
    services::ScoringService,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FinalizeTrigger {
    Timeout,
    Manual,
}

#[derive(Debug)]
pub enum FinalizeOutcome {
    Finished(AttemptResult),
    /// The confirmation gate declined; the attempt is untouched.
    Declined,
    /// Finalize already ran or is in flight; idempotent no-op.
    AlreadyTerminal,
}

pub(crate) enum TickOutcome {
    Running,
    Expired,
    Terminal,
}

struct AttemptState {
    current_index: usize,
    answers: HashMap<String, String>,
    phase: AttemptPhase,
    /// Set when the phase leaves `Ready`, so terminal snapshots stop
    /// counting down.
    frozen_remaining: Option<Duration>,
    result: Option<AttemptResult>,
}

pub(crate) struct AttemptCore {
    test: Test,
    attempt_id: String,
    deadline: Instant,
    submission: Arc<dyn SubmissionService>,
    confirm: Arc<dyn SubmitConfirmation>,
    state: Mutex<AttemptState>,
}

impl AttemptCore {
    fn lock(&self) -> MutexGuard<'_, AttemptState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn remaining_now(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    fn select_option(&self, question_id: &str, option_id: &str) {
        let mut state = self.lock();
        if state.phase.is_terminal() {
            log::debug!(
                "Ignoring selection after finalize on attempt {}",
                self.attempt_id
            );
            return;
        }

        let known = self
            .test
            .question(question_id)
            .map(|q| q.option(option_id).is_some())
            .unwrap_or(false);
        if !known {
            log::debug!(
                "Ignoring selection of unknown question/option '{}'/'{}'",
                question_id,
                option_id
            );
            return;
        }

        state
            .answers
            .insert(question_id.to_string(), option_id.to_string());
    }

    fn next(&self) {
        let mut state = self.lock();
        if state.phase.is_terminal() {
            return;
        }
        state.current_index = (state.current_index + 1).min(self.test.question_count() - 1);
    }

    fn previous(&self) {
        let mut state = self.lock();
        if state.phase.is_terminal() {
            return;
        }
        state.current_index = state.current_index.saturating_sub(1);
    }

    fn jump_to(&self, index: usize) {
        let mut state = self.lock();
        if state.phase.is_terminal() || index >= self.test.question_count() {
            return;
        }
        state.current_index = index;
    }

    fn current_answer(&self, question_id: &str) -> Option<String> {
        self.lock().answers.get(question_id).cloned()
    }

    fn progress(&self) -> (usize, usize) {
        (self.lock().answers.len(), self.test.question_count())
    }

    fn snapshot(&self) -> AttemptSnapshot {
        let state = self.lock();
        let answers = self
            .test
            .questions
            .iter()
            .filter_map(|q| {
                state.answers.get(&q.id).map(|option_id| Answer {
                    question_id: q.id.clone(),
                    option_id: option_id.clone(),
                })
            })
            .collect::<Vec<_>>();

        AttemptSnapshot {
            attempt_id: self.attempt_id.clone(),
            test_id: self.test.id.clone(),
            current_index: state.current_index,
            answered_count: answers.len(),
            question_count: self.test.question_count(),
            answers,
            remaining: state.frozen_remaining.unwrap_or_else(|| self.remaining_now()),
            phase: state.phase,
            result: state.result.clone(),
        }
    }

    fn build_request(&self) -> SubmitAttemptRequest {
        let state = self.lock();
        let answers = self
            .test
            .questions
            .iter()
            .filter_map(|q| {
                state.answers.get(&q.id).map(|option_id| AnswerInput {
                    question_id: q.id.clone(),
                    option_id: option_id.clone(),
                })
            })
            .collect();

        SubmitAttemptRequest {
            test_id: self.test.id.clone(),
            answers,
        }
    }

    pub(crate) fn on_tick(&self) -> TickOutcome {
        let state = self.lock();
        if state.phase.is_terminal() {
            return TickOutcome::Terminal;
        }
        if self.remaining_now().is_zero() {
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    pub(crate) async fn finalize(&self, trigger: FinalizeTrigger) -> AppResult<FinalizeOutcome> {
        if trigger == FinalizeTrigger::Manual {
            // First manual submit goes through the confirmation gate. The
            // counts are re-checked against the gate result below, so a
            // timeout racing the dialog cannot double-submit.
            let pending = {
                let state = self.lock();
                if state.phase == AttemptPhase::Ready {
                    let answered = state.answers.len();
                    Some((answered, self.test.question_count() - answered))
                } else {
                    None
                }
            };

            if let Some((answered, unanswered)) = pending {
                if !self.confirm.confirm_submission(answered, unanswered).await {
                    log::info!("Submission declined for attempt {}", self.attempt_id);
                    return Ok(FinalizeOutcome::Declined);
                }
            }
        }

        // One-shot terminal gate: checked and set in a single critical
        // section so a timer tick and a user submit cannot both proceed.
        {
            let mut state = self.lock();
            match state.phase {
                AttemptPhase::Ready => {
                    state.frozen_remaining = Some(self.remaining_now());
                    state.phase = AttemptPhase::Submitting;
                }
                AttemptPhase::SubmissionFailed if trigger == FinalizeTrigger::Manual => {
                    state.phase = AttemptPhase::Submitting;
                }
                _ => return Ok(FinalizeOutcome::AlreadyTerminal),
            }
        }

        // Rebuilt fresh on every (re)try from the still-intact answer set.
        let request = self.build_request();

        match self.submission.submit_attempt(&request).await {
            Ok(ack) => {
                let result = {
                    let mut state = self.lock();
                    let result = ScoringService::score(&self.test, &state.answers);
                    state.result = Some(result.clone());
                    state.phase = AttemptPhase::Finished;
                    result
                };
                log::info!(
                    "Attempt {} finalized ({:?}): {}/{} correct, ack id {:?}",
                    self.attempt_id,
                    trigger,
                    result.correct_count,
                    result.total_count,
                    ack.attempt_id
                );
                Ok(FinalizeOutcome::Finished(result))
            }
            Err(err) => {
                self.lock().phase = AttemptPhase::SubmissionFailed;
                log::warn!(
                    "Submission failed for attempt {}: {} (answers retained for retry)",
                    self.attempt_id,
                    err
                );
                Err(err)
            }
        }
    }
}

/// One user's run through a test: answer tracking, navigation, the
/// countdown, and the irreversible finalize step. Created by
/// `AssessmentClient::start_attempt` once the test definition is loaded.
pub struct AttemptEngine {
    core: Arc<AttemptCore>,
    timer: AttemptTimer,
}

impl AttemptEngine {
    pub fn start(
        test: Test,
        submission: Arc<dyn SubmissionService>,
        confirm: Arc<dyn SubmitConfirmation>,
    ) -> AppResult<Self> {
        if test.questions.is_empty() {
            return Err(AppError::Validation(
                "test definition has no questions".to_string(),
            ));
        }

        let attempt_id = Uuid::new_v4().to_string();
        log::info!(
            "Starting attempt {} for test {} ({} questions, {:?})",
            attempt_id,
            test.id,
            test.question_count(),
            test.duration
        );

        let core = Arc::new(AttemptCore {
            deadline: Instant::now() + test.duration,
            test,
            attempt_id,
            submission,
            confirm,
            state: Mutex::new(AttemptState {
                current_index: 0,
                answers: HashMap::new(),
                phase: AttemptPhase::Ready,
                frozen_remaining: None,
                result: None,
            }),
        });
        let timer = AttemptTimer::spawn(Arc::clone(&core));

        Ok(Self { core, timer })
    }

    /// Replaces any previous selection for the question (last write wins).
    /// Ignored once the attempt is terminal or when the ids are unknown.
    pub fn select_option(&self, question_id: &str, option_id: &str) {
        self.core.select_option(question_id, option_id);
    }

    pub fn current_answer(&self, question_id: &str) -> Option<String> {
        self.core.current_answer(question_id)
    }

    /// `(answered_count, total_count)`.
    pub fn progress(&self) -> (usize, usize) {
        self.core.progress()
    }

    pub fn next(&self) {
        self.core.next();
    }

    pub fn previous(&self) {
        self.core.previous();
    }

    pub fn jump_to(&self, index: usize) {
        self.core.jump_to(index);
    }

    pub fn remaining(&self) -> Duration {
        self.core.snapshot().remaining
    }

    pub fn snapshot(&self) -> AttemptSnapshot {
        self.core.snapshot()
    }

    pub fn test(&self) -> &Test {
        &self.core.test
    }

    pub fn attempt_id(&self) -> &str {
        &self.core.attempt_id
    }

    /// Manual finalize. Runs the confirmation gate on the first call from
    /// `Ready`; retries after a failed submission skip the gate since the
    /// answer set cannot have changed. Safe to call concurrently with the
    /// countdown expiring: exactly one submission is sent.
    pub async fn submit(&self) -> AppResult<FinalizeOutcome> {
        let outcome = self.core.finalize(FinalizeTrigger::Manual).await;
        if matches!(outcome, Ok(FinalizeOutcome::Finished(_))) {
            self.timer.stop();
        }
        outcome
    }
}

impl std::fmt::Debug for AttemptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptEngine")
            .field("attempt_id", &self.core.attempt_id)
            .field("test_id", &self.core.test.id)
            .finish_non_exhaustive()
    }
}

impl Drop for AttemptEngine {
    fn drop(&mut self) {
        self.timer.stop();
    }
}
