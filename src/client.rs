use std::{sync::Arc, time::Duration};

use crate::{
    auth::{EnvSessionProvider, SessionProvider},
    config::Config,
    engine::{AttemptEngine, SubmitConfirmation},
    errors::{AppError, AppResult},
    repositories::{HttpSubmissionService, HttpTestRepository, SubmissionService, TestRepository},
};

/// Entry point for the surrounding shell: wires configuration into the HTTP
/// stack and hands out attempt engines. The loading/error states around an
/// attempt live here; a failed load surfaces as an error and retry-load is
/// calling `start_attempt` again.
pub struct AssessmentClient {
    test_repository: Arc<dyn TestRepository>,
    submission_service: Arc<dyn SubmissionService>,
}

impl AssessmentClient {
    pub fn new(
        test_repository: Arc<dyn TestRepository>,
        submission_service: Arc<dyn SubmissionService>,
    ) -> Self {
        Self {
            test_repository,
            submission_service,
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        config.validate()?;

        let session: Arc<dyn SessionProvider> = Arc::new(EnvSessionProvider::from_config(config));
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| AppError::Validation(format!("could not build HTTP client: {}", err)))?;

        Ok(Self::new(
            Arc::new(HttpTestRepository::new(
                http.clone(),
                &config.backend_base_url,
                Arc::clone(&session),
            )),
            Arc::new(HttpSubmissionService::new(
                http,
                &config.backend_base_url,
                session,
            )),
        ))
    }

    /// Loads the test for the course and opens an attempt: index 0, empty
    /// answer set, full duration remaining, countdown running. The `confirm`
    /// capability is invoked before any manual finalize.
    pub async fn start_attempt(
        &self,
        course_id: &str,
        confirm: Arc<dyn SubmitConfirmation>,
    ) -> AppResult<AttemptEngine> {
        let test = self
            .test_repository
            .find_by_course(course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no test scheduled for course '{}'", course_id))
            })?;

        AttemptEngine::start(test, Arc::clone(&self.submission_service), confirm)
    }
}
