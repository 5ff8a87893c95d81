use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::sync::Arc;

use crate::{
    auth::SessionProvider,
    errors::{AppError, AppResult},
    models::dto::{SubmissionAck, SubmitAttemptRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit_attempt(&self, request: &SubmitAttemptRequest) -> AppResult<SubmissionAck>;
}

pub struct HttpSubmissionService {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl HttpSubmissionService {
    pub fn new(http: reqwest::Client, base_url: &str, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }
}

#[async_trait]
impl SubmissionService for HttpSubmissionService {
    async fn submit_attempt(&self, request: &SubmitAttemptRequest) -> AppResult<SubmissionAck> {
        let token = self.session.access_token()?;
        let url = format!("{}/api/tests/{}/attempts", self.base_url, request.test_id);

        log::info!(
            "Submitting attempt for test {} with {} answers",
            request.test_id,
            request.answers.len()
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|err| AppError::Submission(err.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Auth(format!(
                "submission endpoint rejected credential with {}",
                response.status()
            ))),
            status if status.is_success() => response
                .json()
                .await
                .map_err(|err| AppError::Submission(format!("malformed ack body: {}", err))),
            status => Err(AppError::Submission(format!(
                "submission endpoint returned {}",
                status
            ))),
        }
    }
}
