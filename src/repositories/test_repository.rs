use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::sync::Arc;

use crate::{
    auth::SessionProvider,
    errors::{AppError, AppResult},
    models::{domain::Test, dto::TestDto},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestRepository: Send + Sync {
    /// `Ok(None)` means the course has no test scheduled, a terminal state
    /// for the caller as opposed to a retryable failure.
    async fn find_by_course(&self, course_id: &str) -> AppResult<Option<Test>>;
}

pub struct HttpTestRepository {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl HttpTestRepository {
    pub fn new(http: reqwest::Client, base_url: &str, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }
}

#[async_trait]
impl TestRepository for HttpTestRepository {
    async fn find_by_course(&self, course_id: &str) -> AppResult<Option<Test>> {
        let token = self.session.access_token()?;
        let url = format!("{}/api/courses/{}/test", self.base_url, course_id);

        log::info!("Loading test definition for course {}", course_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|err| AppError::Transient(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Auth(format!(
                "test endpoint rejected credential with {}",
                response.status()
            ))),
            status if status.is_success() => {
                let dto: TestDto = response
                    .json()
                    .await
                    .map_err(|err| AppError::Transient(format!("malformed test body: {}", err)))?;
                Ok(Some(Test::try_from(dto)?))
            }
            status => Err(AppError::Transient(format!(
                "test endpoint returned {}",
                status
            ))),
        }
    }
}
