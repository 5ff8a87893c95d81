use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("No test available: {0}")]
    NotFound(String),

    #[error("Could not load test: {0}")]
    Transient(String),

    #[error("Could not submit attempt: {0}")]
    Submission(String),

    #[error("Unauthorized: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Transient(_) => "TRANSIENT",
            AppError::Submission(_) => "SUBMISSION_FAILED",
            AppError::Auth(_) => "UNAUTHORIZED",
            AppError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Whether the caller may recover by repeating the failed step with the
    /// same inputs: reloading the test or re-invoking finalize.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transient(_) | AppError::Submission(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
