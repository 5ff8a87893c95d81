use async_trait::async_trait;

/// Yes/no gate the surrounding shell provides for manual submission. An
/// implementation must show the user the answered/unanswered counts and
/// warn that unanswered questions count as incorrect before answering.
#[async_trait]
pub trait SubmitConfirmation: Send + Sync {
    async fn confirm_submission(&self, answered: usize, unanswered: usize) -> bool;
}

/// Proceeds unconditionally. For headless callers and tests.
pub struct AutoConfirm;

#[async_trait]
impl SubmitConfirmation for AutoConfirm {
    async fn confirm_submission(&self, _answered: usize, _unanswered: usize) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_confirm_always_proceeds() {
        assert!(AutoConfirm.confirm_submission(0, 10).await);
        assert!(AutoConfirm.confirm_submission(10, 0).await);
    }
}
