pub mod submission_service;
pub mod test_repository;

pub use submission_service::{HttpSubmissionService, SubmissionService};
pub use test_repository::{HttpTestRepository, TestRepository};
