pub mod request;
pub mod response;

pub use request::{AnswerInput, SubmitAttemptRequest};
pub use response::{OptionDto, QuestionDto, SubmissionAck, TestDto};
