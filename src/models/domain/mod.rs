pub mod attempt;
pub mod result;

pub use attempt::{Answer, AttemptPhase, AttemptSnapshot};
pub use result::{AttemptResult, QuestionResult};
pub use test::{Question, QuestionOption, Test};
