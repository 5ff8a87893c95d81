pub mod attempt;
pub mod confirm;
pub mod timer;

pub use attempt::{AttemptEngine, FinalizeOutcome};
pub use confirm::{AutoConfirm, SubmitConfirmation};
