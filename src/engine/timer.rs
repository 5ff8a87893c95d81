use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::engine::attempt::{AttemptCore, FinalizeTrigger, TickOutcome};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Countdown task owned by exactly one attempt. Each tick re-derives the
/// remaining time from the fixed deadline; when it reaches zero the task
/// triggers finalization once and exits. The task never outlives its
/// engine: it is aborted on successful finalize and on teardown.
pub(crate) struct AttemptTimer {
    handle: JoinHandle<()>,
}

impl AttemptTimer {
    pub(crate) fn spawn(core: Arc<AttemptCore>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(TICK_INTERVAL);
            // After a suspension the next tick re-reads the deadline, so
            // catch-up bursts have nothing to add.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match core.on_tick() {
                    TickOutcome::Running => {}
                    TickOutcome::Terminal => break,
                    TickOutcome::Expired => {
                        if let Err(err) = core.finalize(FinalizeTrigger::Timeout).await {
                            // The attempt stays in its retryable state; the
                            // shell surfaces the retry affordance.
                            log::warn!("Submission on timeout failed: {}", err);
                        }
                        break;
                    }
                }
            }
        });

        Self { handle }
    }

    pub(crate) fn stop(&self) {
        self.handle.abort();
    }
}
