//! DailySweep - In-process scheduled shutdown
//!
//! Runs the sweep once a day at a fixed UTC time. Deployments driven by an
//! external scheduler leave `sweep.daily_at` unset and post scheduled events
//! to `/events` instead.

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::state::AppState;

/// Next instant at `at` (UTC) strictly after `now`
pub fn next_run(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// Daily sweep schedule
pub struct DailySweep {
    at: NaiveTime,
}

impl DailySweep {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// Spawn the schedule loop; abort the handle to stop it
    pub fn spawn(self, state: Arc<AppState>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let due = next_run(now, self.at);
                let wait = (due - now).to_std().unwrap_or_default();
                info!(next_run = %due, "Scheduled shutdown armed");

                tokio::time::sleep(wait).await;

                let span = info_span!("invocation", id = %Uuid::new_v4(), trigger = "daily");
                let outcome = state.sweeper.run().instrument(span).await;
                info!(success = outcome.is_success(), "Daily sweep finished");
            }
        })
    }
}
